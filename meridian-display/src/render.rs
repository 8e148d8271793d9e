//! Face renderer
//!
//! Draws one frame from the time, the display flags and the current weather
//! snapshot. Holds only theme and layout; rendering never changes them.

use embedded_graphics::geometry::{Point, Size};
use embedded_graphics::primitives::Rectangle;
use meridian_core::state::DisplayState;
use meridian_core::time::TimeSnapshot;
use meridian_core::weather::WeatherSnapshot;

use crate::backend::{DisplayError, DrawSurface, TextRole, TextStyle};
use crate::theme::{Layout, Theme};

/// Shown until the first forecast arrives
pub const NO_DATA_TEXT: &str = "No Weather Data";

/// Watch face renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderEngine {
    theme: Theme,
    layout: Layout,
}

impl RenderEngine {
    pub const fn new(theme: Theme, layout: Layout) -> Self {
        Self { theme, layout }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Draw one complete frame
    pub fn render<S: DrawSurface>(
        &self,
        surface: &mut S,
        time: &TimeSnapshot,
        display: DisplayState,
        weather: &WeatherSnapshot,
    ) -> Result<(), DisplayError> {
        let background = if display.ambient {
            self.theme.ambient_background
        } else {
            self.theme.background
        };
        surface.clear(background)?;

        let center_x = (surface.size().width / 2) as i32;
        let anti_alias = display.anti_alias();
        let primary = TextStyle {
            role: TextRole::Time,
            color: self.theme.text,
            anti_alias,
        };
        let light = TextStyle {
            role: TextRole::Date,
            color: self.theme.text_light,
            anti_alias,
        };

        let time_text = time.time_text();
        draw_centered(surface, &time_text, center_x, self.layout.time_y, &primary)?;
        draw_centered(surface, &time.date_text, center_x, self.layout.date_y, &light)?;

        let temp_primary = TextStyle {
            role: TextRole::Temperature,
            ..primary
        };
        let temp_light = TextStyle {
            role: TextRole::Temperature,
            ..light
        };

        if !weather.present {
            return draw_centered(surface, NO_DATA_TEXT, center_x, self.layout.temp_y, &temp_light);
        }

        let max_text = weather.max_text();
        let min_text = weather.min_text();
        let max_width = surface.measure_text(&max_text, TextRole::Temperature).width;
        let min_width = surface.measure_text(&min_text, TextRole::Temperature).width;
        let pair_width = max_width + self.layout.temp_gap + min_width;

        // Icon only in active mode; without one the layout matches ambient
        let icon = weather.icon.as_ref().filter(|_| !display.ambient);
        let text_x = match icon {
            Some(icon) => {
                let icon_size = Size::new(icon.width() as u32, icon.height() as u32);
                let block_width = icon_size.width + self.layout.icon_gap + pair_width;
                let left = center_x - (block_width / 2) as i32;
                let top = self.layout.temp_y - (icon_size.height / 2) as i32;

                surface.draw_image(icon, Rectangle::new(Point::new(left, top), icon_size))?;
                left + (icon_size.width + self.layout.icon_gap) as i32
            }
            None => center_x - (pair_width / 2) as i32,
        };

        surface.draw_text(&max_text, Point::new(text_x, self.layout.temp_y), &temp_primary)?;
        let min_x = text_x + (max_width + self.layout.temp_gap) as i32;
        surface.draw_text(&min_text, Point::new(min_x, self.layout.temp_y), &temp_light)
    }
}

fn draw_centered<S: DrawSurface>(
    surface: &mut S,
    text: &str,
    center_x: i32,
    y: i32,
    style: &TextStyle,
) -> Result<(), DisplayError> {
    let width = surface.measure_text(text, style.role).width;
    surface.draw_text(text, Point::new(center_x - (width / 2) as i32, y), style)
}
