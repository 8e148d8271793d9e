//! Colors and layout constants

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

/// Face colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Active-mode background
    pub background: Rgb565,
    /// Ambient-mode background
    pub ambient_background: Rgb565,
    /// Time and max temperature
    pub text: Rgb565,
    /// Date, min temperature and placeholder
    pub text_light: Rgb565,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme {
    pub const fn new() -> Self {
        Self {
            // #03A9F4
            background: Rgb565::new(0, 42, 30),
            ambient_background: Rgb565::BLACK,
            text: Rgb565::WHITE,
            // #B3FFFFFF over the background, roughly
            text_light: Rgb565::new(24, 50, 29),
        }
    }
}

/// Vertical positions and gaps, tuned for a 240x240 round panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Middle of the time line
    pub time_y: i32,
    /// Middle of the date line
    pub date_y: i32,
    /// Middle of the weather block
    pub temp_y: i32,
    /// Space between icon and temperatures
    pub icon_gap: u32,
    /// Space between max and min temperature
    pub temp_gap: u32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            time_y: 84,
            date_y: 120,
            temp_y: 168,
            icon_gap: 8,
            temp_gap: 10,
        }
    }
}
