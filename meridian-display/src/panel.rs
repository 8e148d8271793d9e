//! `DrawSurface` over an `embedded-graphics` RGB565 target

use embedded_graphics::{
    draw_target::{DrawTarget, DrawTargetExt},
    geometry::{Dimensions, Point, Size},
    image::{Image, ImageRawBE},
    mono_font::{ascii::FONT_9X15, iso_8859_1::FONT_10X20, MonoFont, MonoTextStyle},
    pixelcolor::{Rgb565, RgbColor},
    primitives::Rectangle,
    text::{renderer::TextRenderer, Baseline, Text},
    Drawable,
};
use meridian_core::weather::RasterImage;

use crate::backend::{DisplayError, DrawSurface, TextRole, TextStyle};

/// Font used for each text role
fn font(role: TextRole) -> &'static MonoFont<'static> {
    match role {
        TextRole::Time => &profont::PROFONT_24_POINT,
        TextRole::Date => &FONT_9X15,
        // Needs the degree sign
        TextRole::Temperature => &FONT_10X20,
    }
}

/// Snap each channel to off or full for low-bit panels
fn quantize(color: Rgb565) -> Rgb565 {
    Rgb565::new(
        if color.r() >= 16 { 31 } else { 0 },
        if color.g() >= 32 { 63 } else { 0 },
        if color.b() >= 16 { 31 } else { 0 },
    )
}

/// Panel wrapper implementing `DrawSurface`
pub struct PanelSurface<D> {
    target: D,
}

impl<D: DrawTarget<Color = Rgb565>> PanelSurface<D> {
    pub fn new(target: D) -> Self {
        Self { target }
    }

    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    pub fn into_inner(self) -> D {
        self.target
    }
}

impl<D: DrawTarget<Color = Rgb565>> DrawSurface for PanelSurface<D> {
    fn size(&self) -> Size {
        self.target.bounding_box().size
    }

    fn clear(&mut self, color: Rgb565) -> Result<(), DisplayError> {
        self.target
            .clear(color)
            .map_err(|_| DisplayError::Communication)
    }

    fn fill_rect(&mut self, rect: Rectangle, color: Rgb565) -> Result<(), DisplayError> {
        self.target
            .fill_solid(&rect, color)
            .map_err(|_| DisplayError::Communication)
    }

    fn draw_text(
        &mut self,
        text: &str,
        origin: Point,
        style: &TextStyle,
    ) -> Result<(), DisplayError> {
        let color = if style.anti_alias {
            style.color
        } else {
            quantize(style.color)
        };
        let character_style = MonoTextStyle::new(font(style.role), color);

        Text::with_baseline(text, origin, character_style, Baseline::Middle)
            .draw(&mut self.target)
            .map_err(|_| DisplayError::Communication)?;
        Ok(())
    }

    fn measure_text(&self, text: &str, role: TextRole) -> Size {
        MonoTextStyle::new(font(role), Rgb565::WHITE)
            .measure_string(text, Point::zero(), Baseline::Middle)
            .bounding_box
            .size
    }

    fn draw_image(&mut self, image: &RasterImage, dest: Rectangle) -> Result<(), DisplayError> {
        let raw = ImageRawBE::<Rgb565>::new(image.pixels(), image.width() as u32);
        Image::new(&raw, dest.top_left)
            .draw(&mut self.target.clipped(&dest))
            .map_err(|_| DisplayError::Communication)
    }
}
