//! Drawing surface trait
//!
//! Defines the interface between the face renderer and the display.

use embedded_graphics::geometry::{Point, Size};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::primitives::Rectangle;
use meridian_core::weather::RasterImage;

/// Drawing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with the panel
    Communication,
}

/// Which font a piece of text uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextRole {
    /// Large "HH:MM"
    Time,
    /// Date line
    Date,
    /// Temperatures and the no-data placeholder
    Temperature,
}

/// How to draw one run of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub role: TextRole,
    pub color: Rgb565,
    /// Cleared on low-bit panels in ambient mode
    pub anti_alias: bool,
}

/// Drawing surface
///
/// Text positions are the left edge and vertical middle of the text run.
pub trait DrawSurface {
    /// Surface size in pixels
    fn size(&self) -> Size;

    /// Fill the whole surface
    fn clear(&mut self, color: Rgb565) -> Result<(), DisplayError>;

    /// Fill a rectangle
    fn fill_rect(&mut self, rect: Rectangle, color: Rgb565) -> Result<(), DisplayError>;

    /// Draw text with its left-middle point at `origin`
    fn draw_text(&mut self, text: &str, origin: Point, style: &TextStyle)
        -> Result<(), DisplayError>;

    /// Size `text` would occupy in `role`'s font
    fn measure_text(&self, text: &str, role: TextRole) -> Size;

    /// Composite `image` at `dest`'s top-left corner, clipped to `dest`
    fn draw_image(&mut self, image: &RasterImage, dest: Rectangle) -> Result<(), DisplayError>;
}
