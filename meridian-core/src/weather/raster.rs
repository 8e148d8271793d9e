//! Icon raster decoding
//!
//! Forecast icons arrive as a 4-byte header (width and height, u16 LE)
//! followed by `width * height` RGB565 pixels in big-endian byte order,
//! which is what SPI panels expect on the wire.

use heapless::Vec;

/// Largest accepted icon edge in pixels
pub const MAX_ICON_DIM: u16 = 64;

/// Header length in bytes
pub const RASTER_HEADER_LEN: usize = 4;

/// Largest pixel payload in bytes
pub const MAX_ICON_BYTES: usize = MAX_ICON_DIM as usize * MAX_ICON_DIM as usize * 2;

/// Largest encoded icon asset in bytes
pub const MAX_ASSET_BYTES: usize = RASTER_HEADER_LEN + MAX_ICON_BYTES;

/// Icon decoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RasterError {
    /// Fewer bytes than the header
    Truncated,
    /// Width or height is zero
    Empty,
    /// Width or height exceeds `MAX_ICON_DIM`
    TooLarge,
    /// Pixel data length disagrees with the header
    LengthMismatch,
}

/// Decoded RGB565 image
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RasterImage {
    width: u16,
    height: u16,
    /// Big-endian RGB565, row-major
    pixels: Vec<u8, MAX_ICON_BYTES>,
}

impl RasterImage {
    /// Decode an icon asset
    pub fn decode(bytes: &[u8]) -> Result<Self, RasterError> {
        if bytes.len() < RASTER_HEADER_LEN {
            return Err(RasterError::Truncated);
        }
        let width = u16::from_le_bytes([bytes[0], bytes[1]]);
        let height = u16::from_le_bytes([bytes[2], bytes[3]]);
        Self::from_pixels(width, height, &bytes[RASTER_HEADER_LEN..])
    }

    /// Build from raw big-endian RGB565 pixels
    pub fn from_pixels(width: u16, height: u16, pixels: &[u8]) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::Empty);
        }
        if width > MAX_ICON_DIM || height > MAX_ICON_DIM {
            return Err(RasterError::TooLarge);
        }
        if pixels.len() != width as usize * height as usize * 2 {
            return Err(RasterError::LengthMismatch);
        }

        // Capacity is guaranteed by the dimension check above
        let pixels = Vec::from_slice(pixels).map_err(|_| RasterError::TooLarge)?;
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Encode back into the asset format, returning bytes written
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, RasterError> {
        let len = RASTER_HEADER_LEN + self.pixels.len();
        if buf.len() < len {
            return Err(RasterError::Truncated);
        }
        buf[..2].copy_from_slice(&self.width.to_le_bytes());
        buf[2..4].copy_from_slice(&self.height.to_le_bytes());
        buf[RASTER_HEADER_LEN..len].copy_from_slice(&self.pixels);
        Ok(len)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Raw big-endian pixel bytes
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Raw RGB565 value at (x, y)
    pub fn pixel(&self, x: u16, y: u16) -> Option<u16> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 2;
        Some(u16::from_be_bytes([self.pixels[i], self.pixels[i + 1]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_one() -> [u8; 8] {
        [2, 0, 1, 0, 0xF8, 0x00, 0x07, 0xE0]
    }

    #[test]
    fn test_decode_header_and_pixels() {
        let image = RasterImage::decode(&two_by_one()).unwrap();
        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 1);
        assert_eq!(image.pixel(0, 0), Some(0xF800)); // red
        assert_eq!(image.pixel(1, 0), Some(0x07E0)); // green
        assert_eq!(image.pixel(2, 0), None);
    }

    #[test]
    fn test_decode_rejects_short_input() {
        assert_eq!(RasterImage::decode(&[1, 0, 1]), Err(RasterError::Truncated));
    }

    #[test]
    fn test_decode_rejects_bad_length() {
        let bytes = two_by_one();
        assert_eq!(
            RasterImage::decode(&bytes[..7]),
            Err(RasterError::LengthMismatch)
        );
    }

    #[test]
    fn test_decode_rejects_empty_and_oversized() {
        assert_eq!(RasterImage::decode(&[0, 0, 4, 0]), Err(RasterError::Empty));
        let big = (MAX_ICON_DIM + 1).to_le_bytes();
        assert_eq!(
            RasterImage::decode(&[big[0], big[1], 1, 0]),
            Err(RasterError::TooLarge)
        );
    }

    #[test]
    fn test_encode_matches_asset_format() {
        let image = RasterImage::decode(&two_by_one()).unwrap();
        let mut buf = [0u8; 16];
        let len = image.encode(&mut buf).unwrap();
        assert_eq!(&buf[..len], &two_by_one());
    }

    #[test]
    fn test_largest_icon_fits() {
        let pixels = [0x5Au8; MAX_ICON_BYTES];
        let image = RasterImage::from_pixels(MAX_ICON_DIM, MAX_ICON_DIM, &pixels).unwrap();
        assert_eq!(image.pixels().len(), MAX_ICON_BYTES);
    }
}
