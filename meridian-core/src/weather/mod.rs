//! Weather data as shown on the face
//!
//! The forecast snapshot, the cell it is published through, and icon
//! raster decoding.

pub mod raster;
pub mod snapshot;

pub use raster::{RasterError, RasterImage, MAX_ASSET_BYTES, MAX_ICON_BYTES, MAX_ICON_DIM};
pub use snapshot::{format_temp, round_half_up, SnapshotCell, WeatherSnapshot};
