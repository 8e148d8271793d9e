//! Face configuration compiled in from face.toml

use meridian_core::config::{ClockConfig, FaceConfig, SyncConfig, TimerConfig};
use meridian_core::time::ClockFormat;

mod generated {
    include!(concat!(env!("OUT_DIR"), "/face_config.rs"));
}

pub use generated::{BUILD_EPOCH_MS, IDLE_TIMEOUT_S, LOW_BIT_AMBIENT};

/// Configuration built from the generated constants
pub const FACE_CONFIG: FaceConfig = FaceConfig {
    sync: SyncConfig {
        weather_path: generated::WEATHER_PATH,
        connect_timeout_ms: generated::CONNECT_TIMEOUT_MS,
        asset_read_timeout_ms: generated::ASSET_READ_TIMEOUT_MS,
    },
    timer: TimerConfig {
        interval_ms: generated::FRAME_INTERVAL_MS,
    },
    clock: ClockConfig {
        format: if generated::TWELVE_HOUR {
            ClockFormat::TwelveHour
        } else {
            ClockFormat::TwentyFourHour
        },
        utc_offset_s: generated::UTC_OFFSET_S,
    },
};
