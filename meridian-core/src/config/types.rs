//! Configuration type definitions

use crate::scheduler::DEFAULT_INTERVAL_MS;
use crate::time::{ClockFormat, MAX_UTC_OFFSET_S, MIN_UTC_OFFSET_S};
use meridian_protocol::WEATHER_PATH;

/// Maximum data path length (matches the protocol's path capacity)
pub const MAX_PATH_LEN: usize = 32;

/// Default bound on the connection step
pub const DEFAULT_CONNECT_TIMEOUT_MS: u32 = 5_000;

/// Default bound on one asset read
pub const DEFAULT_ASSET_READ_TIMEOUT_MS: u32 = 10_000;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Weather path must start with '/'
    PathNotAbsolute,
    /// Weather path exceeds `MAX_PATH_LEN`
    PathTooLong,
    /// A timeout of zero would fail every sync
    ZeroTimeout,
    /// Frame interval must be non-zero
    ZeroInterval,
    /// UTC offset outside -12h..=+14h
    OffsetOutOfRange,
}

/// Weather sync settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncConfig {
    /// Data path the face listens on
    pub weather_path: &'static str,
    /// Deadline for `ensure_connected`
    pub connect_timeout_ms: u32,
    /// Deadline for reading one icon asset
    pub asset_read_timeout_ms: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncConfig {
    pub const fn new() -> Self {
        Self {
            weather_path: WEATHER_PATH,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            asset_read_timeout_ms: DEFAULT_ASSET_READ_TIMEOUT_MS,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.weather_path.starts_with('/') {
            return Err(ConfigError::PathNotAbsolute);
        }
        if self.weather_path.len() > MAX_PATH_LEN {
            return Err(ConfigError::PathTooLong);
        }
        if self.connect_timeout_ms == 0 || self.asset_read_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

/// Frame timer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerConfig {
    /// Redraw interval in milliseconds
    pub interval_ms: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

/// Wall clock settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    pub format: ClockFormat,
    /// Zone offset applied until the companion reports one
    pub utc_offset_s: i32,
}

/// Complete face configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaceConfig {
    pub sync: SyncConfig,
    pub timer: TimerConfig,
    pub clock: ClockConfig,
}

impl FaceConfig {
    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sync.validate()?;
        if self.timer.interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if !(MIN_UTC_OFFSET_S..=MAX_UTC_OFFSET_S).contains(&self.clock.utc_offset_s) {
            return Err(ConfigError::OffsetOutOfRange);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FaceConfig::default();
        assert_eq!(config.sync.weather_path, "/weather");
        assert_eq!(config.sync.connect_timeout_ms, 5_000);
        assert_eq!(config.timer.interval_ms, 1_000);
        assert_eq!(config.clock.format, ClockFormat::TwentyFourHour);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_relative_path() {
        let mut config = FaceConfig::default();
        config.sync.weather_path = "weather";
        assert_eq!(config.validate(), Err(ConfigError::PathNotAbsolute));
    }

    #[test]
    fn test_rejects_zero_values() {
        let mut config = FaceConfig::default();
        config.sync.asset_read_timeout_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));

        let mut config = FaceConfig::default();
        config.timer.interval_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroInterval));
    }

    #[test]
    fn test_rejects_offset_out_of_range() {
        let mut config = FaceConfig::default();
        config.clock.utc_offset_s = -13 * 3_600;
        assert_eq!(config.validate(), Err(ConfigError::OffsetOutOfRange));
    }
}
