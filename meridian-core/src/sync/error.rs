//! Sync error types

use core::fmt;

use crate::traits::TransportError;
use crate::weather::RasterError;

/// Why an event was not a usable weather update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MalformedReason {
    /// Event is for another data path
    WrongPath,
    /// Event is not a change (e.g. a deletion)
    NotChanged,
    /// A temperature field is absent
    MissingField,
    /// A temperature is NaN or infinite
    InvalidValue,
}

/// Weather sync failures
///
/// None of these are fatal; the last good snapshot stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncError {
    /// Update carries no icon asset reference
    InvalidAsset,
    /// Companion did not answer the connect in time
    ConnectionTimeout,
    /// Companion refused or the link failed
    ConnectionFailed,
    /// Asset bytes could not be retrieved
    AssetResolution,
    /// Asset read hit its deadline
    AssetReadTimeout,
    /// Asset exceeds the icon buffer
    AssetTooLarge,
    /// Asset bytes are not a valid icon
    ImageDecode(RasterError),
    /// Event ignored
    MalformedEvent(MalformedReason),
}

impl SyncError {
    /// Event was filtered out rather than failing mid-sync
    pub fn is_ignorable(&self) -> bool {
        matches!(self, SyncError::MalformedEvent(_))
    }
}

impl From<RasterError> for SyncError {
    fn from(err: RasterError) -> Self {
        SyncError::ImageDecode(err)
    }
}

impl From<MalformedReason> for SyncError {
    fn from(reason: MalformedReason) -> Self {
        SyncError::MalformedEvent(reason)
    }
}

impl From<TransportError> for SyncError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::AssetMissing => SyncError::AssetResolution,
            TransportError::Overflow => SyncError::AssetTooLarge,
            TransportError::Refused | TransportError::Disconnected | TransportError::Io => {
                SyncError::ConnectionFailed
            }
        }
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::InvalidAsset => f.write_str("weather update has no icon asset"),
            SyncError::ConnectionTimeout => f.write_str("companion connect timed out"),
            SyncError::ConnectionFailed => f.write_str("companion connect failed"),
            SyncError::AssetResolution => f.write_str("icon asset unavailable"),
            SyncError::AssetReadTimeout => f.write_str("icon asset read timed out"),
            SyncError::AssetTooLarge => f.write_str("icon asset too large"),
            SyncError::ImageDecode(err) => write!(f, "icon decode failed: {:?}", err),
            SyncError::MalformedEvent(reason) => write!(f, "event ignored: {:?}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_mapping() {
        assert_eq!(SyncError::from(TransportError::Refused), SyncError::ConnectionFailed);
        assert_eq!(SyncError::from(TransportError::AssetMissing), SyncError::AssetResolution);
        assert_eq!(SyncError::from(TransportError::Overflow), SyncError::AssetTooLarge);
    }

    #[test]
    fn test_only_malformed_is_ignorable() {
        assert!(SyncError::from(MalformedReason::WrongPath).is_ignorable());
        assert!(!SyncError::ConnectionTimeout.is_ignorable());
    }

    #[test]
    fn test_display() {
        let text = std::format!("{}", SyncError::ImageDecode(RasterError::Truncated));
        assert_eq!(text, "icon decode failed: Truncated");
    }
}
