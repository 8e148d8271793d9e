//! Data items pushed by the companion
//!
//! The phone publishes key/value maps under a logical path. Each change
//! reaches the watch as a `DataEvent`, postcard-encoded inside a
//! `DATA_CHANGED` frame.

use heapless::{String, Vec};
use serde::{Deserialize, Serialize};

use crate::frame::{FrameError, MAX_PAYLOAD_SIZE};

/// Logical path of the weather data item
pub const WEATHER_PATH: &str = "/weather";

/// Key holding the forecast icon asset reference
pub const KEY_ICON: &str = "icon";

/// Key holding the forecast low temperature
pub const KEY_TEMP_MIN: &str = "temp.min";

/// Key holding the forecast high temperature
pub const KEY_TEMP_MAX: &str = "temp.max";

/// Maximum data item path length
pub const MAX_PATH_LEN: usize = 32;

/// Maximum key length
pub const MAX_KEY_LEN: usize = 16;

/// Maximum text value length
pub const MAX_TEXT_LEN: usize = 32;

/// Maximum asset digest length (hex SHA-1 fits)
pub const MAX_DIGEST_LEN: usize = 40;

/// Maximum entries per map
pub const MAX_ENTRIES: usize = 6;

/// Map capacity exceeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CapacityError;

/// Opaque reference to a binary asset held by the companion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AssetRef {
    /// Content digest the companion uses to look the asset up
    pub digest: String<MAX_DIGEST_LEN>,
}

impl AssetRef {
    /// Create a reference from its digest
    pub fn new(digest: &str) -> Result<Self, CapacityError> {
        let mut s = String::new();
        s.push_str(digest).map_err(|_| CapacityError)?;
        Ok(Self { digest: s })
    }

    /// Digest as a string slice
    pub fn as_str(&self) -> &str {
        self.digest.as_str()
    }
}

/// A single typed value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataValue {
    Double(f64),
    Long(i64),
    Text(String<MAX_TEXT_LEN>),
    Asset(AssetRef),
}

/// Key/value pair inside a map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DataEntry {
    pub key: String<MAX_KEY_LEN>,
    pub value: DataValue,
}

/// Small ordered key/value map
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DataMap {
    entries: Vec<DataEntry, MAX_ENTRIES>,
}

impl DataMap {
    /// Create an empty map
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or replace a value
    pub fn put(&mut self, key: &str, value: DataValue) -> Result<(), CapacityError> {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.key.as_str() == key) {
            entry.value = value;
            return Ok(());
        }

        let mut k = String::new();
        k.push_str(key).map_err(|_| CapacityError)?;
        self.entries
            .push(DataEntry { key: k, value })
            .map_err(|_| CapacityError)
    }

    /// Insert a floating point value
    pub fn put_double(&mut self, key: &str, value: f64) -> Result<(), CapacityError> {
        self.put(key, DataValue::Double(value))
    }

    /// Insert an asset reference
    pub fn put_asset(&mut self, key: &str, asset: AssetRef) -> Result<(), CapacityError> {
        self.put(key, DataValue::Asset(asset))
    }

    /// Look up a value
    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.entries
            .iter()
            .find(|e| e.key.as_str() == key)
            .map(|e| &e.value)
    }

    /// Look up a floating point value
    ///
    /// Integer values are widened, matching how the phone side stores
    /// whole-degree readings.
    pub fn get_double(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            DataValue::Double(v) => Some(*v),
            DataValue::Long(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Look up an asset reference
    pub fn get_asset(&self, key: &str) -> Option<&AssetRef> {
        match self.get(key)? {
            DataValue::Asset(asset) => Some(asset),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DataEntry> {
        self.entries.iter()
    }
}

/// What happened to the data item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventKind {
    /// Item created or updated
    Changed,
    /// Item removed on the phone
    Deleted,
}

/// Change notification for one data item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DataEvent {
    pub kind: EventKind,
    pub path: String<MAX_PATH_LEN>,
    pub map: DataMap,
}

impl DataEvent {
    /// Build a `Changed` event
    pub fn changed(path: &str, map: DataMap) -> Result<Self, CapacityError> {
        let mut p = String::new();
        p.push_str(path).map_err(|_| CapacityError)?;
        Ok(Self {
            kind: EventKind::Changed,
            path: p,
            map,
        })
    }

    /// Build a `Deleted` event
    pub fn deleted(path: &str) -> Result<Self, CapacityError> {
        let mut event = Self::changed(path, DataMap::new())?;
        event.kind = EventKind::Deleted;
        Ok(event)
    }

    /// Serialize into `buf`, returning the used prefix
    pub fn encode<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], FrameError> {
        let limit = buf.len().min(MAX_PAYLOAD_SIZE);
        postcard::to_slice(self, &mut buf[..limit]).map_err(|_| FrameError::PayloadTooLarge)
    }

    /// Deserialize from a frame payload
    pub fn decode(bytes: &[u8]) -> Result<Self, FrameError> {
        postcard::from_bytes(bytes).map_err(|_| FrameError::InvalidPayload)
    }
}
