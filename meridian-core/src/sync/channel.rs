//! Weather sync channel
//!
//! Turns a data-change event into a published `WeatherSnapshot`:
//! filter, parse, resolve the icon, decode, then one atomic publish. Any
//! failure leaves the previous snapshot in place.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;
use meridian_protocol::{AssetRef, DataEvent, EventKind, KEY_ICON, KEY_TEMP_MAX, KEY_TEMP_MIN};

use super::error::{MalformedReason, SyncError};
use super::link::CompanionLink;
use crate::config::SyncConfig;
use crate::traits::CompanionTransport;
use crate::weather::{round_half_up, RasterImage, SnapshotCell, WeatherSnapshot, MAX_ASSET_BYTES};

/// Fields extracted from a weather event
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParsedWeather {
    pub max_temp: i32,
    pub min_temp: i32,
    pub icon: Option<AssetRef>,
}

/// Validate and extract a weather update
pub fn parse_event(event: &DataEvent, weather_path: &str) -> Result<ParsedWeather, SyncError> {
    if event.kind != EventKind::Changed {
        return Err(MalformedReason::NotChanged.into());
    }
    if event.path.as_str() != weather_path {
        return Err(MalformedReason::WrongPath.into());
    }

    let temp = |key: &str| -> Result<i32, SyncError> {
        let value = event
            .map
            .get_double(key)
            .ok_or(MalformedReason::MissingField)?;
        if !value.is_finite() {
            return Err(MalformedReason::InvalidValue.into());
        }
        Ok(round_half_up(value))
    };

    Ok(ParsedWeather {
        max_temp: temp(KEY_TEMP_MAX)?,
        min_temp: temp(KEY_TEMP_MIN)?,
        icon: event.map.get_asset(KEY_ICON).cloned(),
    })
}

/// Sync counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncStats {
    /// Events delivered
    pub received: u32,
    /// Events filtered out
    pub ignored: u32,
    /// Snapshots published
    pub published: u32,
    /// Updates aborted mid-sync
    pub failed: u32,
    pub last_error: Option<SyncError>,
}

/// Weather sync pipeline, run from the sync task
pub struct WeatherSync<'a, M: RawMutex> {
    snapshot: &'a SnapshotCell<M>,
    config: SyncConfig,
    stats: SyncStats,
    asset_buf: [u8; MAX_ASSET_BYTES],
}

impl<'a, M: RawMutex> WeatherSync<'a, M> {
    pub fn new(snapshot: &'a SnapshotCell<M>, config: SyncConfig) -> Self {
        Self {
            snapshot,
            config,
            stats: SyncStats::default(),
            asset_buf: [0; MAX_ASSET_BYTES],
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn stats(&self) -> SyncStats {
        self.stats
    }

    /// Handle one delivered event
    ///
    /// Returns the snapshot revision on publish.
    pub async fn handle_event<T, D>(
        &mut self,
        link: &mut CompanionLink<T, D>,
        event: &DataEvent,
    ) -> Result<u32, SyncError>
    where
        T: CompanionTransport,
        D: DelayNs,
    {
        self.stats.received += 1;

        let parsed = match parse_event(event, self.config.weather_path) {
            Ok(parsed) => parsed,
            Err(err) => {
                self.stats.ignored += 1;
                debug!("sync: {}", err);
                return Err(err);
            }
        };

        match self.resolve_and_publish(link, parsed).await {
            Ok(revision) => {
                self.stats.published += 1;
                info!("sync: published weather revision {}", revision);
                Ok(revision)
            }
            Err(err) => {
                self.stats.failed += 1;
                self.stats.last_error = Some(err);
                warn!("sync: {}", err);
                Err(err)
            }
        }
    }

    /// Handle a batch of events in order; returns how many published
    pub async fn handle_batch<T, D>(
        &mut self,
        link: &mut CompanionLink<T, D>,
        events: &[DataEvent],
    ) -> usize
    where
        T: CompanionTransport,
        D: DelayNs,
    {
        let mut published = 0;
        for event in events {
            if self.handle_event(link, event).await.is_ok() {
                published += 1;
            }
        }
        published
    }

    async fn resolve_and_publish<T, D>(
        &mut self,
        link: &mut CompanionLink<T, D>,
        parsed: ParsedWeather,
    ) -> Result<u32, SyncError>
    where
        T: CompanionTransport,
        D: DelayNs,
    {
        let asset = parsed.icon.ok_or(SyncError::InvalidAsset)?;

        link.ensure_connected(self.config.connect_timeout_ms).await?;
        let len = link
            .resolve_asset(&asset, &mut self.asset_buf, self.config.asset_read_timeout_ms)
            .await?;
        let bytes = self.asset_buf.get(..len).ok_or(SyncError::AssetTooLarge)?;
        let icon = RasterImage::decode(bytes)?;

        let snapshot = WeatherSnapshot::new(parsed.max_temp, parsed.min_temp, Some(icon));
        Ok(self.snapshot.publish(snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::mock::{MockDelay, MockTransport};
    use crate::traits::TransportError;
    use crate::weather::RasterError;
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use meridian_protocol::DataMap;

    // 2x1 icon: red, green
    const ICON: [u8; 8] = [2, 0, 1, 0, 0xF8, 0x00, 0x07, 0xE0];

    fn weather_event(path: &str, max: f64, min: f64) -> DataEvent {
        let mut map = DataMap::new();
        map.put_asset(KEY_ICON, AssetRef::new("0a1b2c3d").unwrap())
            .unwrap();
        map.put_double(KEY_TEMP_MAX, max).unwrap();
        map.put_double(KEY_TEMP_MIN, min).unwrap();
        DataEvent::changed(path, map).unwrap()
    }

    fn connected_link() -> CompanionLink<MockTransport, MockDelay> {
        CompanionLink::new(MockTransport::serving(&ICON), MockDelay::default())
    }

    #[test]
    fn test_parse_rounds_temperatures() {
        let parsed = parse_event(&weather_event("/weather", 5.6, -2.4), "/weather").unwrap();
        assert_eq!(parsed.max_temp, 6);
        assert_eq!(parsed.min_temp, -2);
        assert_eq!(parsed.icon.unwrap().as_str(), "0a1b2c3d");
    }

    #[test]
    fn test_parse_rejects_missing_and_invalid_fields() {
        let mut map = DataMap::new();
        map.put_double(KEY_TEMP_MAX, 20.0).unwrap();
        let event = DataEvent::changed("/weather", map.clone()).unwrap();
        assert_eq!(
            parse_event(&event, "/weather"),
            Err(SyncError::MalformedEvent(MalformedReason::MissingField))
        );

        map.put_double(KEY_TEMP_MIN, f64::NAN).unwrap();
        let event = DataEvent::changed("/weather", map).unwrap();
        assert_eq!(
            parse_event(&event, "/weather"),
            Err(SyncError::MalformedEvent(MalformedReason::InvalidValue))
        );
    }

    #[test]
    fn test_publishes_complete_snapshot() {
        let cell: SnapshotCell<NoopRawMutex> = SnapshotCell::new();
        let mut sync = WeatherSync::new(&cell, SyncConfig::default());
        let mut link = connected_link();

        let revision = block_on(sync.handle_event(&mut link, &weather_event("/weather", 21.5, 12.2)));
        assert_eq!(revision, Ok(1));

        let snap = cell.load();
        assert!(snap.present);
        assert_eq!(snap.max_text().as_str(), "22°");
        assert_eq!(snap.min_text().as_str(), "12°");
        assert_eq!(snap.icon.unwrap().pixel(1, 0), Some(0x07E0));
        assert!(link.is_listening());
        assert_eq!(link.transport().reads, 1);
    }

    #[test]
    fn test_wrong_path_never_mutates() {
        let cell: SnapshotCell<NoopRawMutex> = SnapshotCell::new();
        let mut sync = WeatherSync::new(&cell, SyncConfig::default());
        let mut link = connected_link();

        let result = block_on(sync.handle_event(&mut link, &weather_event("/steps", 1.0, 0.0)));
        assert_eq!(
            result,
            Err(SyncError::MalformedEvent(MalformedReason::WrongPath))
        );
        assert_eq!(cell.revision(), 0);
        assert_eq!(link.transport().connects, 0);
        assert_eq!(sync.stats().ignored, 1);
    }

    #[test]
    fn test_deleted_event_ignored() {
        let cell: SnapshotCell<NoopRawMutex> = SnapshotCell::new();
        let mut sync = WeatherSync::new(&cell, SyncConfig::default());
        let mut link = connected_link();

        let event = DataEvent::deleted("/weather").unwrap();
        let result = block_on(sync.handle_event(&mut link, &event));
        assert!(result.unwrap_err().is_ignorable());
        assert_eq!(cell.revision(), 0);
    }

    #[test]
    fn test_duplicate_delivery_is_idempotent() {
        let cell: SnapshotCell<NoopRawMutex> = SnapshotCell::new();
        let mut sync = WeatherSync::new(&cell, SyncConfig::default());
        let mut link = connected_link();
        let event = weather_event("/weather", 8.0, -3.0);

        block_on(sync.handle_event(&mut link, &event)).unwrap();
        let first = cell.load();
        block_on(sync.handle_event(&mut link, &event)).unwrap();

        assert_eq!(cell.load(), first);
        assert_eq!(link.transport().connects, 1);
    }

    #[test]
    fn test_connection_failure_keeps_previous_snapshot() {
        let cell: SnapshotCell<NoopRawMutex> = SnapshotCell::new();
        let mut sync = WeatherSync::new(&cell, SyncConfig::default());
        let mut link = connected_link();

        block_on(sync.handle_event(&mut link, &weather_event("/weather", 8.0, -3.0))).unwrap();
        let before = cell.load();

        link.on_suspended(1);
        link.transport_mut().connect_outcome = None;
        let result = block_on(sync.handle_event(&mut link, &weather_event("/weather", 30.0, 20.0)));

        assert_eq!(result, Err(SyncError::ConnectionTimeout));
        assert_eq!(cell.load(), before);
        assert_eq!(cell.revision(), 1);
        assert_eq!(sync.stats().failed, 1);
        assert_eq!(sync.stats().last_error, Some(SyncError::ConnectionTimeout));
        assert_eq!(link.stats().connect_failures, 1);
    }

    #[test]
    fn test_missing_asset_reference() {
        let cell: SnapshotCell<NoopRawMutex> = SnapshotCell::new();
        let mut sync = WeatherSync::new(&cell, SyncConfig::default());
        let mut link = connected_link();

        let mut map = DataMap::new();
        map.put_double(KEY_TEMP_MAX, 1.0).unwrap();
        map.put_double(KEY_TEMP_MIN, 0.0).unwrap();
        let event = DataEvent::changed("/weather", map).unwrap();

        assert_eq!(
            block_on(sync.handle_event(&mut link, &event)),
            Err(SyncError::InvalidAsset)
        );
        assert_eq!(link.transport().connects, 0);
    }

    #[test]
    fn test_asset_failures_abort() {
        let cell: SnapshotCell<NoopRawMutex> = SnapshotCell::new();
        let mut sync = WeatherSync::new(&cell, SyncConfig::default());
        let mut link = connected_link();
        let event = weather_event("/weather", 8.0, -3.0);

        link.transport_mut().asset_outcome = None;
        assert_eq!(
            block_on(sync.handle_event(&mut link, &event)),
            Err(SyncError::AssetReadTimeout)
        );

        link.transport_mut().asset_outcome = Some(Err(TransportError::AssetMissing));
        assert_eq!(
            block_on(sync.handle_event(&mut link, &event)),
            Err(SyncError::AssetResolution)
        );

        link.transport_mut().asset_outcome = Some(Ok(std::vec![1, 0, 1, 0, 0xFF]));
        assert_eq!(
            block_on(sync.handle_event(&mut link, &event)),
            Err(SyncError::ImageDecode(RasterError::LengthMismatch))
        );

        assert_eq!(cell.revision(), 0);
        assert_eq!(sync.stats().failed, 3);
    }

    #[test]
    fn test_batch_counts_published() {
        let cell: SnapshotCell<NoopRawMutex> = SnapshotCell::new();
        let mut sync = WeatherSync::new(&cell, SyncConfig::default());
        let mut link = connected_link();

        let events = [
            weather_event("/weather", 1.0, 0.0),
            weather_event("/other", 2.0, 0.0),
            weather_event("/weather", 3.0, 0.0),
        ];
        assert_eq!(block_on(sync.handle_batch(&mut link, &events)), 2);
        assert_eq!(cell.load().max_temp, 3);

        let stats = sync.stats();
        assert_eq!((stats.received, stats.ignored, stats.published), (3, 1, 2));
    }
}
