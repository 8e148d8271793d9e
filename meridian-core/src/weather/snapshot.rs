//! Weather snapshot and its publication cell
//!
//! The sync context builds a complete `WeatherSnapshot` off to the side and
//! publishes it with a single replace; the render context takes a single
//! load per frame. Both happen under one blocking-mutex section, so a reader
//! never sees an icon from one update paired with temperatures from another.

use core::cell::RefCell;
use core::fmt::Write;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::String;

use super::raster::RasterImage;

/// Capacity of a formatted temperature ("-2147483648°")
pub const TEMP_TEXT_LEN: usize = 16;

/// Round half up, as the phone app does: -2.5 → -2, 2.5 → 3
pub fn round_half_up(value: f64) -> i32 {
    libm::floor(value + 0.5) as i32
}

/// Format a whole-degree temperature with the degree sign
pub fn format_temp(degrees: i32) -> String<TEMP_TEXT_LEN> {
    let mut text = String::new();
    // i32 plus the sign always fits
    let _ = write!(text, "{}°", degrees);
    text
}

/// Most recent forecast as shown on the face
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WeatherSnapshot {
    pub max_temp: i32,
    pub min_temp: i32,
    pub icon: Option<RasterImage>,
    /// False until the first successful sync
    pub present: bool,
}

impl Default for WeatherSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl WeatherSnapshot {
    /// Nothing received yet
    pub const fn empty() -> Self {
        Self {
            max_temp: 0,
            min_temp: 0,
            icon: None,
            present: false,
        }
    }

    /// A complete forecast
    pub fn new(max_temp: i32, min_temp: i32, icon: Option<RasterImage>) -> Self {
        Self {
            max_temp,
            min_temp,
            icon,
            present: true,
        }
    }

    pub fn max_text(&self) -> String<TEMP_TEXT_LEN> {
        format_temp(self.max_temp)
    }

    pub fn min_text(&self) -> String<TEMP_TEXT_LEN> {
        format_temp(self.min_temp)
    }
}

struct Published {
    revision: u32,
    snapshot: WeatherSnapshot,
}

/// Single-writer, single-reader publication cell
///
/// `M` picks the critical section: `CriticalSectionRawMutex` when the
/// writer and reader run on different executors or threads,
/// `NoopRawMutex` when both share one executor.
pub struct SnapshotCell<M: RawMutex> {
    inner: Mutex<M, RefCell<Published>>,
}

impl<M: RawMutex> Default for SnapshotCell<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> SnapshotCell<M> {
    /// Cell holding the empty snapshot at revision 0
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Published {
                revision: 0,
                snapshot: WeatherSnapshot::empty(),
            })),
        }
    }

    /// Replace the whole snapshot; returns the new revision
    pub fn publish(&self, snapshot: WeatherSnapshot) -> u32 {
        self.inner.lock(|cell| {
            let mut published = cell.borrow_mut();
            published.revision = published.revision.wrapping_add(1);
            published.snapshot = snapshot;
            published.revision
        })
    }

    /// Copy of the current snapshot
    pub fn load(&self) -> WeatherSnapshot {
        self.inner.lock(|cell| cell.borrow().snapshot.clone())
    }

    /// Borrow the current snapshot without copying
    ///
    /// Keep `f` short: the writer is held off for its duration.
    pub fn read<R>(&self, f: impl FnOnce(&WeatherSnapshot) -> R) -> R {
        self.inner.lock(|cell| f(&cell.borrow().snapshot))
    }

    /// Number of publishes so far
    pub fn revision(&self) -> u32 {
        self.inner.lock(|cell| cell.borrow().revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};
    use proptest::prelude::*;

    fn icon_tagged(tag: u8) -> RasterImage {
        RasterImage::from_pixels(2, 2, &[tag; 8]).unwrap()
    }

    #[test]
    fn test_rounding_examples() {
        assert_eq!(format_temp(round_half_up(-2.4)).as_str(), "-2°");
        assert_eq!(format_temp(round_half_up(5.6)).as_str(), "6°");
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-0.4), 0);
    }

    #[test]
    fn test_rounding_saturates() {
        assert_eq!(round_half_up(1e20), i32::MAX);
        assert_eq!(round_half_up(-1e20), i32::MIN);
    }

    #[test]
    fn test_new_cell_is_empty() {
        let cell: SnapshotCell<NoopRawMutex> = SnapshotCell::new();
        assert_eq!(cell.revision(), 0);
        assert!(!cell.load().present);
        assert!(cell.read(|s| s.icon.is_none()));
    }

    #[test]
    fn test_publish_replaces_wholesale() {
        let cell: SnapshotCell<NoopRawMutex> = SnapshotCell::new();
        cell.publish(WeatherSnapshot::new(21, 12, Some(icon_tagged(1))));
        let revision = cell.publish(WeatherSnapshot::new(8, -3, None));

        assert_eq!(revision, 2);
        let snap = cell.load();
        assert_eq!((snap.max_temp, snap.min_temp), (8, -3));
        assert!(snap.icon.is_none());
        assert_eq!(snap.max_text().as_str(), "8°");
        assert_eq!(snap.min_text().as_str(), "-3°");
    }

    #[test]
    fn test_concurrent_reader_never_sees_torn_snapshot() {
        const UPDATES: i32 = 2_000;
        let cell: SnapshotCell<CriticalSectionRawMutex> = SnapshotCell::new();

        std::thread::scope(|scope| {
            scope.spawn(|| {
                for n in 1..=UPDATES {
                    let tag = (n % 251) as u8;
                    cell.publish(WeatherSnapshot::new(n, -n, Some(icon_tagged(tag))));
                }
            });

            scope.spawn(|| {
                let mut last = 0;
                while last < UPDATES {
                    let snap = cell.load();
                    if !snap.present {
                        continue;
                    }
                    let icon = snap.icon.as_ref().unwrap();
                    assert_eq!(snap.min_temp, -snap.max_temp);
                    assert_eq!(icon.pixels()[0], (snap.max_temp % 251) as u8);
                    assert!(snap.max_temp >= last);
                    last = snap.max_temp;
                }
            });
        });

        assert_eq!(cell.revision(), UPDATES as u32);
    }

    proptest! {
        #[test]
        fn prop_rounding_within_half_degree(value in -150.0f64..150.0) {
            let rounded = round_half_up(value) as f64;
            prop_assert!((rounded - value).abs() <= 0.5);
        }
    }
}
