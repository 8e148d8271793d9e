//! Wall clock
//!
//! Builds the time and date text for one render pass from a UTC instant and
//! the current zone offset.

use core::fmt::Write;

use chrono::{DateTime, Datelike, Timelike, Weekday};
use heapless::String;

/// Capacity of the date line ("WED, SEP 30 2026")
pub const DATE_TEXT_LEN: usize = 24;

/// Largest zone offset accepted (UTC+14)
pub const MAX_UTC_OFFSET_S: i32 = 14 * 3_600;

/// Smallest zone offset accepted (UTC-12)
pub const MIN_UTC_OFFSET_S: i32 = -12 * 3_600;

/// Hour display convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockFormat {
    /// 00-23
    #[default]
    TwentyFourHour,
    /// 1-12
    TwelveHour,
}

/// Time fields for one render pass
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeSnapshot {
    pub hour: u8,
    pub minute: u8,
    /// Upper-cased date line, e.g. "SUN, OCT 18 2026"
    pub date_text: String<DATE_TEXT_LEN>,
}

impl TimeSnapshot {
    /// Compute the local time for `unix_ms` shifted by `utc_offset_s`
    ///
    /// Returns `None` when the instant is outside chrono's range.
    pub fn at(unix_ms: i64, utc_offset_s: i32, format: ClockFormat) -> Option<Self> {
        let local_ms = unix_ms.checked_add(utc_offset_s as i64 * 1_000)?;
        let local = DateTime::from_timestamp_millis(local_ms)?.naive_utc();

        let hour = match format {
            ClockFormat::TwentyFourHour => local.hour(),
            ClockFormat::TwelveHour => match local.hour() % 12 {
                0 => 12,
                h => h,
            },
        };

        let mut date_text = String::new();
        write!(
            date_text,
            "{}, {} {} {}",
            weekday_abbrev(local.weekday()),
            month_abbrev(local.month()),
            local.day(),
            local.year()
        )
        .ok()?;

        Some(Self {
            hour: hour as u8,
            minute: local.minute() as u8,
            date_text,
        })
    }

    /// "HH:MM"
    pub fn time_text(&self) -> String<5> {
        let mut text = String::new();
        // Always fits: two two-digit fields and a colon
        let _ = write!(text, "{:02}:{:02}", self.hour, self.minute);
        text
    }
}

fn weekday_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MON",
        Weekday::Tue => "TUE",
        Weekday::Wed => "WED",
        Weekday::Thu => "THU",
        Weekday::Fri => "FRI",
        Weekday::Sat => "SAT",
        Weekday::Sun => "SUN",
    }
}

fn month_abbrev(month: u32) -> &'static str {
    match month {
        1 => "JAN",
        2 => "FEB",
        3 => "MAR",
        4 => "APR",
        5 => "MAY",
        6 => "JUN",
        7 => "JUL",
        8 => "AUG",
        9 => "SEP",
        10 => "OCT",
        11 => "NOV",
        _ => "DEC",
    }
}

/// Maps monotonic uptime onto Unix time
///
/// `base_ms` is the Unix time at uptime zero. Setting the clock moves the
/// base; uptime itself never jumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EpochAnchor {
    base_ms: i64,
}

impl EpochAnchor {
    pub const fn new(base_ms: i64) -> Self {
        Self { base_ms }
    }

    /// Anchor that reads `unix_ms` at `uptime_ms`
    pub fn anchored(unix_ms: i64, uptime_ms: u64) -> Self {
        let uptime_ms = i64::try_from(uptime_ms).unwrap_or(i64::MAX);
        Self::new(unix_ms.saturating_sub(uptime_ms))
    }

    pub fn base_ms(&self) -> i64 {
        self.base_ms
    }

    /// Unix time at `uptime_ms`
    pub fn unix_ms(&self, uptime_ms: u64) -> i64 {
        let uptime_ms = i64::try_from(uptime_ms).unwrap_or(i64::MAX);
        self.base_ms.saturating_add(uptime_ms)
    }

    /// Uptime at which Unix time reaches `unix_ms`, zero if already past
    pub fn uptime_at(&self, unix_ms: u64) -> u64 {
        let unix_ms = i64::try_from(unix_ms).unwrap_or(i64::MAX);
        u64::try_from(unix_ms.saturating_sub(self.base_ms)).unwrap_or(0)
    }
}

/// Zone-aware clock owned by the render context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WatchClock {
    utc_offset_s: i32,
    format: ClockFormat,
}

impl WatchClock {
    pub const fn new(utc_offset_s: i32, format: ClockFormat) -> Self {
        Self {
            utc_offset_s,
            format,
        }
    }

    pub fn utc_offset_s(&self) -> i32 {
        self.utc_offset_s
    }

    /// Adopt a new zone offset, clamped to the valid range
    ///
    /// Returns true if the offset changed.
    pub fn set_utc_offset(&mut self, utc_offset_s: i32) -> bool {
        let clamped = utc_offset_s.clamp(MIN_UTC_OFFSET_S, MAX_UTC_OFFSET_S);
        let changed = clamped != self.utc_offset_s;
        self.utc_offset_s = clamped;
        changed
    }

    /// Fresh snapshot for this render pass
    pub fn snapshot(&self, unix_ms: i64) -> Option<TimeSnapshot> {
        TimeSnapshot::at(unix_ms, self.utc_offset_s, self.format)
    }
}
