//! Wall-clock time
//!
//! The board has no RTC. Wall time is an `EpochAnchor` over uptime: it
//! starts at the build epoch and is re-anchored whenever the companion
//! sends its time. The zone offset arrives the same way.

use embassy_time::Instant;
use portable_atomic::{AtomicI32, AtomicI64, Ordering};

use meridian_core::time::EpochAnchor;

use crate::config::{BUILD_EPOCH_MS, FACE_CONFIG};

/// Unix time at uptime zero, written by the companion RX task
static EPOCH_BASE_MS: AtomicI64 = AtomicI64::new(BUILD_EPOCH_MS);

/// Current zone offset, written by the companion RX task
pub static UTC_OFFSET_S: AtomicI32 = AtomicI32::new(FACE_CONFIG.clock.utc_offset_s);

fn anchor() -> EpochAnchor {
    EpochAnchor::new(EPOCH_BASE_MS.load(Ordering::Relaxed))
}

/// Milliseconds since the Unix epoch
pub fn now_unix_ms() -> i64 {
    anchor().unix_ms(Instant::now().as_millis())
}

/// Embassy instant at which wall time reaches `unix_ms`
pub fn instant_at(unix_ms: u64) -> Instant {
    Instant::from_millis(anchor().uptime_at(unix_ms))
}

/// Re-anchor wall time so that now reads `unix_ms`
pub fn set_unix_ms(unix_ms: i64) {
    let anchor = EpochAnchor::anchored(unix_ms, Instant::now().as_millis());
    EPOCH_BASE_MS.store(anchor.base_ms(), Ordering::Relaxed);
}

pub fn utc_offset_s() -> i32 {
    UTC_OFFSET_S.load(Ordering::Relaxed)
}

/// Store a new offset; returns true if it changed
pub fn set_utc_offset_s(offset_s: i32) -> bool {
    UTC_OFFSET_S.swap(offset_s, Ordering::Relaxed) != offset_s
}
