//! Redraw scheduling
//!
//! Requests one repaint per second, aligned to wall-clock second
//! boundaries, only while the display mode says animation should run.

pub mod frame_timer;

pub use frame_timer::{FrameTimer, TickOutcome, DEFAULT_INTERVAL_MS};
