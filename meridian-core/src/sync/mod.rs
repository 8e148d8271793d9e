//! Companion link and weather synchronization
//!
//! Everything here runs in the sync task and may await link I/O. The only
//! thing it shares with the render side is the `SnapshotCell`.

pub mod channel;
pub mod deadline;
pub mod error;
pub mod link;

#[cfg(test)]
pub(crate) mod mock;

pub use channel::{parse_event, ParsedWeather, SyncStats, WeatherSync};
pub use deadline::{with_deadline, Elapsed};
pub use error::{MalformedReason, SyncError};
pub use link::{CompanionLink, LinkState, LinkStats};
