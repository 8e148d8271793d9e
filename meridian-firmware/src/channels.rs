//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use meridian_core::state::{LifecycleEvent, RedrawRequest};
use meridian_core::weather::SnapshotCell;
use meridian_protocol::{CompanionMessage, DataEvent, Frame};

/// Channel capacity for lifecycle notifications
const LIFECYCLE_CHANNEL_SIZE: usize = 8;

/// Channel capacity for weather data events
const DATA_CHANNEL_SIZE: usize = 4;

/// Channel capacity for link replies and outbound frames
const LINK_CHANNEL_SIZE: usize = 4;

/// Lifecycle notifications (visibility, ambient, properties, zone, tick)
pub static LIFECYCLE: Channel<CriticalSectionRawMutex, LifecycleEvent, LIFECYCLE_CHANNEL_SIZE> =
    Channel::new();

/// Repaint requests; post through `post_redraw` so unread ones merge
pub static REDRAW: Signal<CriticalSectionRawMutex, RedrawRequest> = Signal::new();

/// Weather data events from the companion
pub static DATA_EVENTS: Channel<CriticalSectionRawMutex, DataEvent, DATA_CHANNEL_SIZE> =
    Channel::new();

/// Session and asset replies, tagged with the frame sequence number
pub static LINK_REPLIES: Channel<CriticalSectionRawMutex, (u8, CompanionMessage), LINK_CHANNEL_SIZE> =
    Channel::new();

/// Companion suspended the session (cause code)
pub static SUSPENDED: Signal<CriticalSectionRawMutex, u8> = Signal::new();

/// Frames queued for the companion
pub static OUTBOUND: Channel<CriticalSectionRawMutex, Frame, LINK_CHANNEL_SIZE> = Channel::new();

/// Latest published forecast, shared by the sync and render tasks
pub static WEATHER: SnapshotCell<CriticalSectionRawMutex> = SnapshotCell::new();
