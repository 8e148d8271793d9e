//! Companion link protocol
//!
//! This crate defines the UART protocol between the watch and the BLE bridge
//! that relays data items from the paired phone. Every message travels in a
//! small binary frame:
//!
//! ```text
//! ┌───────┬────────┬──────┬─────┬─────────────┬───────┐
//! │ START │ LENGTH │ TYPE │ SEQ │ PAYLOAD     │ CRC-8 │
//! │ 1B    │ 1B     │ 1B   │ 1B  │ 0–240B      │ 1B    │
//! └───────┴────────┴──────┴─────┴─────────────┴───────┘
//! ```
//!
//! Data item bodies (`DataEvent`) are postcard-encoded inside the payload;
//! everything else uses fixed little-endian layouts.

#![no_std]
#![deny(unsafe_code)]

pub mod assembly;
pub mod datamap;
pub mod frame;
pub mod messages;

pub use assembly::{AssemblyError, AssetAssembler};
pub use datamap::{
    AssetRef, DataEntry, DataEvent, DataMap, DataValue, EventKind, KEY_ICON, KEY_TEMP_MAX,
    KEY_TEMP_MIN, WEATHER_PATH,
};
pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_PAYLOAD_SIZE};
pub use messages::{CompanionMessage, RefusalReason, WatchMessage};
