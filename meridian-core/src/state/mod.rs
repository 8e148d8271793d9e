//! Display mode state machine
//!
//! Tracks visibility, ambient mode and the low-bit-ambient capability,
//! and derives whether the per-second redraw should run.

pub mod events;
pub mod machine;
pub mod power;
pub mod redraw;

pub use events::{LifecycleEvent, Reaction};
pub use machine::{DisplayMode, DisplayState, ModeStateMachine};
pub use power::{PowerInput, PowerPolicy, PowerWait};
pub use redraw::{post_redraw, RedrawRequest};
