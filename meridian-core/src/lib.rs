//! Board-agnostic core logic for the Meridian watch face
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Display mode state machine (active / ambient / hidden)
//! - Frame timer aligned to wall-clock seconds
//! - Companion link session handling and the weather sync pipeline
//! - Weather snapshot publication shared with the render context
//! - Wall clock formatting
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod config;
pub mod scheduler;
pub mod state;
pub mod sync;
pub mod time;
pub mod traits;
pub mod weather;
