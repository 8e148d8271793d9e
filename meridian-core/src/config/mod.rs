//! Configuration types
//!
//! Board-agnostic configuration for the face. The firmware fills these from
//! `face.toml` at build time; host tests use the defaults.

pub mod types;

pub use types::*;
