//! Drawing surface abstraction and the Meridian face renderer
//!
//! This crate provides:
//! - `DrawSurface` trait: the handful of primitives the face needs
//! - `RenderEngine`: lays out time, date and weather on a surface
//! - `Theme` and `Layout`: colors and vertical positions
//! - `PanelSurface`: `DrawSurface` over any `embedded-graphics` RGB565 target
//!
//! # Architecture
//!
//! The renderer only sees `DrawSurface`, so layout logic is tested on the
//! host against a recording surface. The firmware wraps its `mipidsi` panel
//! in a `PanelSurface` and hands it to the same renderer.

#![cfg_attr(not(test), no_std)]

pub mod backend;
pub mod panel;
pub mod render;
pub mod theme;

// Re-export key types
pub use backend::{DisplayError, DrawSurface, TextRole, TextStyle};
pub use panel::PanelSurface;
pub use render::{RenderEngine, NO_DATA_TEXT};
pub use theme::{Layout, Theme};
