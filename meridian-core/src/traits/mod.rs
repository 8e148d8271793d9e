//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and the radio link to the companion phone.

pub mod transport;

pub use transport::{CompanionTransport, TransportError};
