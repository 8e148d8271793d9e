//! Companion transport trait
//!
//! Abstracts the radio path to the paired phone. The watch only ever asks
//! for two things: a session, and the bytes behind an asset reference.

use meridian_protocol::AssetRef;

/// Errors reported by a companion transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Companion refused the session
    Refused,
    /// Session dropped mid-request
    Disconnected,
    /// Companion has no asset for the digest
    AssetMissing,
    /// Asset does not fit the supplied buffer
    Overflow,
    /// Link-level I/O or framing failure
    Io,
}

/// Connection to the companion app
///
/// Implementations must be cancel-safe: a future dropped at a deadline
/// leaves the transport usable for the next call.
#[allow(async_fn_in_trait)]
pub trait CompanionTransport {
    /// Open a session with the companion
    async fn connect(&mut self) -> Result<(), TransportError>;

    /// Read the full byte stream behind `asset` into `buf`
    ///
    /// Returns the number of bytes written.
    async fn read_asset(&mut self, asset: &AssetRef, buf: &mut [u8])
        -> Result<usize, TransportError>;

    /// Tear the session down
    fn disconnect(&mut self) {}
}
