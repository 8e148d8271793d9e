//! Companion link session
//!
//! Owns the transport and the deadline clock. There is no background retry:
//! the sync task reconnects on demand when the next update arrives.

use embedded_hal_async::delay::DelayNs;
use meridian_protocol::AssetRef;

use super::deadline::{with_deadline, Elapsed};
use super::error::SyncError;
use crate::traits::{CompanionTransport, TransportError};

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    #[default]
    Disconnected,
    Connected,
    /// Companion paused the session; next sync reconnects
    Suspended,
}

/// Session counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStats {
    pub connect_attempts: u32,
    pub connect_failures: u32,
    pub suspensions: u32,
}

/// Session with the companion app
pub struct CompanionLink<T, D> {
    transport: T,
    delay: D,
    state: LinkState,
    /// Weather listener registered for this session
    listening: bool,
    stats: LinkStats,
}

impl<T: CompanionTransport, D: DelayNs> CompanionLink<T, D> {
    pub const fn new(transport: T, delay: D) -> Self {
        Self {
            transport,
            delay,
            state: LinkState::Disconnected,
            listening: false,
            stats: LinkStats {
                connect_attempts: 0,
                connect_failures: 0,
                suspensions: 0,
            },
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == LinkState::Connected
    }

    /// Check if weather updates are being listened for
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Attempt a connection, bounded by `timeout_ms`
    pub async fn connect(&mut self, timeout_ms: u32) -> Result<(), SyncError> {
        self.stats.connect_attempts += 1;
        debug!("link: connecting (timeout {} ms)", timeout_ms);

        match with_deadline(&mut self.delay, timeout_ms, self.transport.connect()).await {
            Ok(Ok(())) => {
                self.on_connected();
                Ok(())
            }
            Ok(Err(_)) => {
                self.on_connection_failed(SyncError::ConnectionFailed);
                Err(SyncError::ConnectionFailed)
            }
            Err(Elapsed) => {
                // Abandoned attempt; reset the transport for the next one
                self.transport.disconnect();
                self.on_connection_failed(SyncError::ConnectionTimeout);
                Err(SyncError::ConnectionTimeout)
            }
        }
    }

    /// Connect only if not already connected
    pub async fn ensure_connected(&mut self, timeout_ms: u32) -> Result<(), SyncError> {
        if self.is_connected() {
            return Ok(());
        }
        self.connect(timeout_ms).await
    }

    /// Session established; start listening for weather updates
    pub fn on_connected(&mut self) {
        self.state = LinkState::Connected;
        self.listening = true;
        info!("link: connected");
    }

    /// Companion paused the session
    pub fn on_suspended(&mut self, cause: u8) {
        self.state = LinkState::Suspended;
        self.listening = false;
        self.stats.suspensions += 1;
        warn!("link: suspended (cause {})", cause);
    }

    /// Connection attempt failed
    pub fn on_connection_failed(&mut self, reason: SyncError) {
        self.state = LinkState::Disconnected;
        self.listening = false;
        self.stats.connect_failures += 1;
        warn!("link: connection failed: {}", reason);
    }

    /// Read the asset behind `asset` into `buf`, bounded by `timeout_ms`
    pub async fn resolve_asset(
        &mut self,
        asset: &AssetRef,
        buf: &mut [u8],
        timeout_ms: u32,
    ) -> Result<usize, SyncError> {
        let read = self.transport.read_asset(asset, buf);
        match with_deadline(&mut self.delay, timeout_ms, read).await {
            Ok(Ok(len)) => Ok(len),
            Ok(Err(TransportError::Overflow)) => Err(SyncError::AssetTooLarge),
            Ok(Err(TransportError::Disconnected)) => {
                self.state = LinkState::Disconnected;
                self.listening = false;
                Err(SyncError::AssetResolution)
            }
            Ok(Err(_)) => Err(SyncError::AssetResolution),
            Err(Elapsed) => Err(SyncError::AssetReadTimeout),
        }
    }

    /// Explicit teardown
    pub fn disconnect(&mut self) {
        if self.state != LinkState::Disconnected {
            info!("link: disconnecting");
        }
        self.transport.disconnect();
        self.state = LinkState::Disconnected;
        self.listening = false;
    }
}
