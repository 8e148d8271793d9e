//! Companion transport over the BLE bridge UART
//!
//! Requests go out as frames through the TX task; replies come back from
//! the RX task tagged with their sequence number. Asset chunks echo the
//! request's sequence number so replies to an abandoned request are dropped.

use defmt::*;
use meridian_core::traits::{CompanionTransport, TransportError};
use meridian_protocol::{
    AssemblyError, AssetAssembler, AssetRef, CompanionMessage, WatchMessage,
};

use crate::channels::{LINK_REPLIES, OUTBOUND};

/// `CompanionTransport` backed by the RX/TX task channels
pub struct UartLink {
    seq: u8,
}

impl UartLink {
    pub const fn new() -> Self {
        Self { seq: 0 }
    }

    fn next_seq(&mut self) -> u8 {
        self.seq = self.seq.wrapping_add(1);
        self.seq
    }

    /// Drop replies left over from a timed-out request
    fn drain_stale(&mut self) {
        while let Ok((seq, _)) = LINK_REPLIES.try_receive() {
            trace!("Dropping stale reply seq={}", seq);
        }
    }

    async fn send(&mut self, msg: WatchMessage) -> Result<u8, TransportError> {
        let seq = self.next_seq();
        let frame = msg.to_frame(seq).map_err(|_| TransportError::Io)?;
        OUTBOUND.send(frame).await;
        Ok(seq)
    }
}

impl CompanionTransport for UartLink {
    async fn connect(&mut self) -> Result<(), TransportError> {
        self.drain_stale();
        self.send(WatchMessage::Connect).await?;

        loop {
            match LINK_REPLIES.receive().await {
                (_, CompanionMessage::ConnectAck { session }) => {
                    debug!("Session {} established", session);
                    return Ok(());
                }
                (_, CompanionMessage::ConnectRefused(reason)) => {
                    warn!("Connect refused: {:?}", reason);
                    return Err(TransportError::Refused);
                }
                (seq, _) => trace!("Ignoring reply seq={} while connecting", seq),
            }
        }
    }

    async fn read_asset(
        &mut self,
        asset: &AssetRef,
        buf: &mut [u8],
    ) -> Result<usize, TransportError> {
        self.drain_stale();
        let request = self.send(WatchMessage::RequestAsset(asset.clone())).await?;
        let mut assembler = AssetAssembler::new(request, buf);

        loop {
            let (seq, reply) = LINK_REPLIES.receive().await;
            match assembler.on_reply(seq, &reply) {
                Ok(Some(len)) => return Ok(len),
                Ok(None) => trace!("Asset at {} bytes (reply seq={})", assembler.received(), seq),
                Err(e) => {
                    warn!("Asset transfer abandoned: {:?}", e);
                    return Err(match e {
                        AssemblyError::Missing => TransportError::AssetMissing,
                        AssemblyError::Suspended => TransportError::Disconnected,
                        AssemblyError::Overflow => TransportError::Overflow,
                        AssemblyError::OutOfOrder | AssemblyError::Inconsistent => {
                            TransportError::Io
                        }
                    });
                }
            }
        }
    }

    fn disconnect(&mut self) {
        self.drain_stale();
    }
}
