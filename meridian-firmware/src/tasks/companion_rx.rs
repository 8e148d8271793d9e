//! Companion UART receive task
//!
//! Receives frames from the BLE bridge and dispatches messages.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use meridian_core::state::LifecycleEvent;
use meridian_protocol::{CompanionMessage, FrameParser, WatchMessage};

use crate::channels::{DATA_EVENTS, LIFECYCLE, LINK_REPLIES, OUTBOUND, SUSPENDED};
use crate::clock;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Companion RX task - receives and parses frames from the bridge
#[embassy_executor::task]
pub async fn companion_rx_task(mut rx: BufferedUartRx) {
    info!("Companion RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => match CompanionMessage::from_frame(&frame) {
                            Ok(msg) => handle_message(frame.seq, msg).await,
                            Err(e) => warn!("Failed to parse companion message: {:?}", e),
                        },
                        Ok(None) => {
                            // Need more bytes
                        }
                        Err(e) => {
                            warn!("Frame parse error: {:?}", e);
                        }
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Route a parsed companion message
async fn handle_message(seq: u8, msg: CompanionMessage) {
    match msg {
        CompanionMessage::Ping => {
            trace!("PING received");
            if let Ok(frame) = WatchMessage::Pong.to_frame(seq) {
                OUTBOUND.send(frame).await;
            }
        }
        CompanionMessage::DataChanged(event) => {
            debug!("Data changed on {}", event.path.as_str());
            if DATA_EVENTS.try_send(event).is_err() {
                warn!("Data channel full, dropping event");
            }
        }
        CompanionMessage::TimeZone { offset_s } => {
            if clock::set_utc_offset_s(offset_s) {
                info!("Time zone offset now {} s", offset_s);
                LIFECYCLE.send(LifecycleEvent::TimeZoneChanged).await;
            }
        }
        CompanionMessage::Time { unix_ms } => {
            if unix_ms <= 0 {
                warn!("Ignoring companion time {}", unix_ms);
                return;
            }
            clock::set_unix_ms(unix_ms);
            info!("Wall clock set to {} ms", unix_ms);
            LIFECYCLE.send(LifecycleEvent::ClockAdjusted).await;
        }
        CompanionMessage::Suspended { cause } => {
            SUSPENDED.signal(cause);
            // Also wake any in-flight request
            let _ = LINK_REPLIES.try_send((seq, CompanionMessage::Suspended { cause }));
        }
        reply => {
            if LINK_REPLIES.try_send((seq, reply)).is_err() {
                warn!("Link reply channel full, dropping seq={}", seq);
            }
        }
    }
}
