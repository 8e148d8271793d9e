//! Companion UART transmit task
//!
//! Encodes queued frames and writes them to the BLE bridge.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use meridian_protocol::frame::MAX_FRAME_SIZE;

use crate::channels::OUTBOUND;

/// Companion TX task - sends frames to the bridge
#[embassy_executor::task]
pub async fn companion_tx_task(mut tx: BufferedUartTx) {
    info!("Companion TX task started");

    let mut buf = [0u8; MAX_FRAME_SIZE];

    loop {
        let frame = OUTBOUND.receive().await;
        match frame.encode(&mut buf) {
            Ok(len) => {
                if let Err(e) = tx.write_all(&buf[..len]).await {
                    warn!("Failed to send frame type={:#x}: {:?}", frame.msg_type, e);
                } else {
                    trace!("Sent frame type={:#x} seq={}", frame.msg_type, frame.seq);
                }
            }
            Err(e) => warn!("Failed to encode frame: {:?}", e),
        }
    }
}
