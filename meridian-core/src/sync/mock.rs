//! Test doubles for the companion transport and the deadline clock

use meridian_protocol::AssetRef;

use crate::traits::{CompanionTransport, TransportError};
use embedded_hal_async::delay::DelayNs;

/// Scripted transport; `None` outcomes never complete
#[derive(Default)]
pub struct MockTransport {
    pub connect_outcome: Option<Result<(), TransportError>>,
    pub asset_outcome: Option<Result<Vec<u8>, TransportError>>,
    pub connects: u32,
    pub reads: u32,
    pub disconnects: u32,
}

impl MockTransport {
    /// Accepts connections and serves `asset`
    pub fn serving(asset: &[u8]) -> Self {
        Self {
            connect_outcome: Some(Ok(())),
            asset_outcome: Some(Ok(asset.to_vec())),
            ..Self::default()
        }
    }
}

impl CompanionTransport for MockTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        self.connects += 1;
        match self.connect_outcome {
            Some(outcome) => outcome,
            None => core::future::pending().await,
        }
    }

    async fn read_asset(
        &mut self,
        _asset: &AssetRef,
        buf: &mut [u8],
    ) -> Result<usize, TransportError> {
        self.reads += 1;
        match &self.asset_outcome {
            None => core::future::pending().await,
            Some(Err(err)) => Err(*err),
            Some(Ok(bytes)) => {
                if bytes.len() > buf.len() {
                    return Err(TransportError::Overflow);
                }
                buf[..bytes.len()].copy_from_slice(bytes);
                Ok(bytes.len())
            }
        }
    }

    fn disconnect(&mut self) {
        self.disconnects += 1;
    }
}

/// Delay that completes at once and records requested deadlines
#[derive(Default)]
pub struct MockDelay {
    pub requested_ms: Vec<u32>,
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, _ns: u32) {}

    async fn delay_ms(&mut self, ms: u32) {
        self.requested_ms.push(ms);
    }
}
