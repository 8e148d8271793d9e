//! Asset reassembly
//!
//! The companion answers `REQUEST_ASSET` with a run of `ASSET_CHUNK`s that
//! echo the request's sequence number. Chunks must arrive in order and
//! agree on the total length. Replies tagged with any other sequence number
//! belong to an abandoned request and are skipped.

use crate::messages::CompanionMessage;

/// Why an asset transfer was abandoned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AssemblyError {
    /// Companion does not know the asset
    Missing,
    /// Session suspended mid-transfer
    Suspended,
    /// Announced total does not fit the destination buffer
    Overflow,
    /// Chunk offset is not where the previous chunk ended
    OutOfOrder,
    /// Chunk runs past the total, or the total changed between chunks
    Inconsistent,
}

/// Collects one asset into a caller-provided buffer
#[derive(Debug)]
pub struct AssetAssembler<'a> {
    request_seq: u8,
    buf: &'a mut [u8],
    received: usize,
    total: Option<usize>,
}

impl<'a> AssetAssembler<'a> {
    /// Expect chunks tagged with `request_seq`, written into `buf`
    pub fn new(request_seq: u8, buf: &'a mut [u8]) -> Self {
        Self {
            request_seq,
            buf,
            received: 0,
            total: None,
        }
    }

    /// Bytes accepted so far
    pub fn received(&self) -> usize {
        self.received
    }

    /// Feed one reply from the link
    ///
    /// Returns `Ok(Some(len))` once the asset is complete, `Ok(None)` while
    /// more chunks are needed or when the reply was not ours.
    pub fn on_reply(
        &mut self,
        seq: u8,
        reply: &CompanionMessage,
    ) -> Result<Option<usize>, AssemblyError> {
        match reply {
            // A suspension ends the transfer whatever it was tagged with
            CompanionMessage::Suspended { .. } => Err(AssemblyError::Suspended),
            _ if seq != self.request_seq => Ok(None),
            CompanionMessage::AssetChunk {
                offset,
                total,
                data,
            } => self.accept_chunk(*offset, *total, data),
            CompanionMessage::AssetMissing => Err(AssemblyError::Missing),
            _ => Ok(None),
        }
    }

    /// Place one chunk
    pub fn accept_chunk(
        &mut self,
        offset: u32,
        total: u32,
        data: &[u8],
    ) -> Result<Option<usize>, AssemblyError> {
        let total = usize::try_from(total).map_err(|_| AssemblyError::Overflow)?;
        if total > self.buf.len() {
            return Err(AssemblyError::Overflow);
        }
        if *self.total.get_or_insert(total) != total {
            return Err(AssemblyError::Inconsistent);
        }
        if usize::try_from(offset).ok() != Some(self.received) {
            return Err(AssemblyError::OutOfOrder);
        }

        let end = self
            .received
            .checked_add(data.len())
            .filter(|end| *end <= total)
            .ok_or(AssemblyError::Inconsistent)?;
        self.buf[self.received..end].copy_from_slice(data);
        self.received = end;

        Ok((end == total).then_some(total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;

    fn chunk(offset: u32, total: u32, data: &[u8]) -> CompanionMessage {
        CompanionMessage::AssetChunk {
            offset,
            total,
            data: Vec::from_slice(data).unwrap(),
        }
    }

    #[test]
    fn test_chunks_in_order_complete() {
        let mut buf = [0u8; 16];
        let mut assembler = AssetAssembler::new(7, &mut buf);

        assert_eq!(assembler.on_reply(7, &chunk(0, 6, &[1, 2, 3])), Ok(None));
        assert_eq!(assembler.received(), 3);
        assert_eq!(assembler.on_reply(7, &chunk(3, 6, &[4, 5, 6])), Ok(Some(6)));
        assert_eq!(&buf[..6], &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_stale_sequence_skipped() {
        let mut buf = [0u8; 8];
        let mut assembler = AssetAssembler::new(7, &mut buf);

        assert_eq!(assembler.on_reply(6, &chunk(0, 2, &[9, 9])), Ok(None));
        assert_eq!(assembler.on_reply(6, &CompanionMessage::AssetMissing), Ok(None));
        assert_eq!(assembler.received(), 0);
        assert_eq!(assembler.on_reply(7, &chunk(0, 2, &[1, 2])), Ok(Some(2)));
    }

    #[test]
    fn test_missing_and_suspended() {
        let mut buf = [0u8; 8];
        let mut assembler = AssetAssembler::new(3, &mut buf);
        assert_eq!(
            assembler.on_reply(3, &CompanionMessage::AssetMissing),
            Err(AssemblyError::Missing)
        );
        assert_eq!(
            assembler.on_reply(200, &CompanionMessage::Suspended { cause: 1 }),
            Err(AssemblyError::Suspended)
        );
    }

    #[test]
    fn test_total_larger_than_buffer() {
        let mut buf = [0u8; 4];
        let mut assembler = AssetAssembler::new(1, &mut buf);
        assert_eq!(
            assembler.on_reply(1, &chunk(0, 5, &[0])),
            Err(AssemblyError::Overflow)
        );
    }

    #[test]
    fn test_offset_near_u32_max_rejected() {
        let mut buf = [0u8; 64];
        let mut assembler = AssetAssembler::new(1, &mut buf);
        assert_eq!(
            assembler.accept_chunk(0xFFFF_FFF0, 32, &[0xAB; 32]),
            Err(AssemblyError::OutOfOrder)
        );
        assert_eq!(assembler.received(), 0);
    }

    #[test]
    fn test_out_of_order_and_inconsistent_chunks() {
        let mut buf = [0u8; 16];
        let mut assembler = AssetAssembler::new(1, &mut buf);
        assert_eq!(assembler.accept_chunk(0, 8, &[1, 2]), Ok(None));
        assert_eq!(
            assembler.accept_chunk(4, 8, &[3, 4]),
            Err(AssemblyError::OutOfOrder)
        );
        assert_eq!(
            assembler.accept_chunk(2, 10, &[3, 4]),
            Err(AssemblyError::Inconsistent)
        );
        assert_eq!(
            assembler.accept_chunk(2, 8, &[0; 7]),
            Err(AssemblyError::Inconsistent)
        );
    }

    #[test]
    fn test_empty_asset() {
        let mut buf = [0u8; 4];
        let mut assembler = AssetAssembler::new(2, &mut buf);
        assert_eq!(assembler.accept_chunk(0, 0, &[]), Ok(Some(0)));
    }
}
