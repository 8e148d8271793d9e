//! Message types for the companion link
//!
//! Message types are divided into two categories:
//! - Companion → Watch: session control, data changes, asset chunks, time
//! - Watch → Companion: connect requests, asset requests, heartbeat replies

use heapless::Vec;

use crate::datamap::{AssetRef, DataEvent};
use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};

// Message type IDs: Companion → Watch
pub const MSG_CONNECT_ACK: u8 = 0x01;
pub const MSG_CONNECT_REFUSED: u8 = 0x02;
pub const MSG_SUSPENDED: u8 = 0x03;
pub const MSG_DATA_CHANGED: u8 = 0x10;
pub const MSG_ASSET_CHUNK: u8 = 0x11;
pub const MSG_ASSET_MISSING: u8 = 0x12;
pub const MSG_TIME_ZONE: u8 = 0x13;
pub const MSG_TIME: u8 = 0x14;
pub const MSG_PING: u8 = 0x1F;

// Message type IDs: Watch → Companion
pub const MSG_CONNECT: u8 = 0x20;
pub const MSG_REQUEST_ASSET: u8 = 0x21;
pub const MSG_PONG: u8 = 0x2F;

/// Asset chunk header: offset (u32 LE) + total length (u32 LE)
const CHUNK_HEADER_LEN: usize = 8;

/// Maximum asset bytes carried by one chunk
pub const MAX_CHUNK_DATA: usize = MAX_PAYLOAD_SIZE - CHUNK_HEADER_LEN;

/// Why the companion refused a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RefusalReason {
    /// Phone-side data service is not installed or disabled
    ServiceMissing,
    /// Bridge is not paired with a phone
    NotPaired,
    /// Another session is active
    Busy,
    /// Unrecognized reason code
    Unknown(u8),
}

impl RefusalReason {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0x01 => RefusalReason::ServiceMissing,
            0x02 => RefusalReason::NotPaired,
            0x03 => RefusalReason::Busy,
            other => RefusalReason::Unknown(other),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            RefusalReason::ServiceMissing => 0x01,
            RefusalReason::NotPaired => 0x02,
            RefusalReason::Busy => 0x03,
            RefusalReason::Unknown(other) => other,
        }
    }
}

/// Messages from the companion bridge to the watch
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CompanionMessage {
    /// Session established
    ConnectAck { session: u16 },
    /// Session request rejected
    ConnectRefused(RefusalReason),
    /// Session temporarily suspended (phone out of range, service restart)
    Suspended { cause: u8 },
    /// A data item changed on the phone
    DataChanged(DataEvent),
    /// Part of a requested asset
    AssetChunk {
        offset: u32,
        total: u32,
        data: Vec<u8, MAX_CHUNK_DATA>,
    },
    /// Requested asset is unknown to the companion
    AssetMissing,
    /// Phone's time zone changed; offset from UTC in seconds
    TimeZone { offset_s: i32 },
    /// Phone's wall-clock time in milliseconds since the Unix epoch
    Time { unix_ms: i64 },
    /// Heartbeat request
    Ping,
}

impl CompanionMessage {
    /// Parse a message from a frame
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        let payload = frame.payload.as_slice();
        match frame.msg_type {
            MSG_CONNECT_ACK => {
                let bytes: [u8; 2] = payload
                    .try_into()
                    .map_err(|_| FrameError::InvalidPayload)?;
                Ok(CompanionMessage::ConnectAck {
                    session: u16::from_le_bytes(bytes),
                })
            }
            MSG_CONNECT_REFUSED => {
                let byte = payload.first().ok_or(FrameError::InvalidPayload)?;
                Ok(CompanionMessage::ConnectRefused(RefusalReason::from_byte(
                    *byte,
                )))
            }
            MSG_SUSPENDED => {
                let cause = payload.first().copied().unwrap_or(0);
                Ok(CompanionMessage::Suspended { cause })
            }
            MSG_DATA_CHANGED => Ok(CompanionMessage::DataChanged(DataEvent::decode(payload)?)),
            MSG_ASSET_CHUNK => {
                if payload.len() < CHUNK_HEADER_LEN {
                    return Err(FrameError::InvalidPayload);
                }
                let (header, body) = payload.split_at(CHUNK_HEADER_LEN);
                let offset = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
                let total = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
                let data = Vec::from_slice(body).map_err(|_| FrameError::PayloadTooLarge)?;
                Ok(CompanionMessage::AssetChunk {
                    offset,
                    total,
                    data,
                })
            }
            MSG_ASSET_MISSING => Ok(CompanionMessage::AssetMissing),
            MSG_TIME_ZONE => {
                let bytes: [u8; 4] = payload
                    .try_into()
                    .map_err(|_| FrameError::InvalidPayload)?;
                Ok(CompanionMessage::TimeZone {
                    offset_s: i32::from_le_bytes(bytes),
                })
            }
            MSG_TIME => {
                let bytes: [u8; 8] = payload
                    .try_into()
                    .map_err(|_| FrameError::InvalidPayload)?;
                Ok(CompanionMessage::Time {
                    unix_ms: i64::from_le_bytes(bytes),
                })
            }
            MSG_PING => Ok(CompanionMessage::Ping),
            _ => Err(FrameError::InvalidFrame),
        }
    }

    /// Encode this message into a frame (for the bridge side and tests)
    pub fn to_frame(&self, seq: u8) -> Result<Frame, FrameError> {
        match self {
            CompanionMessage::ConnectAck { session } => {
                Frame::new(MSG_CONNECT_ACK, seq, &session.to_le_bytes())
            }
            CompanionMessage::ConnectRefused(reason) => {
                Frame::new(MSG_CONNECT_REFUSED, seq, &[reason.to_byte()])
            }
            CompanionMessage::Suspended { cause } => Frame::new(MSG_SUSPENDED, seq, &[*cause]),
            CompanionMessage::DataChanged(event) => {
                let mut buf = [0u8; MAX_PAYLOAD_SIZE];
                let encoded = event.encode(&mut buf)?;
                Frame::new(MSG_DATA_CHANGED, seq, encoded)
            }
            CompanionMessage::AssetChunk {
                offset,
                total,
                data,
            } => {
                let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
                payload
                    .extend_from_slice(&offset.to_le_bytes())
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                payload
                    .extend_from_slice(&total.to_le_bytes())
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                payload
                    .extend_from_slice(data)
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                Frame::new(MSG_ASSET_CHUNK, seq, &payload)
            }
            CompanionMessage::AssetMissing => Ok(Frame::empty(MSG_ASSET_MISSING, seq)),
            CompanionMessage::TimeZone { offset_s } => {
                Frame::new(MSG_TIME_ZONE, seq, &offset_s.to_le_bytes())
            }
            CompanionMessage::Time { unix_ms } => {
                Frame::new(MSG_TIME, seq, &unix_ms.to_le_bytes())
            }
            CompanionMessage::Ping => Ok(Frame::empty(MSG_PING, seq)),
        }
    }
}

/// Messages from the watch to the companion bridge
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WatchMessage {
    /// Request a session
    Connect,
    /// Ask for the bytes behind an asset reference
    RequestAsset(AssetRef),
    /// Heartbeat response
    Pong,
}

impl WatchMessage {
    /// Encode this message into a frame
    pub fn to_frame(&self, seq: u8) -> Result<Frame, FrameError> {
        match self {
            WatchMessage::Connect => Ok(Frame::empty(MSG_CONNECT, seq)),
            WatchMessage::RequestAsset(asset) => {
                Frame::new(MSG_REQUEST_ASSET, seq, asset.as_str().as_bytes())
            }
            WatchMessage::Pong => Ok(Frame::empty(MSG_PONG, seq)),
        }
    }

    /// Parse a message from a frame (for the bridge side and tests)
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        match frame.msg_type {
            MSG_CONNECT => Ok(WatchMessage::Connect),
            MSG_REQUEST_ASSET => {
                let digest = core::str::from_utf8(&frame.payload)
                    .map_err(|_| FrameError::InvalidPayload)?;
                let asset = AssetRef::new(digest).map_err(|_| FrameError::InvalidPayload)?;
                Ok(WatchMessage::RequestAsset(asset))
            }
            MSG_PONG => Ok(WatchMessage::Pong),
            _ => Err(FrameError::InvalidFrame),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datamap::{DataMap, KEY_TEMP_MAX, WEATHER_PATH};

    #[test]
    fn test_connect_ack_payload() {
        let frame = CompanionMessage::ConnectAck { session: 0x1234 }
            .to_frame(4)
            .unwrap();
        assert_eq!(frame.msg_type, MSG_CONNECT_ACK);
        assert_eq!(frame.seq, 4);
        assert_eq!(frame.payload.as_slice(), &[0x34, 0x12]);
    }

    #[test]
    fn test_connect_ack_wrong_length() {
        let frame = Frame::new(MSG_CONNECT_ACK, 0, &[1]).unwrap();
        assert_eq!(
            CompanionMessage::from_frame(&frame),
            Err(FrameError::InvalidPayload)
        );
    }

    #[test]
    fn test_refusal_reason_codes() {
        let frame = Frame::new(MSG_CONNECT_REFUSED, 0, &[0x02]).unwrap();
        assert_eq!(
            CompanionMessage::from_frame(&frame).unwrap(),
            CompanionMessage::ConnectRefused(RefusalReason::NotPaired)
        );
        assert_eq!(RefusalReason::from_byte(0x77), RefusalReason::Unknown(0x77));
        assert_eq!(RefusalReason::Unknown(0x77).to_byte(), 0x77);
    }

    #[test]
    fn test_asset_chunk_layout() {
        let msg = CompanionMessage::AssetChunk {
            offset: 480,
            total: 1028,
            data: Vec::from_slice(&[9, 8, 7]).unwrap(),
        };
        let frame = msg.to_frame(11).unwrap();
        assert_eq!(frame.msg_type, MSG_ASSET_CHUNK);
        assert_eq!(&frame.payload[..4], &480u32.to_le_bytes());
        assert_eq!(&frame.payload[4..8], &1028u32.to_le_bytes());
        assert_eq!(&frame.payload[8..], &[9, 8, 7]);
        assert_eq!(CompanionMessage::from_frame(&frame).unwrap(), msg);
    }

    #[test]
    fn test_time_zone_offset() {
        let frame = CompanionMessage::TimeZone { offset_s: -18_000 }
            .to_frame(2)
            .unwrap();
        assert_eq!(frame.payload.as_slice(), &(-18_000i32).to_le_bytes());
        assert_eq!(
            CompanionMessage::from_frame(&frame).unwrap(),
            CompanionMessage::TimeZone { offset_s: -18_000 }
        );
    }

    #[test]
    fn test_time_payload() {
        let msg = CompanionMessage::Time {
            unix_ms: 1_792_314_342_000,
        };
        let frame = msg.to_frame(6).unwrap();
        assert_eq!(frame.msg_type, MSG_TIME);
        assert_eq!(frame.payload.as_slice(), &1_792_314_342_000i64.to_le_bytes());
        assert_eq!(CompanionMessage::from_frame(&frame).unwrap(), msg);

        let short = Frame::new(MSG_TIME, 0, &[0; 4]).unwrap();
        assert_eq!(
            CompanionMessage::from_frame(&short),
            Err(FrameError::InvalidPayload)
        );
    }

    #[test]
    fn test_truncated_asset_chunk() {
        let frame = Frame::new(MSG_ASSET_CHUNK, 0, &[0, 0, 0]).unwrap();
        assert_eq!(
            CompanionMessage::from_frame(&frame),
            Err(FrameError::InvalidPayload)
        );
    }

    #[test]
    fn test_data_changed_frame() {
        let mut map = DataMap::new();
        map.put_double(KEY_TEMP_MAX, 5.6).unwrap();
        let msg = CompanionMessage::DataChanged(DataEvent::changed(WEATHER_PATH, map).unwrap());

        let frame = msg.to_frame(0).unwrap();
        assert_eq!(frame.msg_type, MSG_DATA_CHANGED);
        assert_eq!(CompanionMessage::from_frame(&frame).unwrap(), msg);
    }

    #[test]
    fn test_request_asset_carries_digest() {
        let asset = AssetRef::new("abcdef0123").unwrap();
        let frame = WatchMessage::RequestAsset(asset.clone())
            .to_frame(7)
            .unwrap();
        assert_eq!(frame.payload.as_slice(), b"abcdef0123");
        assert_eq!(
            WatchMessage::from_frame(&frame).unwrap(),
            WatchMessage::RequestAsset(asset)
        );
    }

    #[test]
    fn test_unknown_type() {
        let frame = Frame::empty(0x99, 0);
        assert_eq!(
            CompanionMessage::from_frame(&frame),
            Err(FrameError::InvalidFrame)
        );
        assert_eq!(WatchMessage::from_frame(&frame), Err(FrameError::InvalidFrame));
    }
}
