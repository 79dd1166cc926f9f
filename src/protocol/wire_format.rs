//! Wire format decoding for the header layers.
//!
//! A frame on the wire:
//! ```text
//! ┌──────────────┬───────────┬──────────────────┬────────────┬──────────────┐
//! │ Frame header │ Transport │ Request/response │ Message    │ Body         │
//! │ 12 bytes     │ 2 bytes   │ 16 bytes (opt.)  │ header 8 B │ block + var  │
//! └──────────────┴───────────┴──────────────────┴────────────┴──────────────┘
//! ```
//!
//! All multi-byte integers are Little Endian.

use crate::error::{DecodeError, Result};

/// Frame header size in bytes (fixed, exactly 12).
pub const FRAME_HEADER_SIZE: usize = 12;

/// Transport header size in bytes.
pub const TRANSPORT_HEADER_SIZE: usize = 2;

/// Request/response correlation header size in bytes.
pub const CORRELATION_HEADER_SIZE: usize = 16;

/// Message descriptor size in bytes.
pub const MESSAGE_HEADER_SIZE: usize = 8;

/// Smallest frame body that can carry a transport header and a descriptor.
pub const MIN_FRAME_LENGTH: u32 = (TRANSPORT_HEADER_SIZE + MESSAGE_HEADER_SIZE) as u32;

/// Default maximum frame length (16 MB).
pub const DEFAULT_MAX_FRAME_LENGTH: u32 = 16 * 1024 * 1024;

#[inline]
fn u16_le(buf: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([buf[at], buf[at + 1]])
}

#[inline]
fn u32_le(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

#[inline]
fn u64_le(buf: &[u8], at: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&buf[at..at + 8]);
    u64::from_le_bytes(word)
}

/// Outer frame header.
///
/// Only `length` is interpreted by the decoder. The other fields are
/// decoded so callers can see them, but nothing here checks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Number of bytes following this header that belong to the frame.
    pub length: u32,
    pub version: u8,
    pub flags: u8,
    pub frame_type: u16,
    pub stream_id: u32,
}

impl FrameHeader {
    /// Decode a frame header from bytes.
    ///
    /// Returns `None` if buffer is too short.
    ///
    /// # Example
    ///
    /// ```
    /// use zbc_client::protocol::FrameHeader;
    ///
    /// let bytes = [30, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
    /// let header = FrameHeader::decode(&bytes).unwrap();
    /// assert_eq!(header.length, 30);
    /// ```
    pub fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() < FRAME_HEADER_SIZE {
            return None;
        }
        Some(Self {
            length: u32_le(buf, 0),
            version: buf[4],
            flags: buf[5],
            frame_type: u16_le(buf, 6),
            stream_id: u32_le(buf, 8),
        })
    }

    /// Validate the declared length.
    ///
    /// Checks:
    /// - Length can hold at least a transport header and a descriptor
    /// - Length doesn't exceed max
    pub fn validate(&self, max_frame_length: u32) -> Result<()> {
        if self.length < MIN_FRAME_LENGTH {
            return Err(DecodeError::FrameDecode(format!(
                "Frame length {} is below minimum {}",
                self.length, MIN_FRAME_LENGTH
            )));
        }

        if self.length > max_frame_length {
            return Err(DecodeError::FrameDecode(format!(
                "Frame length {} exceeds maximum {}",
                self.length, max_frame_length
            )));
        }

        Ok(())
    }
}

/// Transport sub-protocol selected by the first two bytes of a frame body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ProtocolId {
    /// Request/response exchange; a correlation header follows.
    RequestResponse = 0,
    /// Fire-and-forget message; no correlation header.
    FullDuplexSingleMessage = 1,
}

impl TryFrom<u16> for ProtocolId {
    type Error = DecodeError;

    fn try_from(value: u16) -> Result<Self> {
        match value {
            0 => Ok(ProtocolId::RequestResponse),
            1 => Ok(ProtocolId::FullDuplexSingleMessage),
            other => Err(DecodeError::UnsupportedProtocol(other)),
        }
    }
}

/// Two-byte transport header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportHeader {
    pub protocol_id: ProtocolId,
}

impl TransportHeader {
    /// Classify a frame body by its leading discriminator.
    ///
    /// # Example
    ///
    /// ```
    /// use zbc_client::protocol::{ProtocolId, TransportHeader};
    ///
    /// let header = TransportHeader::decode(&[1, 0]).unwrap();
    /// assert_eq!(header.protocol_id, ProtocolId::FullDuplexSingleMessage);
    /// assert!(TransportHeader::decode(&[7, 0]).is_err());
    /// ```
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < TRANSPORT_HEADER_SIZE {
            return Err(DecodeError::FrameDecode(format!(
                "Frame body of {} bytes cannot hold a transport header",
                buf.len()
            )));
        }
        let protocol_id = ProtocolId::try_from(u16_le(buf, 0))?;
        Ok(Self { protocol_id })
    }

    /// Whether a correlation header follows this transport header.
    #[inline]
    pub fn has_correlation(&self) -> bool {
        self.protocol_id == ProtocolId::RequestResponse
    }

    /// Offset of the message descriptor within the frame body.
    #[inline]
    pub fn descriptor_offset(&self) -> usize {
        if self.has_correlation() {
            TRANSPORT_HEADER_SIZE + CORRELATION_HEADER_SIZE
        } else {
            TRANSPORT_HEADER_SIZE
        }
    }
}

/// Request/response header.
///
/// Opaque to the decoder; a correlator matches responses to requests with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CorrelationHeader {
    pub connection_id: u64,
    pub request_id: u64,
}

impl CorrelationHeader {
    /// Decode the 16 bytes that follow a request/response transport header.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < CORRELATION_HEADER_SIZE {
            return Err(DecodeError::CorrelationDecode(format!(
                "need {} bytes, {} available",
                CORRELATION_HEADER_SIZE,
                buf.len()
            )));
        }
        Ok(Self {
            connection_id: u64_le(buf, 0),
            request_id: u64_le(buf, 8),
        })
    }
}

/// Eight-byte message descriptor.
///
/// `block_length` and `version` are carried to the body decoder as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageDescriptor {
    pub template_id: u16,
    pub block_length: u16,
    pub version: u16,
    pub reserved: u16,
}

impl MessageDescriptor {
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < MESSAGE_HEADER_SIZE {
            return Err(DecodeError::MessageHeaderDecode(format!(
                "need {} bytes, {} available",
                MESSAGE_HEADER_SIZE,
                buf.len()
            )));
        }
        Ok(Self {
            template_id: u16_le(buf, 0),
            block_length: u16_le(buf, 2),
            version: u16_le(buf, 4),
            reserved: u16_le(buf, 6),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_header_little_endian_byte_order() {
        let bytes = [
            0x0B, 0x0A, 0x09, 0x08, // length
            0x01, // version
            0x02, // flags
            0x04, 0x03, // type
            0x08, 0x07, 0x06, 0x05, // stream id
        ];
        let header = FrameHeader::decode(&bytes).unwrap();

        assert_eq!(header.length, 0x08090A0B);
        assert_eq!(header.version, 0x01);
        assert_eq!(header.flags, 0x02);
        assert_eq!(header.frame_type, 0x0304);
        assert_eq!(header.stream_id, 0x05060708);
    }

    #[test]
    fn test_frame_header_too_short_buffer() {
        let buf = [0u8; 11];
        assert!(FrameHeader::decode(&buf).is_none());
    }

    #[test]
    fn test_validate_length_bounds() {
        let mut header = FrameHeader::decode(&[0u8; 12]).unwrap();

        header.length = MIN_FRAME_LENGTH - 1;
        let err = header.validate(DEFAULT_MAX_FRAME_LENGTH).unwrap_err();
        assert!(err.to_string().contains("below minimum"));

        header.length = MIN_FRAME_LENGTH;
        assert!(header.validate(DEFAULT_MAX_FRAME_LENGTH).is_ok());

        header.length = 1_000;
        let err = header.validate(100).unwrap_err();
        assert!(matches!(err, DecodeError::FrameDecode(_)));
        assert!(err.to_string().contains("exceeds maximum"));
    }

    #[test]
    fn test_transport_header_variants() {
        let rr = TransportHeader::decode(&[0, 0]).unwrap();
        assert_eq!(rr.protocol_id, ProtocolId::RequestResponse);
        assert!(rr.has_correlation());
        assert_eq!(rr.descriptor_offset(), 18);

        let fd = TransportHeader::decode(&[1, 0]).unwrap();
        assert_eq!(fd.protocol_id, ProtocolId::FullDuplexSingleMessage);
        assert!(!fd.has_correlation());
        assert_eq!(fd.descriptor_offset(), 2);
    }

    #[test]
    fn test_transport_header_rejects_unknown_protocol() {
        for raw in [2u16, 0x0100, u16::MAX] {
            let err = TransportHeader::decode(&raw.to_le_bytes()).unwrap_err();
            assert!(matches!(err, DecodeError::UnsupportedProtocol(id) if id == raw));
        }
    }

    #[test]
    fn test_correlation_header_decode() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&7u64.to_le_bytes());
        bytes.extend_from_slice(&0xDEADBEEFu64.to_le_bytes());

        let header = CorrelationHeader::decode(&bytes).unwrap();
        assert_eq!(header.connection_id, 7);
        assert_eq!(header.request_id, 0xDEADBEEF);

        let err = CorrelationHeader::decode(&bytes[..15]).unwrap_err();
        assert!(matches!(err, DecodeError::CorrelationDecode(_)));
    }

    #[test]
    fn test_message_descriptor_field_order() {
        let bytes = [30, 0, 10, 0, 2, 0, 0, 0];
        let descriptor = MessageDescriptor::decode(&bytes).unwrap();

        assert_eq!(descriptor.template_id, 30);
        assert_eq!(descriptor.block_length, 10);
        assert_eq!(descriptor.version, 2);
        assert_eq!(descriptor.reserved, 0);

        let err = MessageDescriptor::decode(&bytes[..7]).unwrap_err();
        assert!(matches!(err, DecodeError::MessageHeaderDecode(_)));
    }
}
