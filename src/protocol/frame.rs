//! Frame struct holding one length-delimited frame read from the stream.
//!
//! Uses `bytes::Bytes` so later stages slice the body without copying.
//!
//! # Example
//!
//! ```
//! use zbc_client::protocol::{Frame, FrameHeader};
//! use bytes::Bytes;
//!
//! let mut raw = [0u8; 12];
//! raw[0] = 10;
//! let header = FrameHeader::decode(&raw).unwrap();
//! let frame = Frame::new(header, Bytes::from_static(&[1, 0, 30, 0, 0, 0, 0, 0, 0, 0]));
//!
//! assert_eq!(frame.len(), 10);
//! ```

use bytes::Bytes;

use super::wire_format::{FrameHeader, FRAME_HEADER_SIZE};

/// A complete frame: header plus exactly `header.length` body bytes.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Decoded frame header.
    pub header: FrameHeader,
    /// Frame body (transport header onwards).
    pub body: Bytes,
}

impl Frame {
    /// Create a new frame from header and body.
    pub fn new(header: FrameHeader, body: Bytes) -> Self {
        Self { header, body }
    }

    /// Get a reference to the body bytes.
    #[inline]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Bytes this frame occupied on the wire, header included.
    #[inline]
    pub fn wire_len(&self) -> usize {
        FRAME_HEADER_SIZE + self.body.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_lengths() {
        let mut raw = [0u8; FRAME_HEADER_SIZE];
        raw[0] = 4;
        let header = FrameHeader::decode(&raw).unwrap();
        let frame = Frame::new(header, Bytes::from_static(b"abcd"));

        assert_eq!(frame.len(), 4);
        assert_eq!(frame.wire_len(), 16);
        assert_eq!(frame.body(), b"abcd");
        assert!(!frame.is_empty());
    }
}
