//! Aggregate of all header layers of one frame.
//!
//! Parsing peels the layers in order:
//! - transport header at offset 0
//! - correlation header at offset 2, request/response frames only
//! - message descriptor at offset 2 or 18

use super::wire_format::{
    CorrelationHeader, FrameHeader, MessageDescriptor, TransportHeader, MESSAGE_HEADER_SIZE,
    TRANSPORT_HEADER_SIZE,
};
use super::Frame;
use crate::error::Result;

/// Every header layer of a frame, built once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headers {
    frame: FrameHeader,
    transport: TransportHeader,
    correlation: Option<CorrelationHeader>,
    descriptor: MessageDescriptor,
}

impl Headers {
    /// Parse the header layers of a frame.
    ///
    /// # Errors
    ///
    /// `UnsupportedProtocol`, `CorrelationDecode` or `MessageHeaderDecode`,
    /// whichever layer fails first.
    pub fn parse(frame: &Frame) -> Result<Self> {
        let body = frame.body();
        let transport = TransportHeader::decode(body)?;

        let correlation = if transport.has_correlation() {
            Some(CorrelationHeader::decode(&body[TRANSPORT_HEADER_SIZE..])?)
        } else {
            None
        };

        let descriptor = MessageDescriptor::decode(&body[transport.descriptor_offset()..])?;

        Ok(Self {
            frame: frame.header,
            transport,
            correlation,
            descriptor,
        })
    }

    #[inline]
    pub fn frame(&self) -> &FrameHeader {
        &self.frame
    }

    #[inline]
    pub fn transport(&self) -> &TransportHeader {
        &self.transport
    }

    /// Correlation header; `None` for full duplex frames.
    #[inline]
    pub fn correlation(&self) -> Option<&CorrelationHeader> {
        self.correlation.as_ref()
    }

    #[inline]
    pub fn descriptor(&self) -> &MessageDescriptor {
        &self.descriptor
    }

    /// Template id from the descriptor.
    #[inline]
    pub fn template_id(&self) -> u16 {
        self.descriptor.template_id
    }

    /// Offset of the message descriptor within the frame body (2 or 18).
    #[inline]
    pub fn descriptor_offset(&self) -> usize {
        self.transport.descriptor_offset()
    }

    /// Offset of the message body within the frame body.
    #[inline]
    pub fn body_offset(&self) -> usize {
        self.descriptor_offset() + MESSAGE_HEADER_SIZE
    }
}
