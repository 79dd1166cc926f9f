//! Protocol module - wire format, framing, and header layers.
//!
//! This module implements the envelope around every message:
//! - 12-byte frame header and length-delimited frame reading
//! - 2-byte transport header selecting request/response or full duplex
//! - 16-byte correlation header (request/response only)
//! - 8-byte message descriptor

mod frame;
mod frame_reader;
mod headers;
mod wire_format;

pub use frame::Frame;
pub use frame_reader::FrameReader;
pub use headers::Headers;
pub use wire_format::{
    CorrelationHeader, FrameHeader, MessageDescriptor, ProtocolId, TransportHeader,
    CORRELATION_HEADER_SIZE, DEFAULT_MAX_FRAME_LENGTH, FRAME_HEADER_SIZE, MESSAGE_HEADER_SIZE,
    MIN_FRAME_LENGTH, TRANSPORT_HEADER_SIZE,
};
