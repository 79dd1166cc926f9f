//! Error types for zbc-client.

use thiserror::Error;

use crate::body::TemplateId;
use crate::protocol::Headers;

/// Main error type for every stage of the decode pipeline.
///
/// Each variant names the stage that failed. Stages fail fast and nothing
/// retries, so the first error seen is the one reported.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The stream ended before a frame header or frame body was complete.
    #[error("Incomplete read: expected {expected} bytes, received {received}")]
    IncompleteRead { expected: usize, received: usize },

    /// I/O error other than end of stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The 12-byte frame header is structurally invalid.
    #[error("Frame decode error: {0}")]
    FrameDecode(String),

    /// The transport discriminator is neither request/response nor full duplex.
    #[error("Unsupported protocol id: {0}")]
    UnsupportedProtocol(u16),

    /// Fewer than 16 bytes were left for the request/response header.
    #[error("Correlation header decode error: {0}")]
    CorrelationDecode(String),

    /// Fewer than 8 bytes were left for the message descriptor.
    #[error("Message header decode error: {0}")]
    MessageHeaderDecode(String),

    /// The fixed-layout body of a known template could not be decoded.
    #[error("Body decode error ({template:?}): {fault}")]
    BodyDecode {
        template: TemplateId,
        fault: BodyFault,
        headers: Box<Headers>,
    },

    /// The embedded MessagePack payload is invalid.
    #[error("Payload decode error: {source}")]
    PayloadDecode {
        #[source]
        source: rmp_serde::decode::Error,
        headers: Box<Headers>,
    },

    /// The template id is not one of the recognized message kinds.
    #[error("Unknown template id: {template_id}")]
    UnknownTemplate {
        template_id: u16,
        headers: Box<Headers>,
    },
}

impl DecodeError {
    /// Headers parsed before the failure, when the failure happened after
    /// header parsing completed.
    pub fn headers(&self) -> Option<&Headers> {
        match self {
            DecodeError::BodyDecode { headers, .. }
            | DecodeError::PayloadDecode { headers, .. }
            | DecodeError::UnknownTemplate { headers, .. } => Some(headers),
            _ => None,
        }
    }

    /// True for end-of-stream conditions.
    #[inline]
    pub fn is_incomplete_read(&self) -> bool {
        matches!(self, DecodeError::IncompleteRead { .. })
    }
}

/// Why a fixed-layout body failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BodyFault {
    /// Fewer bytes than `block_length` follow the descriptor.
    #[error("block length {declared} exceeds {available} available bytes")]
    BlockTruncated { declared: usize, available: usize },

    /// `block_length` cannot hold the fields defined for this version.
    #[error("block length {declared} is smaller than {required} bytes required by version {version}")]
    BlockTooShort {
        declared: usize,
        required: usize,
        version: u16,
    },

    /// The variable-length field prefix or its data runs past the frame.
    #[error("variable data needs {declared} bytes, {available} available")]
    VarDataTruncated { declared: usize, available: usize },
}

/// Result type alias using DecodeError.
pub type Result<T> = std::result::Result<T, DecodeError>;
