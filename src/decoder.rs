//! Message decoder: runs one frame through every pipeline stage.
//!
//! 1. Read frame (length-delimited)
//! 2. Parse header layers (transport, correlation, descriptor)
//! 3. Decode the typed body selected by template id
//! 4. Decode the MessagePack payload into a [`Value`](crate::Value)
//! 5. Assemble the [`Message`]
//!
//! # Example
//!
//! ```ignore
//! use zbc_client::decode_one;
//!
//! let message = decode_one(&mut socket).await?;
//! if let Some(correlation) = message.correlation() {
//!     println!("response to request {}", correlation.request_id);
//! }
//! ```

use bytes::Bytes;
use tokio::io::AsyncRead;

use crate::body::{Body, TemplateId};
use crate::codec::MsgPackCodec;
use crate::error::{DecodeError, Result};
use crate::message::Message;
use crate::protocol::{Frame, FrameReader, Headers, DEFAULT_MAX_FRAME_LENGTH};

/// What to do with a template id outside the known set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownTemplatePolicy {
    /// Fail with `DecodeError::UnknownTemplate`.
    #[default]
    Reject,
    /// Deliver the message with `Body::Unrecognized` and no payload.
    Skip,
}

/// Configuration for decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Largest frame length accepted from a frame header.
    pub max_frame_length: u32,
    /// Frame alignment on the wire; `None` means frames are back to back.
    pub frame_alignment: Option<usize>,
    /// Handling of unknown template ids.
    pub unknown_templates: UnknownTemplatePolicy,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_frame_length: DEFAULT_MAX_FRAME_LENGTH,
            frame_alignment: None,
            unknown_templates: UnknownTemplatePolicy::Reject,
        }
    }
}

/// Decode a frame that has already been read.
pub fn decode_frame(frame: &Frame, config: &DecoderConfig) -> Result<Message> {
    let headers = Headers::parse(frame)?;
    let body = frame.body.slice(headers.body_offset()..);
    parse_message(headers, &body, config.unknown_templates)
}

/// Decode the body and payload that follow a parsed set of headers.
///
/// `body` starts right after the message descriptor.
pub fn parse_message(
    headers: Headers,
    body: &Bytes,
    unknown_templates: UnknownTemplatePolicy,
) -> Result<Message> {
    let descriptor = *headers.descriptor();

    let Some(template) = TemplateId::from_u16(descriptor.template_id) else {
        return match unknown_templates {
            UnknownTemplatePolicy::Reject => Err(DecodeError::UnknownTemplate {
                template_id: descriptor.template_id,
                headers: Box::new(headers),
            }),
            UnknownTemplatePolicy::Skip => {
                tracing::warn!(
                    "Skipping message with unknown template id {}",
                    descriptor.template_id
                );
                let body = Body::Unrecognized {
                    template_id: descriptor.template_id,
                    bytes: body.clone(),
                };
                Ok(Message::assemble(headers, body, None))
            }
        };
    };

    let typed = match Body::decode(template, body, descriptor.block_length, descriptor.version) {
        Ok(typed) => typed,
        Err(fault) => {
            return Err(DecodeError::BodyDecode {
                template,
                fault,
                headers: Box::new(headers),
            })
        }
    };

    let payload = match typed.payload().map(|bytes| MsgPackCodec::decode_value(bytes)) {
        Some(Ok(value)) => Some(value),
        Some(Err(source)) => {
            return Err(DecodeError::PayloadDecode {
                source,
                headers: Box::new(headers),
            })
        }
        None => None,
    };

    tracing::trace!(
        template_id = descriptor.template_id,
        version = descriptor.version,
        frame_length = headers.frame().length,
        "Decoded message"
    );

    Ok(Message::assemble(headers, typed, payload))
}

/// Decode exactly one message from `reader` with default settings.
///
/// Intended for request/response exchanges where the caller reads one
/// reply per request.
pub async fn decode_one<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Message> {
    MessageDecoder::new(reader).decode_one().await
}

/// Decoder bound to one byte stream.
pub struct MessageDecoder<R> {
    frames: FrameReader<R>,
    config: DecoderConfig,
}

impl<R: AsyncRead + Unpin> MessageDecoder<R> {
    /// Create a decoder with default configuration.
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, DecoderConfig::default())
    }

    pub fn with_config(reader: R, config: DecoderConfig) -> Self {
        let frames = FrameReader::new(reader)
            .with_max_frame_length(config.max_frame_length)
            .with_alignment(config.frame_alignment);
        Self { frames, config }
    }

    #[inline]
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Read one frame and parse only its header layers.
    ///
    /// Returns the headers and the bytes after the message descriptor,
    /// ready for [`MessageDecoder::parse_message`].
    pub async fn read_headers(&mut self) -> Result<(Headers, Bytes)> {
        let frame = self.frames.read_frame().await?;
        let headers = Headers::parse(&frame)?;
        let body = frame.body.slice(headers.body_offset()..);
        Ok((headers, body))
    }

    /// Second phase of [`MessageDecoder::read_headers`].
    pub fn parse_message(&self, headers: Headers, body: &Bytes) -> Result<Message> {
        parse_message(headers, body, self.config.unknown_templates)
    }

    /// Read and decode exactly one message.
    pub async fn decode_one(&mut self) -> Result<Message> {
        let frame = self.frames.read_frame().await?;
        decode_frame(&frame, &self.config)
    }

    /// Read and decode the next message; `Ok(None)` when the stream closed
    /// cleanly at a frame boundary.
    pub async fn next_message(&mut self) -> Result<Option<Message>> {
        match self.frames.next_frame().await? {
            Some(frame) => decode_frame(&frame, &self.config).map(Some),
            None => Ok(None),
        }
    }

    /// Consume the decoder, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.frames.into_inner()
    }
}
