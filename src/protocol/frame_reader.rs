//! Frame reader over an async byte stream.
//!
//! Reads a 12-byte frame header, validates it, then reads exactly
//! `length` body bytes. Frames carry no sync markers, so once a read
//! fails the stream position is unknown and the reader must not be reused.
//!
//! # Example
//!
//! ```ignore
//! use zbc_client::protocol::FrameReader;
//!
//! let mut reader = FrameReader::new(socket);
//! while let Some(frame) = reader.next_frame().await? {
//!     println!("frame of {} bytes", frame.len());
//! }
//! ```

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::wire_format::{FrameHeader, DEFAULT_MAX_FRAME_LENGTH, FRAME_HEADER_SIZE};
use super::Frame;
use crate::error::{DecodeError, Result};

/// Reads length-delimited frames from an `AsyncRead`.
pub struct FrameReader<R> {
    reader: R,
    /// Maximum allowed frame length.
    max_frame_length: u32,
    /// Pad frames to this boundary, if set.
    alignment: Option<usize>,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    /// Create a new frame reader with default settings.
    ///
    /// Default max frame length: 16MB, no alignment padding.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            max_frame_length: DEFAULT_MAX_FRAME_LENGTH,
            alignment: None,
        }
    }

    /// Set the maximum accepted frame length.
    pub fn with_max_frame_length(mut self, max_frame_length: u32) -> Self {
        self.max_frame_length = max_frame_length;
        self
    }

    /// Skip padding after each frame so headers start on `alignment` boundaries.
    ///
    /// `None` or `Some(0 | 1)` disables padding.
    pub fn with_alignment(mut self, alignment: Option<usize>) -> Self {
        self.alignment = alignment.filter(|a| *a > 1);
        self
    }

    /// Read the next frame, treating a clean end of stream as `Ok(None)`.
    ///
    /// The stream is cleanly closed only if it ends before the first byte
    /// of a frame header. Ending anywhere else is an `IncompleteRead`.
    pub async fn next_frame(&mut self) -> Result<Option<Frame>> {
        let mut raw = [0u8; FRAME_HEADER_SIZE];
        let received = self.fill(&mut raw).await?;
        if received == 0 {
            return Ok(None);
        }
        if received < FRAME_HEADER_SIZE {
            return Err(DecodeError::IncompleteRead {
                expected: FRAME_HEADER_SIZE,
                received,
            });
        }
        self.read_rest(&raw).await.map(Some)
    }

    /// Read exactly one frame.
    ///
    /// # Errors
    ///
    /// - `IncompleteRead` if the stream ends before the frame is complete
    /// - `FrameDecode` if the header declares an invalid length
    pub async fn read_frame(&mut self) -> Result<Frame> {
        let mut raw = [0u8; FRAME_HEADER_SIZE];
        let received = self.fill(&mut raw).await?;
        if received < FRAME_HEADER_SIZE {
            return Err(DecodeError::IncompleteRead {
                expected: FRAME_HEADER_SIZE,
                received,
            });
        }
        self.read_rest(&raw).await
    }

    async fn read_rest(&mut self, raw: &[u8; FRAME_HEADER_SIZE]) -> Result<Frame> {
        let header = FrameHeader::decode(raw).ok_or_else(|| {
            DecodeError::FrameDecode("Frame header shorter than 12 bytes".to_string())
        })?;
        header.validate(self.max_frame_length)?;

        let length = header.length as usize;
        let mut body = BytesMut::zeroed(length);
        let received = self.fill(&mut body).await?;
        if received < length {
            return Err(DecodeError::IncompleteRead {
                expected: length,
                received,
            });
        }

        self.skip_padding(FRAME_HEADER_SIZE + length).await?;

        Ok(Frame::new(header, body.freeze()))
    }

    async fn skip_padding(&mut self, frame_len: usize) -> Result<()> {
        let Some(alignment) = self.alignment else {
            return Ok(());
        };
        let padding = (alignment - frame_len % alignment) % alignment;
        if padding == 0 {
            return Ok(());
        }

        let mut pad = vec![0u8; padding];
        let received = self.fill(&mut pad).await?;
        if received < padding {
            return Err(DecodeError::IncompleteRead {
                expected: padding,
                received,
            });
        }
        Ok(())
    }

    /// Fill `buf` from the stream, returning how many bytes arrived before EOF.
    async fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]).await {
                Ok(0) => break, // Connection closed
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(DecodeError::Io(e)),
            }
        }
        Ok(filled)
    }

    /// Get a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Consume the frame reader, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}
