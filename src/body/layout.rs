//! Fixed block + variable data layout shared by every message body.
//!
//! ```text
//! ┌───────────────────────────────┬──────────┬──────────────┐
//! │ Fixed block                   │ Length   │ Var data     │
//! │ block_length bytes            │ u16 LE   │ length bytes │
//! └───────────────────────────────┴──────────┴──────────────┘
//! ```
//!
//! Fields added in later schema versions carry a `since_version`; a message
//! of an older version decodes them as `None`. A block longer than the
//! known fields is allowed and the excess is skipped.

use bytes::Bytes;

use crate::error::BodyFault;

/// Size of the length prefix of a variable data field.
pub const VAR_DATA_LENGTH_SIZE: usize = 2;

/// Position of a fixed field inside the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub offset: usize,
    pub size: usize,
    pub since_version: u16,
}

impl Field {
    pub const fn new(offset: usize, size: usize, since_version: u16) -> Self {
        Self {
            offset,
            size,
            since_version,
        }
    }

    #[inline]
    fn end(&self) -> usize {
        self.offset + self.size
    }
}

/// Minimum block length holding every field present at `version`.
pub fn required_block_length(fields: &[Field], version: u16) -> usize {
    fields
        .iter()
        .filter(|f| f.since_version <= version)
        .map(Field::end)
        .max()
        .unwrap_or(0)
}

/// A body split into its fixed block and the bytes after it.
pub(crate) struct BodyLayout<'a> {
    block: &'a [u8],
    version: u16,
    rest: Bytes,
}

impl<'a> BodyLayout<'a> {
    /// Split `bytes` at `block_length`, checking the block can hold `fields`.
    pub fn split(
        bytes: &'a Bytes,
        block_length: u16,
        version: u16,
        fields: &[Field],
    ) -> Result<Self, BodyFault> {
        let declared = block_length as usize;
        if declared > bytes.len() {
            return Err(BodyFault::BlockTruncated {
                declared,
                available: bytes.len(),
            });
        }

        let required = required_block_length(fields, version);
        if declared < required {
            return Err(BodyFault::BlockTooShort {
                declared,
                required,
                version,
            });
        }

        Ok(Self {
            block: &bytes[..declared],
            version,
            rest: bytes.slice(declared..),
        })
    }

    #[inline]
    fn present(&self, field: Field) -> bool {
        field.since_version <= self.version
    }

    // Fields that are present always lie inside the block: split() checked
    // the block against every present field.

    pub fn u8(&self, field: Field) -> Option<u8> {
        self.present(field).then(|| self.block[field.offset])
    }

    pub fn u16(&self, field: Field) -> Option<u16> {
        self.present(field).then(|| {
            let at = field.offset;
            u16::from_le_bytes([self.block[at], self.block[at + 1]])
        })
    }

    pub fn u64(&self, field: Field) -> Option<u64> {
        self.present(field).then(|| {
            let mut word = [0u8; 8];
            word.copy_from_slice(&self.block[field.offset..field.end()]);
            u64::from_le_bytes(word)
        })
    }

    /// Read the length-prefixed variable data field after the block.
    ///
    /// The returned bytes share memory with the frame.
    pub fn var_data(&self) -> Result<Bytes, BodyFault> {
        let rest = &self.rest;
        if rest.len() < VAR_DATA_LENGTH_SIZE {
            return Err(BodyFault::VarDataTruncated {
                declared: VAR_DATA_LENGTH_SIZE,
                available: rest.len(),
            });
        }

        let declared = u16::from_le_bytes([rest[0], rest[1]]) as usize;
        let available = rest.len() - VAR_DATA_LENGTH_SIZE;
        if declared > available {
            return Err(BodyFault::VarDataTruncated {
                declared,
                available,
            });
        }

        Ok(rest.slice(VAR_DATA_LENGTH_SIZE..VAR_DATA_LENGTH_SIZE + declared))
    }
}
