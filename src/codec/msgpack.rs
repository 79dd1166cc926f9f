//! MsgPack codec using `rmp-serde`.
//!
//! Message bodies carry their payload as a MessagePack document. It is
//! self-describing, so it decodes into a [`Value`] without a schema, or
//! into any `Deserialize` type when the caller knows the shape.
//!
//! # Example
//!
//! ```
//! use zbc_client::codec::{MsgPackCodec, Value};
//!
//! // {"a": 1}
//! let bytes = [0x81, 0xa1, b'a', 0x01];
//! let value = MsgPackCodec::decode_value(&bytes).unwrap();
//!
//! assert_eq!(value.get("a").and_then(Value::as_i64), Some(1));
//! ```

use std::io::Cursor;

use serde::de::{self, DeserializeOwned};
use serde::Deserialize;

use super::Value;

/// MessagePack codec for payloads.
pub struct MsgPackCodec;

impl MsgPackCodec {
    /// Decode MsgPack bytes to a value.
    ///
    /// The whole slice must hold exactly one MessagePack document.
    ///
    /// # Errors
    ///
    /// Returns error if the bytes cannot be deserialized to type T, or if
    /// bytes remain after the document.
    pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, rmp_serde::decode::Error> {
        let mut cursor = Cursor::new(bytes);
        let value = {
            let mut deserializer = rmp_serde::Deserializer::new(&mut cursor);
            T::deserialize(&mut deserializer)?
        };

        let consumed = cursor.position() as usize;
        if consumed != bytes.len() {
            return Err(de::Error::custom(format!(
                "{} trailing bytes after payload",
                bytes.len() - consumed
            )));
        }
        Ok(value)
    }

    /// Decode MsgPack bytes into a generic [`Value`] tree.
    ///
    /// All or nothing: an error never comes with a partial value.
    #[inline]
    pub fn decode_value(bytes: &[u8]) -> Result<Value, rmp_serde::decode::Error> {
        Self::decode(bytes)
    }
}
