//! Codec module - deserialization of embedded payloads.
//!
//! - [`MsgPackCodec`] - MessagePack using `rmp-serde`
//! - [`Value`] - schema-less value tree the payloads decode into
//!
//! # Design
//!
//! Codecs are implemented as marker structs with static methods rather than trait objects.

mod msgpack;
mod value;

pub use msgpack::MsgPackCodec;
pub use value::Value;
