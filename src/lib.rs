//! # zbc-client
//!
//! Client-side decoding for the Zeebe broker wire protocol.
//!
//! Turns a byte stream from the broker into [`Message`] values:
//!
//! ```text
//! bytes ─► frame ─► transport ─► correlation? ─► descriptor ─► body ─► payload ─► Message
//! ```
//!
//! - [`protocol`] - framing and header layers
//! - [`body`] - fixed-layout bodies selected by template id
//! - [`codec`] - MessagePack payloads as [`Value`] trees
//! - [`Subscription`] - long-lived read loop feeding a bounded queue
//! - [`decode_one`] - single message, for request/response exchanges
//!
//! Connecting, sending requests, correlating responses and credit-based
//! flow control belong to the caller.
//!
//! ## Example
//!
//! ```ignore
//! use zbc_client::Subscription;
//!
//! let mut subscription = Subscription::open(socket);
//! while let Some(message) = subscription.next().await {
//!     println!("{:?}", message?.payload());
//! }
//! ```

pub mod body;
pub mod codec;
pub mod error;
pub mod protocol;

mod decoder;
mod message;
mod subscription;

pub use body::{Body, TemplateId};
pub use codec::Value;
pub use decoder::{
    decode_frame, decode_one, parse_message, DecoderConfig, MessageDecoder, UnknownTemplatePolicy,
};
pub use error::{BodyFault, DecodeError, Result};
pub use message::Message;
pub use protocol::Headers;
pub use subscription::{Subscription, SubscriptionBuilder, TryRecvError, DEFAULT_QUEUE_CAPACITY};
