//! Decoded message: header layers, typed body and payload value.

use serde::de::DeserializeOwned;

use crate::body::{Body, TemplateId};
use crate::codec::{MsgPackCodec, Value};
use crate::protocol::{CorrelationHeader, Headers};

/// One fully decoded frame.
///
/// Built once by the decoder; read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    headers: Headers,
    body: Body,
    payload: Option<Value>,
}

impl Message {
    pub(crate) fn assemble(headers: Headers, body: Body, payload: Option<Value>) -> Self {
        Self {
            headers,
            body,
            payload,
        }
    }

    #[inline]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    #[inline]
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Decoded payload; `None` only for an unrecognized body.
    #[inline]
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Known template of the body.
    #[inline]
    pub fn template(&self) -> Option<TemplateId> {
        self.body.template()
    }

    /// Correlation header for request/response frames.
    #[inline]
    pub fn correlation(&self) -> Option<&CorrelationHeader> {
        self.headers.correlation()
    }

    /// Deserialize the raw payload bytes into a concrete type.
    ///
    /// Returns `None` for an unrecognized body.
    pub fn payload_as<T: DeserializeOwned>(
        &self,
    ) -> Option<Result<T, rmp_serde::decode::Error>> {
        self.body
            .payload()
            .map(|bytes| MsgPackCodec::decode::<T>(bytes))
    }

    /// Split into parts.
    pub fn into_parts(self) -> (Headers, Body, Option<Value>) {
        (self.headers, self.body, self.payload)
    }
}
