//! Body module - template ids and fixed-layout body decoders.
//!
//! The message descriptor's `template_id` selects exactly one record
//! decoder. Each decoder is a pure function of `(bytes, block_length,
//! version)` and returns the typed record, whose variable data field holds
//! the MessagePack payload.
//!
//! # Example
//!
//! ```
//! use zbc_client::body::{Body, TemplateId};
//! use bytes::Bytes;
//!
//! // Control message response: empty block, then `[]` as var data
//! let bytes = Bytes::from_static(&[1, 0, 0x90]);
//! let body = Body::decode(TemplateId::ControlMessageResponse, &bytes, 0, 0).unwrap();
//!
//! assert_eq!(body.template(), Some(TemplateId::ControlMessageResponse));
//! assert_eq!(body.payload().unwrap().as_ref(), &[0x90]);
//! ```

mod layout;
mod records;

pub use layout::VAR_DATA_LENGTH_SIZE;
pub use records::{
    ControlMessageResponse, ExecuteCommandRequest, ExecuteCommandResponse, SubscribedEvent,
};

use bytes::Bytes;

use crate::error::BodyFault;

/// Recognized message kinds and their wire template ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum TemplateId {
    ControlMessageResponse = 11,
    ExecuteCommandRequest = 20,
    ExecuteCommandResponse = 21,
    SubscribedEvent = 30,
}

impl TemplateId {
    /// Map a raw template id onto a known message kind.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            11 => Some(TemplateId::ControlMessageResponse),
            20 => Some(TemplateId::ExecuteCommandRequest),
            21 => Some(TemplateId::ExecuteCommandResponse),
            30 => Some(TemplateId::SubscribedEvent),
            _ => None,
        }
    }

    #[inline]
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

/// Decoded message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    ExecuteCommandRequest(ExecuteCommandRequest),
    ExecuteCommandResponse(ExecuteCommandResponse),
    ControlMessageResponse(ControlMessageResponse),
    SubscribedEvent(SubscribedEvent),
    /// Template id outside the known set, kept undecoded.
    ///
    /// Only produced when the decoder is configured to skip unknown templates.
    Unrecognized { template_id: u16, bytes: Bytes },
}

impl Body {
    /// Decode the body of a known template.
    ///
    /// `bytes` starts right after the message descriptor and runs to the
    /// end of the frame.
    pub fn decode(
        template: TemplateId,
        bytes: &Bytes,
        block_length: u16,
        version: u16,
    ) -> Result<Self, BodyFault> {
        let body = match template {
            TemplateId::ExecuteCommandRequest => Body::ExecuteCommandRequest(
                ExecuteCommandRequest::decode(bytes, block_length, version)?,
            ),
            TemplateId::ExecuteCommandResponse => Body::ExecuteCommandResponse(
                ExecuteCommandResponse::decode(bytes, block_length, version)?,
            ),
            TemplateId::ControlMessageResponse => Body::ControlMessageResponse(
                ControlMessageResponse::decode(bytes, block_length, version)?,
            ),
            TemplateId::SubscribedEvent => {
                Body::SubscribedEvent(SubscribedEvent::decode(bytes, block_length, version)?)
            }
        };
        Ok(body)
    }

    /// Known template of this body; `None` for `Unrecognized`.
    pub fn template(&self) -> Option<TemplateId> {
        match self {
            Body::ExecuteCommandRequest(_) => Some(TemplateId::ExecuteCommandRequest),
            Body::ExecuteCommandResponse(_) => Some(TemplateId::ExecuteCommandResponse),
            Body::ControlMessageResponse(_) => Some(TemplateId::ControlMessageResponse),
            Body::SubscribedEvent(_) => Some(TemplateId::SubscribedEvent),
            Body::Unrecognized { .. } => None,
        }
    }

    /// Raw MessagePack payload (`command`, `event` or `data`).
    pub fn payload(&self) -> Option<&Bytes> {
        match self {
            Body::ExecuteCommandRequest(r) => Some(&r.command),
            Body::ExecuteCommandResponse(r) => Some(&r.event),
            Body::ControlMessageResponse(r) => Some(&r.data),
            Body::SubscribedEvent(r) => Some(&r.event),
            Body::Unrecognized { .. } => None,
        }
    }

    #[inline]
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, Body::Unrecognized { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_id_mapping_is_one_to_one() {
        let all = [
            TemplateId::ControlMessageResponse,
            TemplateId::ExecuteCommandRequest,
            TemplateId::ExecuteCommandResponse,
            TemplateId::SubscribedEvent,
        ];
        for template in all {
            assert_eq!(TemplateId::from_u16(template.as_u16()), Some(template));
        }
        assert_eq!(TemplateId::from_u16(0), None);
        assert_eq!(TemplateId::from_u16(10), None);
        assert_eq!(TemplateId::from_u16(u16::MAX), None);
    }

    #[test]
    fn test_dispatch_by_template() {
        let mut raw = 4u16.to_le_bytes().to_vec();
        raw.extend_from_slice(&9u64.to_le_bytes());
        raw.extend_from_slice(&[1, 0, 0xC3]);
        let bytes = Bytes::from(raw);

        let body = Body::decode(TemplateId::ExecuteCommandResponse, &bytes, 10, 0).unwrap();
        match &body {
            Body::ExecuteCommandResponse(r) => {
                assert_eq!(r.partition_id, 4);
                assert_eq!(r.key, 9);
            }
            other => panic!("unexpected body {other:?}"),
        }
        assert_eq!(body.payload().unwrap().as_ref(), &[0xC3]);

        let body = Body::decode(TemplateId::SubscribedEvent, &bytes, 10, 0).unwrap();
        assert_eq!(body.template(), Some(TemplateId::SubscribedEvent));
    }

    #[test]
    fn test_block_length_and_version_in_order() {
        let mut raw = 2u16.to_le_bytes().to_vec();
        raw.extend_from_slice(&100u64.to_le_bytes()); // position
        raw.extend_from_slice(&7u64.to_le_bytes()); // key
        raw.extend_from_slice(&8u64.to_le_bytes()); // subscriber key
        raw.extend_from_slice(&[1, 2]); // subscription type, event type
        raw.extend_from_slice(&[0, 0]); // empty var data
        let bytes = Bytes::from(raw);

        match Body::decode(TemplateId::SubscribedEvent, &bytes, 28, 1).unwrap() {
            Body::SubscribedEvent(event) => {
                assert_eq!(event.key, Some(7));
                assert_eq!(event.subscriber_key, Some(8));
                assert_eq!(event.event_type, Some(2));
            }
            other => panic!("unexpected body {other:?}"),
        }

        let err = Body::decode(TemplateId::SubscribedEvent, &bytes, 1, 28).unwrap_err();
        assert!(matches!(err, BodyFault::BlockTooShort { declared: 1, .. }));
    }

    #[test]
    fn test_unrecognized_has_no_payload() {
        let body = Body::Unrecognized {
            template_id: 99,
            bytes: Bytes::from_static(b"??"),
        };
        assert!(body.is_unrecognized());
        assert!(body.template().is_none());
        assert!(body.payload().is_none());
    }
}
