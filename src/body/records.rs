//! Fixed-layout records for each recognized template.
//!
//! Every record ends in one variable data field holding a MessagePack
//! payload, kept here as raw bytes.

use bytes::Bytes;

use super::layout::{BodyLayout, Field};
use crate::error::BodyFault;

/// Command sent by a client; decoded mostly for loopback and test traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteCommandRequest {
    pub partition_id: u16,
    pub key: u64,
    /// Since version 1.
    pub event_type: Option<u8>,
    /// MessagePack command payload.
    pub command: Bytes,
}

impl ExecuteCommandRequest {
    const PARTITION_ID: Field = Field::new(0, 2, 0);
    const KEY: Field = Field::new(2, 8, 0);
    const EVENT_TYPE: Field = Field::new(10, 1, 1);
    pub(crate) const FIELDS: &'static [Field] = &[Self::PARTITION_ID, Self::KEY, Self::EVENT_TYPE];

    pub fn decode(bytes: &Bytes, block_length: u16, version: u16) -> Result<Self, BodyFault> {
        let layout = BodyLayout::split(bytes, block_length, version, Self::FIELDS)?;
        Ok(Self {
            partition_id: layout.u16(Self::PARTITION_ID).unwrap_or_default(),
            key: layout.u64(Self::KEY).unwrap_or_default(),
            event_type: layout.u8(Self::EVENT_TYPE),
            command: layout.var_data()?,
        })
    }
}

/// Broker response to an executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteCommandResponse {
    pub partition_id: u16,
    pub key: u64,
    /// MessagePack event payload.
    pub event: Bytes,
}

impl ExecuteCommandResponse {
    const PARTITION_ID: Field = Field::new(0, 2, 0);
    const KEY: Field = Field::new(2, 8, 0);
    pub(crate) const FIELDS: &'static [Field] = &[Self::PARTITION_ID, Self::KEY];

    pub fn decode(bytes: &Bytes, block_length: u16, version: u16) -> Result<Self, BodyFault> {
        let layout = BodyLayout::split(bytes, block_length, version, Self::FIELDS)?;
        Ok(Self {
            partition_id: layout.u16(Self::PARTITION_ID).unwrap_or_default(),
            key: layout.u64(Self::KEY).unwrap_or_default(),
            event: layout.var_data()?,
        })
    }
}

/// Broker response to a control message (topology, subscription control).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlMessageResponse {
    /// MessagePack response payload.
    pub data: Bytes,
}

impl ControlMessageResponse {
    pub(crate) const FIELDS: &'static [Field] = &[];

    pub fn decode(bytes: &Bytes, block_length: u16, version: u16) -> Result<Self, BodyFault> {
        let layout = BodyLayout::split(bytes, block_length, version, Self::FIELDS)?;
        Ok(Self {
            data: layout.var_data()?,
        })
    }
}

/// Event pushed by the broker on an open subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribedEvent {
    pub partition_id: u16,
    pub position: u64,
    /// Since version 1.
    pub key: Option<u64>,
    /// Since version 1.
    pub subscriber_key: Option<u64>,
    /// Since version 1.
    pub subscription_type: Option<u8>,
    /// Since version 1.
    pub event_type: Option<u8>,
    /// MessagePack event payload.
    pub event: Bytes,
}

impl SubscribedEvent {
    const PARTITION_ID: Field = Field::new(0, 2, 0);
    const POSITION: Field = Field::new(2, 8, 0);
    const KEY: Field = Field::new(10, 8, 1);
    const SUBSCRIBER_KEY: Field = Field::new(18, 8, 1);
    const SUBSCRIPTION_TYPE: Field = Field::new(26, 1, 1);
    const EVENT_TYPE: Field = Field::new(27, 1, 1);
    pub(crate) const FIELDS: &'static [Field] = &[
        Self::PARTITION_ID,
        Self::POSITION,
        Self::KEY,
        Self::SUBSCRIBER_KEY,
        Self::SUBSCRIPTION_TYPE,
        Self::EVENT_TYPE,
    ];

    pub fn decode(bytes: &Bytes, block_length: u16, version: u16) -> Result<Self, BodyFault> {
        let layout = BodyLayout::split(bytes, block_length, version, Self::FIELDS)?;
        Ok(Self {
            partition_id: layout.u16(Self::PARTITION_ID).unwrap_or_default(),
            position: layout.u64(Self::POSITION).unwrap_or_default(),
            key: layout.u64(Self::KEY),
            subscriber_key: layout.u64(Self::SUBSCRIBER_KEY),
            subscription_type: layout.u8(Self::SUBSCRIPTION_TYPE),
            event_type: layout.u8(Self::EVENT_TYPE),
            event: layout.var_data()?,
        })
    }
}
