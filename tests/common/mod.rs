//! Wire builders for tests.
//!
//! The crate only decodes, so tests assemble frames byte by byte here.

#![allow(dead_code)]

use serde::Serialize;

pub const SUBSCRIBED_EVENT: u16 = 30;
pub const EXECUTE_COMMAND_REQUEST: u16 = 20;
pub const EXECUTE_COMMAND_RESPONSE: u16 = 21;
pub const CONTROL_MESSAGE_RESPONSE: u16 = 11;

/// Builder for one frame as it appears on the wire.
pub struct FrameBuilder {
    protocol_id: u16,
    correlation: Option<(u64, u64)>,
    template_id: u16,
    block: Vec<u8>,
    block_length: Option<u16>,
    version: u16,
    payload: Vec<u8>,
}

impl FrameBuilder {
    pub fn full_duplex(template_id: u16) -> Self {
        Self {
            protocol_id: 1,
            correlation: None,
            template_id,
            block: Vec::new(),
            block_length: None,
            version: 0,
            payload: Vec::new(),
        }
    }

    pub fn request_response(template_id: u16, connection_id: u64, request_id: u64) -> Self {
        Self {
            protocol_id: 0,
            correlation: Some((connection_id, request_id)),
            ..Self::full_duplex(template_id)
        }
    }

    /// Override the transport discriminator.
    pub fn protocol_id(mut self, protocol_id: u16) -> Self {
        self.protocol_id = protocol_id;
        self
    }

    pub fn version(mut self, version: u16) -> Self {
        self.version = version;
        self
    }

    /// Fixed block bytes; `block_length` defaults to their length.
    pub fn block(mut self, block: Vec<u8>) -> Self {
        self.block = block;
        self
    }

    /// Declare a block length different from the bytes actually written.
    pub fn block_length(mut self, block_length: u16) -> Self {
        self.block_length = Some(block_length);
        self
    }

    pub fn raw_payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    pub fn payload<T: Serialize>(self, value: &T) -> Self {
        let bytes = rmp_serde::to_vec_named(value).unwrap();
        self.raw_payload(bytes)
    }

    /// Frame body: everything after the 12-byte frame header.
    pub fn body(&self) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&self.protocol_id.to_le_bytes());
        if let Some((connection_id, request_id)) = self.correlation {
            body.extend_from_slice(&connection_id.to_le_bytes());
            body.extend_from_slice(&request_id.to_le_bytes());
        }
        let block_length = self.block_length.unwrap_or(self.block.len() as u16);
        body.extend_from_slice(&self.template_id.to_le_bytes());
        body.extend_from_slice(&block_length.to_le_bytes());
        body.extend_from_slice(&self.version.to_le_bytes());
        body.extend_from_slice(&0u16.to_le_bytes());
        body.extend_from_slice(&self.block);
        body.extend_from_slice(&(self.payload.len() as u16).to_le_bytes());
        body.extend_from_slice(&self.payload);
        body
    }

    /// Complete frame including the frame header.
    pub fn build(&self) -> Vec<u8> {
        let body = self.body();
        let mut frame = Vec::with_capacity(12 + body.len());
        frame.extend_from_slice(&(body.len() as u32).to_le_bytes());
        frame.push(0); // version
        frame.push(0); // flags
        frame.extend_from_slice(&0u16.to_le_bytes()); // type
        frame.extend_from_slice(&0u32.to_le_bytes()); // stream id
        frame.extend_from_slice(&body);
        frame
    }
}

/// Version 0 subscribed event block: partition id, position.
pub fn subscribed_event_block(partition_id: u16, position: u64) -> Vec<u8> {
    let mut block = partition_id.to_le_bytes().to_vec();
    block.extend_from_slice(&position.to_le_bytes());
    block
}

/// Subscribed event frame carrying `{"seq": seq}`.
pub fn sequenced_event(seq: u64) -> Vec<u8> {
    let mut payload = std::collections::BTreeMap::new();
    payload.insert("seq", seq);
    FrameBuilder::full_duplex(SUBSCRIBED_EVENT)
        .block(subscribed_event_block(0, seq))
        .payload(&payload)
        .build()
}
