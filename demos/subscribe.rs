//! Subscribe - example of consuming a subscription stream.
//!
//! This example demonstrates:
//! - Opening a subscription with `Subscription::builder()`
//! - Reading messages with `subscription.next()`
//! - Inspecting typed bodies and payloads with `payload_as`
//!
//! A broker task writes subscribed events into an in-memory duplex pipe,
//! standing in for the TCP connection a real client would use.
//!
//! ```text
//! cargo run --example subscribe
//! ```

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use zbc_client::{Body, Subscription};

const SUBSCRIBED_EVENT: u16 = 30;

/// Payload carried by each event.
#[derive(Serialize, Deserialize, Debug)]
struct OrderEvent {
    order_id: u64,
    state: String,
}

/// Encode one full duplex subscribed event frame.
fn subscribed_event(partition_id: u16, position: u64, event: &OrderEvent) -> Vec<u8> {
    let payload = rmp_serde::to_vec_named(event).unwrap_or_default();

    let mut body = 1u16.to_le_bytes().to_vec(); // full duplex
    body.extend_from_slice(&SUBSCRIBED_EVENT.to_le_bytes());
    body.extend_from_slice(&10u16.to_le_bytes()); // block length
    body.extend_from_slice(&0u16.to_le_bytes()); // version
    body.extend_from_slice(&0u16.to_le_bytes()); // reserved
    body.extend_from_slice(&partition_id.to_le_bytes());
    body.extend_from_slice(&position.to_le_bytes());
    body.extend_from_slice(&(payload.len() as u16).to_le_bytes());
    body.extend_from_slice(&payload);

    let mut frame = (body.len() as u32).to_le_bytes().to_vec();
    frame.extend_from_slice(&[0u8; 8]);
    frame.extend_from_slice(&body);
    frame
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (mut broker, connection) = tokio::io::duplex(256);

    let mut subscription = Subscription::builder().queue_capacity(4).open(connection);

    // Pretend to be the broker pushing events
    let broker_task = tokio::spawn(async move {
        for (i, state) in ["created", "paid", "shipped"].iter().enumerate() {
            let event = OrderEvent {
                order_id: 1000 + i as u64,
                state: state.to_string(),
            };
            let frame = subscribed_event(1, i as u64, &event);
            if broker.write_all(&frame).await.is_err() {
                break;
            }
        }
        // Dropping the broker half closes the connection
    });

    while let Some(message) = subscription.next().await {
        let message = message?;

        if let Body::SubscribedEvent(event) = message.body() {
            println!("partition {} position {}", event.partition_id, event.position);
        }
        if let Some(payload) = message.payload() {
            println!("  payload: {payload}");
        }
        if let Some(order) = message.payload_as::<OrderEvent>() {
            println!("  typed:   {:?}", order?);
        }
    }

    broker_task.await?;
    println!("Connection closed");
    Ok(())
}
