//! Subscription builder and read loop.
//!
//! The [`SubscriptionBuilder`] configures decoding and the delivery queue.
//! The [`Subscription`] owns a spawned read loop:
//! 1. Read one frame
//! 2. Decode headers, body and payload
//! 3. Push the message onto a bounded queue
//! 4. Repeat until the connection closes or a frame fails to decode
//!
//! The queue is bounded. When it is full the read loop waits, which in turn
//! stops reading from the connection. A decode error is delivered once and
//! ends the subscription; frames carry no sync markers, so the only way to
//! resume is a new connection.
//!
//! # Example
//!
//! ```ignore
//! use zbc_client::Subscription;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let socket = tokio::net::TcpStream::connect("127.0.0.1:51015").await?;
//!     let mut subscription = Subscription::builder()
//!         .queue_capacity(64)
//!         .open(socket);
//!
//!     while let Some(message) = subscription.next().await {
//!         let message = message?;
//!         if let Some(payload) = message.payload() {
//!             println!("{payload}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```

use tokio::io::AsyncRead;
use tokio::sync::mpsc;
pub use tokio::sync::mpsc::error::TryRecvError;
use tokio::task::JoinHandle;

use crate::decoder::{DecoderConfig, MessageDecoder, UnknownTemplatePolicy};
use crate::error::Result;
use crate::message::Message;

/// Default capacity of the delivery queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 32;

/// Builder for configuring and opening a subscription.
pub struct SubscriptionBuilder {
    config: DecoderConfig,
    queue_capacity: usize,
}

impl SubscriptionBuilder {
    /// Create a new subscription builder.
    pub fn new() -> Self {
        Self {
            config: DecoderConfig::default(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }

    /// Replace the whole decoder configuration.
    pub fn decoder_config(mut self, config: DecoderConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the maximum accepted frame length.
    ///
    /// Default: 16 MB
    pub fn max_frame_length(mut self, max_frame_length: u32) -> Self {
        self.config.max_frame_length = max_frame_length;
        self
    }

    /// Expect frames padded to `alignment` bytes on the wire.
    ///
    /// Default: no padding
    pub fn frame_alignment(mut self, alignment: usize) -> Self {
        self.config.frame_alignment = Some(alignment);
        self
    }

    /// Set the handling of unknown template ids.
    ///
    /// Default: reject
    pub fn unknown_templates(mut self, policy: UnknownTemplatePolicy) -> Self {
        self.config.unknown_templates = policy;
        self
    }

    /// Set the delivery queue capacity (minimum 1).
    ///
    /// Default: 32
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /// Spawn the read loop over `reader` and return the consumer side.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open<R>(self, reader: R) -> Subscription
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        let decoder = MessageDecoder::with_config(reader, self.config);

        tracing::debug!(
            queue_capacity = self.queue_capacity,
            "Opening subscription stream"
        );
        let task = tokio::spawn(read_loop(decoder, tx));

        Subscription { rx, task }
    }
}

impl Default for SubscriptionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Consumer side of an open subscription.
///
/// Messages arrive in wire order. Dropping the subscription stops the read
/// loop; closing the underlying connection ends it from the other side.
pub struct Subscription {
    rx: mpsc::Receiver<Result<Message>>,
    task: JoinHandle<()>,
}

impl Subscription {
    /// Create a new subscription builder.
    pub fn builder() -> SubscriptionBuilder {
        SubscriptionBuilder::new()
    }

    /// Open a subscription with default settings.
    pub fn open<R>(reader: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        SubscriptionBuilder::new().open(reader)
    }

    /// Wait for the next message.
    ///
    /// Returns `None` once the stream has ended. An `Err` item is always the
    /// last item before `None`.
    pub async fn next(&mut self) -> Option<Result<Message>> {
        self.rx.recv().await
    }

    /// Take a message that is already queued, without waiting.
    ///
    /// Fails with `TryRecvError::Empty` when nothing is queued yet and with
    /// `TryRecvError::Disconnected` once the stream has ended.
    pub fn try_next(&mut self) -> std::result::Result<Result<Message>, TryRecvError> {
        self.rx.try_recv()
    }

    /// Whether the read loop has stopped.
    ///
    /// Messages queued before it stopped can still be received.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the read loop and discard queued messages.
    pub fn close(self) {
        // Drop does the work
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Main read loop - decodes frames and pushes them to the consumer.
async fn read_loop<R: AsyncRead + Unpin>(
    mut decoder: MessageDecoder<R>,
    tx: mpsc::Sender<Result<Message>>,
) {
    let mut delivered: u64 = 0;

    loop {
        let item = match decoder.next_message().await {
            Ok(Some(message)) => Ok(message),
            Ok(None) => {
                tracing::debug!("Connection closed after {} messages", delivered);
                return;
            }
            Err(e) => {
                tracing::error!("Subscription read loop error: {}", e);
                Err(e)
            }
        };

        let fatal = item.is_err();
        if tx.send(item).await.is_err() {
            tracing::debug!("Subscription consumer dropped");
            return;
        }
        if fatal {
            return;
        }
        delivered += 1;
    }
}
