//! Topic message handler seam.

use async_trait::async_trait;

/// Callback invoked once per inbound message on a subscribed topic.
///
/// Handlers run inline on the connection's read task, so delivery order
/// matches broker arrival order on each topic.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Handle a raw message body published on `topic`.
    async fn on_message(&self, topic: &str, body: &str);
}
