//! Push dispatcher — turns raw broker payloads into stored, presented
//! notifications.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use studyhub_broker::MessageHandler;
use studyhub_entity::NotificationClass;
use studyhub_overlay::OverlayStack;

use crate::feed::NotificationFeed;

/// Receives raw topic messages and drives the store + presentation flow.
#[derive(Debug)]
pub struct NotificationDispatcher {
    /// The observable notification log.
    feed: Arc<NotificationFeed>,
    /// Transient presentation layer.
    overlays: Arc<OverlayStack>,
}

impl NotificationDispatcher {
    /// Creates a dispatcher over the feed and overlay stack.
    pub fn new(feed: Arc<NotificationFeed>, overlays: Arc<OverlayStack>) -> Self {
        Self { feed, overlays }
    }
}

#[async_trait]
impl MessageHandler for NotificationDispatcher {
    async fn on_message(&self, topic: &str, body: &str) {
        let notification = self.feed.append_push(body);
        let class = NotificationClass::from_payload(body);
        debug!(
            topic = %topic,
            id = %notification.id,
            class = %class,
            "Push notification stored"
        );
        self.overlays.present(notification, class);
    }
}
