//! Topic subscription registry.

use std::sync::Arc;

use dashmap::DashMap;

use crate::handler::MessageHandler;

/// Registry of topic handlers.
///
/// Registration is accepted at any time, connected or not; the connection
/// run loop reads the topic list to (re)issue subscribe frames on every
/// successful connect.
#[derive(Default)]
pub struct SubscriptionRegistry {
    /// Topic → registered handlers.
    topics: DashMap<String, Vec<Arc<dyn MessageHandler>>>,
}

impl SubscriptionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            topics: DashMap::new(),
        }
    }

    /// Registers a handler for a topic.
    pub fn add(&self, topic: impl Into<String>, handler: Arc<dyn MessageHandler>) {
        self.topics.entry(topic.into()).or_default().push(handler);
    }

    /// Returns all subscribed topics.
    pub fn topics(&self) -> Vec<String> {
        self.topics.iter().map(|e| e.key().clone()).collect()
    }

    /// Returns the handler count for a topic.
    pub fn handler_count(&self, topic: &str) -> usize {
        self.topics.get(topic).map(|h| h.len()).unwrap_or(0)
    }

    /// Delivers a message body to every handler of a topic, in
    /// registration order.
    pub async fn dispatch(&self, topic: &str, body: &str) {
        // Clone the handler list out before awaiting so no map shard lock
        // is held across a suspension point.
        let handlers: Vec<Arc<dyn MessageHandler>> = match self.topics.get(topic) {
            Some(entry) => entry.value().clone(),
            None => return,
        };

        for handler in handlers {
            handler.on_message(topic, body).await;
        }
    }
}

impl std::fmt::Debug for SubscriptionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionRegistry")
            .field("topics", &self.topics.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;

    struct Recorder {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MessageHandler for Recorder {
        async fn on_message(&self, _topic: &str, body: &str) {
            self.seen
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(body.to_string());
        }
    }

    #[tokio::test]
    async fn test_dispatch_in_arrival_order() {
        let registry = SubscriptionRegistry::new();
        let recorder = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
        });
        registry.add("/topic/notification", recorder.clone());

        registry.dispatch("/topic/notification", "first").await;
        registry.dispatch("/topic/notification", "second").await;

        let seen = recorder.seen.lock().unwrap_or_else(|e| e.into_inner());
        assert_eq!(seen.as_slice(), ["first", "second"]);
    }

    #[tokio::test]
    async fn test_dispatch_unknown_topic_is_noop() {
        let registry = SubscriptionRegistry::new();
        registry.dispatch("/topic/other", "ignored").await;
        assert_eq!(registry.handler_count("/topic/other"), 0);
    }
}
