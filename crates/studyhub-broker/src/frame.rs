//! Wire frame definitions for the broker dialect.
//!
//! Frames are internally-tagged JSON carried in WebSocket text messages.
//! The `body` of a `message` frame is raw text: it is handed to topic
//! handlers verbatim and never parsed by this crate.

use serde::{Deserialize, Serialize};

/// Frames sent by the client to the broker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Subscribe to a topic.
    Subscribe {
        /// Topic path.
        topic: String,
    },
    /// Client heartbeat.
    Ping {
        /// Client timestamp in epoch milliseconds.
        timestamp: i64,
    },
    /// Response to a broker heartbeat.
    Pong {
        /// Echoed timestamp.
        timestamp: i64,
    },
}

/// Frames sent by the broker to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    /// Subscription confirmed.
    Subscribed {
        /// Topic path.
        topic: String,
    },
    /// A published message on a subscribed topic.
    Message {
        /// Topic path.
        topic: String,
        /// Raw payload text, delivered to handlers unparsed.
        body: String,
    },
    /// Broker heartbeat.
    Ping {
        /// Broker timestamp in epoch milliseconds.
        timestamp: i64,
    },
    /// Response to a client heartbeat.
    Pong {
        /// Echoed timestamp.
        timestamp: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_wire_shape() {
        let frame = ClientFrame::Subscribe {
            topic: "/topic/notification".to_string(),
        };
        let json = serde_json::to_value(&frame).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"type": "subscribe", "topic": "/topic/notification"})
        );
    }

    #[test]
    fn test_message_frame_decodes() {
        let raw = r#"{"type":"message","topic":"/topic/notification","body":"plain text"}"#;
        let frame: ServerFrame = serde_json::from_str(raw).expect("deserialize");
        match frame {
            ServerFrame::Message { topic, body } => {
                assert_eq!(topic, "/topic/notification");
                assert_eq!(body, "plain text");
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_frame_is_rejected() {
        let raw = r#"{"type":"presence_update","status":"away"}"#;
        assert!(serde_json::from_str::<ServerFrame>(raw).is_err());
    }
}
