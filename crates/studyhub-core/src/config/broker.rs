//! Message broker connection configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for the persistent publish/subscribe broker connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// WebSocket endpoint of the broker.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Topic the notification feed subscribes to.
    #[serde(default = "default_topic")]
    pub notification_topic: String,
    /// Delay before a reconnect attempt after an unexpected drop, in ms.
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_ms: u64,
    /// Expected interval of inbound server heartbeats, in ms.
    #[serde(default = "default_heartbeat")]
    pub heartbeat_incoming_ms: u64,
    /// Interval at which the client sends heartbeats, in ms.
    #[serde(default = "default_heartbeat")]
    pub heartbeat_outgoing_ms: u64,
}

impl BrokerConfig {
    /// Reconnect delay as a [`Duration`].
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    /// Outgoing heartbeat interval as a [`Duration`].
    pub fn heartbeat_outgoing(&self) -> Duration {
        Duration::from_millis(self.heartbeat_outgoing_ms)
    }

    /// Inbound liveness window: no server traffic for twice the incoming
    /// interval means the connection is treated as half-open and dropped.
    pub fn liveness_window(&self) -> Duration {
        Duration::from_millis(self.heartbeat_incoming_ms * 2)
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            notification_topic: default_topic(),
            reconnect_delay_ms: default_reconnect_delay(),
            heartbeat_incoming_ms: default_heartbeat(),
            heartbeat_outgoing_ms: default_heartbeat(),
        }
    }
}

fn default_endpoint() -> String {
    "ws://localhost:8888/api/socket".to_string()
}

fn default_topic() -> String {
    "/topic/notification".to_string()
}

fn default_reconnect_delay() -> u64 {
    5000
}

fn default_heartbeat() -> u64 {
    4000
}
