//! # studyhub-broker
//!
//! Persistent publish/subscribe connection to the message broker. Provides:
//!
//! - A client handle with non-blocking activation
//! - Automatic reconnection at a fixed delay, with no retry cap
//! - Symmetric heartbeats and half-open connection detection
//! - Topic subscriptions re-established on every successful (re)connect
//! - Observable connection state

pub mod client;
pub mod frame;
pub mod handler;
mod session;
pub mod state;
pub mod subscription;

pub use client::BrokerClient;
pub use handler::MessageHandler;
pub use state::ConnectionState;
pub use subscription::SubscriptionRegistry;
