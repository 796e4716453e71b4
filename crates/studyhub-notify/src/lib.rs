//! # studyhub-notify
//!
//! The notification store and dispatcher. [`NotificationFeed`] keeps the
//! ordered in-memory log and broadcasts full snapshots to observers;
//! [`NotificationDispatcher`] turns raw push payloads into stored
//! notifications and triggers the transient presentation layer.

pub mod dispatcher;
pub mod feed;

pub use dispatcher::NotificationDispatcher;
pub use feed::NotificationFeed;
