//! # studyhub-client
//!
//! HTTP client for the REST collaborator. The notification feed talks to
//! the backend exclusively through the [`NotificationBackend`] trait so
//! tests can substitute an in-memory double.

pub mod backend;
pub mod http;

pub use backend::NotificationBackend;
pub use http::HttpNotificationBackend;
