//! # studyhub-entity
//!
//! Domain entity models for StudyHub.

pub mod notification;

pub use notification::{Notification, NotificationClass};
