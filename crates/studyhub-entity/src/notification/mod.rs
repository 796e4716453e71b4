//! Notification domain entities.

pub mod class;
pub mod model;

pub use class::NotificationClass;
pub use model::Notification;
