//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use studyhub_core::types::id::NotificationId;

/// A notification shown to the user.
///
/// Created either by synthesizing a record from a raw push payload the
/// moment it arrives, or by the REST collaborator (which may populate the
/// optional presentation fields). Serialized in camelCase to match the
/// collaborating backend's JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification identifier, assigned once at creation.
    pub id: NotificationId,
    /// Free-text body from the server payload.
    pub description: String,
    /// Whether the user has read this notification.
    pub read: bool,
    /// When the notification was created (ISO-8601 on the wire).
    pub time: DateTime<Utc>,
    /// Optional title (CRUD-sourced notifications only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Optional icon name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Optional image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Optional link target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Whether the link should be followed via client-side routing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_router: Option<bool>,
}

impl Notification {
    /// Synthesize a notification from a raw push payload.
    ///
    /// The payload text is stored verbatim; the optional presentation
    /// fields are never set on push-derived records.
    pub fn from_push(id: NotificationId, payload: impl Into<String>, time: DateTime<Utc>) -> Self {
        Self {
            id,
            description: payload.into(),
            read: false,
            time,
            title: None,
            icon: None,
            image: None,
            link: None,
            use_router: None,
        }
    }

    /// Check if the notification is still unread.
    pub fn is_unread(&self) -> bool {
        !self.read
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_record_defaults() {
        let n = Notification::from_push(NotificationId::from("1"), "payload text", Utc::now());
        assert!(!n.read);
        assert!(n.is_unread());
        assert_eq!(n.description, "payload text");
        assert!(n.title.is_none());
        assert!(n.use_router.is_none());
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let mut n = Notification::from_push(NotificationId::from("2"), "x", Utc::now());
        n.use_router = Some(true);
        let json = serde_json::to_value(&n).expect("serialize");
        assert!(json.get("useRouter").is_some());
        assert!(json.get("use_router").is_none());
    }
}
