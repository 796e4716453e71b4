//! Overlay model: variant, anchor, and the overlay record itself.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use studyhub_entity::{Notification, NotificationClass};

/// Unique overlay identifier.
pub type OverlayId = Uuid;

/// Visual variant of an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayVariant {
    /// Regular slide-in card, no backdrop.
    Ordinary,
    /// Celebratory popup with a full-screen modal backdrop.
    TaskCompletion,
}

impl OverlayVariant {
    /// Pick the variant for a notification class.
    pub fn from_class(class: NotificationClass) -> Self {
        match class {
            NotificationClass::Ordinary => Self::Ordinary,
            NotificationClass::TaskCompletion => Self::TaskCompletion,
        }
    }

    /// Whether this variant renders a full-screen modal backdrop.
    pub fn has_backdrop(&self) -> bool {
        matches!(self, Self::TaskCompletion)
    }

    /// Heading shown above the notification body.
    pub fn heading(&self) -> &'static str {
        match self {
            Self::Ordinary => "New Notification",
            Self::TaskCompletion => "Congratulations!",
        }
    }
}

/// Fixed screen position of an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayAnchor {
    /// Inset from the top edge, in px.
    pub top_px: u32,
    /// Inset from the right edge, in px.
    pub right_px: u32,
}

impl OverlayAnchor {
    /// Anchor at the top-right corner with a symmetric inset.
    pub fn top_right(inset_px: u32) -> Self {
        Self {
            top_px: inset_px,
            right_px: inset_px,
        }
    }
}

/// A transient visual attachment backing one notification.
#[derive(Debug, Clone)]
pub struct Overlay {
    /// Unique overlay id.
    pub id: OverlayId,
    /// The notification being presented.
    pub notification: Notification,
    /// Visual variant.
    pub variant: OverlayVariant,
    /// Screen position.
    pub anchor: OverlayAnchor,
    /// When the overlay was created.
    pub created_at: DateTime<Utc>,
}

impl Overlay {
    /// Creates an overlay for a notification.
    pub fn new(notification: Notification, variant: OverlayVariant, anchor: OverlayAnchor) -> Self {
        Self {
            id: Uuid::new_v4(),
            notification,
            variant,
            anchor,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_backdrop_and_heading() {
        assert!(!OverlayVariant::Ordinary.has_backdrop());
        assert!(OverlayVariant::TaskCompletion.has_backdrop());
        assert_eq!(OverlayVariant::Ordinary.heading(), "New Notification");
        assert_eq!(OverlayVariant::TaskCompletion.heading(), "Congratulations!");
    }

    #[test]
    fn test_variant_follows_class() {
        assert_eq!(
            OverlayVariant::from_class(NotificationClass::TaskCompletion),
            OverlayVariant::TaskCompletion
        );
        assert_eq!(
            OverlayVariant::from_class(NotificationClass::Ordinary),
            OverlayVariant::Ordinary
        );
    }

    #[test]
    fn test_top_right_anchor() {
        let anchor = OverlayAnchor::top_right(20);
        assert_eq!(anchor.top_px, 20);
        assert_eq!(anchor.right_px, 20);
    }
}
