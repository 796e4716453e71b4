//! Notification classification for presentation.

use serde::{Deserialize, Serialize};

/// Visual class of a notification, decided from its raw payload text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationClass {
    /// Regular notification.
    Ordinary,
    /// Task-completion celebration.
    TaskCompletion,
}

impl NotificationClass {
    /// Classify a raw push payload.
    ///
    /// A payload is a task-completion event iff it contains the literal
    /// substring `"Congratulations"`. The match is case-sensitive.
    pub fn from_payload(payload: &str) -> Self {
        if payload.contains("Congratulations") {
            Self::TaskCompletion
        } else {
            Self::Ordinary
        }
    }

    /// Return the class as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ordinary => "ordinary",
            Self::TaskCompletion => "task_completion",
        }
    }
}

impl std::fmt::Display for NotificationClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
