//! Time-based notification identifiers.
//!
//! Push-synthesized notifications are identified by their arrival time in
//! milliseconds since the Unix epoch, rendered as a string. Identifiers are
//! assigned once at creation, never reused, and must stay unique for the
//! whole session, so the generator bumps past the last issued value when
//! two messages land in the same millisecond.

use std::fmt;
use std::sync::Mutex;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Unique identifier for a notification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(pub String);

impl NotificationId {
    /// Create an identifier from an existing string.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NotificationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NotificationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Issues strictly increasing time-based notification identifiers.
#[derive(Debug, Default)]
pub struct NotificationIdSequence {
    /// Last issued millisecond value.
    last: Mutex<i64>,
}

impl NotificationIdSequence {
    /// Create a new sequence.
    pub fn new() -> Self {
        Self {
            last: Mutex::new(0),
        }
    }

    /// Issue the next identifier.
    ///
    /// Uses the current wall-clock millisecond; if that would collide with
    /// (or precede) the previously issued value, bumps one past it instead.
    pub fn next_id(&self) -> NotificationId {
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        let now = Utc::now().timestamp_millis();
        let issued = if now > *last { now } else { *last + 1 };
        *last = issued;
        NotificationId(issued.to_string())
    }
}
