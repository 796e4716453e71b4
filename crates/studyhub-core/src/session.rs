//! Session context carrying the authenticated user and their role.

use serde::{Deserialize, Serialize};

/// Roles a StudyHub user can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular learner account.
    Student,
    /// Course owner who can publish tasks and courses.
    Instructor,
    /// Full platform administrator.
    Admin,
}

impl UserRole {
    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Instructor => "instructor",
            Self::Admin => "admin",
        }
    }
}

/// Context for the current authenticated session.
///
/// Constructed once at startup and passed into the components that need it,
/// so that every operation knows *who* is acting without reaching into
/// ambient global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    /// The authenticated user's ID.
    pub user_id: String,
    /// The username (convenience field for display and logging).
    pub username: String,
    /// The user's role.
    pub role: UserRole,
}

impl SessionContext {
    /// Creates a new session context.
    pub fn new(user_id: impl Into<String>, username: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            role,
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
