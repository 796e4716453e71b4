//! Remote side-effect seam for the notification feed.

use async_trait::async_trait;

use studyhub_core::result::AppResult;
use studyhub_core::session::SessionContext;
use studyhub_core::types::id::NotificationId;
use studyhub_entity::Notification;

/// The remote operations the notification feed performs.
///
/// Every feed mutation runs its remote side effect first and only mutates
/// the local log once the backend has confirmed. The boolean returns on
/// [`delete`](NotificationBackend::delete) and
/// [`mark_all_read`](NotificationBackend::mark_all_read) are the backend's
/// confirmation — a `false` means the local log must stay untouched.
#[async_trait]
pub trait NotificationBackend: Send + Sync {
    /// Fetch the full notification list for the session user.
    async fn fetch_all(&self, ctx: &SessionContext) -> AppResult<Vec<Notification>>;

    /// Create a notification; returns the record as stored by the backend.
    async fn create(
        &self,
        ctx: &SessionContext,
        notification: &Notification,
    ) -> AppResult<Notification>;

    /// Replace the notification with the given id.
    async fn update(
        &self,
        ctx: &SessionContext,
        id: &NotificationId,
        notification: &Notification,
    ) -> AppResult<Notification>;

    /// Delete the notification with the given id.
    async fn delete(&self, ctx: &SessionContext, id: &NotificationId) -> AppResult<bool>;

    /// Mark every notification of the session user as read.
    async fn mark_all_read(&self, ctx: &SessionContext) -> AppResult<bool>;
}
