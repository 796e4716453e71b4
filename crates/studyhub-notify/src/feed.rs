//! Observable notification log with remote-first mutations.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::sync::watch;
use tracing::debug;

use studyhub_client::NotificationBackend;
use studyhub_core::result::AppResult;
use studyhub_core::session::SessionContext;
use studyhub_core::types::id::{NotificationId, NotificationIdSequence};
use studyhub_entity::Notification;

/// Ordered, observable log of all known notifications.
///
/// Every imperative operation performs its remote side effect first; only
/// confirmed success mutates the local log, after which the full updated
/// snapshot is republished. Observers therefore never see unconfirmed
/// remote state, and late subscribers replay the current snapshot.
pub struct NotificationFeed {
    /// Remote side-effect seam.
    backend: Arc<dyn NotificationBackend>,
    /// Time-based id generator for push-synthesized records.
    ids: NotificationIdSequence,
    /// The ordered log. Held only across synchronous sections.
    log: Mutex<Vec<Notification>>,
    /// Snapshot publisher.
    snapshot_tx: watch::Sender<Vec<Notification>>,
}

impl NotificationFeed {
    /// Creates an empty feed over the given backend.
    pub fn new(backend: Arc<dyn NotificationBackend>) -> Self {
        let (snapshot_tx, _) = watch::channel(Vec::new());
        Self {
            backend,
            ids: NotificationIdSequence::new(),
            log: Mutex::new(Vec::new()),
            snapshot_tx,
        }
    }

    /// Returns a receiver observing the full snapshot; the current value
    /// is visible immediately.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.snapshot_tx.subscribe()
    }

    /// Returns a copy of the current snapshot.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.log.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of notifications in the log.
    pub fn len(&self) -> usize {
        self.log.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of unread notifications.
    pub fn unread_count(&self) -> usize {
        self.log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|n| n.is_unread())
            .count()
    }

    /// Fetches the server-side list and replaces the local snapshot.
    pub async fn refresh(&self, ctx: &SessionContext) -> AppResult<Vec<Notification>> {
        let notifications = self.backend.fetch_all(ctx).await?;

        let mut log = self.log.lock().unwrap_or_else(|e| e.into_inner());
        *log = notifications.clone();
        self.snapshot_tx.send_replace(log.clone());
        Ok(notifications)
    }

    /// Creates a notification remotely, then appends the stored record.
    pub async fn create(
        &self,
        ctx: &SessionContext,
        notification: Notification,
    ) -> AppResult<Notification> {
        let created = self.backend.create(ctx, &notification).await?;

        let mut log = self.log.lock().unwrap_or_else(|e| e.into_inner());
        log.push(created.clone());
        self.snapshot_tx.send_replace(log.clone());
        Ok(created)
    }

    /// Replaces the notification with the given id.
    ///
    /// An id absent from the local log is treated as already applied: the
    /// log stays untouched and no snapshot is republished.
    pub async fn update(
        &self,
        ctx: &SessionContext,
        id: &NotificationId,
        patch: Notification,
    ) -> AppResult<()> {
        let updated = self.backend.update(ctx, id, &patch).await?;

        let mut log = self.log.lock().unwrap_or_else(|e| e.into_inner());
        match log.iter().position(|n| &n.id == id) {
            Some(index) => {
                log[index] = updated;
                self.snapshot_tx.send_replace(log.clone());
            }
            None => {
                debug!(id = %id, "Update for unknown notification id, treated as already applied");
            }
        }
        Ok(())
    }

    /// Deletes the notification with the given id. The local record goes
    /// away only when the backend confirms the deletion.
    pub async fn delete(&self, ctx: &SessionContext, id: &NotificationId) -> AppResult<bool> {
        let deleted = self.backend.delete(ctx, id).await?;

        if deleted {
            let mut log = self.log.lock().unwrap_or_else(|e| e.into_inner());
            log.retain(|n| &n.id != id);
            self.snapshot_tx.send_replace(log.clone());
        } else {
            debug!(id = %id, "Backend did not confirm deletion, log untouched");
        }
        Ok(deleted)
    }

    /// Marks every notification as read, locally only after the backend
    /// confirms.
    pub async fn mark_all_read(&self, ctx: &SessionContext) -> AppResult<bool> {
        let confirmed = self.backend.mark_all_read(ctx).await?;

        if confirmed {
            let mut log = self.log.lock().unwrap_or_else(|e| e.into_inner());
            for notification in log.iter_mut() {
                notification.read = true;
            }
            self.snapshot_tx.send_replace(log.clone());
        }
        Ok(confirmed)
    }

    /// Synthesizes a record for a raw push payload and appends it.
    ///
    /// Push records never merge with CRUD-origin records, even with
    /// identical content; the log is append-only under push delivery.
    pub fn append_push(&self, payload: &str) -> Notification {
        let notification = Notification::from_push(self.ids.next_id(), payload, Utc::now());

        let mut log = self.log.lock().unwrap_or_else(|e| e.into_inner());
        log.push(notification.clone());
        self.snapshot_tx.send_replace(log.clone());
        notification
    }
}

impl std::fmt::Debug for NotificationFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationFeed")
            .field("len", &self.len())
            .finish()
    }
}
