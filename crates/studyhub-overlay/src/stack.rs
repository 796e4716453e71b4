//! Active overlay bookkeeping and auto-dismiss timers.

use std::sync::Arc;

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use studyhub_core::config::overlay::OverlayConfig;
use studyhub_entity::{Notification, NotificationClass};

use crate::navigator::Navigator;
use crate::overlay::{Overlay, OverlayAnchor, OverlayId, OverlayVariant};
use crate::renderer::OverlayRenderer;

/// Route the task-completion "view progress" action navigates to.
const PROGRESS_ROUTE: &str = "/dashboards/project";

/// Owns every visible overlay and its auto-dismiss timer.
///
/// Overlays are independent: presenting a new one never affects those
/// already on screen. Dismissal is idempotent — the timer and a manual
/// close race for a single `DashMap::remove`, and whichever loses is a
/// no-op.
pub struct OverlayStack {
    /// Presentation settings.
    config: OverlayConfig,
    /// Rendering backend.
    renderer: Arc<dyn OverlayRenderer>,
    /// Navigation backend.
    navigator: Arc<dyn Navigator>,
    /// Visible overlays.
    active: Arc<DashMap<OverlayId, Arc<Overlay>>>,
    /// Cancels pending auto-dismiss timers on shutdown.
    cancel: CancellationToken,
}

impl OverlayStack {
    /// Creates a stack with the given backends.
    pub fn new(
        config: OverlayConfig,
        renderer: Arc<dyn OverlayRenderer>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            config,
            renderer,
            navigator,
            active: Arc::new(DashMap::new()),
            cancel: CancellationToken::new(),
        }
    }

    /// Presents one overlay for a notification and arms its auto-dismiss
    /// timer. Returns the overlay id usable for manual dismissal.
    pub fn present(&self, notification: Notification, class: NotificationClass) -> OverlayId {
        let overlay = Arc::new(Overlay::new(
            notification,
            OverlayVariant::from_class(class),
            OverlayAnchor::top_right(self.config.inset_px),
        ));
        let id = overlay.id;

        self.active.insert(id, Arc::clone(&overlay));
        self.renderer.mount(&overlay);
        debug!(
            overlay_id = %id,
            variant = ?overlay.variant,
            lifetime_ms = self.config.lifetime_ms,
            "Overlay presented"
        );

        let active = Arc::clone(&self.active);
        let renderer = Arc::clone(&self.renderer);
        let lifetime = self.config.lifetime();
        let cancel = self.cancel.child_token();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(lifetime) => {}
            }
            // Timeout and shutdown both go through the shared dismissal
            // path; a manual close that already won makes this a no-op.
            dismiss_entry(&active, &renderer, &id);
        });

        id
    }

    /// Dismisses an overlay. Returns `false` if it was already gone.
    pub fn dismiss(&self, id: &OverlayId) -> bool {
        dismiss_entry(&self.active, &self.renderer, id)
    }

    /// Handles the task-completion "view progress" action: navigate to
    /// the progress dashboard, then dismiss.
    pub fn view_progress(&self, id: &OverlayId) -> bool {
        if !self.active.contains_key(id) {
            return false;
        }
        self.navigator.navigate(PROGRESS_ROUTE);
        self.dismiss(id)
    }

    /// Number of currently visible overlays.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Whether the given overlay is still visible.
    pub fn is_active(&self, id: &OverlayId) -> bool {
        self.active.contains_key(id)
    }

    /// Cancels every pending timer and unmounts all visible overlays.
    pub fn shutdown(&self) {
        self.cancel.cancel();
        let ids: Vec<OverlayId> = self.active.iter().map(|e| *e.key()).collect();
        for id in ids {
            dismiss_entry(&self.active, &self.renderer, &id);
        }
    }
}

impl std::fmt::Debug for OverlayStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayStack")
            .field("active", &self.active.len())
            .finish()
    }
}

/// Single dismissal path shared by timeout, manual close, and shutdown.
fn dismiss_entry(
    active: &DashMap<OverlayId, Arc<Overlay>>,
    renderer: &Arc<dyn OverlayRenderer>,
    id: &OverlayId,
) -> bool {
    match active.remove(id) {
        Some((_, overlay)) => {
            renderer.unmount(&overlay);
            true
        }
        None => {
            debug!(overlay_id = %id, "Overlay already dismissed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use chrono::Utc;
    use studyhub_core::types::id::NotificationId;

    #[derive(Default)]
    struct RecordingRenderer {
        mounts: AtomicUsize,
        unmounts: AtomicUsize,
    }

    impl OverlayRenderer for RecordingRenderer {
        fn mount(&self, _overlay: &Overlay) {
            self.mounts.fetch_add(1, Ordering::SeqCst);
        }

        fn unmount(&self, _overlay: &Overlay) {
            self.unmounts.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        paths: Mutex<Vec<String>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, path: &str) {
            self.paths
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(path.to_string());
        }
    }

    fn stack_with_doubles() -> (OverlayStack, Arc<RecordingRenderer>, Arc<RecordingNavigator>) {
        let renderer = Arc::new(RecordingRenderer::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let stack = OverlayStack::new(
            OverlayConfig::default(),
            renderer.clone(),
            navigator.clone(),
        );
        (stack, renderer, navigator)
    }

    fn sample(description: &str) -> Notification {
        Notification::from_push(NotificationId::from("1"), description, Utc::now())
    }

    /// Let spawned timer tasks run after the clock has advanced.
    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_dismiss_fires_once_at_lifetime() {
        let (stack, renderer, _) = stack_with_doubles();
        let id = stack.present(sample("hello"), NotificationClass::Ordinary);
        assert!(stack.is_active(&id));

        tokio::time::sleep(Duration::from_millis(4_999)).await;
        settle().await;
        assert!(stack.is_active(&id), "overlay should outlive 4999 ms");

        tokio::time::sleep(Duration::from_millis(2)).await;
        settle().await;
        assert!(!stack.is_active(&id), "overlay should be gone at 5001 ms");
        assert_eq!(renderer.unmounts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_then_auto_dismiss_is_noop() {
        let (stack, renderer, _) = stack_with_doubles();
        let id = stack.present(sample("hello"), NotificationClass::Ordinary);

        assert!(stack.dismiss(&id));
        assert!(!stack.dismiss(&id), "second dismissal must be a no-op");

        tokio::time::sleep(Duration::from_millis(6_000)).await;
        settle().await;
        assert_eq!(
            renderer.unmounts.load(Ordering::SeqCst),
            1,
            "timer must not tear the overlay down a second time"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlays_are_independent() {
        let (stack, _, _) = stack_with_doubles();
        let first = stack.present(sample("one"), NotificationClass::Ordinary);

        tokio::time::sleep(Duration::from_millis(3_000)).await;
        let second = stack.present(sample("two"), NotificationClass::TaskCompletion);
        assert_eq!(stack.active_count(), 2);

        // First reaches its lifetime; second is untouched.
        tokio::time::sleep(Duration::from_millis(2_001)).await;
        settle().await;
        assert!(!stack.is_active(&first));
        assert!(stack.is_active(&second));

        tokio::time::sleep(Duration::from_millis(3_000)).await;
        settle().await;
        assert!(!stack.is_active(&second));
    }

    #[tokio::test(start_paused = true)]
    async fn test_view_progress_navigates_then_dismisses() {
        let (stack, _, navigator) = stack_with_doubles();
        let id = stack.present(sample("Congratulations"), NotificationClass::TaskCompletion);

        assert!(stack.view_progress(&id));
        assert!(!stack.is_active(&id));
        {
            let paths = navigator.paths.lock().unwrap_or_else(|e| e.into_inner());
            assert_eq!(paths.as_slice(), ["/dashboards/project"]);
        }

        // Acting on a dismissed overlay neither navigates nor errors.
        assert!(!stack.view_progress(&id));
        let paths = navigator.paths.lock().unwrap_or_else(|e| e.into_inner());
        assert_eq!(paths.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_unmounts_everything() {
        let (stack, renderer, _) = stack_with_doubles();
        stack.present(sample("one"), NotificationClass::Ordinary);
        stack.present(sample("two"), NotificationClass::Ordinary);

        stack.shutdown();
        assert_eq!(stack.active_count(), 0);
        assert_eq!(renderer.unmounts.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_millis(6_000)).await;
        settle().await;
        assert_eq!(
            renderer.unmounts.load(Ordering::SeqCst),
            2,
            "cancelled timers must not unmount again"
        );
    }
}
