//! Rendering seam for overlays.

use tracing::info;

use crate::overlay::Overlay;

/// Mounts and unmounts overlay attachments in some presentation backend.
pub trait OverlayRenderer: Send + Sync {
    /// Called exactly once when an overlay becomes visible.
    fn mount(&self, overlay: &Overlay);

    /// Called exactly once when an overlay is torn down.
    fn unmount(&self, overlay: &Overlay);
}

/// Renderer that logs overlay lifecycle through `tracing`.
#[derive(Debug, Default)]
pub struct TracingRenderer;

impl OverlayRenderer for TracingRenderer {
    fn mount(&self, overlay: &Overlay) {
        info!(
            overlay_id = %overlay.id,
            heading = overlay.variant.heading(),
            backdrop = overlay.variant.has_backdrop(),
            description = %overlay.notification.description,
            "Overlay mounted"
        );
    }

    fn unmount(&self, overlay: &Overlay) {
        info!(overlay_id = %overlay.id, "Overlay unmounted");
    }
}
