//! Client-side navigation seam.

use tracing::info;

/// Performs client-side route changes on behalf of overlay actions.
pub trait Navigator: Send + Sync {
    /// Navigate to an application route.
    fn navigate(&self, path: &str);
}

/// Navigator that logs route changes through `tracing`.
#[derive(Debug, Default)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, path: &str) {
        info!(path = %path, "Navigating");
    }
}
