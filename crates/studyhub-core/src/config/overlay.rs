//! Transient overlay presentation configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for transient notification overlays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// How long an overlay stays on screen before auto-dismissal, in ms.
    #[serde(default = "default_lifetime")]
    pub lifetime_ms: u64,
    /// Inset from the top-right screen corner, in px.
    #[serde(default = "default_inset")]
    pub inset_px: u32,
}

impl OverlayConfig {
    /// Overlay lifetime as a [`Duration`].
    pub fn lifetime(&self) -> Duration {
        Duration::from_millis(self.lifetime_ms)
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            lifetime_ms: default_lifetime(),
            inset_px: default_inset(),
        }
    }
}

fn default_lifetime() -> u64 {
    5000
}

fn default_inset() -> u32 {
    20
}
