//! # studyhub-overlay
//!
//! Transient presentation layer. Each incoming notification gets one
//! short-lived overlay anchored at the top-right of the screen; the
//! celebratory task-completion variant adds a full-screen backdrop and a
//! "view progress" action. Overlays auto-dismiss after a fixed lifetime
//! through the same idempotent path as manual close.

pub mod navigator;
pub mod overlay;
pub mod renderer;
pub mod stack;

pub use navigator::{Navigator, TracingNavigator};
pub use overlay::{Overlay, OverlayAnchor, OverlayId, OverlayVariant};
pub use renderer::{OverlayRenderer, TracingRenderer};
pub use stack::OverlayStack;
