//! Overlay toggle model for the RTSS Overlay handheld plugin.
//!
//! The plugin panel shows a two-notch slider that switches the RivaTuner
//! Statistics Server on-screen display off or on. This crate models that
//! control independently of any UI toolkit: the slider's state, the single
//! remote procedure it calls, and the notification the user sees for each
//! outcome.
//!
//! # Modules
//!
//! - [`backend`] - Remote procedure seam and its outcomes
//! - [`error`] - Error types for slider values and backend transport
//! - [`notification`] - User-facing toast content
//! - [`state`] - Overlay on/off state and slider mapping
//! - [`toggle`] - The slider controller

pub mod backend;
pub mod error;
pub mod notification;
pub mod state;
pub mod toggle;

pub use backend::{OverlayBackend, RemoteOutcome, SET_OSD_STATUS};
pub use error::{BackendError, InvalidSliderValue};
pub use notification::Notification;
pub use state::OverlayState;
pub use toggle::OverlayToggle;

/// Display name of the plugin.
pub const PLUGIN_TITLE: &str = "RTSS Overlay";
