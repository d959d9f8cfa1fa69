//! The overlay slider controller.
//!
//! The controller owns the slider's current selection. On every change it
//! records the new selection first, then calls the backend, then turns the
//! outcome into a notification. The selection is not rolled back when the
//! call fails and is never read back from the service, so after a failure
//! the slider shows the requested state rather than the real one.

use crate::backend::{OverlayBackend, RemoteOutcome, SET_OSD_STATUS};
use crate::error::InvalidSliderValue;
use crate::notification::Notification;
use crate::state::OverlayState;
use log::{debug, info, warn};

/// Drives the overlay slider against a backend.
#[derive(Debug)]
pub struct OverlayToggle<B> {
    backend: B,
    selection: OverlayState,
}

impl<B: OverlayBackend> OverlayToggle<B> {
    /// Create a toggle showing [`OverlayState::Off`].
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            selection: OverlayState::Off,
        }
    }

    /// The slider's current selection.
    #[must_use]
    pub fn selection(&self) -> OverlayState {
        self.selection
    }

    /// Borrow the backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Select `state`, ask the backend to apply it, and return the
    /// notification for the user.
    ///
    /// Backend failures are folded into the notification; nothing is
    /// propagated.
    pub fn select(&mut self, state: OverlayState) -> Notification {
        self.selection = state;
        debug!("calling {SET_OSD_STATUS} with {}", state.value());

        let outcome = RemoteOutcome::from(self.backend.set_overlay_status(state));
        match &outcome {
            RemoteOutcome::Applied => info!("overlay switched {state}"),
            RemoteOutcome::Rejected => warn!("{SET_OSD_STATUS} declined to switch overlay {state}"),
            RemoteOutcome::TransportError(message) => {
                warn!("{SET_OSD_STATUS} failed: {message}");
            }
        }
        Notification::for_outcome(state, &outcome)
    }

    /// Handle a raw slider position.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSliderValue`] for positions other than 0 or 1; the
    /// selection is left unchanged and the backend is not called.
    pub fn on_slider_change(&mut self, value: i64) -> Result<Notification, InvalidSliderValue> {
        let state = OverlayState::from_slider(value)?;
        Ok(self.select(state))
    }

    /// Consume the toggle and return its backend.
    #[must_use]
    pub fn into_backend(self) -> B {
        self.backend
    }
}
