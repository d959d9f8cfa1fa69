//! The remote procedure seam between the panel and the overlay service.
//!
//! The panel makes exactly one kind of call, [`SET_OSD_STATUS`], passing the
//! requested state and receiving a boolean "applied" answer. How the call
//! reaches the service is up to the [`OverlayBackend`] implementation.

use crate::error::BackendError;
use crate::state::OverlayState;

/// Name of the remote procedure that switches the overlay.
pub const SET_OSD_STATUS: &str = "set_osd_status";

/// Invokes the overlay service.
#[cfg_attr(test, mockall::automock)]
pub trait OverlayBackend {
    /// Ask the service to show or hide the overlay.
    ///
    /// Returns `Ok(true)` when the change was applied and `Ok(false)` when
    /// the service declined it.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the call itself fails.
    fn set_overlay_status(&self, state: OverlayState) -> Result<bool, BackendError>;
}

impl<B: OverlayBackend + ?Sized> OverlayBackend for &B {
    fn set_overlay_status(&self, state: OverlayState) -> Result<bool, BackendError> {
        (**self).set_overlay_status(state)
    }
}

impl<B: OverlayBackend + ?Sized> OverlayBackend for Box<B> {
    fn set_overlay_status(&self, state: OverlayState) -> Result<bool, BackendError> {
        (**self).set_overlay_status(state)
    }
}

/// The result of one remote call, collapsed to what the user is told.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome {
    /// The service applied the change.
    Applied,
    /// The service answered but did not apply the change.
    Rejected,
    /// No answer arrived.
    TransportError(String),
}

impl RemoteOutcome {
    /// Classify a backend result.
    #[must_use]
    pub fn from_result(result: Result<bool, BackendError>) -> Self {
        match result {
            Ok(true) => Self::Applied,
            Ok(false) => Self::Rejected,
            Err(err) => Self::TransportError(err.to_string()),
        }
    }

    /// Whether the change took effect.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

impl From<Result<bool, BackendError>> for RemoteOutcome {
    fn from(result: Result<bool, BackendError>) -> Self {
        Self::from_result(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::applied(Ok(true), RemoteOutcome::Applied)]
    #[case::rejected(Ok(false), RemoteOutcome::Rejected)]
    #[case::transport(
        Err(BackendError::Transport { message: "socket closed".to_owned() }),
        RemoteOutcome::TransportError("transport failure: socket closed".to_owned())
    )]
    fn backend_results_classify(
        #[case] result: Result<bool, BackendError>,
        #[case] expected: RemoteOutcome,
    ) {
        assert_eq!(RemoteOutcome::from(result), expected);
    }

    #[test]
    fn only_applied_counts_as_applied() {
        assert!(RemoteOutcome::Applied.is_applied());
        assert!(!RemoteOutcome::Rejected.is_applied());
        assert!(!RemoteOutcome::TransportError(String::new()).is_applied());
    }

    #[test]
    fn references_forward_to_backend() {
        fn switch_on<B: OverlayBackend>(backend: B) -> Result<bool, BackendError> {
            backend.set_overlay_status(OverlayState::On)
        }

        let mut backend = MockOverlayBackend::new();
        backend
            .expect_set_overlay_status()
            .withf(|state| *state == OverlayState::On)
            .times(1)
            .returning(|_| Ok(true));

        assert_eq!(switch_on(&backend), Ok(true));
    }
}
