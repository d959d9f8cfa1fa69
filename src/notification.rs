//! User-facing toast content for each remote outcome.

use crate::PLUGIN_TITLE;
use crate::backend::RemoteOutcome;
use crate::state::OverlayState;
use std::fmt;

const ERROR_TITLE: &str = "Error";
const REJECTED_BODY: &str = "Failed to change RTSS overlay";
const TRANSPORT_BODY: &str = "An error occurred";

/// A transient message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Toast title.
    pub title: String,
    /// Toast body.
    pub body: String,
}

impl Notification {
    /// Create a notification from its parts.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// The notification for `outcome` after requesting `state`.
    ///
    /// Transport failures are reported generically; their detail is only
    /// logged.
    ///
    /// # Examples
    ///
    /// ```
    /// use rtss_overlay::{Notification, OverlayState, RemoteOutcome};
    ///
    /// let toast = Notification::for_outcome(OverlayState::On, &RemoteOutcome::Applied);
    /// assert_eq!(toast.title, "RTSS Overlay");
    /// assert_eq!(toast.body, "Overlay ON");
    /// ```
    #[must_use]
    pub fn for_outcome(state: OverlayState, outcome: &RemoteOutcome) -> Self {
        match outcome {
            RemoteOutcome::Applied => Self::new(PLUGIN_TITLE, format!("Overlay {}", state.label())),
            RemoteOutcome::Rejected => Self::new(ERROR_TITLE, REJECTED_BODY),
            RemoteOutcome::TransportError(_) => Self::new(ERROR_TITLE, TRANSPORT_BODY),
        }
    }

    /// Whether this notification reports a failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.title == ERROR_TITLE
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.body)
    }
}
