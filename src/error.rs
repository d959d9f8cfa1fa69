//! Error types for the overlay toggle.

use thiserror::Error;

/// A slider position that does not map to an overlay state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("slider value {value} is out of range; expected 0 (off) or 1 (on)")]
pub struct InvalidSliderValue {
    /// The rejected slider value.
    pub value: i64,
}

/// The remote call to the overlay backend could not be completed.
///
/// This is distinct from the backend answering "not applied": it means no
/// answer arrived at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The backend was unreachable or the call was dropped in transit.
    #[error("transport failure: {message}")]
    Transport {
        /// Description of the failure.
        message: String,
    },

    /// The backend raised an error while handling the call.
    #[error("remote procedure `{procedure}` failed: {message}")]
    Remote {
        /// Name of the procedure that failed.
        procedure: &'static str,
        /// Error reported by the backend.
        message: String,
    },
}
