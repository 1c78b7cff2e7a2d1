//! Tracker registry errors.

use thiserror::Error;

/// Errors raised by registry operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TrackError {
    /// Attempt to register an identity that is already tracked, under
    /// [`DuplicatePolicy::Reject`](crate::tracker::DuplicatePolicy::Reject).
    #[error("object is already tracked")]
    DuplicateObject,

    /// Lookup or refresh of an identity that was never registered.
    #[error("object is not tracked")]
    NotFound,
}
