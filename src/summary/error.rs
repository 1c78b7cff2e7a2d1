//! Aggregation errors.

use thiserror::Error;

/// A trajectory referenced a state outside the summary's universe.
///
/// Raised when a summary is fed a trajectory built against a different
/// state universe; nothing from the offending trajectory is counted.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("trajectory references state '{state}' outside the summary's universe")]
pub struct UnknownStateError {
    /// Name of the foreign state.
    pub state: String,
}
