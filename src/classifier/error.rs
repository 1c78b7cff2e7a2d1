//! Configuration errors for classifier construction.

use thiserror::Error;

/// Errors raised while configuring a classifier.
///
/// These are configuration-time errors: they are raised before any object
/// is registered and never afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A rule or the default state references a state outside the declared
    /// universe.
    #[error("state '{state}' is not part of the declared state universe")]
    UnknownState { state: String },
}
