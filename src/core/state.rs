//! Core State trait for classification states.
//!
//! Every state a classifier, tracker, or summary works with implements this
//! trait, which provides pure methods for inspecting state properties
//! without side effects.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for classification states.
///
/// States are small immutable values drawn from a fixed, finite universe
/// declared when a classifier or summary is constructed. In practice they
/// are fieldless enums; the [`state_enum!`](crate::state_enum) macro
/// generates the boilerplate.
///
/// # Required Traits
///
/// - `Clone`: states are copied into trajectories and count tables
/// - `Eq`: states are compared for compaction and lookup
/// - `Ord`: universes and summaries iterate in a stable state order
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: trajectories and summaries are
///   serializable for callers that persist them
///
/// # Example
///
/// ```rust
/// use trackway::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
/// enum TicketState {
///     Open,
///     Triaged,
///     Closed,
/// }
///
/// impl State for TicketState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "Open",
///             Self::Triaged => "Triaged",
///             Self::Closed => "Closed",
///         }
///     }
/// }
///
/// assert_eq!(TicketState::Triaged.name(), "Triaged");
/// ```
pub trait State:
    Clone + Eq + Ord + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    ///
    /// Returns a static string reference for zero-cost naming.
    fn name(&self) -> &str;
}
