//! Trackway: rule-driven object state tracking
//!
//! Trackway classifies tracked domain objects into one of a fixed set of
//! named states using an ordered list of boolean rules, records each
//! object's timestamped history of state changes, and aggregates those
//! histories into a directed, weighted transition summary.
//!
//! # Core Concepts
//!
//! - **State**: type-safe state values via the [`State`](core::State) trait
//! - **Classifier**: ordered (state, predicate) rules, first match wins
//! - **Trajectory**: the deduplicated, timestamped state history of one
//!   object
//! - **Summary**: start/end/edge counts aggregated over many trajectories
//!
//! # Example
//!
//! ```rust
//! use trackway::classifier::StateClassifier;
//! use trackway::summary::TransitionSummary;
//! use trackway::tracker::ObjectStateTracker;
//! use trackway::state_enum;
//!
//! state_enum! {
//!     enum TaskState {
//!         Pending,
//!         Running,
//!         Done,
//!     }
//! }
//!
//! #[derive(PartialEq)]
//! struct Task {
//!     id: u32,
//!     progress: u8,
//! }
//!
//! let classifier = StateClassifier::new([TaskState::Pending, TaskState::Running, TaskState::Done])
//!     .with_rule(TaskState::Done, |t: &Task| t.progress >= 100)?
//!     .with_rule(TaskState::Running, |t: &Task| t.progress > 0)?
//!     .with_default(TaskState::Pending)?;
//!
//! let mut tracker = ObjectStateTracker::new(classifier);
//! tracker.register([Task { id: 1, progress: 0 }])?;
//!
//! let task = Task { id: 1, progress: 0 };
//! let mut summary = TransitionSummary::new([TaskState::Pending, TaskState::Running, TaskState::Done]);
//! summary.add(tracker.trajectory_of(&task)?)?;
//!
//! assert_eq!(summary.started(&TaskState::Pending), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod classifier;
pub mod core;
pub mod summary;
pub mod tracker;

// Re-export commonly used types
pub use classifier::{ConfigError, StateClassifier};
pub use core::{ClassificationRule, OrderingError, State, Trajectory, TrajectoryEntry};
pub use summary::{TransitionSummary, UnknownStateError};
pub use tracker::{ChangeListener, DuplicatePolicy, ObjectStateTracker, TrackError};
