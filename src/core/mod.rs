//! Core state tracking types.
//!
//! This module contains the building blocks everything else is assembled
//! from:
//! - State definitions via the `State` trait
//! - Classification rules pairing states with predicates
//! - Trajectory logs of timestamped state changes
//!
//! All logic in this module is pure with respect to tracked objects:
//! predicates read, never mutate.

mod macros;
mod rule;
mod state;
mod trajectory;

pub use rule::ClassificationRule;
pub use state::State;
pub use trajectory::{OrderingError, Trajectory, TrajectoryEntry};
