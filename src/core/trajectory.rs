//! Per-object state trajectory tracking.
//!
//! A trajectory is the ordered, timestamped log of the states one tracked
//! object has moved through. It records *changes*, not evaluations: two
//! consecutive entries never carry the same state.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// A single trajectory entry: the state entered and when.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TrajectoryEntry<S: State> {
    /// The state the object entered
    pub state: S,
    /// When the state was recorded
    pub at: DateTime<Utc>,
}

/// Append with a timestamp earlier than the trajectory's last entry.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("timestamp {offered} is earlier than the last recorded entry at {last}")]
pub struct OrderingError {
    /// Timestamp of the current last entry
    pub last: DateTime<Utc>,
    /// The rejected timestamp
    pub offered: DateTime<Utc>,
}

/// Ordered history of state changes for one tracked object.
///
/// Entries are kept in non-decreasing timestamp order, and no two
/// consecutive entries share a state. A trajectory is created and mutated by
/// the tracker that owns it; everything else reads it through
/// [`first`](Trajectory::first), [`last`](Trajectory::last), and ordered
/// traversal.
///
/// # Example
///
/// ```rust
/// use trackway::core::Trajectory;
/// use trackway::state_enum;
/// use chrono::Utc;
///
/// state_enum! {
///     enum Phase {
///         Queued,
///         Running,
///         Done,
///     }
/// }
///
/// let mut trajectory = Trajectory::with_initial(Phase::Queued, Utc::now());
/// trajectory.append(Phase::Running, Utc::now())?;
/// trajectory.append(Phase::Done, Utc::now())?;
///
/// assert_eq!(trajectory.first().map(|e| &e.state), Some(&Phase::Queued));
/// assert_eq!(trajectory.last().map(|e| &e.state), Some(&Phase::Done));
/// assert_eq!(trajectory.len(), 3);
/// # Ok::<(), trackway::core::OrderingError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Trajectory<S: State> {
    entries: Vec<TrajectoryEntry<S>>,
}

impl<S: State> Default for Trajectory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> Trajectory<S> {
    /// Create a new empty trajectory.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Create a trajectory holding a single initial entry.
    pub fn with_initial(state: S, at: DateTime<Utc>) -> Self {
        Self {
            entries: vec![TrajectoryEntry { state, at }],
        }
    }

    /// Append a state change.
    ///
    /// Fails with [`OrderingError`] if `at` is earlier than the last
    /// recorded entry. Appending the state already at the tail is a no-op
    /// (the log records changes, so the invariant that no two consecutive
    /// entries share a state holds structurally).
    pub fn append(&mut self, state: S, at: DateTime<Utc>) -> Result<(), OrderingError> {
        if let Some(tail) = self.entries.last() {
            if at < tail.at {
                return Err(OrderingError {
                    last: tail.at,
                    offered: at,
                });
            }
            if tail.state == state {
                return Ok(());
            }
        }
        self.entries.push(TrajectoryEntry { state, at });
        Ok(())
    }

    /// Tracker-internal append: clamps `at` to the tail timestamp so a
    /// backwards wall-clock step cannot violate ordering.
    pub(crate) fn record(&mut self, state: S, at: DateTime<Utc>) {
        let at = match self.entries.last() {
            Some(tail) => at.max(tail.at),
            None => at,
        };
        // Cannot fail: the timestamp is clamped.
        let _ = self.append(state, at);
    }

    /// The first (registration-time) entry, if any.
    pub fn first(&self) -> Option<&TrajectoryEntry<S>> {
        self.entries.first()
    }

    /// The most recent entry, if any.
    pub fn last(&self) -> Option<&TrajectoryEntry<S>> {
        self.entries.last()
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[TrajectoryEntry<S>] {
        &self.entries
    }

    /// The states visited, in order.
    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.entries.iter().map(|entry| &entry.state)
    }

    /// Number of recorded state changes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the trajectory has recorded anything yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Elapsed time between the first and last entry.
    ///
    /// Returns `None` for an empty trajectory.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.entries.first()?, self.entries.last()?);
        last.at.signed_duration_since(first.at).to_std().ok()
    }
}

impl<'a, S: State> IntoIterator for &'a Trajectory<S> {
    type Item = &'a TrajectoryEntry<S>;
    type IntoIter = std::slice::Iter<'a, TrajectoryEntry<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Renders as `[(in: S at: T), (from: S to: S at: T), ...]`.
impl<S: State> fmt::Display for Trajectory<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        let mut before: Option<&S> = None;
        for (index, entry) in self.entries.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            match before {
                None => write!(f, "(in: {} at: {})", entry.state.name(), entry.at)?,
                Some(prev) => write!(
                    f,
                    "(from: {} to: {} at: {})",
                    prev.name(),
                    entry.state.name(),
                    entry.at
                )?,
            }
            before = Some(&entry.state);
        }
        write!(f, "]")
    }
}
