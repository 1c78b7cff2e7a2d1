//! Aggregation of trajectories into a transition summary.
//!
//! A summary consumes trajectories (not live objects) and accumulates, per
//! state of a fixed universe, how often trajectories started there, ended
//! there, and how often each state-to-state transition occurred. The result
//! approximates a simple directed, weighted transition graph; counts are
//! raw, not probabilities.

pub mod error;

pub use error::UnknownStateError;

use crate::core::{State, Trajectory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Start/end/edge counts accumulated from a set of trajectories.
///
/// All counts start at zero for every state in the universe and only grow.
/// Adding a trajectory is not idempotent: feeding the same trajectory twice
/// counts it twice, which is the caller's responsibility to avoid.
/// Self-loop edges cannot occur, since a trajectory never holds two
/// consecutive equal states.
///
/// # Example
///
/// ```rust
/// use trackway::core::Trajectory;
/// use trackway::summary::TransitionSummary;
/// use trackway::state_enum;
/// use chrono::Utc;
///
/// state_enum! {
///     enum Step {
///         Start,
///         Middle,
///         End,
///     }
/// }
///
/// let mut trajectory = Trajectory::with_initial(Step::Start, Utc::now());
/// trajectory.append(Step::Middle, Utc::now())?;
/// trajectory.append(Step::End, Utc::now())?;
///
/// let mut summary = TransitionSummary::new([Step::Start, Step::Middle, Step::End]);
/// summary.add(&trajectory)?;
///
/// assert_eq!(summary.started(&Step::Start), 1);
/// assert_eq!(summary.ended(&Step::End), 1);
/// assert_eq!(summary.transitions(&Step::Start, &Step::Middle), 1);
/// assert_eq!(summary.transitions(&Step::Middle, &Step::Start), 0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionSummary<S: State> {
    started: BTreeMap<S, u64>,
    ended: BTreeMap<S, u64>,
    edges: BTreeMap<S, BTreeMap<S, u64>>,
}

impl<S: State> TransitionSummary<S> {
    /// Create a summary over a fixed state universe, all counts zero.
    pub fn new<I>(universe: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        let mut started = BTreeMap::new();
        let mut ended = BTreeMap::new();
        let mut edges = BTreeMap::new();
        for state in universe {
            started.insert(state.clone(), 0);
            ended.insert(state.clone(), 0);
            edges.insert(state, BTreeMap::new());
        }
        Self {
            started,
            ended,
            edges,
        }
    }

    /// Accumulate one trajectory.
    ///
    /// Increments the start count of its first state, the end count of its
    /// last state, and one edge count per consecutive pair. Fails with
    /// [`UnknownStateError`] if any referenced state is outside the
    /// universe, in which case nothing is counted. An empty trajectory is a
    /// no-op.
    pub fn add(&mut self, trajectory: &Trajectory<S>) -> Result<(), UnknownStateError> {
        for state in trajectory.states() {
            if !self.started.contains_key(state) {
                return Err(UnknownStateError {
                    state: state.name().to_string(),
                });
            }
        }

        let entries = trajectory.entries();
        let (Some(first), Some(last)) = (entries.first(), entries.last()) else {
            return Ok(());
        };

        if let Some(count) = self.started.get_mut(&first.state) {
            *count += 1;
        }
        if let Some(count) = self.ended.get_mut(&last.state) {
            *count += 1;
        }
        for pair in entries.windows(2) {
            if let Some(outgoing) = self.edges.get_mut(&pair[0].state) {
                *outgoing.entry(pair[1].state.clone()).or_insert(0) += 1;
            }
        }
        Ok(())
    }

    /// How many trajectories started in `state`.
    pub fn started(&self, state: &S) -> u64 {
        self.started.get(state).copied().unwrap_or(0)
    }

    /// How many trajectories ended in `state`.
    pub fn ended(&self, state: &S) -> u64 {
        self.ended.get(state).copied().unwrap_or(0)
    }

    /// How many `from` -> `to` transitions were observed.
    pub fn transitions(&self, from: &S, to: &S) -> u64 {
        self.edges
            .get(from)
            .and_then(|outgoing| outgoing.get(to))
            .copied()
            .unwrap_or(0)
    }

    /// The non-zero outgoing edges of `state`, in state order.
    pub fn outgoing<'a>(&'a self, state: &S) -> impl Iterator<Item = (&'a S, u64)> + 'a {
        self.edges
            .get(state)
            .into_iter()
            .flatten()
            .filter(|(_, count)| **count > 0)
            .map(|(to, count)| (to, *count))
    }

    /// The states of the universe, in state order.
    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.started.keys()
    }
}

/// Renders one block per state: start/end counts, then only the non-zero
/// outgoing edges, so output stays proportional to observed transitions.
impl<S: State> fmt::Display for TransitionSummary<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, state) in self.states().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{}: initial={}, final={}",
                state.name(),
                self.started(state),
                self.ended(state)
            )?;
            for (to, count) in self.outgoing(state) {
                write!(f, "\n  -> {}: {}", to.name(), count)?;
            }
        }
        Ok(())
    }
}
