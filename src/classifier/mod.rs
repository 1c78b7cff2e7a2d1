//! First-match-wins state classification.
//!
//! A classifier holds an ordered list of [`ClassificationRule`]s plus an
//! optional default state. Evaluating an object walks the rules in the
//! order they were registered and returns the state of the first rule whose
//! predicate matches. Rules may overlap; registration order encodes
//! priority, so callers never need mutually exclusive predicates.

pub mod error;

pub use error::ConfigError;

use crate::core::{ClassificationRule, State};
use std::collections::BTreeSet;

/// Ordered rule-based classifier over a fixed state universe.
///
/// # Example
///
/// ```rust
/// use trackway::classifier::StateClassifier;
/// use trackway::state_enum;
///
/// state_enum! {
///     enum JobState {
///         Queued,
///         Running,
///         Done,
///     }
/// }
///
/// struct Job {
///     progress: u8,
/// }
///
/// let classifier = StateClassifier::new([JobState::Queued, JobState::Running, JobState::Done])
///     .with_rule(JobState::Done, |j: &Job| j.progress >= 100)?
///     .with_rule(JobState::Running, |j: &Job| j.progress > 0)?
///     .with_default(JobState::Queued)?;
///
/// assert_eq!(classifier.classify(&Job { progress: 0 }), Some(JobState::Queued));
/// assert_eq!(classifier.classify(&Job { progress: 40 }), Some(JobState::Running));
/// assert_eq!(classifier.classify(&Job { progress: 100 }), Some(JobState::Done));
/// # Ok::<(), trackway::classifier::ConfigError>(())
/// ```
pub struct StateClassifier<O, S: State> {
    universe: BTreeSet<S>,
    rules: Vec<ClassificationRule<O, S>>,
    default_state: Option<S>,
}

impl<O, S: State> StateClassifier<O, S> {
    /// Declare the fixed universe of valid states.
    ///
    /// The universe never grows after construction; every rule and the
    /// default state must reference one of these states.
    pub fn new<I>(universe: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        Self {
            universe: universe.into_iter().collect(),
            rules: Vec::new(),
            default_state: None,
        }
    }

    /// Register a classification rule for `state`.
    ///
    /// Rules are evaluated in registration order and the first match wins.
    /// Registering a rule for an already-configured state replaces its
    /// predicate in place (last write wins, original position kept), which
    /// allows iterative rule refinement before objects are added.
    pub fn with_rule<F>(mut self, state: S, predicate: F) -> Result<Self, ConfigError>
    where
        F: Fn(&O) -> bool + Send + Sync + 'static,
    {
        self.check_membership(&state)?;
        match self.rules.iter_mut().find(|rule| rule.state() == &state) {
            Some(existing) => existing.set_predicate(predicate),
            None => self.rules.push(ClassificationRule::new(state, predicate)),
        }
        Ok(self)
    }

    /// Designate the fallback state for objects no rule matches.
    ///
    /// Without a default, unmatched objects classify to `None`.
    pub fn with_default(mut self, state: S) -> Result<Self, ConfigError> {
        self.check_membership(&state)?;
        self.default_state = Some(state);
        Ok(self)
    }

    /// Classify an object.
    ///
    /// Walks the rules in registration order and returns the state of the
    /// first matching one; falls back to the default state, or `None` when
    /// no default is configured. Pure with respect to the object.
    pub fn classify(&self, object: &O) -> Option<S> {
        self.rules
            .iter()
            .find(|rule| rule.matches(object))
            .map(|rule| rule.state().clone())
            .or_else(|| self.default_state.clone())
    }

    /// The declared state universe, in state order.
    pub fn universe(&self) -> &BTreeSet<S> {
        &self.universe
    }

    /// The configured default state, if any.
    pub fn default_state(&self) -> Option<&S> {
        self.default_state.as_ref()
    }

    fn check_membership(&self, state: &S) -> Result<(), ConfigError> {
        if self.universe.contains(state) {
            Ok(())
        } else {
            Err(ConfigError::UnknownState {
                state: state.name().to_string(),
            })
        }
    }
}
