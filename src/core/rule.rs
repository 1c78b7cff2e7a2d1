//! Classification rules pairing a state with a predicate.
//!
//! Rules are pure boolean functions over a tracked object, paired with the
//! state they classify into. A classifier evaluates its rules in
//! registration order and the first match wins.

use super::state::State;

/// A single classification rule: a target state plus a pure predicate.
///
/// The predicate inspects a tracked object and decides whether the object
/// currently belongs to the rule's state. Predicates must be pure
/// (deterministic, no side effects) and thread-safe (`Send + Sync`).
///
/// # Example
///
/// ```rust
/// use trackway::core::{ClassificationRule, State};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
/// enum TankState {
///     Empty,
///     Full,
/// }
///
/// impl State for TankState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Empty => "Empty",
///             Self::Full => "Full",
///         }
///     }
/// }
///
/// struct Tank {
///     level: u32,
/// }
///
/// let rule = ClassificationRule::new(TankState::Empty, |t: &Tank| t.level == 0);
///
/// assert!(rule.matches(&Tank { level: 0 }));
/// assert!(!rule.matches(&Tank { level: 7 }));
/// assert_eq!(rule.state(), &TankState::Empty);
/// ```
pub struct ClassificationRule<O, S: State> {
    state: S,
    predicate: Box<dyn Fn(&O) -> bool + Send + Sync>,
}

impl<O, S: State> ClassificationRule<O, S> {
    /// Create a rule from a target state and a pure predicate.
    pub fn new<F>(state: S, predicate: F) -> Self
    where
        F: Fn(&O) -> bool + Send + Sync + 'static,
    {
        ClassificationRule {
            state,
            predicate: Box::new(predicate),
        }
    }

    /// The state this rule classifies into.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Check whether the object currently satisfies this rule.
    ///
    /// Pure evaluation of the predicate; the object is never mutated.
    pub fn matches(&self, object: &O) -> bool {
        (self.predicate)(object)
    }

    /// Replace the predicate, keeping the rule's state and position.
    pub(crate) fn set_predicate<F>(&mut self, predicate: F)
    where
        F: Fn(&O) -> bool + Send + Sync + 'static,
    {
        self.predicate = Box::new(predicate);
    }
}
