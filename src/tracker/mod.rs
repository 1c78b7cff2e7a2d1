//! Object registry with change-driven state tracking.
//!
//! The tracker owns an insertion-ordered registry of collaborator objects,
//! classifies each one with a [`StateClassifier`], and appends to the
//! object's [`Trajectory`] only when the computed state actually changes.
//! Refreshing never mutates the objects themselves.

pub mod error;
mod listener;

pub use error::TrackError;
pub use listener::ChangeListener;

use crate::classifier::StateClassifier;
use crate::core::{State, Trajectory};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// What `register` does with an identity that is already tracked.
///
/// Rejection surfaces the conflict and is the default; overwriting is
/// opt-in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Fail with [`TrackError::DuplicateObject`], leaving the registry
    /// untouched.
    #[default]
    Reject,
    /// Replace the tracked object and reset its trajectory, keeping its
    /// registration position.
    Replace,
}

struct TrackedSlot<O, S: State> {
    object: O,
    current: Option<S>,
    trajectory: Trajectory<S>,
}

/// Tracks the classified state of a set of collaborator objects over time.
///
/// Object identity is the collaborator's own `PartialEq` contract (a
/// business key, typically), not reference identity. Each identity maps to
/// exactly one trajectory, owned and mutated exclusively by this tracker.
///
/// # Example
///
/// ```rust
/// use trackway::classifier::StateClassifier;
/// use trackway::tracker::ObjectStateTracker;
/// use trackway::state_enum;
///
/// state_enum! {
///     enum BatteryState {
///         Charged,
///         Draining,
///     }
/// }
///
/// #[derive(PartialEq)]
/// struct Battery {
///     id: u32,
///     level: u8,
/// }
///
/// let classifier = StateClassifier::new([BatteryState::Charged, BatteryState::Draining])
///     .with_rule(BatteryState::Charged, |b: &Battery| b.level >= 95)?
///     .with_default(BatteryState::Draining)?;
///
/// let mut tracker = ObjectStateTracker::new(classifier);
/// tracker.register([Battery { id: 1, level: 100 }, Battery { id: 2, level: 40 }])?;
///
/// let full = Battery { id: 1, level: 100 };
/// assert_eq!(tracker.state_of(&full)?, Some(&BatteryState::Charged));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ObjectStateTracker<O, S: State> {
    classifier: StateClassifier<O, S>,
    tracked: Vec<TrackedSlot<O, S>>,
    on_duplicate: DuplicatePolicy,
}

impl<O: PartialEq, S: State> ObjectStateTracker<O, S> {
    /// Create a tracker around a configured classifier.
    pub fn new(classifier: StateClassifier<O, S>) -> Self {
        Self {
            classifier,
            tracked: Vec::new(),
            on_duplicate: DuplicatePolicy::default(),
        }
    }

    /// Choose how to handle registration of an already-tracked identity.
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.on_duplicate = policy;
        self
    }

    /// The classifier this tracker evaluates objects with.
    pub fn classifier(&self) -> &StateClassifier<O, S> {
        &self.classifier
    }

    /// Register objects, classifying each and starting its trajectory.
    ///
    /// Registration is atomic: under [`DuplicatePolicy::Reject`], a
    /// duplicate anywhere in the batch (against the registry or within the
    /// batch itself) fails the whole call and registers nothing. Objects
    /// that no rule and no default classify start with an empty trajectory
    /// and a current state of "no state".
    pub fn register<I>(&mut self, objects: I) -> Result<(), TrackError>
    where
        I: IntoIterator<Item = O>,
    {
        let incoming: Vec<O> = objects.into_iter().collect();

        if self.on_duplicate == DuplicatePolicy::Reject {
            for (index, object) in incoming.iter().enumerate() {
                let in_registry = self.tracked.iter().any(|slot| slot.object == *object);
                let in_batch = incoming[..index].iter().any(|earlier| earlier == object);
                if in_registry || in_batch {
                    return Err(TrackError::DuplicateObject);
                }
            }
        }

        let now = Utc::now();
        for object in incoming {
            let current = self.classifier.classify(&object);
            let trajectory = match &current {
                Some(state) => {
                    log::debug!("registered object in state {}", state.name());
                    Trajectory::with_initial(state.clone(), now)
                }
                None => {
                    log::debug!("registered object with no matching state");
                    Trajectory::new()
                }
            };
            let slot = TrackedSlot {
                object,
                current,
                trajectory,
            };
            match self.tracked.iter_mut().find(|s| s.object == slot.object) {
                Some(existing) => *existing = slot,
                None => self.tracked.push(slot),
            }
        }
        Ok(())
    }

    /// Re-evaluate every tracked object.
    ///
    /// Appends a trajectory entry only for objects whose computed state
    /// differs from their current one; unchanged objects keep their last
    /// entry and timestamp untouched.
    pub fn refresh(&mut self) {
        let now = Utc::now();
        let classifier = &self.classifier;
        for slot in &mut self.tracked {
            Self::reclassify(classifier, slot, now);
        }
    }

    /// Re-evaluate a single tracked object.
    pub fn refresh_object(&mut self, object: &O) -> Result<(), TrackError> {
        let now = Utc::now();
        let classifier = &self.classifier;
        let slot = self
            .tracked
            .iter_mut()
            .find(|slot| slot.object == *object)
            .ok_or(TrackError::NotFound)?;
        Self::reclassify(classifier, slot, now);
        Ok(())
    }

    fn reclassify(
        classifier: &StateClassifier<O, S>,
        slot: &mut TrackedSlot<O, S>,
        now: DateTime<Utc>,
    ) {
        let next = classifier.classify(&slot.object);
        if next == slot.current {
            return;
        }
        log::debug!(
            "state change {} -> {}",
            slot.current.as_ref().map_or("(none)", State::name),
            next.as_ref().map_or("(none)", State::name),
        );
        if let Some(state) = &next {
            slot.trajectory.record(state.clone(), now);
        }
        slot.current = next;
    }

    /// The trajectory recorded for a registered identity.
    pub fn trajectory_of(&self, object: &O) -> Result<&Trajectory<S>, TrackError> {
        self.find(object).map(|slot| &slot.trajectory)
    }

    /// The current state of a registered identity.
    ///
    /// `Ok(None)` means the object is tracked but currently matches no rule
    /// and no default is configured.
    pub fn state_of(&self, object: &O) -> Result<Option<&S>, TrackError> {
        self.find(object).map(|slot| slot.current.as_ref())
    }

    /// Partition all tracked objects by their current state.
    ///
    /// Every state of the universe is present as a key, possibly with an
    /// empty bucket; each object appears in at most one bucket. Objects
    /// currently in "no state" are omitted.
    pub fn snapshot(&self) -> BTreeMap<S, Vec<&O>> {
        let mut buckets: BTreeMap<S, Vec<&O>> = self
            .classifier
            .universe()
            .iter()
            .map(|state| (state.clone(), Vec::new()))
            .collect();
        for slot in &self.tracked {
            if let Some(state) = &slot.current {
                if let Some(bucket) = buckets.get_mut(state) {
                    bucket.push(&slot.object);
                }
            }
        }
        buckets
    }

    /// Iterate tracked objects lazily, in registration order.
    pub fn iter(&self) -> TrackedObjects<'_, O, S> {
        TrackedObjects {
            inner: self.tracked.iter(),
        }
    }

    /// Number of tracked objects.
    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    /// Whether anything has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    fn find(&self, object: &O) -> Result<&TrackedSlot<O, S>, TrackError> {
        self.tracked
            .iter()
            .find(|slot| slot.object == *object)
            .ok_or(TrackError::NotFound)
    }
}

/// Iterator over tracked objects in registration order.
pub struct TrackedObjects<'a, O, S: State> {
    inner: std::slice::Iter<'a, TrackedSlot<O, S>>,
}

impl<'a, O, S: State> Iterator for TrackedObjects<'a, O, S> {
    type Item = &'a O;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|slot| &slot.object)
    }
}

impl<'a, O: PartialEq, S: State> IntoIterator for &'a ObjectStateTracker<O, S> {
    type Item = &'a O;
    type IntoIter = TrackedObjects<'a, O, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Renders as `{STATE=[obj, ...], ...}` in state-universe order.
impl<O: PartialEq + fmt::Display, S: State> fmt::Display for ObjectStateTracker<O, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (index, (state, objects)) in self.snapshot().iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}=[", state.name())?;
            for (position, object) in objects.iter().enumerate() {
                if position > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{object}")?;
            }
            write!(f, "]")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_enum;
    use std::cell::Cell;
    use std::fmt;
    use std::rc::Rc;

    state_enum! {
        enum GaugeState {
            Low,
            Normal,
            High,
        }
    }

    #[derive(Debug)]
    struct Gauge {
        name: &'static str,
        value: Cell<i64>,
    }

    impl Gauge {
        fn shared(name: &'static str, value: i64) -> Rc<Self> {
            Rc::new(Gauge {
                name,
                value: Cell::new(value),
            })
        }
    }

    impl PartialEq for Gauge {
        fn eq(&self, other: &Self) -> bool {
            self.name == other.name
        }
    }

    impl fmt::Display for Gauge {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "gauge {}", self.name)
        }
    }

    fn classifier() -> StateClassifier<Rc<Gauge>, GaugeState> {
        StateClassifier::new([GaugeState::Low, GaugeState::Normal, GaugeState::High])
            .with_rule(GaugeState::High, |g: &Rc<Gauge>| g.value.get() > 100)
            .unwrap()
            .with_rule(GaugeState::Low, |g: &Rc<Gauge>| g.value.get() < 10)
            .unwrap()
            .with_default(GaugeState::Normal)
            .unwrap()
    }

    #[test]
    fn register_assigns_initial_states() {
        let mut tracker = ObjectStateTracker::new(classifier());
        let cold = Gauge::shared("cold", 0);
        let warm = Gauge::shared("warm", 50);
        tracker.register([Rc::clone(&cold), Rc::clone(&warm)]).unwrap();

        assert_eq!(tracker.state_of(&cold).unwrap(), Some(&GaugeState::Low));
        assert_eq!(tracker.state_of(&warm).unwrap(), Some(&GaugeState::Normal));
        assert_eq!(tracker.trajectory_of(&cold).unwrap().len(), 1);
    }

    #[test]
    fn duplicate_registration_is_rejected_and_keeps_first_trajectory() {
        let mut tracker = ObjectStateTracker::new(classifier());
        let gauge = Gauge::shared("g", 0);
        tracker.register([Rc::clone(&gauge)]).unwrap();

        gauge.value.set(50);
        tracker.refresh();
        let before: Vec<GaugeState> = tracker
            .trajectory_of(&gauge)
            .unwrap()
            .states()
            .cloned()
            .collect();

        let twin = Gauge::shared("g", 500);
        assert_eq!(
            tracker.register([twin]).unwrap_err(),
            TrackError::DuplicateObject
        );

        let after: Vec<GaugeState> = tracker
            .trajectory_of(&gauge)
            .unwrap()
            .states()
            .cloned()
            .collect();
        assert_eq!(before, after);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn duplicate_within_a_batch_registers_nothing() {
        let mut tracker = ObjectStateTracker::new(classifier());
        let first = Gauge::shared("a", 0);
        let twin = Gauge::shared("a", 50);
        let other = Gauge::shared("b", 50);

        let result = tracker.register([first, other, twin]);

        assert_eq!(result.unwrap_err(), TrackError::DuplicateObject);
        assert!(tracker.is_empty());
    }

    #[test]
    fn replace_policy_resets_the_trajectory() {
        let mut tracker =
            ObjectStateTracker::new(classifier()).with_duplicate_policy(DuplicatePolicy::Replace);
        let gauge = Gauge::shared("g", 0);
        tracker.register([Rc::clone(&gauge)]).unwrap();
        gauge.value.set(50);
        tracker.refresh();
        assert_eq!(tracker.trajectory_of(&gauge).unwrap().len(), 2);

        let replacement = Gauge::shared("g", 500);
        tracker.register([Rc::clone(&replacement)]).unwrap();

        assert_eq!(tracker.len(), 1);
        let trajectory = tracker.trajectory_of(&replacement).unwrap();
        assert_eq!(trajectory.len(), 1);
        assert_eq!(
            trajectory.first().map(|e| &e.state),
            Some(&GaugeState::High)
        );
    }

    #[test]
    fn refresh_is_idempotent_without_mutation() {
        let mut tracker = ObjectStateTracker::new(classifier());
        let gauge = Gauge::shared("g", 50);
        tracker.register([Rc::clone(&gauge)]).unwrap();

        tracker.refresh();
        tracker.refresh();
        tracker.refresh();

        assert_eq!(tracker.trajectory_of(&gauge).unwrap().len(), 1);
    }

    #[test]
    fn refresh_records_actual_changes() {
        let mut tracker = ObjectStateTracker::new(classifier());
        let gauge = Gauge::shared("g", 0);
        tracker.register([Rc::clone(&gauge)]).unwrap();

        gauge.value.set(50);
        tracker.refresh();
        gauge.value.set(200);
        tracker.refresh();

        let states: Vec<GaugeState> = tracker
            .trajectory_of(&gauge)
            .unwrap()
            .states()
            .cloned()
            .collect();
        assert_eq!(
            states,
            vec![GaugeState::Low, GaugeState::Normal, GaugeState::High]
        );
    }

    #[test]
    fn refresh_object_leaves_others_untouched() {
        let mut tracker = ObjectStateTracker::new(classifier());
        let one = Gauge::shared("one", 0);
        let two = Gauge::shared("two", 0);
        tracker
            .register([Rc::clone(&one), Rc::clone(&two)])
            .unwrap();

        one.value.set(50);
        two.value.set(50);
        tracker.refresh_object(&one).unwrap();

        assert_eq!(tracker.trajectory_of(&one).unwrap().len(), 2);
        // `two` mutated but was not refreshed, so nothing is recorded yet.
        assert_eq!(tracker.trajectory_of(&two).unwrap().len(), 1);
        assert_eq!(tracker.state_of(&two).unwrap(), Some(&GaugeState::Low));
    }

    #[test]
    fn unregistered_lookups_are_not_found() {
        let mut tracker = ObjectStateTracker::new(classifier());
        let stranger = Gauge::shared("stranger", 0);

        assert_eq!(
            tracker.trajectory_of(&stranger).unwrap_err(),
            TrackError::NotFound
        );
        assert_eq!(
            tracker.refresh_object(&stranger).unwrap_err(),
            TrackError::NotFound
        );
        assert_eq!(tracker.state_of(&stranger).unwrap_err(), TrackError::NotFound);
    }

    #[test]
    fn snapshot_partitions_all_tracked_objects() {
        let mut tracker = ObjectStateTracker::new(classifier());
        let cold = Gauge::shared("cold", 0);
        let warm = Gauge::shared("warm", 50);
        let hot = Gauge::shared("hot", 500);
        tracker
            .register([Rc::clone(&cold), Rc::clone(&warm), Rc::clone(&hot)])
            .unwrap();

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[&GaugeState::Low], vec![&cold]);
        assert_eq!(snapshot[&GaugeState::Normal], vec![&warm]);
        assert_eq!(snapshot[&GaugeState::High], vec![&hot]);

        let total: usize = snapshot.values().map(Vec::len).sum();
        assert_eq!(total, tracker.len());
    }

    #[test]
    fn unclassified_objects_are_tracked_but_unbucketed() {
        // No default: a mid-range gauge matches no rule.
        let classifier = StateClassifier::new([GaugeState::Low, GaugeState::High])
            .with_rule(GaugeState::High, |g: &Rc<Gauge>| g.value.get() > 100)
            .unwrap()
            .with_rule(GaugeState::Low, |g: &Rc<Gauge>| g.value.get() < 10)
            .unwrap();
        let mut tracker = ObjectStateTracker::new(classifier);
        let gauge = Gauge::shared("mid", 50);
        tracker.register([Rc::clone(&gauge)]).unwrap();

        assert_eq!(tracker.state_of(&gauge).unwrap(), None);
        assert!(tracker.trajectory_of(&gauge).unwrap().is_empty());
        let total: usize = tracker.snapshot().values().map(Vec::len).sum();
        assert_eq!(total, 0);

        // The first matching classification starts the trajectory.
        gauge.value.set(500);
        tracker.refresh();
        assert_eq!(tracker.state_of(&gauge).unwrap(), Some(&GaugeState::High));
        assert_eq!(tracker.trajectory_of(&gauge).unwrap().len(), 1);
    }

    #[test]
    fn iteration_follows_registration_order() {
        let mut tracker = ObjectStateTracker::new(classifier());
        let names = ["z", "a", "m"];
        for name in names {
            tracker.register([Gauge::shared(name, 50)]).unwrap();
        }

        let seen: Vec<&str> = tracker.iter().map(|gauge| gauge.name).collect();
        assert_eq!(seen, names);

        // Restartable: a second pass sees the same sequence.
        let again: Vec<&str> = (&tracker).into_iter().map(|gauge| gauge.name).collect();
        assert_eq!(again, names);
    }

    #[test]
    fn display_renders_buckets_in_universe_order() {
        let mut tracker = ObjectStateTracker::new(classifier());
        tracker
            .register([Gauge::shared("cold", 0), Gauge::shared("hot", 500)])
            .unwrap();

        assert_eq!(
            tracker.to_string(),
            "{Low=[gauge cold], Normal=[], High=[gauge hot]}"
        );
    }
}
