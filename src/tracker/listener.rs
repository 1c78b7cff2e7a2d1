//! Change-notification seam between collaborators and the tracker.

use super::ObjectStateTracker;
use crate::core::State;

/// Listener for synchronous object-change notifications.
///
/// Collaborator objects that can publish changes invoke `on_change` on
/// their registered listeners whenever a relevant field mutates. The
/// channel is synchronous and at-least-once; delivering a notification for
/// an object the listener does not know is allowed.
pub trait ChangeListener<O> {
    /// Called by a collaborator after one of its fields changed.
    fn on_change(&mut self, object: &O);
}

/// The tracker responds to a change notification by re-evaluating that
/// single object. Notifications for untracked objects are ignored.
impl<O: PartialEq, S: State> ChangeListener<O> for ObjectStateTracker<O, S> {
    fn on_change(&mut self, object: &O) {
        if self.refresh_object(object).is_err() {
            log::warn!("change notification for untracked object ignored");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::StateClassifier;
    use crate::state_enum;
    use std::cell::Cell;
    use std::rc::Rc;

    state_enum! {
        enum DoorState {
            Open,
            Closed,
        }
    }

    #[derive(Debug)]
    struct Door {
        id: u32,
        open: Cell<bool>,
    }

    impl PartialEq for Door {
        fn eq(&self, other: &Self) -> bool {
            self.id == other.id
        }
    }

    fn tracker() -> ObjectStateTracker<Rc<Door>, DoorState> {
        let classifier = StateClassifier::new([DoorState::Open, DoorState::Closed])
            .with_rule(DoorState::Open, |d: &Rc<Door>| d.open.get())
            .unwrap()
            .with_default(DoorState::Closed)
            .unwrap();
        ObjectStateTracker::new(classifier)
    }

    #[test]
    fn notification_refreshes_the_object() {
        let mut tracker = tracker();
        let door = Rc::new(Door {
            id: 1,
            open: Cell::new(false),
        });
        tracker.register([Rc::clone(&door)]).unwrap();

        door.open.set(true);
        tracker.on_change(&door);

        assert_eq!(tracker.state_of(&door).unwrap(), Some(&DoorState::Open));
        assert_eq!(tracker.trajectory_of(&door).unwrap().len(), 2);
    }

    #[test]
    fn notification_for_untracked_object_is_ignored() {
        let mut tracker = tracker();
        let stranger = Rc::new(Door {
            id: 9,
            open: Cell::new(true),
        });

        tracker.on_change(&stranger);
        assert!(tracker.is_empty());
    }
}
