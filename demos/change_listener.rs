//! Change-Driven Refresh
//!
//! This demo wires a collaborator object's change-notification channel to
//! the tracker: every mutation publishes a synchronous notification, and
//! the tracker re-evaluates just that object. No polling `refresh()` calls
//! are needed.
//!
//! Key concepts:
//! - The `ChangeListener` seam between collaborators and the tracker
//! - A publisher built with `Rc::new_cyclic` and interior mutability
//! - Trajectory growth driven purely by notifications
//!
//! Run with: cargo run --example change_listener

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use trackway::classifier::StateClassifier;
use trackway::state_enum;
use trackway::tracker::{ChangeListener, ObjectStateTracker};

state_enum! {
    pub enum SensorState {
        Nominal,
        Overheat,
        Offline,
    }
}

type SharedListener = Rc<RefCell<dyn ChangeListener<Rc<Sensor>>>>;

// A temperature sensor that publishes a notification after every mutation.
// It keeps a weak handle to itself so it can hand listeners the shared
// handle they know it by.
struct Sensor {
    id: u32,
    celsius: Cell<f64>,
    me: Weak<Sensor>,
    listeners: RefCell<Vec<SharedListener>>,
}

impl Sensor {
    fn shared(id: u32, celsius: f64) -> Rc<Self> {
        Rc::new_cyclic(|me| Sensor {
            id,
            celsius: Cell::new(celsius),
            me: me.clone(),
            listeners: RefCell::new(Vec::new()),
        })
    }

    fn subscribe(&self, listener: SharedListener) {
        self.listeners.borrow_mut().push(listener);
    }

    fn set_celsius(&self, celsius: f64) {
        self.celsius.set(celsius);
        self.publish();
    }

    fn publish(&self) {
        let Some(me) = self.me.upgrade() else { return };
        for listener in self.listeners.borrow().iter() {
            listener.borrow_mut().on_change(&me);
        }
    }
}

impl PartialEq for Sensor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sensor #{}", self.id)
    }
}

fn main() {
    env_logger::init();

    println!("=== Change-Driven Refresh ===\n");

    let classifier = StateClassifier::new([
        SensorState::Nominal,
        SensorState::Overheat,
        SensorState::Offline,
    ])
    .with_rule(SensorState::Offline, |s: &Rc<Sensor>| {
        s.celsius.get().is_nan()
    })
    .unwrap()
    .with_rule(SensorState::Overheat, |s: &Rc<Sensor>| s.celsius.get() > 90.0)
    .unwrap()
    .with_default(SensorState::Nominal)
    .unwrap();

    let tracker = Rc::new(RefCell::new(ObjectStateTracker::new(classifier)));

    let boiler = Sensor::shared(1, 22.5);
    tracker.borrow_mut().register([Rc::clone(&boiler)]).unwrap();
    boiler.subscribe(Rc::clone(&tracker) as SharedListener);

    println!("Registered {boiler} at 22.5 C");
    println!("  {}\n", tracker.borrow());

    // Each mutation publishes; the tracker refreshes itself.
    println!("Heating up to 95.0 C...");
    boiler.set_celsius(95.0);
    println!("Cooling down to 60.0 C...");
    boiler.set_celsius(60.0);
    println!("Reading lost...");
    boiler.set_celsius(f64::NAN);
    println!();

    println!("Final snapshot: {}", tracker.borrow());
    println!(
        "Trajectory of {boiler}: {}",
        tracker.borrow().trajectory_of(&boiler).unwrap()
    );

    println!("\n=== Demo Complete ===");
}
