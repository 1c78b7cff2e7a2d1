//! Conference Registration Tracking
//!
//! This demo walks three conference registrations through their lifecycle
//! and aggregates the resulting trajectories into a transition summary.
//!
//! Key concepts:
//! - Declaring a state universe with `state_enum!`
//! - Ordered, overlapping classification rules with a fallback state
//! - Change-driven refresh and trajectory compaction
//! - Aggregating trajectories into start/end/edge counts
//!
//! Run with: cargo run --example conference_registration

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use trackway::classifier::StateClassifier;
use trackway::state_enum;
use trackway::summary::TransitionSummary;
use trackway::tracker::ObjectStateTracker;

state_enum! {
    pub enum RegistrationState {
        Started,
        Filled,
        Validated,
        Payed,
        Finished,
        Rejected,
    }
}

const UNIVERSE: [RegistrationState; 6] = [
    RegistrationState::Started,
    RegistrationState::Filled,
    RegistrationState::Validated,
    RegistrationState::Payed,
    RegistrationState::Finished,
    RegistrationState::Rejected,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RegistrationKind {
    Full,
    Member,
    Student,
}

impl RegistrationKind {
    fn price(self) -> u32 {
        match self {
            Self::Full => 1100,
            Self::Member => 900,
            Self::Student => 450,
        }
    }
}

// Registration identity is the attendee name; mutable fields use interior
// mutability so the tracker and the caller can share handles.
struct Registration {
    name: String,
    kind: RegistrationKind,
    affiliation: RefCell<Option<String>>,
    amount_paid: Cell<u32>,
    validated: Cell<bool>,
}

impl Registration {
    fn shared(name: &str, kind: RegistrationKind) -> Rc<Self> {
        Rc::new(Registration {
            name: name.to_string(),
            kind,
            affiliation: RefCell::new(None),
            amount_paid: Cell::new(0),
            validated: Cell::new(false),
        })
    }

    fn pay(&self, amount: u32) {
        self.amount_paid.set(self.amount_paid.get() + amount);
    }

    fn set_affiliation(&self, affiliation: &str) {
        *self.affiliation.borrow_mut() = Some(affiliation.to_string());
    }

    fn set_validated(&self, validated: bool) {
        self.validated.set(validated);
    }

    fn total(&self) -> u32 {
        self.kind.price()
    }
}

impl PartialEq for Registration {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Display for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reg. of: {}", self.name)
    }
}

fn main() {
    env_logger::init();

    println!("=== Conference Registration Tracking ===\n");

    let classifier = StateClassifier::new(UNIVERSE)
        .with_rule(RegistrationState::Payed, |r: &Rc<Registration>| {
            r.amount_paid.get() == r.total() && !r.validated.get()
        })
        .unwrap()
        .with_rule(RegistrationState::Started, |r: &Rc<Registration>| {
            r.affiliation.borrow().is_none() && !r.validated.get()
        })
        .unwrap()
        .with_rule(RegistrationState::Filled, |r: &Rc<Registration>| {
            r.affiliation.borrow().is_some() && !r.validated.get()
        })
        .unwrap()
        .with_rule(RegistrationState::Validated, |r: &Rc<Registration>| {
            r.amount_paid.get() == 0 && r.validated.get()
        })
        .unwrap()
        .with_rule(RegistrationState::Finished, |r: &Rc<Registration>| {
            r.amount_paid.get() == r.total() && r.validated.get()
        })
        .unwrap()
        .with_default(RegistrationState::Rejected)
        .unwrap();

    let mut tracker = ObjectStateTracker::new(classifier);

    let ann = Registration::shared("Ann Smith", RegistrationKind::Full);
    let john = Registration::shared("John Doe", RegistrationKind::Student);
    let lisa = Registration::shared("Lisa Martin", RegistrationKind::Member);
    tracker
        .register([Rc::clone(&ann), Rc::clone(&john), Rc::clone(&lisa)])
        .unwrap();

    println!("After registration:");
    println!("  {tracker}\n");

    // Ann fills in her affiliation, John pays his fee in full.
    ann.set_affiliation("University of Miskatonic");
    john.pay(RegistrationKind::Student.price());
    tracker.refresh();

    // Lisa gets validated first, then pays.
    lisa.set_validated(true);
    tracker.refresh();
    lisa.pay(RegistrationKind::Member.price());
    tracker.refresh();

    println!("After updates:");
    println!("  {tracker}\n");

    println!("Trajectories:");
    for registration in &tracker {
        let trajectory = tracker.trajectory_of(registration).unwrap();
        println!("  {registration}: {trajectory}");
    }
    println!();

    let mut summary = TransitionSummary::new(UNIVERSE);
    for registration in &tracker {
        summary.add(tracker.trajectory_of(registration).unwrap()).unwrap();
    }

    println!("Transition summary:");
    println!("{summary}");

    println!("\n=== Demo Complete ===");
}
