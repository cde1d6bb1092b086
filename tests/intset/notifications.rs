//! Integration tests for integer set change notification

use std::cell::RefCell;
use std::rc::Rc;

use stash_intset::{IntSet, IntSetEvent};

fn recorder(set: &mut IntSet) -> Rc<RefCell<Vec<IntSetEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    set.connect(move |_, event| sink.borrow_mut().push(event));
    events
}

#[test]
fn assign_emits_one_event() {
    let mut set = IntSet::from_values(&[1, 2, 3]);
    let events = recorder(&mut set);
    set.assign(&IntSet::from_values(&[2, 3, 4, 5]));
    assert_eq!(*events.borrow(), vec![IntSetEvent::Assigned]);
}

#[test]
fn assign_identical_content_still_emits() {
    let mut set = IntSet::from_values(&[1, 2, 3]);
    let events = recorder(&mut set);
    let same = set.clone();
    set.assign(&same);
    assert_eq!(*events.borrow(), vec![IntSetEvent::Assigned]);
}

#[test]
fn update_emits_granular_events() {
    let mut set = IntSet::from_values(&[1, 2, 3]);
    let events = recorder(&mut set);
    set.update(&[2, 3, 4, 5]);
    assert_eq!(
        *events.borrow(),
        vec![
            IntSetEvent::Removed(1),
            IntSetEvent::Added(4),
            IntSetEvent::Added(5),
        ]
    );
    assert!(!events.borrow().contains(&IntSetEvent::Assigned));
}

#[test]
fn update_to_same_content_is_silent() {
    let mut set = IntSet::from_values(&[1, 5, 6]);
    let events = recorder(&mut set);
    set.update(&[6, 5, 1, 1]);
    assert!(events.borrow().is_empty());
}

#[test]
fn fill_emits_one_event() {
    let mut set = IntSet::new();
    let events = recorder(&mut set);
    set.fill(&[4, 2, 3]);
    assert_eq!(*events.borrow(), vec![IntSetEvent::Assigned]);
    assert_eq!(set.values(), vec![2, 3, 4]);
}

#[test]
fn handlers_observe_consistent_state_during_update() {
    let mut set = IntSet::from_values(&[1, 2, 3]);
    let checks = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&checks);
    set.connect(move |set, event| {
        let consistent = match event {
            IntSetEvent::Added(v) => set.contains(v),
            IntSetEvent::Removed(v) => !set.contains(v),
            IntSetEvent::Assigned => true,
        };
        sink.borrow_mut().push(consistent);
    });
    set.update(&[3, 10, 11, -1]);
    assert_eq!(checks.borrow().len(), 5);
    assert!(checks.borrow().iter().all(|&ok| ok));
}

#[test]
fn every_subscriber_is_called() {
    let mut set = IntSet::new();
    let first = recorder(&mut set);
    let second = recorder(&mut set);
    set.add(1);
    assert_eq!(*first.borrow(), vec![IntSetEvent::Added(1)]);
    assert_eq!(*second.borrow(), vec![IntSetEvent::Added(1)]);
}
