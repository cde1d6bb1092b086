//! Randomized operation sequences checked against a `HashSet` oracle

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use stash_intset::{IntSet, IntSetEvent};

const SEQUENCES: u64 = 50;
const OPERATIONS: usize = 1200;

#[test]
fn random_add_remove_toggle_matches_oracle() {
    for seed in 0..SEQUENCES {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let span = rng.gen_range(4..200);

        let mut set = IntSet::new();
        let mut oracle: HashSet<i32> = HashSet::new();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        set.connect(move |_, event| sink.borrow_mut().push(event));

        for step in 0..OPERATIONS {
            let v = rng.gen_range(-span..span);
            let before = events.borrow().len();
            let expected = match rng.gen_range(0..3) {
                0 => {
                    let changed = set.add(v);
                    assert_eq!(changed, oracle.insert(v), "seed {seed} step {step} add {v}");
                    changed.then_some(IntSetEvent::Added(v))
                }
                1 => {
                    let changed = set.remove(v);
                    assert_eq!(changed, oracle.remove(&v), "seed {seed} step {step} remove {v}");
                    changed.then_some(IntSetEvent::Removed(v))
                }
                _ => {
                    let present = set.toggle(v);
                    let oracle_present = if oracle.remove(&v) {
                        false
                    } else {
                        oracle.insert(v);
                        true
                    };
                    assert_eq!(present, oracle_present, "seed {seed} step {step} toggle {v}");
                    Some(if present {
                        IntSetEvent::Added(v)
                    } else {
                        IntSetEvent::Removed(v)
                    })
                }
            };

            let emitted: Vec<IntSetEvent> = events.borrow()[before..].to_vec();
            assert_eq!(emitted, expected.into_iter().collect::<Vec<_>>(), "seed {seed} step {step}");
            assert_eq!(set.len(), oracle.len(), "seed {seed} step {step}");
            assert_eq!(set.contains(v), oracle.contains(&v), "seed {seed} step {step}");
        }

        let mut expected: Vec<i32> = oracle.into_iter().collect();
        expected.sort_unstable();
        assert_eq!(set.values(), expected, "seed {seed}");
        assert_eq!(set, IntSet::from_values(&expected), "seed {seed}");
    }
}

#[test]
fn random_updates_reach_target() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
    let mut set = IntSet::new();
    let mirror = Rc::new(RefCell::new(HashSet::new()));
    let sink = Rc::clone(&mirror);
    set.connect(move |_, event| match event {
        IntSetEvent::Added(v) => assert!(sink.borrow_mut().insert(v)),
        IntSetEvent::Removed(v) => assert!(sink.borrow_mut().remove(&v)),
        IntSetEvent::Assigned => panic!("update must not assign"),
    });

    for _ in 0..200 {
        let target: Vec<i32> = (0..rng.gen_range(0..40)).map(|_| rng.gen_range(-50..50)).collect();
        set.update(&target);
        let expected: HashSet<i32> = target.iter().copied().collect();
        assert_eq!(*mirror.borrow(), expected);
        assert_eq!(set, IntSet::from_values(&target));
    }
}
