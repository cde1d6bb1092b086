//! Integration tests for integer set operations

use stash_intset::{IntRange, IntSet, IntSetIter, RangesError};

// =============================================================================
// Canonical Form
// =============================================================================

#[test]
fn canonicalizes_unsorted_input() {
    let set = IntSet::from_values(&[3, 1, 2, 7]);
    assert_eq!(set.ranges(), &[IntRange::new(1, 3), IntRange::new(7, 7)]);
    assert_eq!(set.to_flat(), vec![1, 3, 7, 7]);
}

#[test]
fn ranges_merge_as_gaps_close() {
    let mut set = IntSet::new();
    for v in [10, 12, 14, 11, 13] {
        set.add(v);
    }
    assert_eq!(set.ranges(), &[IntRange::new(10, 14)]);
    set.remove(12);
    assert_eq!(set.ranges(), &[IntRange::new(10, 11), IntRange::new(13, 14)]);
}

#[test]
fn full_range_length() {
    let set = IntSet::from_ranges(vec![IntRange::new(i32::MIN, i32::MAX)]).unwrap();
    assert_eq!(set.ranges()[0].len(), 1 << 32);
    assert!(set.contains(0));
    assert!(set.contains(i32::MIN));
    assert!(set.contains(i32::MAX));
}

#[test]
fn invalid_range_lists() {
    assert_eq!(IntSet::from_flat(&[1, 2, 3]), Err(RangesError::OddLength(3)));
    assert_eq!(IntSet::from_flat(&[5, 1]), Err(RangesError::NotCanonical));
    assert_eq!(IntSet::from_flat(&[1, 2, 3, 4]), Err(RangesError::NotCanonical));
    assert!(IntSet::from_flat(&[1, 2, 4, 5]).is_ok());
}

// =============================================================================
// Iteration
// =============================================================================

#[test]
fn iteration_protocols_agree() {
    let set: IntSet = [9, 1, 2, 3, -4].into_iter().collect();

    let mut cursor = IntSetIter::default();
    let mut stepped = Vec::new();
    let mut more = set.first(&mut cursor);
    while more {
        stepped.push(cursor.value);
        more = set.next(&mut cursor);
    }

    let mut visited = Vec::new();
    set.foreach(|v| visited.push(v));

    assert_eq!(stepped, set.values());
    assert_eq!(visited, set.values());
    assert_eq!(set.iter().collect::<Vec<_>>(), vec![-4, 1, 2, 3, 9]);
}

#[test]
fn debug_shows_ranges() {
    let set = IntSet::from_values(&[1, 2, 3, 7]);
    assert_eq!(format!("{set:?}"), "IntSet[1..=3, 7]");
}

// =============================================================================
// Properties
// =============================================================================

mod properties {
    use proptest::prelude::*;
    use stash_intset::IntSet;

    proptest! {
        #[test]
        fn values_are_sorted_and_unique(values in prop::collection::vec(-500i32..500, 0..200)) {
            let set = IntSet::from_values(&values);
            let mut expected = values.clone();
            expected.sort_unstable();
            expected.dedup();
            prop_assert_eq!(set.values(), expected.clone());
            prop_assert_eq!(set.len(), expected.len());
            prop_assert_eq!(IntSet::from_flat(&set.to_flat()), Ok(set));
        }
    }
}
