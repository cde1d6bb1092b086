//! Integration tests for typed container cells

use stash_container::Container;
use stash_foundation::{ObjectRef, Rgba, Unit, Value, ValueKind, intern};

// =============================================================================
// Set and Get
// =============================================================================

#[test]
fn typed_values_round_trip() {
    let mut c = Container::new();
    c.set_bool("/cells/b", true);
    c.set_char("/cells/c", 0xfe);
    c.set_int32("/cells/i", -123_456);
    c.set_int64("/cells/l", -1_234_567_890_123);
    c.set_double("/cells/d", std::f64::consts::E);
    c.set_string("/cells/s", "Mud");
    c.set_boxed("/cells/color", Rgba::new(1.0, 0.5, 0.25, 1.0));

    assert!(c.get_bool("/cells/b"));
    assert_eq!(c.get_char("/cells/c"), 0xfe);
    assert_eq!(c.get_int32("/cells/i"), -123_456);
    assert_eq!(c.get_int64("/cells/l"), -1_234_567_890_123);
    assert_eq!(c.get_double("/cells/d"), std::f64::consts::E);
    assert_eq!(c.get_string("/cells/s"), "Mud");
    assert_eq!(
        c.get_boxed::<Rgba>("/cells/color"),
        &Rgba::new(1.0, 0.5, 0.25, 1.0)
    );
    assert_eq!(c.len(), 7);
}

#[test]
fn keys_and_strings_address_the_same_cell() {
    let mut c = Container::new();
    let key = intern("/cells/shared");
    c.set_int32(key, 5);
    assert_eq!(c.get_int32("/cells/shared"), 5);
    c.set_int32("/cells/shared", 6);
    assert_eq!(c.get_int32(key), 6);
    assert_eq!(c.len(), 1);
}

#[test]
fn setting_a_different_kind_replaces_the_cell() {
    let mut c = Container::new();
    c.set_int32("/cells/x", 1);
    c.set_string("/cells/x", "one");
    assert_eq!(c.value_kind("/cells/x"), Some(ValueKind::String));
    assert_eq!(c.len(), 1);
}

#[test]
fn gis_leaves_output_alone_when_missing_or_mistyped() {
    let mut c = Container::new();
    c.set_double("/cells/d", 2.5);

    let mut n = 17;
    assert!(!c.gis_int32("/cells/d", &mut n));
    assert!(!c.gis_int32("/cells/none", &mut n));
    assert_eq!(n, 17);

    let mut x = 0.0;
    assert!(c.gis_double("/cells/d", &mut x));
    assert_eq!(x, 2.5);
}

#[test]
#[should_panic(expected = "not int32")]
fn get_with_wrong_kind_panics() {
    let mut c = Container::new();
    c.set_bool("/cells/flag", false);
    let _ = c.get_int32("/cells/flag");
}

#[test]
#[should_panic(expected = "has no")]
fn get_missing_panics() {
    let c = Container::new();
    let _ = c.get_string("/cells/nowhere");
}

#[test]
fn contains_does_not_intern() {
    let c = Container::new();
    assert!(!c.contains("/cells/never/interned/anywhere"));
    assert!(stash_foundation::try_lookup("/cells/never/interned/anywhere").is_none());
}

// =============================================================================
// Objects
// =============================================================================

#[test]
fn set_object_shares_take_object_moves() {
    let unit = ObjectRef::new(Unit::new("m"));
    let mut c = Container::new();
    c.set_object("/obj/shared", &unit);
    assert_eq!(unit.ref_count(), 2);
    assert!(c.get_object("/obj/shared").ptr_eq(&unit));

    c.take_object("/obj/moved", ObjectRef::new(Unit::new("s")));
    assert_eq!(c.get_object("/obj/moved").ref_count(), 1);
}

#[test]
fn duplicate_is_deep() {
    let unit = ObjectRef::new(Unit::new("V"));
    let mut c = Container::new();
    c.set_object("/dup/unit", &unit);
    c.set_int32("/dup/n", 1);

    let copy = c.duplicate();
    assert_eq!(copy, c);
    assert!(!copy.get_object("/dup/unit").ptr_eq(&unit));
    assert_eq!(unit.ref_count(), 2);
}

#[test]
fn duplicate_by_prefix_selects_subtrees() {
    let mut c = Container::new();
    c.set_int32("/a/1", 1);
    c.set_int32("/a/2", 2);
    c.set_int32("/ab", 3);
    c.set_int32("/b/1", 4);

    let copy = c.duplicate_by_prefix(&["/a", "/b/1"]);
    let mut keys: Vec<String> = copy.keys_as_strings().iter().map(ToString::to_string).collect();
    keys.sort();
    assert_eq!(keys, vec!["/a/1", "/a/2", "/b/1"]);
}

#[test]
fn equality_ignores_order_and_compares_objects_by_value() {
    let mut a = Container::new();
    a.set_int32("/eq/n", 1);
    a.take_object("/eq/u", ObjectRef::new(Unit::new("K")));

    let mut b = Container::new();
    b.take_object("/eq/u", ObjectRef::new(Unit::new("K")));
    b.set_int32("/eq/n", 1);
    assert_eq!(a, b);

    b.set_value("/eq/n", Value::Int64(1));
    assert_ne!(a, b);
}

// =============================================================================
// Enumeration
// =============================================================================

#[test]
fn foreach_restricts_to_prefix() {
    let mut c = Container::new();
    c.set_int32("/walk/a", 1);
    c.set_int32("/walk/b", 2);
    c.set_int32("/walkers", 3);
    c.set_int32("/other", 4);

    let mut seen = Vec::new();
    c.foreach(Some("/walk"), |key, value| {
        seen.push((key.name().to_string(), value.as_int32()));
    });
    assert_eq!(
        seen,
        vec![
            ("/walk/a".to_string(), Some(1)),
            ("/walk/b".to_string(), Some(2)),
        ]
    );

    let mut all = 0;
    c.foreach(None, |_, _| all += 1);
    assert_eq!(all, 4);
}
