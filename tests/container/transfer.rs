//! Integration tests for container transfer

use std::cell::Cell;
use std::rc::Rc;

use stash_container::{Container, Watch, transfer};
use stash_foundation::{ObjectRef, Unit};

fn populated() -> Container {
    let mut c = Container::new();
    c.set_int32("/pfx/a", 1);
    c.set_double("/pfx/b", 2.0);
    c.set_string("/pfx/c/d", "three");
    c.set_bool("/pfx/c/e", true);
    c.take_object("/pfx/unit", ObjectRef::new(Unit::new("mm")));
    c
}

#[test]
fn transfer_within_doubles_the_cells() {
    let mut c = populated();
    let count = Rc::new(Cell::new(0));
    let sink = Rc::clone(&count);
    c.connect(Watch::prefix("/elsewhere"), move |_, _| sink.set(sink.get() + 1));

    assert_eq!(c.transfer_within("/pfx", "/elsewhere", true, true), 5);
    assert_eq!(c.len(), 10);
    assert_eq!(count.get(), 5);
    assert_eq!(c.get_string("/elsewhere/c/d"), "three");
    assert!(!c
        .get_object("/elsewhere/unit")
        .ptr_eq(c.get_object("/pfx/unit")));
}

#[test]
fn transfer_between_containers() {
    let source = populated();
    let mut dest = Container::new();
    assert_eq!(transfer(&source, &mut dest, "/pfx/c", "/copy", false, false), 2);
    assert_eq!(dest.get_string("/copy/d"), "three");
    assert!(dest.get_bool("/copy/e"));
    assert_eq!(source.len(), 5);
}

#[test]
fn shallow_transfer_shares_objects() {
    let source = populated();
    let mut shallow = Container::new();
    let mut deep = Container::new();
    shallow.transfer_from(&source, "/pfx", "/s", false, false);
    deep.transfer_from(&source, "/pfx", "/d", false, true);

    let original = source.get_object("/pfx/unit");
    assert_eq!(original.ref_count(), 2);
    assert!(shallow.get_object("/s/unit").ptr_eq(original));
    assert_eq!(deep.get_object("/d/unit").ref_count(), 1);

    let mut two = Container::new();
    two.transfer_from(&source, "/pfx", "/t", false, false);
    assert_eq!(original.ref_count(), 3);
}

#[test]
fn keep_existing_protects_destination() {
    let source = populated();
    let mut dest = Container::new();
    dest.set_int32("/x/a", 100);
    let changed = dest.transfer_from(&source, "/pfx", "/x", true, false);
    assert_eq!(changed, 4);
    assert_eq!(dest.get_int32("/x/a"), 100);

    let changed = dest.transfer_from(&source, "/pfx", "/x", false, false);
    assert_eq!(changed, 1);
    assert_eq!(dest.get_int32("/x/a"), 1);
}

#[test]
fn overlapping_prefixes_copy_only_existing_cells() {
    let mut c = Container::new();
    c.set_int32("/o/a", 1);
    c.set_int32("/o/b", 2);
    assert_eq!(c.transfer_within("/o", "/o/o", false, false), 2);
    assert_eq!(c.len(), 4);
    assert_eq!(c.get_int32("/o/o/a"), 1);
    assert!(!c.contains("/o/o/o/a"));
}
