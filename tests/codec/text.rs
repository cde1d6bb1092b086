//! Integration tests for the text container dump

use std::cell::Cell;
use std::rc::Rc;

use stash_codec::{builtin_registry, from_text, load_text_into, to_text};
use stash_container::{Container, Watch};
use stash_foundation::{ErrorDomain, ObjectRef, Rgba, Unit};
use stash_intset::IntSet;

fn sample() -> Container {
    let mut c = Container::new();
    c.set_bool("/txt/bool", false);
    c.set_char("/txt/char", b'\'');
    c.set_int32("/txt/int32", -7);
    c.set_int64("/txt/int64", 1 << 40);
    c.set_double("/txt/double", 1e-9);
    c.set_double("/txt/whole", 3.0);
    c.set_string("/txt/string", "tab\there \"quoted\"\n");
    c.set_boxed("/txt/color", Rgba::new(1.0, 0.0, 0.0, 0.5));
    c.take_object("/txt/unit", ObjectRef::new(Unit::new("m")));
    c.take_object("/txt/set", ObjectRef::new(IntSet::from_values(&[-3, 4, 5])));
    c
}

#[test]
fn dump_and_parse_round_trip() {
    let original = sample();
    let text = to_text(&original);
    assert_eq!(text.lines().count(), original.len());
    assert!(text.contains("\"/txt/int64\" 1099511627776q\n"));
    assert!(text.contains("\"/txt/whole\" 3.0\n"));
    assert!(text.contains("\"/txt/bool\" False\n"));

    let back = from_text(&text, &builtin_registry()).unwrap();
    assert_eq!(back, original);
}

#[test]
fn reloading_identical_text_notifies_nobody() {
    let text = to_text(&sample());
    let registry = builtin_registry();
    let mut c = Container::new();

    let count = Rc::new(Cell::new(0));
    let sink = Rc::clone(&count);
    c.connect(Watch::All, move |_, _| sink.set(sink.get() + 1));

    assert_eq!(load_text_into(&mut c, &text, &registry).unwrap(), 10);
    assert_eq!(count.get(), 10);

    assert_eq!(load_text_into(&mut c, &text, &registry).unwrap(), 0);
    assert_eq!(count.get(), 10);
}

#[test]
fn comments_and_blank_lines_are_skipped() {
    let text = "# header\n\n\"/a\" 1\n   \n\"/b\" 2.5\n";
    let c = from_text(text, &builtin_registry()).unwrap();
    assert_eq!(c.len(), 2);
    assert_eq!(c.get_int32("/a"), 1);
    assert_eq!(c.get_double("/b"), 2.5);
}

#[test]
fn bad_line_reports_its_number_and_loads_nothing() {
    let text = "\"/ok\" 1\n\"/bad\" ???\n";
    let mut c = Container::new();
    let err = load_text_into(&mut c, text, &builtin_registry()).unwrap_err();
    assert_eq!(err.domain(), ErrorDomain::Text);
    assert!(err.to_string().contains("line 2"));
    assert!(c.is_empty());
}
