//! Integration tests for the binary object format

use stash_codec::{CodecConfig, builtin_registry, encode_record, from_bytes, from_bytes_with, read_from, to_bytes};
use stash_container::Container;
use stash_foundation::{DeserializeErrorCode, ErrorDomain, ItemValue, ObjectRef, Record, Rgba, Unit};
use stash_intset::IntSet;

fn sample() -> Container {
    let mut c = Container::new();
    c.set_char("/bin/char", 0xfe);
    c.set_bool("/bin/bool", true);
    c.set_int32("/bin/int32", -123_456);
    c.set_int64("/bin/int64", -1_234_567_890);
    c.set_string("/bin/string", "Mud");
    c.set_double("/bin/double", std::f64::consts::E);
    c.take_object("/bin/unit", ObjectRef::new(Unit::new("uPa")));
    c
}

// =============================================================================
// Round Trips
// =============================================================================

#[test]
fn container_round_trip() {
    let original = sample();
    let bytes = to_bytes(&original);
    let decoded = from_bytes(&bytes, &builtin_registry()).unwrap();

    assert_eq!(decoded.consumed, bytes.len());
    assert!(decoded.warnings.is_empty());
    let back = decoded.object.downcast_ref::<Container>().unwrap();
    assert_eq!(back, &original);
    assert_eq!(back.get_char("/bin/char"), 0xfe);
    assert_eq!(back.get_double("/bin/double"), std::f64::consts::E);
    assert_eq!(
        back.get_object("/bin/unit").downcast_ref::<Unit>(),
        Some(&Unit::new("uPa"))
    );
}

#[test]
fn nested_containers_and_sets() {
    let mut inner = Container::new();
    inner.take_object("/set", ObjectRef::new(IntSet::from_values(&[1, 2, 3, 9])));
    inner.set_boxed("/color", Rgba::new(0.25, 0.5, 0.75, 1.0));
    let mut outer = Container::new();
    outer.take_object("/inner", ObjectRef::new(inner));

    let bytes = to_bytes(&outer);
    let decoded = from_bytes(&bytes, &builtin_registry()).unwrap();
    let back = decoded.object.downcast_ref::<Container>().unwrap();
    let inner = back.get_object("/inner").downcast_ref::<Container>().unwrap();
    let set = inner.get_object("/set").downcast_ref::<IntSet>().unwrap();
    assert_eq!(set.values(), vec![1, 2, 3, 9]);
    assert_eq!(inner.get_boxed::<Rgba>("/color").b, 0.75);
}

#[test]
fn stream_reads_one_object_at_a_time() {
    let mut stream = to_bytes(&sample());
    stream.extend(to_bytes(&IntSet::from_values(&[5])));
    let mut reader = stream.as_slice();

    let registry = builtin_registry();
    let first = read_from(&mut reader, &registry, &CodecConfig::default()).unwrap();
    assert!(first.object.downcast_ref::<Container>().is_some());
    let second = read_from(&mut reader, &registry, &CodecConfig::default()).unwrap();
    assert_eq!(second.object.type_name(), "GwyIntSet");
    assert!(reader.is_empty());

    let err = read_from(&mut reader, &registry, &CodecConfig::default()).unwrap_err();
    assert_eq!(err.domain(), ErrorDomain::Deserialize);
}

// =============================================================================
// Rejected Data
// =============================================================================

fn intset_bytes(bounds: Vec<i32>) -> Vec<u8> {
    encode_record(&Record::new("GwyIntSet").with_item("ranges", ItemValue::Int32Array(bounds)))
}

#[test]
fn odd_length_intset_is_rejected() {
    let errors = from_bytes(&intset_bytes(vec![1, 2, 3]), &builtin_registry()).unwrap_err();
    assert!(errors.contains(DeserializeErrorCode::Invalid));
    assert!(errors
        .iter()
        .any(|e| e.message == "Integer set ranges length 3 is not a multiple of 2."));
}

#[test]
fn non_canonical_intset_is_rejected() {
    for bounds in [vec![5, 1], vec![1, 3, 2, 4], vec![1, 2, 3, 4]] {
        let errors = from_bytes(&intset_bytes(bounds), &builtin_registry()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.message == "Integer set ranges are not in canonical form."));
    }
}

/// `GwyIntSet` holding the touching ranges `[0,0] [1,1] [2,2] [3,3]`,
/// written out byte by byte.
const TOUCHING_RANGES: &[u8] = &[
    b'G', b'w', b'y', b'I', b'n', b't', b'S', b'e', b't', 0, // type name
    48, 0, 0, 0, 0, 0, 0, 0, // item list size
    b'r', b'a', b'n', b'g', b'e', b's', 0, // item name
    b'I', // int32 array tag
    8, 0, 0, 0, 0, 0, 0, 0, // element count
    0, 0, 0, 0, 0, 0, 0, 0, // [0, 0]
    1, 0, 0, 0, 1, 0, 0, 0, // [1, 1]
    2, 0, 0, 0, 2, 0, 0, 0, // [2, 2]
    3, 0, 0, 0, 3, 0, 0, 0, // [3, 3]
];

#[test]
fn touching_ranges_are_rejected() {
    assert_eq!(TOUCHING_RANGES, intset_bytes(vec![0, 0, 1, 1, 2, 2, 3, 3]).as_slice());
    let errors = from_bytes(TOUCHING_RANGES, &builtin_registry()).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.as_slice()[0].code, DeserializeErrorCode::Invalid);
    assert_eq!(
        errors.as_slice()[0].message,
        "Integer set ranges are not in canonical form."
    );
}

#[test]
fn every_bad_nested_set_is_reported() {
    let record = Record::new("GwyContainer")
        .with_item(
            "/a",
            ItemValue::Object(Record::new("GwyIntSet").with_item("ranges", ItemValue::Int32Array(vec![1, 2, 3]))),
        )
        .with_item("/n", ItemValue::Int32(5))
        .with_item(
            "/b",
            ItemValue::Object(Record::new("GwyIntSet").with_item("ranges", ItemValue::Int32Array(vec![5, 1]))),
        );

    let errors = from_bytes(&encode_record(&record), &builtin_registry()).unwrap_err();
    let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Integer set ranges length 3 is not a multiple of 2.",
            "Integer set ranges are not in canonical form.",
        ]
    );
}

#[test]
fn canonical_intset_is_accepted() {
    let decoded = from_bytes(&intset_bytes(vec![1, 3, 7, 7]), &builtin_registry()).unwrap();
    let set = decoded.object.downcast_ref::<IntSet>().unwrap();
    assert_eq!(set, &IntSet::from_values(&[3, 1, 2, 7]));
}

#[test]
fn truncated_data_never_yields_an_object() {
    let bytes = to_bytes(&sample());
    let registry = builtin_registry();
    for len in 0..bytes.len() {
        let errors = from_bytes(&bytes[..len], &registry).unwrap_err();
        assert!(errors.has_fatal(), "prefix of {len} bytes");
    }
}

#[test]
fn trailing_bytes_depend_on_config() {
    let mut bytes = to_bytes(&IntSet::from_values(&[4]));
    let size = bytes.len();
    bytes.extend_from_slice(b"junk");
    let registry = builtin_registry();

    let errors = from_bytes(&bytes, &registry).unwrap_err();
    assert!(errors.contains(DeserializeErrorCode::Padding));

    let decoded = from_bytes_with(&bytes, &registry, &CodecConfig::lenient()).unwrap();
    assert_eq!(decoded.consumed, size);
}

#[test]
fn unknown_items_are_warnings() {
    let record = Record::new("GwySIUnit")
        .with_item("unitstr", ItemValue::String("A".into()))
        .with_item("bogus", ItemValue::Int32(1));
    let decoded = from_bytes(&encode_record(&record), &builtin_registry()).unwrap();
    assert!(decoded.warnings.contains(DeserializeErrorCode::Item));
    assert_eq!(decoded.object.downcast_ref::<Unit>(), Some(&Unit::new("A")));
}
