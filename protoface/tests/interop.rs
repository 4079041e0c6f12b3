//! Wire compatibility of facades with hand-encoded bytes and plain prost messages.

mod schema;

use prost::Message;
use proptest::prelude::*;
use proptest::property_test;
use protoface::Facade;
use schema::{pb, test, Sibling, Test, TestEnum};

/// Reference encodings, one per field kind.
///
/// Keys are `(field_number << 3) | wire_type`.
#[test]
fn test_reference_bytes_per_field_kind() {
    let cases: Vec<(Test, Vec<u8>)> = vec![
        (Test::new().with_field(123), vec![0x08, 0x7b]),
        (
            Test::new().with_field(-1),
            vec![0x08, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01],
        ),
        (Test::new().with_optional_field(123), vec![0x10, 0x7b]),
        (Test::new().with_enum_field(TestEnum::One), vec![0x18, 0x01]),
        (Test::new().with_int_variant(123), vec![0x20, 0x7b]),
        (
            Test::new().with_string_variant("hi"),
            vec![0x2a, 0x02, b'h', b'i'],
        ),
        (
            Test::new().with_sibling(Sibling::new().with_field(123)),
            vec![0x32, 0x02, 0x08, 0x7b],
        ),
        (
            Test::new().with_nested(test::Nested::new().with_field(123)),
            vec![0x3a, 0x02, 0x08, 0x7b],
        ),
        (
            Test::new().with_repeated_field([1, 2, 3]),
            vec![0x42, 0x03, 0x01, 0x02, 0x03],
        ),
    ];

    for (message, expected) in cases {
        assert_eq!(message.serialize(), expected, "{message:?}");
        assert_eq!(message.encoded_len(), expected.len());

        let parsed = Test::parse(&expected[..]).unwrap();
        assert_eq!(parsed, message);
    }
}

#[test]
fn test_full_message_matches_prost() {
    let message = Test::new()
        .with_field(1)
        .with_optional_field(2)
        .with_enum_field(TestEnum::Two)
        .with_string_variant("x")
        .with_sibling(Sibling::new().with_field(6))
        .with_nested(test::Nested::new().with_field(7))
        .with_repeated_field([8, 9]);

    let reference = pb::Test {
        field: 1,
        optional_field: Some(2),
        enum_field: TestEnum::Two as i32,
        variant: Some(pb::test::Variant::StringVariant("x".to_string())),
        sibling: Some(pb::Sibling { field: 6 }),
        nested: Some(pb::test::Nested { field: 7 }),
        repeated_field: vec![8, 9],
    };

    assert_eq!(message.serialize(), reference.encode_to_vec());
    assert_eq!(message.to_storage(), reference);

    #[rustfmt::skip]
    let expected = [
        0x08, 0x01,
        0x10, 0x02,
        0x18, 0x02,
        0x2a, 0x01, b'x',
        0x32, 0x02, 0x08, 0x06,
        0x3a, 0x02, 0x08, 0x07,
        0x42, 0x02, 0x08, 0x09,
    ];
    assert_eq!(message.serialize(), expected);
}

#[test]
fn test_parses_unpacked_repeated() {
    let message = Test::parse(&[0x40, 0x01, 0x40, 0x02][..]).unwrap();
    assert_eq!(message.repeated_field(), [1, 2]);
    // Re-encoded packed.
    assert_eq!(message.serialize(), [0x42, 0x02, 0x01, 0x02]);
}

#[test]
fn test_last_oneof_case_on_wire_wins() {
    let message = Test::parse(&[0x20, 0x01, 0x2a, 0x01, b'a'][..]).unwrap();
    assert_eq!(message.int_variant(), None);
    assert_eq!(message.string_variant().as_deref(), Some("a"));
}

#[test]
fn test_enum_roundtrips_every_value() {
    for value in [TestEnum::Unspecified, TestEnum::One, TestEnum::Two] {
        let message = Test::new().with_enum_field(value);
        let parsed = Test::parse(&message.serialize()[..]).unwrap();

        assert_eq!(parsed.enum_field(), Ok(value));
        assert_eq!(parsed.enum_field_raw(), value as i32);
    }
}

#[property_test]
fn proptest_scalar_roundtrip(value: i64) {
    let message = Test::new().with_field(value);
    let parsed = Test::parse(&message.serialize()[..]).unwrap();
    prop_assert_eq!(parsed.field(), value);

    let reference = pb::Test {
        field: value,
        ..Default::default()
    };
    prop_assert_eq!(message.serialize(), reference.encode_to_vec());
}

#[property_test]
fn proptest_optional_roundtrip(value: Option<i64>) {
    let message = Test::new();
    if let Some(value) = value {
        message.set_optional_field(value);
    }

    let parsed = Test::parse(&message.serialize()[..]).unwrap();
    prop_assert_eq!(parsed.optional_field(), value);
}

#[property_test]
fn proptest_repeated_roundtrip(values: Vec<i64>) {
    let message = Test::new().with_repeated_field(values.clone());
    let parsed = Test::parse(&message.serialize()[..]).unwrap();
    prop_assert_eq!(parsed.repeated_field().to_vec(), values.clone());

    let reference = pb::Test {
        repeated_field: values,
        ..Default::default()
    };
    prop_assert_eq!(message.serialize(), reference.encode_to_vec());
}

#[property_test]
fn proptest_oneof_last_write_wins(first: i64, second: String) {
    let message = Test::new().with_int_variant(first);
    message.set_string_variant(second.clone());

    prop_assert_eq!(message.int_variant(), None);
    prop_assert_eq!(message.string_variant(), Some(second.clone()));

    let parsed = Test::parse(&message.serialize()[..]).unwrap();
    prop_assert_eq!(parsed.variant(), Some(pb::test::Variant::StringVariant(second)));
}

#[property_test]
fn proptest_oneof_match_selects_set_case(value: i64) {
    let message = Test::new().with_int_variant(value);
    let parsed = Test::parse(&message.serialize()[..]).unwrap();

    match parsed.variant() {
        Some(pb::test::Variant::IntVariant(found)) => prop_assert_eq!(found, value),
        Some(pb::test::Variant::StringVariant(found)) => {
            prop_assert!(false, "matched string case {found:?} while int case is set")
        }
        None => prop_assert!(false, "no case matched while int case is set"),
    }

    parsed.clear_variant();
    prop_assert_eq!(parsed.variant(), None);
    prop_assert_eq!(parsed.int_variant(), None);
}
