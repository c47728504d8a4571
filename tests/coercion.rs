use json_endpointer::{ErrorKind, JsonEndpoint};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use std::str::FromStr;

fn document() -> Value {
    json!({
        "name": "test_json",
        "testType": {
            "value_byte": 123,
            "value_sbyte_less_zero": -123,
            "value_byte_string": "123",
            "value_sbyte_string_less_zero": "-123",
            "value_int": 1234,
            "value_int_less_zero": -1234,
            "value_int_string": "1234",
            "value_int_string_less_zero": "-1234",
            "value_int_0": 0,
            "value_decimal": 1234.567,
            "value_decimal_less_zero": -1234.567,
            "value_bool_false": false,
            "value_bool_false_string": "false",
            "value_bool_true": true,
            "value_bool_true_string": "true",
            "value_array_int": [1, 2, 3],
            "value_int32": 123456,
            "value_int32_less_zero": -123456,
            "value_int64": 3147483647i64,
            "value_int64_less_zero": -3147483647i64,
            "obj": {
                "name": "TestObj",
                "value": 123
            }
        }
    })
}

fn kind<T: std::fmt::Debug>(r: json_endpointer::Result<T>) -> ErrorKind {
    r.unwrap_err().kind()
}

#[test]
fn test_to_string() {
    let doc = document();
    assert_eq!(doc.get_key_to_string("name2").unwrap(), None);
    assert_eq!(doc.get_key_to_string("testType.value_array_int").unwrap(), None);
    assert_eq!(doc.get_key_to_string("testType.obj").unwrap(), None);
    assert_eq!(doc.get_key_to_string("name").unwrap().as_deref(), Some("test_json"));
    assert_eq!(doc.get_key_to_string("testType.value_int").unwrap().as_deref(), Some("1234"));
    assert_eq!(
        doc.get_key_to_string("testType.value_decimal").unwrap().as_deref(),
        Some("1234.567")
    );
    assert_eq!(
        doc.get_key_to_string("testType.value_int_less_zero").unwrap().as_deref(),
        Some("-1234")
    );
    assert_eq!(
        doc.get_key_to_string("testType.value_decimal_less_zero").unwrap().as_deref(),
        Some("-1234.567")
    );
    assert_eq!(
        doc.get_key_to_string("testType.value_bool_false").unwrap().as_deref(),
        Some("false")
    );
    assert_eq!(
        doc.get_key_to_string("testType.value_bool_true").unwrap().as_deref(),
        Some("true")
    );
}

#[test]
fn test_to_string_expands_exponents() {
    let doc: Value = serde_json::from_str(r#"{"big":1e21,"tiny":0.0000001,"thou":1e3}"#).unwrap();
    assert_eq!(
        doc.get_key_to_string("big").unwrap().as_deref(),
        Some("1000000000000000000000")
    );
    assert_eq!(doc.get_key_to_string("tiny").unwrap().as_deref(), Some("0.0000001"));
    assert_eq!(doc.get_key_to_string("thou").unwrap().as_deref(), Some("1000"));
}

#[test]
fn test_to_bool() {
    let doc = document();
    assert_eq!(kind(doc.get_key_to_bool("name2")), ErrorKind::FormatConversion);
    assert_eq!(kind(doc.get_key_to_bool("testType.value_array_int")), ErrorKind::FormatConversion);
    assert_eq!(kind(doc.get_key_to_bool("name")), ErrorKind::Parse);
    assert!(doc.get_key_to_bool("testType.value_int").unwrap());
    assert!(doc.get_key_to_bool("testType.value_decimal").unwrap());
    assert!(doc.get_key_to_bool("testType.value_int_less_zero").unwrap());
    assert!(doc.get_key_to_bool("testType.value_decimal_less_zero").unwrap());
    assert!(!doc.get_key_to_bool("testType.value_int_0").unwrap());
    assert!(!doc.get_key_to_bool("testType.value_bool_false").unwrap());
    assert!(doc.get_key_to_bool("testType.value_bool_true").unwrap());
    assert!(!doc.get_key_to_bool("testType.value_bool_false_string").unwrap());
    assert!(doc.get_key_to_bool("testType.value_bool_true_string").unwrap());
}

#[test]
fn test_to_u8() {
    let doc = document();
    assert_eq!(kind(doc.get_key_to_u8("name")), ErrorKind::Parse);
    assert_eq!(kind(doc.get_key_to_u8("name2")), ErrorKind::FormatConversion);
    assert_eq!(kind(doc.get_key_to_u8("testType.value_array_int")), ErrorKind::FormatConversion);
    assert_eq!(doc.get_key_to_u8("testType.value_byte").unwrap(), 123);
    assert_eq!(doc.get_key_to_u8("testType.value_byte_string").unwrap(), 123);
    assert_eq!(doc.get_key_to_u8("testType.value_int_0").unwrap(), 0);
    assert_eq!(kind(doc.get_key_to_u8("testType.value_int")), ErrorKind::Overflow);
    assert_eq!(kind(doc.get_key_to_u8("testType.value_int_less_zero")), ErrorKind::Overflow);
    assert_eq!(kind(doc.get_key_to_u8("testType.value_int_string")), ErrorKind::Overflow);
    assert_eq!(kind(doc.get_key_to_u8("testType.value_decimal")), ErrorKind::FormatConversion);
    assert_eq!(
        kind(doc.get_key_to_u8("testType.value_decimal_less_zero")),
        ErrorKind::FormatConversion
    );
    assert_eq!(kind(doc.get_key_to_u8("testType.value_bool_false")), ErrorKind::FormatConversion);
    assert_eq!(kind(doc.get_key_to_u8("testType.value_bool_true")), ErrorKind::FormatConversion);
    assert_eq!(kind(doc.get_key_to_u8("testType.value_bool_false_string")), ErrorKind::Parse);
    assert_eq!(kind(doc.get_key_to_u8("testType.value_bool_true_string")), ErrorKind::Parse);
}

#[test]
fn test_to_i8() {
    let doc = document();
    assert_eq!(kind(doc.get_key_to_i8("name2")), ErrorKind::FormatConversion);
    assert_eq!(doc.get_key_to_i8("testType.value_byte").unwrap(), 123);
    assert_eq!(doc.get_key_to_i8("testType.value_sbyte_less_zero").unwrap(), -123);
    assert_eq!(doc.get_key_to_i8("testType.value_byte_string").unwrap(), 123);
    assert_eq!(doc.get_key_to_i8("testType.value_sbyte_string_less_zero").unwrap(), -123);
    assert_eq!(kind(doc.get_key_to_i8("testType.value_int")), ErrorKind::Overflow);
    assert_eq!(kind(doc.get_key_to_i8("testType.value_int_string_less_zero")), ErrorKind::Overflow);
}

#[test]
fn test_to_i16() {
    let doc = document();
    assert_eq!(kind(doc.get_key_to_i16("name")), ErrorKind::Parse);
    assert_eq!(kind(doc.get_key_to_i16("name2")), ErrorKind::FormatConversion);
    assert_eq!(doc.get_key_to_i16("testType.value_int").unwrap(), 1234);
    assert_eq!(doc.get_key_to_i16("testType.value_int_less_zero").unwrap(), -1234);
    assert_eq!(doc.get_key_to_i16("testType.value_int_string").unwrap(), 1234);
    assert_eq!(doc.get_key_to_i16("testType.value_int_string_less_zero").unwrap(), -1234);
    assert_eq!(doc.get_key_to_i16("testType.value_int_0").unwrap(), 0);
    assert_eq!(kind(doc.get_key_to_i16("testType.value_decimal")), ErrorKind::FormatConversion);
    assert_eq!(kind(doc.get_key_to_i16("testType.value_bool_true")), ErrorKind::FormatConversion);
    assert_eq!(kind(doc.get_key_to_i16("testType.value_int32")), ErrorKind::Overflow);
    assert_eq!(kind(doc.get_key_to_i16("testType.value_int32_less_zero")), ErrorKind::Overflow);
}

#[test]
fn test_to_i32_and_i64() {
    let doc = document();
    assert_eq!(doc.get_key_to_i32("testType.value_int32").unwrap(), 123456);
    assert_eq!(doc.get_key_to_i32("testType.value_int32_less_zero").unwrap(), -123456);
    assert_eq!(kind(doc.get_key_to_i32("testType.value_int64")), ErrorKind::Overflow);
    assert_eq!(doc.get_key_to_i64("testType.value_int64").unwrap(), 3147483647);
    assert_eq!(doc.get_key_to_i64("testType.value_int64_less_zero").unwrap(), -3147483647);
    assert_eq!(kind(doc.get_key_to_i64("testType.value_array_int")), ErrorKind::FormatConversion);
}

#[test]
fn test_unsigned_rejects_negatives() {
    let doc = document();
    assert_eq!(doc.get_key_to_u16("testType.value_int").unwrap(), 1234);
    assert_eq!(kind(doc.get_key_to_u16("testType.value_sbyte_less_zero")), ErrorKind::Overflow);
    assert_eq!(
        kind(doc.get_key_to_u16("testType.value_sbyte_string_less_zero")),
        ErrorKind::Overflow
    );
    assert_eq!(kind(doc.get_key_to_u16("testType.value_int32")), ErrorKind::Overflow);
    assert_eq!(doc.get_key_to_u32("testType.value_int32").unwrap(), 123456);
    assert_eq!(kind(doc.get_key_to_u32("testType.value_int32_less_zero")), ErrorKind::Overflow);
    assert_eq!(doc.get_key_to_u64("testType.value_int64").unwrap(), 3147483647);
    assert_eq!(kind(doc.get_key_to_u64("testType.value_int64_less_zero")), ErrorKind::Overflow);
    assert_eq!(kind(doc.get_key_to_u64("testType.value_bool_true_string")), ErrorKind::Parse);
}

#[test]
fn test_floating_point() {
    let doc = document();
    assert_eq!(doc.get_key_to_f64("testType.value_decimal").unwrap(), 1234.567);
    assert_eq!(doc.get_key_to_f64("testType.value_int_string").unwrap(), 1234.0);
    assert_eq!(doc.get_key_to_f32("testType.value_decimal_less_zero").unwrap(), -1234.567f64 as f32);
    assert_eq!(kind(doc.get_key_to_f64("name")), ErrorKind::Parse);
    assert_eq!(kind(doc.get_key_to_f32("testType.value_bool_true")), ErrorKind::FormatConversion);
    assert_eq!(kind(doc.get_key_to_f64("name2")), ErrorKind::FormatConversion);
}

#[test]
fn test_decimal() {
    let doc = document();
    assert_eq!(
        doc.get_key_to_decimal("testType.value_decimal").unwrap(),
        Decimal::from_str("1234.567").unwrap()
    );
    assert_eq!(
        doc.get_key_to_decimal("testType.value_int_string_less_zero").unwrap(),
        Decimal::from(-1234)
    );
    assert_eq!(kind(doc.get_key_to_decimal("testType.obj")), ErrorKind::FormatConversion);
}

#[test]
fn test_array_length() {
    let doc = document();
    assert_eq!(doc.get_key_to_array_length("testType.value_array_int").unwrap(), 3);
    assert_eq!(kind(doc.get_key_to_array_length("name")), ErrorKind::FormatConversion);
    assert_eq!(kind(doc.get_key_to_array_length("testType.obj")), ErrorKind::FormatConversion);
    assert_eq!(kind(doc.get_key_to_array_length("nope")), ErrorKind::FormatConversion);
}

#[derive(Debug, Deserialize, PartialEq)]
struct ObjTest {
    name: String,
    value: i32,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct WrongShape {
    name: u8,
}

#[test]
fn test_to_object() {
    let doc = document();
    assert_eq!(
        doc.get_key_to_object::<ObjTest>("testType.obj").unwrap(),
        Some(ObjTest {
            name: "TestObj".into(),
            value: 123
        })
    );
    assert_eq!(doc.get_key_to_object::<ObjTest>("name").unwrap(), None);
    assert_eq!(doc.get_key_to_object::<ObjTest>("testType.value_array_int").unwrap(), None);
    assert_eq!(doc.get_key_to_object::<ObjTest>("testType.missing").unwrap(), None);
    assert_eq!(kind(doc.get_key_to_object::<WrongShape>("testType.obj")), ErrorKind::Decode);
}

#[test]
fn test_to_array() {
    let doc = document();
    assert_eq!(
        doc.get_key_to_array::<i32>("testType.value_array_int").unwrap(),
        Some(vec![1, 2, 3])
    );
    assert_eq!(doc.get_key_to_array::<i32>("testType.obj").unwrap(), None);
    assert_eq!(doc.get_key_to_array::<i32>("nope").unwrap(), None);
    assert_eq!(kind(doc.get_key_to_array::<String>("testType.value_array_int")), ErrorKind::Decode);
}
