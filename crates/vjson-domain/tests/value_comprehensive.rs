//! Comprehensive tests for the Value model
//!
//! Tests cover construction, predicates, accessors, conversions
//! and serde interop.

use vjson_rs_domain::{DomainError, Map, Value};

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_constructors_match_variants() {
    assert_eq!(Value::null(), Value::Null);
    assert_eq!(Value::default(), Value::Null);
    assert_eq!(Value::bool(true), Value::Bool(true));
    assert_eq!(Value::int(i64::MIN), Value::Int(i64::MIN));
    assert_eq!(Value::float(2.5), Value::Float(2.5));
    assert_eq!(Value::string("🦀"), Value::String("🦀".to_string()));
    assert_eq!(Value::array(vec![]), Value::Array(Vec::new()));
    assert_eq!(Value::object(Map::new()), Value::Object(Map::new()));
}

#[test]
fn test_float_nan_is_representable() {
    let nan = Value::float(f64::NAN);
    assert!(nan.is_float());
    assert!(nan.as_f64().unwrap().is_nan());
    assert_ne!(nan, nan.clone());
}

#[test]
fn test_big_int_keeps_text() {
    let big = Value::big_int("-123456789012345678901234567890");
    assert!(big.is_big_int());
    assert!(big.is_number());
    assert_eq!(big.as_big_int(), Some("-123456789012345678901234567890"));
}

// ============================================================================
// Predicates and accessors
// ============================================================================

#[test]
fn test_predicates_are_exclusive() {
    let samples = [
        Value::Null,
        Value::Bool(false),
        Value::Int(0),
        Value::Float(0.0),
        Value::string(""),
        Value::Array(vec![]),
        Value::Object(Map::new()),
    ];

    for value in &samples {
        let hits = [
            value.is_null(),
            value.is_bool(),
            value.is_int(),
            value.is_float(),
            value.is_string(),
            value.is_array(),
            value.is_object(),
        ]
        .iter()
        .filter(|hit| **hit)
        .count();
        assert_eq!(hits, 1, "{value:?}");
    }
}

#[test]
fn test_nested_lookup() {
    let mut inner = Map::new();
    inner.insert("b".into(), Value::Array(vec![Value::Int(1), Value::Int(2)]));
    let mut outer = Map::new();
    outer.insert("a".into(), Value::Object(inner));
    let value = Value::Object(outer);

    assert_eq!(value["a"]["b"][1], Value::Int(2));
    assert_eq!(value.get("a").and_then(|a| a.get("b")).map(Value::len), Some(2));
    assert!(value["missing"]["deeper"].is_null());
}

#[test]
fn test_mutation_through_accessors() {
    let mut value = Value::Array(vec![Value::Int(1)]);
    value.as_array_mut().unwrap().push(Value::Int(2));
    assert_eq!(value.len(), 2);

    let mut object = Value::Object(Map::new());
    object
        .as_object_mut()
        .unwrap()
        .insert("k".into(), Value::Null);
    assert!(!object.is_empty());

    let taken = object.take();
    assert!(taken.is_object());
    assert!(object.is_null());
}

// ============================================================================
// Conversions
// ============================================================================

#[test]
fn test_from_primitives() {
    assert_eq!(Value::from(true), Value::Bool(true));
    assert_eq!(Value::from(42i32), Value::Int(42));
    assert_eq!(Value::from(1.5f32), Value::Float(1.5));
    assert_eq!(Value::from("s"), Value::string("s"));
    assert_eq!(Value::from(None::<i64>), Value::Null);
    assert_eq!(Value::from(Some(3u8)), Value::Int(3));
    assert_eq!(
        Value::from(i128::MIN),
        Value::big_int(i128::MIN.to_string())
    );
}

#[test]
fn test_try_from_values() {
    assert_eq!(bool::try_from(Value::Bool(true)), Ok(true));
    assert_eq!(i64::try_from(Value::Int(-5)), Ok(-5));
    assert_eq!(f64::try_from(Value::Int(2)), Ok(2.0));
    assert_eq!(String::try_from(Value::string("x")), Ok("x".to_string()));
    assert!(matches!(
        i64::try_from(Value::big_int("99999999999999999999")),
        Err(DomainError::OutOfRange { target: "i64", .. })
    ));
    assert!(matches!(
        Map::try_from(Value::Null),
        Err(DomainError::TypeMismatch {
            expected: "object",
            actual: "null"
        })
    ));
}

// ============================================================================
// Serde interop
// ============================================================================

#[test]
fn test_serde_json_roundtrip_preserves_structure() {
    let text = r#"{"b":[1,2.5,"x",null,true],"a":{"nested":-7}}"#;
    let value: Value = serde_json::from_str(text).unwrap();
    assert_eq!(value["b"][1], Value::Float(2.5));
    assert_eq!(serde_json::to_string(&value).unwrap(), text);
}
