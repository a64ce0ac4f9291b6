//! Comprehensive tests for the encoder
//!
//! Coverage targets:
//! - Separators, tab layout and ASCII escaping
//! - Non-string keys (skip and coercion)
//! - Default hook substitution and failure
//! - Cycle detection on host containers
//! - Non-finite float policy and depth limit

use std::{cell::OnceCell, rc::Rc};
use vjson_rs::{
    EncodeConfig, Encoder, ErrorKind, HookError, Key, Map, Node, Source, Value, decode, encode,
    to_string,
};

fn encode_with(config: EncodeConfig, value: &impl Source) -> vjson_rs::Result<String> {
    Encoder::with_config(config).encode_to_string(value)
}

fn object(entries: &[(&str, Value)]) -> Value {
    Value::Object(entries.iter().map(|(k, v)| (k.to_string(), v.clone())).collect::<Map>())
}

/// Host mapping with arbitrary key kinds
struct Record {
    entries: Vec<(Key<'static>, Value)>,
}

impl Source for Record {
    fn node(&self) -> Node<'_> {
        Node::Object(Box::new(
            self.entries.iter().map(|(k, v)| (*k, v as &dyn Source)),
        ))
    }

    fn type_name(&self) -> &'static str {
        "Record"
    }
}

/// Host value with no JSON form of its own
#[allow(dead_code)]
struct Timestamp(u64);

impl Source for Timestamp {
    fn node(&self) -> Node<'_> {
        Node::Unsupported
    }

    fn type_name(&self) -> &'static str {
        "Timestamp"
    }
}

/// Host list that may end up containing itself
struct Graph {
    children: OnceCell<Vec<Rc<Graph>>>,
}

impl Graph {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            children: OnceCell::new(),
        })
    }
}

impl Source for Graph {
    fn node(&self) -> Node<'_> {
        let children = self.children.get().map(Vec::as_slice).unwrap_or(&[]);
        Node::Array(Box::new(children.iter().map(|c| c.as_ref() as &dyn Source)))
    }

    fn type_name(&self) -> &'static str {
        "Graph"
    }
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_compact_output() {
    let value = object(&[
        ("b", Value::Int(1)),
        ("a", Value::Array(vec![Value::Null, Value::Bool(true), Value::string("x")])),
    ]);
    assert_eq!(to_string(&value).unwrap(), r#"{"b":1,"a":[null,true,"x"]}"#);
}

#[test]
fn test_readable_separators() {
    let value = object(&[("a", Value::Array(vec![Value::Int(1), Value::Int(2)]))]);
    let config = EncodeConfig::default().with_separators(", ", ": ");
    assert_eq!(encode_with(config, &value).unwrap(), r#"{"a": [1, 2]}"#);
}

#[test]
fn test_arbitrary_separator_text() {
    let value = Value::Array(vec![Value::Int(1), Value::Int(2)]);
    let config = EncodeConfig::default().with_separators(" ; ", " = ");
    assert_eq!(encode_with(config, &value).unwrap(), "[1 ; 2]");
}

#[test]
fn test_format_arrays_inside_objects() {
    let value = object(&[(
        "a",
        Value::Array(vec![Value::Int(1), object(&[("b", Value::Int(2))])]),
    )]);
    assert_eq!(
        encode_with(EncodeConfig::pretty(), &value).unwrap(),
        "{\n\t\"a\":\t[1, {\n\t\t\t\"b\":\t2\n\t\t}]\n}"
    );
}

#[test]
fn test_empty_containers() {
    assert_eq!(to_string(&Value::Array(vec![])).unwrap(), "[]");
    assert_eq!(to_string(&Value::Object(Map::new())).unwrap(), "{}");
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_escapes_in_default_mode() {
    let value = Value::string("q\"b\\n\nt\tc\u{1}é");
    assert_eq!(to_string(&value).unwrap(), "\"q\\\"b\\\\n\\nt\\tc\\u0001é\"");
}

#[test]
fn test_ensure_ascii_escapes_everything_else() {
    let config = EncodeConfig {
        ensure_ascii: true,
        ..EncodeConfig::default()
    };
    let value = Value::string("é\u{7f}😀");
    assert_eq!(
        encode_with(config, &value).unwrap(),
        r#""\u00e9\u007f\ud83d\ude00""#
    );
}

#[test]
fn test_keys_are_escaped() {
    let value = object(&[("line\nbreak", Value::Null)]);
    assert_eq!(to_string(&value).unwrap(), r#"{"line\nbreak":null}"#);
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn test_float_repr() {
    let value = Value::Array(
        [1.0, 0.1, 1e16, 1e-5, -0.0, 123.456, 1e22]
            .into_iter()
            .map(Value::Float)
            .collect(),
    );
    assert_eq!(
        to_string(&value).unwrap(),
        "[1.0,0.1,1e+16,1e-05,-0.0,123.456,1e+22]"
    );
}

#[test]
fn test_integer_extremes() {
    assert_eq!(to_string(&i64::MIN).unwrap(), "-9223372036854775808");
    assert_eq!(to_string(&u64::MAX).unwrap(), "18446744073709551615");
    assert_eq!(
        to_string(&Value::big_int("-123456789012345678901234567890")).unwrap(),
        "-123456789012345678901234567890"
    );
}

#[test]
fn test_non_finite_allowed_by_default() {
    let value = Value::Array(vec![
        Value::Float(f64::NAN),
        Value::Float(f64::INFINITY),
        Value::Float(f64::NEG_INFINITY),
    ]);
    assert_eq!(to_string(&value).unwrap(), "[NaN,Infinity,-Infinity]");
}

#[test]
fn test_non_finite_rejected_when_disallowed() {
    let config = EncodeConfig {
        allow_nan: false,
        ..EncodeConfig::default()
    };
    let err = encode_with(config.clone(), &f64::INFINITY).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueNotAllowed);
    assert!(err.to_string().contains("Infinity"));

    let err = encode_with(config, &Value::Float(f64::NAN)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueNotAllowed);
}

// ============================================================================
// Keys
// ============================================================================

fn mixed_record() -> Record {
    Record {
        entries: vec![
            (Key::Str("s"), Value::Int(0)),
            (Key::Null, Value::Int(1)),
            (Key::Bool(true), Value::Int(2)),
            (Key::Int(-5), Value::Int(3)),
            (Key::Float(1.5), Value::Int(4)),
            (Key::Other("tuple"), Value::Int(5)),
        ],
    }
}

#[test]
fn test_non_string_key_rejected_by_default() {
    let err = encode(&mixed_record()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedKeyType);
    assert_eq!(err.to_string(), "Object keys must be strings, not null");
}

#[test]
fn test_skip_keys_drops_entries() {
    let config = EncodeConfig {
        skip_keys: true,
        ..EncodeConfig::default()
    };
    assert_eq!(encode_with(config, &mixed_record()).unwrap(), r#"{"s":0}"#);
}

#[test]
fn test_coerced_scalar_keys() {
    let config = EncodeConfig {
        coerce_scalar_keys: true,
        skip_keys: true,
        ..EncodeConfig::default()
    };
    assert_eq!(
        encode_with(config, &mixed_record()).unwrap(),
        r#"{"s":0,"null":1,"true":2,"-5":3,"1.5":4}"#
    );
}

#[test]
fn test_coerced_non_finite_keys_follow_nan_policy() {
    for (key, literal) in [
        (f64::NAN, "NaN"),
        (f64::INFINITY, "Infinity"),
        (f64::NEG_INFINITY, "-Infinity"),
    ] {
        let record = Record {
            entries: vec![(Key::Float(key), Value::Int(1))],
        };
        let permissive = EncodeConfig {
            coerce_scalar_keys: true,
            ..EncodeConfig::default()
        };
        assert_eq!(
            encode_with(permissive, &record).unwrap(),
            format!(r#"{{"{literal}":1}}"#)
        );

        let strict = EncodeConfig {
            coerce_scalar_keys: true,
            allow_nan: false,
            ..EncodeConfig::default()
        };
        let err = encode_with(strict, &record).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueNotAllowed);
        assert!(err.to_string().ends_with(literal));
    }
}

#[test]
fn test_coercion_without_skip_still_rejects_other_keys() {
    let config = EncodeConfig {
        coerce_scalar_keys: true,
        ..EncodeConfig::default()
    };
    let err = encode_with(config, &mixed_record()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedKeyType);
    assert!(err.to_string().ends_with("tuple"));
}

#[test]
fn test_skipped_first_entry_leaves_no_separator() {
    let record = Record {
        entries: vec![(Key::Other("tuple"), Value::Null), (Key::Str("a"), Value::Null)],
    };
    let config = EncodeConfig {
        skip_keys: true,
        ..EncodeConfig::pretty()
    };
    assert_eq!(encode_with(config, &record).unwrap(), "{\n\t\"a\":\tnull\n}");
}

// ============================================================================
// Default hook
// ============================================================================

#[test]
fn test_unsupported_without_hook() {
    let err = encode(&vec![Timestamp(5)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedType);
    assert_eq!(err.to_string(), "Object of type Timestamp is not JSON serializable");
}

#[test]
fn test_default_hook_substitutes() {
    let mut calls = 0;
    let out = {
        let mut encoder = Encoder::new().with_default(|value: &dyn Source| -> Result<Value, HookError> {
            calls += 1;
            Ok(Value::string(format!("<{}>", value.type_name())))
        });
        encoder.encode_to_string(&vec![Timestamp(1), Timestamp(2)]).unwrap()
    };
    assert_eq!(out, r#"["<Timestamp>","<Timestamp>"]"#);
    assert_eq!(calls, 2);
}

#[test]
fn test_default_hook_may_return_containers() {
    let mut encoder = Encoder::new().with_default(|_: &dyn Source| -> Result<Value, HookError> {
        Ok(object(&[("ts", Value::Int(1))]))
    });
    assert_eq!(encoder.encode_to_string(&Timestamp(1)).unwrap(), r#"{"ts":1}"#);
}

#[test]
fn test_default_hook_failure_is_callback_error() {
    let mut encoder = Encoder::new()
        .with_default(|_: &dyn Source| -> Result<Value, HookError> { Err("no thanks".into()) });
    let err = encoder.encode(&Timestamp(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Callback);
    assert!(err.to_string().contains("no thanks"));
    assert!(std::error::Error::source(&err).is_some());
}

// ============================================================================
// Cycles and depth
// ============================================================================

#[test]
fn test_self_reference_detected() {
    let root = Graph::new();
    let _ = root.children.set(vec![Graph::new(), root.clone()]);

    let err = encode(&*root).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CyclicReference);
    assert_eq!(err.to_string(), "Circular reference detected in Graph");
}

#[test]
fn test_shared_child_is_not_a_cycle() {
    let shared = Graph::new();
    let root = Graph::new();
    let _ = root.children.set(vec![shared.clone(), shared.clone(), shared]);
    assert_eq!(to_string(&*root).unwrap(), "[[],[],[]]");
}

#[test]
fn test_cycle_without_checking_hits_depth_limit() {
    let root = Graph::new();
    let _ = root.children.set(vec![root.clone()]);
    let config = EncodeConfig {
        check_circular: false,
        max_depth: 64,
        ..EncodeConfig::default()
    };
    let err = encode_with(config, &*root).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NestingTooDeep);
}

#[test]
fn test_value_depth_limit() {
    let mut value = Value::Null;
    for _ in 0..10 {
        value = object(&[("k", value)]);
    }
    let config = EncodeConfig {
        max_depth: 10,
        ..EncodeConfig::default()
    };
    assert!(encode_with(config.clone(), &value).is_ok());

    let wrapped = Value::Array(vec![value]);
    let err = encode_with(config, &wrapped).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NestingTooDeep);
}

// ============================================================================
// Native sources and sinks
// ============================================================================

#[test]
fn test_native_sources() {
    assert_eq!(to_string(&vec![Some(1i64), None]).unwrap(), "[1,null]");
    assert_eq!(to_string(&"plain").unwrap(), r#""plain""#);
    assert_eq!(to_string(&true).unwrap(), "true");
    assert_eq!(to_string(&vec![vec![0.5f64]]).unwrap(), "[[0.5]]");
}

#[test]
fn test_writer_output_matches_buffer() {
    let value = decode(br#"{"a": [1, 2, {"b": "c"}], "d": 1.5}"#).unwrap();
    let mut out = Vec::new();
    vjson_rs::encode_stream(&value, &mut out).unwrap();
    assert_eq!(out, encode(&value).unwrap());
}

#[test]
fn test_encoder_is_reusable() {
    let mut encoder = Encoder::new();
    for i in 0..3i64 {
        assert_eq!(encoder.encode(&i).unwrap(), i.to_string().into_bytes());
    }
}
