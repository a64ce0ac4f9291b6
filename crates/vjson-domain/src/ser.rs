//! `serde::Serialize` for `Value`

use crate::Value;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::BigInt(text) => serialize_big_int(text, serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

// Widest native integer first; anything beyond 128 bits goes out as a double.
fn serialize_big_int<S: Serializer>(text: &str, serializer: S) -> Result<S::Ok, S::Error> {
    if let Ok(v) = text.parse::<u64>() {
        return serializer.serialize_u64(v);
    }
    if let Ok(v) = text.parse::<i128>() {
        return serializer.serialize_i128(v);
    }
    if let Ok(v) = text.parse::<u128>() {
        return serializer.serialize_u128(v);
    }
    match text.parse::<f64>() {
        Ok(v) => serializer.serialize_f64(v),
        Err(_) => serializer.serialize_str(text),
    }
}
