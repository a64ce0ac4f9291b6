//! Conversions between `Value` and plain Rust types

use crate::{DomainError, Map, Value};

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! from_lossless {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Int(i64::from(value))
                }
            }
        )*
    };
}

from_lossless!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(v) => Value::Int(v),
            Err(_) => Value::BigInt(value.to_string()),
        }
    }
}

impl From<i128> for Value {
    fn from(value: i128) -> Self {
        match i64::try_from(value) {
            Ok(v) => Value::Int(v),
            Err(_) => Value::BigInt(value.to_string()),
        }
    }
}

impl From<u128> for Value {
    fn from(value: u128) -> Self {
        match i64::try_from(value) {
            Ok(v) => Value::Int(v),
            Err(_) => Value::BigInt(value.to_string()),
        }
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::Array(iter.into_iter().map(Into::into).collect())
    }
}

impl TryFrom<Value> for bool {
    type Error = DomainError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value
            .as_bool()
            .ok_or_else(|| DomainError::type_mismatch("bool", value.type_name()))
    }
}

impl TryFrom<Value> for i64 {
    type Error = DomainError;

    fn try_from(mut value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Int(i) => Ok(i),
            Value::BigInt(ref mut text) => {
                Err(DomainError::out_of_range("i64", std::mem::take(text)))
            }
            other => Err(DomainError::type_mismatch("int", other.type_name())),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = DomainError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value
            .as_f64()
            .ok_or_else(|| DomainError::type_mismatch("number", value.type_name()))
    }
}

impl TryFrom<Value> for String {
    type Error = DomainError;

    fn try_from(mut value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(ref mut s) => Ok(std::mem::take(s)),
            other => Err(DomainError::type_mismatch("string", other.type_name())),
        }
    }
}

impl TryFrom<Value> for Vec<Value> {
    type Error = DomainError;

    fn try_from(mut value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(ref mut items) => Ok(std::mem::take(items)),
            other => Err(DomainError::type_mismatch("array", other.type_name())),
        }
    }
}

impl TryFrom<Value> for Map {
    type Error = DomainError;

    fn try_from(mut value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(ref mut map) => Ok(std::mem::take(map)),
            other => Err(DomainError::type_mismatch("object", other.type_name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u64_above_i64_becomes_big_int() {
        assert_eq!(Value::from(u64::MAX), Value::BigInt(u64::MAX.to_string()));
        assert_eq!(Value::from(7u64), Value::Int(7));
    }

    #[test]
    fn test_try_from_mismatch() {
        let err = i64::try_from(Value::from("x")).unwrap_err();
        assert_eq!(err, DomainError::type_mismatch("int", "string"));
    }

    #[test]
    fn test_collect_into_map_and_array() {
        let map: Map = [("a", 1), ("b", 2)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), Value::from(v)))
            .collect();
        assert_eq!(map.len(), 2);

        let array: Value = vec![1, 2, 3].into_iter().collect();
        assert_eq!(array.len(), 3);
    }
}
