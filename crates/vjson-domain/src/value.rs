//! JSON value tree

use indexmap::IndexMap;

/// Insertion-ordered object storage.
///
/// Inserting an existing key replaces its value in place, so the key keeps
/// the position of its first occurrence.
pub type Map = IndexMap<String, Value>;

/// A JSON value.
///
/// `Float` may hold `NaN` and the infinities; they are legal tree members even
/// though strict JSON has no spelling for them. `BigInt` carries the decimal
/// text of an integral literal that does not fit into `i64`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// `null`
    #[default]
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Integral number in the signed 64-bit range
    Int(i64),
    /// IEEE-754 double, `NaN` and `±Infinity` included
    Float(f64),
    /// Integral number outside the signed 64-bit range, as written in the source
    BigInt(String),
    /// Unicode text
    String(String),
    /// Ordered sequence
    Array(Vec<Value>),
    /// Ordered mapping with string keys
    Object(Map),
}

static NULL: Value = Value::Null;

impl Value {
    /// Create a null value
    pub fn null() -> Self {
        Self::Null
    }

    /// Create a boolean value
    pub fn bool(value: bool) -> Self {
        Self::Bool(value)
    }

    /// Create an integer value
    pub fn int(value: i64) -> Self {
        Self::Int(value)
    }

    /// Create a float value
    pub fn float(value: f64) -> Self {
        Self::Float(value)
    }

    /// Create a big integer from its decimal text
    pub fn big_int(text: impl Into<String>) -> Self {
        Self::BigInt(text.into())
    }

    /// Create a string value
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Create an array value
    pub fn array(items: Vec<Value>) -> Self {
        Self::Array(items)
    }

    /// Create an object value
    pub fn object(entries: Map) -> Self {
        Self::Object(entries)
    }

    /// Short lowercase name of the variant, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::BigInt(_) => "bigint",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check if value is a boolean
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    /// Check if value is an `i64` integer
    pub fn is_int(&self) -> bool {
        matches!(self, Self::Int(_))
    }

    /// Check if value is a float
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float(_))
    }

    /// Check if value is an out-of-range integer
    pub fn is_big_int(&self) -> bool {
        matches!(self, Self::BigInt(_))
    }

    /// Check if value is any kind of number
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_) | Self::BigInt(_))
    }

    /// Check if value is a string
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Check if value is an array
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Check if value is an object
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Get boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get integer value
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get numeric value as a double.
    ///
    /// `BigInt` text is converted with the usual rounding; it may become infinite.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::BigInt(text) => text.parse().ok(),
            _ => None,
        }
    }

    /// Get the decimal text of a big integer
    pub fn as_big_int(&self) -> Option<&str> {
        match self {
            Self::BigInt(text) => Some(text),
            _ => None,
        }
    }

    /// Get string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get array items
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Get mutable array items
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Get object entries
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Get mutable object entries
    pub fn as_object_mut(&mut self) -> Option<&mut Map> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up an object member by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object()?.get(key)
    }

    /// Look up an array item by index
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.as_array()?.get(index)
    }

    /// Replace the value with `Null` and return the previous contents
    pub fn take(&mut self) -> Value {
        std::mem::take(self)
    }

    /// Number of direct children of a container, zero for scalars
    pub fn len(&self) -> usize {
        match self {
            Self::Array(items) => items.len(),
            Self::Object(map) => map.len(),
            _ => 0,
        }
    }

    /// Check if the value has no direct children
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Containers are torn down through a heap work list, so dropping a tree
// needs constant stack however deep it is.
impl Drop for Value {
    fn drop(&mut self) {
        let mut pending = match self {
            Value::Array(items) if items.iter().any(Value::has_children) => std::mem::take(items),
            Value::Object(map) if map.values().any(Value::has_children) => {
                map.drain(..).map(|(_, value)| value).collect()
            }
            _ => return,
        };
        while let Some(mut value) = pending.pop() {
            match &mut value {
                Value::Array(items) => pending.append(items),
                Value::Object(map) => pending.extend(map.drain(..).map(|(_, value)| value)),
                _ => {}
            }
        }
    }
}

impl Value {
    fn has_children(&self) -> bool {
        match self {
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
            _ => false,
        }
    }
}

impl std::ops::Index<&str> for Value {
    type Output = Value;

    /// Member access that yields `Null` for missing keys and non-objects
    fn index(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }
}

impl std::ops::Index<usize> for Value {
    type Output = Value;

    /// Item access that yields `Null` when out of bounds or not an array
    fn index(&self, index: usize) -> &Value {
        self.get_index(index).unwrap_or(&NULL)
    }
}
