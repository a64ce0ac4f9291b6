//! Visitation contract between host data and the encoder
//!
//! A host type describes itself one level at a time through [`Source::node`].
//! Containers hand out iterators over borrowed children, so the encoder never
//! copies or mutates host data.

use vjson_rs_domain::{Map, Value};

/// Children of an array node
pub type Elements<'a> = Box<dyn Iterator<Item = &'a dyn Source> + 'a>;

/// Members of an object node
pub type Entries<'a> = Box<dyn Iterator<Item = (Key<'a>, &'a dyn Source)> + 'a>;

/// One level of a host value
pub enum Node<'a> {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    UInt(u64),
    /// Double, non-finite values included
    Float(f64),
    /// Decimal integer text written verbatim
    BigInt(&'a str),
    /// Text
    Str(&'a str),
    /// Ordered sequence
    Array(Elements<'a>),
    /// Ordered mapping
    Object(Entries<'a>),
    /// No native representation; offered to the default hook
    Unsupported,
}

/// Object key as seen by the encoder
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Key<'a> {
    /// String key
    Str(&'a str),
    /// `None`-like key
    Null,
    /// Boolean key
    Bool(bool),
    /// Integer key
    Int(i64),
    /// Float key
    Float(f64),
    /// Any other key type, by name
    Other(&'static str),
}

impl Key<'_> {
    /// Name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Key::Str(_) => "str",
            Key::Null => "null",
            Key::Bool(_) => "bool",
            Key::Int(_) => "int",
            Key::Float(_) => "float",
            Key::Other(name) => name,
        }
    }
}

/// A value the encoder can walk
pub trait Source {
    /// Describe this value's top level
    fn node(&self) -> Node<'_>;

    /// Name used in error messages
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Identity of a container for cycle detection; the default is its address
    fn identity(&self) -> usize {
        (self as *const Self).cast::<()>() as usize
    }

    /// Direct view of a `Value` tree, which lets the encoder skip the
    /// per-container iterator boxing
    fn as_value(&self) -> Option<&Value> {
        None
    }
}

impl Source for Value {
    fn node(&self) -> Node<'_> {
        match self {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(*b),
            Value::Int(i) => Node::Int(*i),
            Value::Float(f) => Node::Float(*f),
            Value::BigInt(text) => Node::BigInt(text),
            Value::String(s) => Node::Str(s),
            Value::Array(items) => Node::Array(Box::new(items.iter().map(|v| v as &dyn Source))),
            Value::Object(map) => Node::Object(entries(map)),
        }
    }

    fn type_name(&self) -> &'static str {
        Value::type_name(self)
    }

    fn as_value(&self) -> Option<&Value> {
        Some(self)
    }
}

fn entries(map: &Map) -> Entries<'_> {
    Box::new(
        map.iter()
            .map(|(k, v)| (Key::Str(k.as_str()), v as &dyn Source)),
    )
}

impl<T: Source> Source for [T] {
    fn node(&self) -> Node<'_> {
        Node::Array(Box::new(self.iter().map(|v| v as &dyn Source)))
    }
}

impl<T: Source> Source for Vec<T> {
    fn node(&self) -> Node<'_> {
        self.as_slice().node()
    }
}

impl<T: Source> Source for Option<T> {
    fn node(&self) -> Node<'_> {
        match self {
            Some(inner) => inner.node(),
            None => Node::Null,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Some(inner) => inner.type_name(),
            None => "null",
        }
    }

    fn as_value(&self) -> Option<&Value> {
        self.as_ref().and_then(Source::as_value)
    }
}

impl Source for str {
    fn node(&self) -> Node<'_> {
        Node::Str(self)
    }
}

impl Source for String {
    fn node(&self) -> Node<'_> {
        Node::Str(self)
    }
}

impl Source for bool {
    fn node(&self) -> Node<'_> {
        Node::Bool(*self)
    }
}

impl Source for f64 {
    fn node(&self) -> Node<'_> {
        Node::Float(*self)
    }
}

impl Source for i64 {
    fn node(&self) -> Node<'_> {
        Node::Int(*self)
    }
}

impl Source for u64 {
    fn node(&self) -> Node<'_> {
        Node::UInt(*self)
    }
}

impl<T: Source + ?Sized> Source for &T {
    fn node(&self) -> Node<'_> {
        (**self).node()
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn identity(&self) -> usize {
        (**self).identity()
    }

    fn as_value(&self) -> Option<&Value> {
        (**self).as_value()
    }
}
