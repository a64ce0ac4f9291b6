//! Error types for vjson operations

use crate::hooks::HookError;
use std::fmt;

/// Result type alias for vjson operations
pub type Result<T> = std::result::Result<T, Error>;

/// Location of a decode failure in the input.
///
/// `offset` counts bytes from the start of the input, byte-order mark
/// included. `line` and `column` are 1-based; `column` counts bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Byte offset from the start of the input
    pub offset: usize,
    /// 1-based line number
    pub line: usize,
    /// 1-based byte column within the line
    pub column: usize,
}

impl Position {
    /// Create a position from its parts
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Compute the position of `offset` by counting newlines in `input`
    pub fn locate(input: &[u8], offset: usize) -> Self {
        let head = &input[..offset.min(input.len())];
        let line = memchr::memchr_iter(b'\n', head).count() + 1;
        let line_start = memchr::memrchr(b'\n', head).map_or(0, |nl| nl + 1);
        Self::new(offset, line, offset - line_start + 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {} column {} (byte {})",
            self.line, self.column, self.offset
        )
    }
}

/// Error category, for callers that branch on the kind of failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Syntax error in the input
    MalformedJson,
    /// Non-whitespace after the top-level value
    TrailingData,
    /// Container nesting beyond the configured limit
    NestingTooDeep,
    /// Underlying read or write failed
    Io,
    /// Value with no JSON representation
    UnsupportedType,
    /// Object key that is not string-like
    UnsupportedKeyType,
    /// Container that contains itself
    CyclicReference,
    /// `NaN`/`Infinity` while they are disallowed
    ValueNotAllowed,
    /// Allocator refused a request
    AllocationFailure,
    /// User hook reported failure
    Callback,
    /// Encoded bytes could not be viewed as text
    Utf8,
}

/// Main error type for vjson operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid JSON syntax
    #[error("Malformed JSON at {position}: {message}")]
    MalformedJson {
        /// Where the parser stopped
        position: Position,
        /// Error description
        message: String,
    },

    /// Extra data after a complete document
    #[error("Extra data at {position}")]
    TrailingData {
        /// Start of the extra data
        position: Position,
    },

    /// Container nesting exceeded the configured depth
    #[error("Maximum nesting depth of {limit} exceeded{}", at(.position))]
    NestingTooDeep {
        /// Configured limit
        limit: usize,
        /// Opening bracket that crossed the limit, when decoding
        position: Option<Position>,
    },

    /// I/O error from a stream adapter
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoder met a value it cannot represent and no default hook handled it
    #[error("Object of type {type_name} is not JSON serializable")]
    UnsupportedType {
        /// Host type name
        type_name: String,
    },

    /// Encoder met a non-string object key and `skip_keys` is off
    #[error("Object keys must be strings, not {type_name}")]
    UnsupportedKeyType {
        /// Host type name of the key
        type_name: String,
    },

    /// Encoder met a container that is already being written
    #[error("Circular reference detected in {type_name}")]
    CyclicReference {
        /// Host type name of the container
        type_name: String,
    },

    /// `NaN` or an infinity while `allow_nan` is off
    #[error("Out of range float values are not JSON compliant: {literal}")]
    ValueNotAllowed {
        /// Literal that would have been written or was read
        literal: &'static str,
    },

    /// A buffer could not grow
    #[error("Memory allocation of {requested} additional bytes failed")]
    AllocationFailure {
        /// Size of the refused request
        requested: usize,
    },

    /// A user hook returned an error
    #[error("{hook} hook failed{}: {source}", at(.position))]
    Callback {
        /// `object_hook` or `default`
        hook: &'static str,
        /// End of the object handed to an object hook
        position: Option<Position>,
        /// Error reported by the hook
        #[source]
        source: HookError,
    },

    /// Encoded output was not valid UTF-8
    #[error("UTF-8 conversion failed: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

fn at(position: &Option<Position>) -> String {
    position.map(|p| format!(" at {p}")).unwrap_or_default()
}

impl Error {
    /// Create a malformed JSON error
    pub fn malformed(position: Position, message: impl Into<String>) -> Self {
        Self::MalformedJson {
            position,
            message: message.into(),
        }
    }

    /// Create a trailing data error
    pub fn trailing(position: Position) -> Self {
        Self::TrailingData { position }
    }

    /// Create a nesting error
    pub fn too_deep(limit: usize, position: Option<Position>) -> Self {
        Self::NestingTooDeep { limit, position }
    }

    /// Create an unsupported type error
    pub fn unsupported_type(type_name: impl Into<String>) -> Self {
        Self::UnsupportedType {
            type_name: type_name.into(),
        }
    }

    /// Create an unsupported key error
    pub fn unsupported_key(type_name: impl Into<String>) -> Self {
        Self::UnsupportedKeyType {
            type_name: type_name.into(),
        }
    }

    /// Create a cycle error
    pub fn cyclic(type_name: impl Into<String>) -> Self {
        Self::CyclicReference {
            type_name: type_name.into(),
        }
    }

    /// Create an allocation failure error
    pub fn allocation(requested: usize) -> Self {
        Self::AllocationFailure { requested }
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedJson { .. } => ErrorKind::MalformedJson,
            Self::TrailingData { .. } => ErrorKind::TrailingData,
            Self::NestingTooDeep { .. } => ErrorKind::NestingTooDeep,
            Self::Io(_) => ErrorKind::Io,
            Self::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            Self::UnsupportedKeyType { .. } => ErrorKind::UnsupportedKeyType,
            Self::CyclicReference { .. } => ErrorKind::CyclicReference,
            Self::ValueNotAllowed { .. } => ErrorKind::ValueNotAllowed,
            Self::AllocationFailure { .. } => ErrorKind::AllocationFailure,
            Self::Callback { .. } => ErrorKind::Callback,
            Self::Utf8(_) => ErrorKind::Utf8,
        }
    }

    /// Input position attached to a decode error
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::MalformedJson { position, .. } | Self::TrailingData { position } => {
                Some(*position)
            }
            Self::NestingTooDeep { position, .. } | Self::Callback { position, .. } => *position,
            _ => None,
        }
    }
}

/// Reserve room for `additional` more elements, reporting refusal as an error
pub(crate) fn try_reserve<T>(buf: &mut Vec<T>, additional: usize) -> Result<()> {
    buf.try_reserve(additional)
        .map_err(|_| Error::allocation(additional.saturating_mul(size_of::<T>())))
}
