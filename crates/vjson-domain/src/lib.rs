//! vjson Domain Layer - the JSON value model
//!
//! This crate holds the in-memory representation shared by the vjson decoder
//! and encoder. It has no I/O and no parsing code; both pipelines produce or
//! consume the types defined here.
//!
//! ## Model
//!
//! - [`Value`]: tagged union of every JSON value the codec understands,
//!   including the `NaN`/`Infinity` extensions and integers that do not fit
//!   into 64 bits ([`Value::BigInt`], kept as verbatim decimal text)
//! - [`Map`]: insertion-ordered object storage
//!
//! ## Features
//!
//! `Value` implements `serde::Serialize` and `serde::Deserialize`, so trees can
//! be handed to any serde data format.

#![warn(missing_docs)]

mod convert;
mod de;
mod ser;
pub mod value;

pub use value::{Map, Value};

/// Domain Result type
pub type DomainResult<T> = Result<T, DomainError>;

/// Errors raised when a [`Value`] is converted into a narrower Rust type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum DomainError {
    /// The value holds a different variant than the one requested
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Requested variant
        expected: &'static str,
        /// Variant actually present
        actual: &'static str,
    },

    /// The value has the right variant but does not fit the target type
    #[error("Value out of range for {target}: {value}")]
    OutOfRange {
        /// Target Rust type
        target: &'static str,
        /// Textual form of the offending value
        value: String,
    },
}

impl DomainError {
    /// Create a type mismatch error
    pub fn type_mismatch(expected: &'static str, actual: &'static str) -> Self {
        Self::TypeMismatch { expected, actual }
    }

    /// Create an out-of-range error
    pub fn out_of_range(target: &'static str, value: impl Into<String>) -> Self {
        Self::OutOfRange {
            target,
            value: value.into(),
        }
    }
}
