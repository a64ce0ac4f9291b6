//! # vjson
//!
//! JSON codec compatible with a widely deployed dynamic-language dialect.
//! Decodes UTF-8 bytes into [`Value`] trees and encodes any [`Source`] back to
//! bytes, with configurable separators, `NaN`/`Infinity` handling, ASCII
//! escaping, user hooks, and streaming adapters over `Read`/`Write`.
//!
//! ```
//! let value = vjson_rs::decode(br#"{"a": [1, 2.5, "x"]}"#).unwrap();
//! assert_eq!(vjson_rs::to_string(&value).unwrap(), r#"{"a":[1,2.5,"x"]}"#);
//! ```

#![warn(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod config;
pub mod encoder;
pub mod error;
pub mod hooks;
pub mod number;
pub mod parser;
pub mod security;
pub mod stream;

pub use vjson_rs_domain::{DomainError, DomainResult, Map, Value};

pub use config::{BigIntPolicy, DecodeConfig, EncodeConfig, StreamConfig, SurrogatePolicy};
pub use encoder::{Elements, Encoder, Entries, Key, Node, Sink, Source};
pub use error::{Error, ErrorKind, Position, Result};
pub use hooks::{DefaultHook, HookError, ObjectHook};
pub use parser::{Decoder, Input, Scanner, SliceInput, Token, TokenKind};
pub use security::DepthTracker;
pub use stream::{StreamInput, StreamSink};

use std::io::{Read, Write};

/// Decode one document from memory with default configuration
pub fn decode(bytes: &[u8]) -> Result<Value> {
    Decoder::new().decode(bytes)
}

/// Decode one document from a reader with default configuration
pub fn decode_stream<R: Read>(reader: R) -> Result<Value> {
    Decoder::new().decode_reader(reader)
}

/// Encode with default configuration
pub fn encode<T: Source>(value: &T) -> Result<Vec<u8>> {
    Encoder::new().encode(value)
}

/// Encode into a writer with default configuration
pub fn encode_stream<T: Source, W: Write>(value: &T, writer: W) -> Result<()> {
    Encoder::new().encode_to_writer(value, writer)
}

/// Encode with default configuration into a `String`
pub fn to_string<T: Source>(value: &T) -> Result<String> {
    Encoder::new().encode_to_string(value)
}

/// Re-export commonly used types
pub mod prelude {
    pub use super::{
        DecodeConfig, Decoder, DefaultHook, EncodeConfig, Encoder, Error, ErrorKind, HookError,
        Key, Map, Node, ObjectHook, Position, Result, Source, Value,
    };
}
