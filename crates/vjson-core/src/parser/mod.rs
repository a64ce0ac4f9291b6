//! JSON decoding: byte classification, tokenizing, and value construction
//!
//! [`Decoder`] is the entry point. It runs the grammar state machine in
//! `decoder` over any [`Input`], which is either a [`SliceInput`] or the
//! streaming reader in [`crate::stream`].

mod decoder;
pub mod input;
pub mod scanner;
pub mod simd;
mod unescape;

pub use input::{Input, SliceInput};
pub use scanner::{Scanner, Token, TokenKind};

use crate::{
    config::{DecodeConfig, StreamConfig},
    error::Result,
    hooks::ObjectHook,
    stream::StreamInput,
};
use std::io::Read;
use tracing::debug;
use vjson_rs_domain::Value;

/// Configured decoder; one instance can serve any number of calls
pub struct Decoder<'h> {
    config: DecodeConfig,
    stream: StreamConfig,
    object_hook: Option<Box<dyn ObjectHook + 'h>>,
}

impl<'h> Decoder<'h> {
    /// Create a decoder with default configuration
    pub fn new() -> Self {
        Self::with_config(DecodeConfig::default())
    }

    /// Create a decoder with custom configuration
    pub fn with_config(config: DecodeConfig) -> Self {
        Self {
            config,
            stream: StreamConfig::default(),
            object_hook: None,
        }
    }

    /// Apply `hook` to every decoded object, innermost first
    pub fn with_object_hook(mut self, hook: impl ObjectHook + 'h) -> Self {
        self.object_hook = Some(Box::new(hook));
        self
    }

    /// Override the buffer sizes used by [`Decoder::decode_reader`]
    pub fn with_stream_config(mut self, stream: StreamConfig) -> Self {
        self.stream = stream;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Decode one document from memory
    pub fn decode(&mut self, bytes: &[u8]) -> Result<Value> {
        debug!("Decoding {} bytes", bytes.len());
        self.run(&mut SliceInput::new(bytes))
    }

    /// Decode one document from a reader, buffering only what is needed
    pub fn decode_reader<R: Read>(&mut self, reader: R) -> Result<Value> {
        debug!("Decoding from reader, chunk {} bytes", self.stream.read_chunk_size);
        let mut input = StreamInput::with_config(reader, self.stream);
        self.run(&mut input)
    }

    /// Decode from any input
    pub fn decode_input<I: Input>(&mut self, input: &mut I) -> Result<Value> {
        self.run(input)
    }

    fn run<I: Input>(&mut self, input: &mut I) -> Result<Value> {
        let hook = self.object_hook.as_deref_mut();
        let result = decoder::Decode::new(&self.config, hook).run(input);
        if let Err(err) = &result {
            debug!("Decode failed: {}", err);
        }
        result
    }
}

impl Default for Decoder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::HookError;
    use vjson_rs_domain::Map;

    #[test]
    fn test_decoder_creation() {
        let decoder = Decoder::new();
        assert_eq!(decoder.config().max_depth, 1000);
    }

    #[test]
    fn test_decoder_reuse() {
        let mut decoder = Decoder::new();
        assert_eq!(decoder.decode(b"[1]").unwrap().len(), 1);
        assert_eq!(decoder.decode(b"[1, 2]").unwrap().len(), 2);
    }

    #[test]
    fn test_hook_sees_inner_first() {
        let mut order = Vec::new();
        let mut decoder = Decoder::new().with_object_hook(|map: Map| -> std::result::Result<Value, HookError> {
            order.push(map.len());
            Ok(Value::Object(map))
        });
        decoder.decode(br#"{"a": {"b": 1, "c": 2}}"#).unwrap();
        drop(decoder);
        assert_eq!(order, [2, 1]);
    }

    #[test]
    fn test_reader_matches_slice() {
        let text = br#"{"k": [1, 2.5, "s", null]}"#;
        let from_slice = Decoder::new().decode(text).unwrap();
        let from_reader = Decoder::new().decode_reader(&text[..]).unwrap();
        assert_eq!(from_slice, from_reader);
    }
}
