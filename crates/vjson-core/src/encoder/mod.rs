//! JSON encoding: depth-first serializer over any [`Source`]
//!
//! `Value` trees take a direct path; other host types are walked through the
//! [`Source`] contract with cycle detection on their containers.

pub mod escape;
mod sink;
mod source;

pub use sink::Sink;
pub use source::{Elements, Entries, Key, Node, Source};

use crate::{
    config::{EncodeConfig, StreamConfig},
    error::{Error, Result},
    hooks::DefaultHook,
    number,
    security::DepthTracker,
    stream::StreamSink,
};
use ahash::AHashSet;
use std::io::Write;
use tracing::debug;
use vjson_rs_domain::Value;

/// Configured encoder; one instance can serve any number of calls
pub struct Encoder<'h> {
    config: EncodeConfig,
    stream: StreamConfig,
    default: Option<Box<dyn DefaultHook + 'h>>,
}

impl<'h> Encoder<'h> {
    /// Create an encoder with default configuration
    pub fn new() -> Self {
        Self::with_config(EncodeConfig::default())
    }

    /// Create an encoder with custom configuration
    pub fn with_config(config: EncodeConfig) -> Self {
        Self {
            config,
            stream: StreamConfig::default(),
            default: None,
        }
    }

    /// Consult `hook` for values with no JSON representation
    pub fn with_default(mut self, hook: impl DefaultHook + 'h) -> Self {
        self.default = Some(Box::new(hook));
        self
    }

    /// Override the buffering used by [`Encoder::encode_to_writer`]
    pub fn with_stream_config(mut self, stream: StreamConfig) -> Self {
        self.stream = stream;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &EncodeConfig {
        &self.config
    }

    /// Encode into a new buffer
    pub fn encode<T: Source>(&mut self, value: &T) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.encode_into(value, &mut out)?;
        Ok(out)
    }

    /// Encode into a new `String`
    pub fn encode_to_string<T: Source>(&mut self, value: &T) -> Result<String> {
        Ok(String::from_utf8(self.encode(value)?)?)
    }

    /// Encode into a writer, flushing in bounded bursts
    pub fn encode_to_writer<T: Source, W: Write>(&mut self, value: &T, writer: W) -> Result<()> {
        let mut sink = StreamSink::with_config(writer, self.stream);
        self.encode_into(value, &mut sink)
    }

    /// Encode into any sink
    pub fn encode_into<T: Source, S: Sink + ?Sized>(&mut self, value: &T, sink: &mut S) -> Result<()> {
        debug!("Encoding {}", value.type_name());
        let walked = {
            let mut walk = Walk {
                config: &self.config,
                default: self.default.as_deref_mut(),
                sink: &mut *sink,
                depth: DepthTracker::with_max_depth(self.config.max_depth),
                open: AHashSet::new(),
                floats: number::Buffer::new(),
                ints: itoa::Buffer::new(),
            };
            walk.source(value)
        };
        let result = walked.and_then(|()| sink.finish());
        if let Err(err) = &result {
            debug!("Encode failed: {}", err);
        }
        result
    }
}

impl Default for Encoder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// State of one encode call
struct Walk<'c, 'h, S: ?Sized> {
    config: &'c EncodeConfig,
    default: Option<&'c mut (dyn DefaultHook + 'h)>,
    sink: &'c mut S,
    depth: DepthTracker,
    /// Containers currently being written, by (identity, type name)
    open: AHashSet<(usize, &'static str)>,
    floats: number::Buffer,
    ints: itoa::Buffer,
}

impl<S: Sink + ?Sized> Walk<'_, '_, S> {
    fn source(&mut self, value: &dyn Source) -> Result<()> {
        if let Some(value) = value.as_value() {
            return self.value(value);
        }
        match value.node() {
            Node::Null => self.sink.write_bytes(b"null"),
            Node::Bool(b) => self.boolean(b),
            Node::Int(i) => self.int(i),
            Node::UInt(u) => {
                let text = self.ints.format(u);
                self.sink.write_bytes(text.as_bytes())
            }
            Node::Float(f) => self.float(f),
            Node::BigInt(text) => self.sink.write_bytes(text.as_bytes()),
            Node::Str(s) => escape::write_str(&mut *self.sink, s, self.config.ensure_ascii),
            Node::Array(items) => self.array(value, items),
            Node::Object(entries) => self.object(value, entries),
            Node::Unsupported => self.fallback(value),
        }
    }

    /// Owned `Value` trees are acyclic, so only depth is tracked here
    fn value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.sink.write_bytes(b"null"),
            Value::Bool(b) => self.boolean(*b),
            Value::Int(i) => self.int(*i),
            Value::Float(f) => self.float(*f),
            Value::BigInt(text) => self.sink.write_bytes(text.as_bytes()),
            Value::String(s) => escape::write_str(&mut *self.sink, s, self.config.ensure_ascii),
            Value::Array(items) => {
                self.depth.enter()?;
                self.sink.write_byte(b'[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.array_separator()?;
                    }
                    self.value(item)?;
                }
                self.sink.write_byte(b']')?;
                self.depth.exit();
                Ok(())
            }
            Value::Object(map) => {
                self.depth.enter()?;
                self.open_object()?;
                for (i, (key, item)) in map.iter().enumerate() {
                    self.member_prefix(i == 0)?;
                    escape::write_str(&mut *self.sink, key, self.config.ensure_ascii)?;
                    self.key_separator()?;
                    self.value(item)?;
                }
                self.close_object(!map.is_empty())?;
                self.depth.exit();
                Ok(())
            }
        }
    }

    fn array(&mut self, owner: &dyn Source, items: Elements<'_>) -> Result<()> {
        self.enter(owner)?;
        self.sink.write_byte(b'[')?;
        for (i, item) in items.enumerate() {
            if i > 0 {
                self.array_separator()?;
            }
            self.source(item)?;
        }
        self.sink.write_byte(b']')?;
        self.exit(owner);
        Ok(())
    }

    fn object(&mut self, owner: &dyn Source, entries: Entries<'_>) -> Result<()> {
        self.enter(owner)?;
        self.open_object()?;
        let mut written = 0usize;
        for (key, item) in entries {
            let coerce = self.config.coerce_scalar_keys;
            match key {
                Key::Str(_) => {}
                Key::Null | Key::Bool(_) | Key::Int(_) | Key::Float(_) if coerce => {}
                _ if self.config.skip_keys => continue,
                other => return Err(Error::unsupported_key(other.type_name())),
            }
            self.member_prefix(written == 0)?;
            self.key(key)?;
            self.key_separator()?;
            self.source(item)?;
            written += 1;
        }
        self.close_object(written > 0)?;
        self.exit(owner);
        Ok(())
    }

    fn key(&mut self, key: Key<'_>) -> Result<()> {
        let text = match key {
            Key::Str(s) => return escape::write_str(&mut *self.sink, s, self.config.ensure_ascii),
            Key::Null => "null",
            Key::Bool(true) => "true",
            Key::Bool(false) => "false",
            Key::Int(i) => self.ints.format(i),
            Key::Float(f) => {
                self.check_finite(f)?;
                self.floats.format(f)
            }
            Key::Other(name) => return Err(Error::unsupported_key(name)),
        };
        self.sink.write_byte(b'"')?;
        self.sink.write_bytes(text.as_bytes())?;
        self.sink.write_byte(b'"')
    }

    fn fallback(&mut self, value: &dyn Source) -> Result<()> {
        let Some(hook) = self.default.as_deref_mut() else {
            return Err(Error::unsupported_type(value.type_name()));
        };
        let substitute = hook.call(value).map_err(|source| Error::Callback {
            hook: "default",
            position: None,
            source,
        })?;
        self.value(&substitute)
    }

    fn enter(&mut self, owner: &dyn Source) -> Result<()> {
        self.depth.enter()?;
        if self.config.check_circular && !self.open.insert(identity(owner)) {
            return Err(Error::cyclic(owner.type_name()));
        }
        Ok(())
    }

    fn exit(&mut self, owner: &dyn Source) {
        self.depth.exit();
        if self.config.check_circular {
            self.open.remove(&identity(owner));
        }
    }

    fn boolean(&mut self, b: bool) -> Result<()> {
        self.sink
            .write_bytes(if b { b"true".as_slice() } else { b"false".as_slice() })
    }

    fn int(&mut self, i: i64) -> Result<()> {
        let text = self.ints.format(i);
        self.sink.write_bytes(text.as_bytes())
    }

    fn float(&mut self, f: f64) -> Result<()> {
        self.check_finite(f)?;
        let text = self.floats.format(f);
        self.sink.write_bytes(text.as_bytes())
    }

    /// Values and keys alike may only be non-finite under `allow_nan`
    fn check_finite(&self, f: f64) -> Result<()> {
        if f.is_finite() || self.config.allow_nan {
            return Ok(());
        }
        let literal = if f.is_nan() {
            "NaN"
        } else if f > 0.0 {
            "Infinity"
        } else {
            "-Infinity"
        };
        Err(Error::ValueNotAllowed { literal })
    }

    fn array_separator(&mut self) -> Result<()> {
        self.sink.write_bytes(self.config.item_separator.as_bytes())?;
        if self.config.format {
            self.sink.write_byte(b' ')?;
        }
        Ok(())
    }

    fn open_object(&mut self) -> Result<()> {
        self.sink.write_byte(b'{')?;
        if self.config.format {
            self.sink.write_byte(b'\n')?;
        }
        Ok(())
    }

    /// Separator before all but the first member, then indentation
    fn member_prefix(&mut self, first: bool) -> Result<()> {
        if !first {
            self.sink.write_bytes(self.config.item_separator.as_bytes())?;
            if self.config.format {
                self.sink.write_byte(b'\n')?;
            }
        }
        if self.config.format {
            self.indent(self.depth.current_depth())?;
        }
        Ok(())
    }

    fn key_separator(&mut self) -> Result<()> {
        self.sink.write_bytes(self.config.key_separator.as_bytes())?;
        if self.config.format {
            self.sink.write_byte(b'\t')?;
        }
        Ok(())
    }

    fn close_object(&mut self, any_members: bool) -> Result<()> {
        if self.config.format {
            if any_members {
                self.sink.write_byte(b'\n')?;
            }
            self.indent(self.depth.current_depth().saturating_sub(1))?;
        }
        self.sink.write_byte(b'}')
    }

    fn indent(&mut self, tabs: usize) -> Result<()> {
        for _ in 0..tabs {
            self.sink.write_byte(b'\t')?;
        }
        Ok(())
    }
}

/// Address plus type name, so a wrapper and its first field stay distinct.
/// Names compare by content; equal literals need not share an address.
fn identity(owner: &dyn Source) -> (usize, &'static str) {
    (owner.identity(), owner.type_name())
}
