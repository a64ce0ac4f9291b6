//! Decoder, encoder and stream configuration
//!
//! Every config has a `Default` matching the reference dialect, a couple of
//! named presets, and serde support so it can be loaded from a settings file.

pub mod limits;

use serde::{Deserialize, Serialize};

pub use limits::{DEFAULT_FLUSH_THRESHOLD, DEFAULT_MAX_DEPTH, DEFAULT_READ_CHUNK};

/// Treatment of integral literals that do not fit into `i64`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BigIntPolicy {
    /// Keep the literal text as `Value::BigInt`
    #[default]
    Exact,
    /// Convert to the nearest double
    Float,
}

/// Treatment of `\u` escapes that name an unpaired UTF-16 surrogate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurrogatePolicy {
    /// Substitute U+FFFD
    #[default]
    Replace,
    /// Fail with `MalformedJson`
    Reject,
}

/// Decoder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Maximum container nesting
    pub max_depth: usize,
    /// Accept `NaN`, `Infinity`, `-Infinity` and `-NaN` literals
    pub allow_nan: bool,
    /// Fail when non-whitespace follows the top-level value
    pub reject_trailing_data: bool,
    /// Accept raw control characters inside strings
    pub allow_control_chars: bool,
    /// Out-of-range integer handling
    pub big_int: BigIntPolicy,
    /// Lone surrogate handling
    pub surrogates: SurrogatePolicy,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_nan: true,
            reject_trailing_data: true,
            allow_control_chars: false,
            big_int: BigIntPolicy::Exact,
            surrogates: SurrogatePolicy::Replace,
        }
    }
}

impl DecodeConfig {
    /// RFC 8259 only: no `NaN`/`Infinity`, lone surrogates rejected
    pub fn strict() -> Self {
        Self {
            allow_nan: false,
            surrogates: SurrogatePolicy::Reject,
            ..Self::default()
        }
    }

    /// Tolerates raw control characters and stops after the first value
    pub fn lenient() -> Self {
        Self {
            allow_control_chars: true,
            reject_trailing_data: false,
            ..Self::default()
        }
    }

    /// Override the nesting limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Encoder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeConfig {
    /// Write `NaN`/`Infinity`/`-Infinity` instead of failing
    pub allow_nan: bool,
    /// Omit entries whose key is not a string instead of failing
    pub skip_keys: bool,
    /// Write `null`/bool/number keys as quoted JSON text
    pub coerce_scalar_keys: bool,
    /// Escape every non-ASCII character
    pub ensure_ascii: bool,
    /// Text between array items and object members
    pub item_separator: String,
    /// Text between an object key and its value
    pub key_separator: String,
    /// Tab-indented layout for objects
    pub format: bool,
    /// Track open containers and fail on self-reference
    pub check_circular: bool,
    /// Maximum container nesting
    pub max_depth: usize,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            allow_nan: true,
            skip_keys: false,
            coerce_scalar_keys: false,
            ensure_ascii: false,
            item_separator: ",".to_string(),
            key_separator: ":".to_string(),
            format: false,
            check_circular: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EncodeConfig {
    /// ASCII-only output without `NaN`/`Infinity`
    pub fn strict() -> Self {
        Self {
            allow_nan: false,
            ensure_ascii: true,
            ..Self::default()
        }
    }

    /// Tab-indented objects with a space after each item separator
    pub fn pretty() -> Self {
        Self {
            format: true,
            ..Self::default()
        }
    }

    /// Replace both separators
    pub fn with_separators(
        mut self,
        item_separator: impl Into<String>,
        key_separator: impl Into<String>,
    ) -> Self {
        self.item_separator = item_separator.into();
        self.key_separator = key_separator.into();
        self
    }
}

/// Streaming adapter configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Bytes requested from the reader per refill
    pub read_chunk_size: usize,
    /// Buffered bytes that trigger a write
    pub flush_threshold: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            read_chunk_size: DEFAULT_READ_CHUNK,
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
        }
    }
}

impl StreamConfig {
    /// Small buffers for memory-constrained callers
    pub fn low_memory() -> Self {
        Self {
            read_chunk_size: 4 * 1024,
            flush_threshold: 4 * 1024,
        }
    }

    /// Large buffers to minimise system calls
    pub fn high_throughput() -> Self {
        Self {
            read_chunk_size: 1024 * 1024,
            flush_threshold: 1024 * 1024,
        }
    }

    pub(crate) fn read_chunk(&self) -> usize {
        self.read_chunk_size.max(limits::MIN_CHUNK)
    }

    pub(crate) fn flush_at(&self) -> usize {
        self.flush_threshold.max(limits::MIN_CHUNK)
    }
}
