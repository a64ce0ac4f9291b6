//! Default limits for decode and encode calls
//!
//! # Tuning
//!
//! - **DEFAULT_MAX_DEPTH**: bounds the decoder's container stack and the
//!   encoder's recursion. Decoding and dropping a `Value` use heap work lists,
//!   so on the decode side the limit only caps memory. The encoder recurses
//!   once per level, so its limit also guards the call stack.
//!
//! - **DEFAULT_READ_CHUNK** / **DEFAULT_FLUSH_THRESHOLD**: granularity of the
//!   streaming adapters. Larger values mean fewer system calls and more
//!   resident memory per call.

/// Maximum container nesting accepted by default
pub const DEFAULT_MAX_DEPTH: usize = 1_000;

/// Bytes requested from a reader per refill
pub const DEFAULT_READ_CHUNK: usize = 64 * 1024;

/// Buffered output size that triggers a write to the underlying writer
pub const DEFAULT_FLUSH_THRESHOLD: usize = 64 * 1024;

/// Smallest accepted chunk size for the streaming adapters
pub const MIN_CHUNK: usize = 64;
