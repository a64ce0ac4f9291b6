//! Double formatter and number literal parsing
//!
//! Stateless apart from the power-of-ten table, which is built once on first
//! use and shared read-only by every thread.

mod format;
mod parse;

pub use format::{Buffer, format_f64};
pub use parse::{NumberKind, check_grammar, parse_f64, parse_i64};
