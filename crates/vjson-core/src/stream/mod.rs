//! Streaming adapters
//!
//! [`StreamInput`] puts a `Read` source behind the decoder's [`Input`](crate::parser::Input)
//! cursor, and [`StreamSink`] puts a `Write` destination behind the
//! encoder's [`Sink`](crate::encoder::Sink). Both report failures of the
//! underlying stream as [`Error::Io`](crate::Error::Io).

mod reader;
mod writer;

pub use reader::StreamInput;
pub use writer::StreamSink;
