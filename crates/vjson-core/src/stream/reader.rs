//! Decoder input over a `Read` source

use crate::{
    config::StreamConfig,
    error::{Error, Position, Result, try_reserve},
    parser::Input,
};
use std::io::{ErrorKind, Read};
use tracing::trace;

/// Read-ahead buffer feeding the decoder from a byte stream.
///
/// Consumed bytes are dropped on the next refill, so residency is bounded by
/// the longest single token plus one read chunk. Line accounting for the
/// dropped prefix is kept so positions stay absolute.
pub struct StreamInput<R> {
    reader: R,
    buf: Vec<u8>,
    pos: usize,
    chunk: usize,
    eof: bool,
    /// Absolute offset of `buf[0]`
    base: usize,
    /// Newlines seen before `buf[0]`
    lines_before: usize,
    /// Absolute offset of the first byte of the current line, if before `buf[0]`
    line_start: usize,
}

impl<R: Read> StreamInput<R> {
    /// Wrap `reader` with default buffer sizes
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, StreamConfig::default())
    }

    /// Wrap `reader` with custom buffer sizes
    pub fn with_config(reader: R, config: StreamConfig) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            pos: 0,
            chunk: config.read_chunk(),
            eof: false,
            base: 0,
            lines_before: 0,
            line_start: 0,
        }
    }

    /// Give back the underlying reader
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Current buffer capacity
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Drop consumed bytes, remembering their newlines
    fn compact(&mut self) {
        if self.pos == 0 {
            return;
        }
        let dropped = &self.buf[..self.pos];
        self.lines_before += memchr::memchr_iter(b'\n', dropped).count();
        if let Some(nl) = memchr::memrchr(b'\n', dropped) {
            self.line_start = self.base + nl + 1;
        }
        self.buf.drain(..self.pos);
        self.base += self.pos;
        self.pos = 0;
    }
}

impl<R: Read> Input for StreamInput<R> {
    #[inline]
    fn window(&self) -> &[u8] {
        &self.buf[self.pos..]
    }

    #[inline]
    fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.buf.len());
    }

    fn fill(&mut self) -> Result<bool> {
        if self.eof {
            return Ok(false);
        }
        self.compact();

        let len = self.buf.len();
        if self.buf.capacity() - len < self.chunk {
            let before = self.buf.capacity();
            try_reserve(&mut self.buf, self.chunk)?;
            trace!(
                "Stream buffer grown from {} to {} bytes",
                before,
                self.buf.capacity()
            );
        }
        self.buf.resize(len + self.chunk, 0);
        let read = loop {
            match self.reader.read(&mut self.buf[len..]) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.buf.truncate(len);
                    return Err(Error::Io(e));
                }
            }
        };
        self.buf.truncate(len + read);
        if read == 0 {
            self.eof = true;
            return Ok(false);
        }
        Ok(true)
    }

    fn offset(&self) -> usize {
        self.base + self.pos
    }

    fn position_at(&self, delta: usize) -> Position {
        let at = (self.pos + delta).min(self.buf.len());
        let head = &self.buf[..at];
        let line = self.lines_before + memchr::memchr_iter(b'\n', head).count() + 1;
        let line_start = memchr::memrchr(b'\n', head).map_or(self.line_start, |nl| self.base + nl + 1);
        let offset = self.base + at;
        Position::new(offset, line, offset - line_start + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Hands out at most `step` bytes per read
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, out: &mut [u8]) -> std::io::Result<usize> {
            let n = self.step.min(out.len()).min(self.data.len());
            out[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_fill_keeps_unconsumed_bytes() {
        let mut input = StreamInput::new(Trickle {
            data: b"abcdef",
            step: 2,
        });
        assert!(input.fill().unwrap());
        assert_eq!(input.window(), b"ab");
        input.advance(1);
        assert!(input.fill().unwrap());
        assert_eq!(input.window(), b"bcd");
        assert_eq!(input.offset(), 1);
    }

    #[test]
    fn test_positions_survive_compaction() {
        let mut input = StreamInput::new(Trickle {
            data: b"a\nbc\nde",
            step: 3,
        });
        while input.fill().unwrap() {
            let n = input.window().len().saturating_sub(1);
            input.advance(n);
        }
        let tail = input.window().len();
        let position = input.position_at(tail.saturating_sub(1));
        assert_eq!(position.line, 3);
        assert_eq!(position.offset, 6);
        assert_eq!(position.column, 2);
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut input = StreamInput::new(Cursor::new(Vec::<u8>::new()));
        assert!(!input.fill().unwrap());
        assert!(!input.fill().unwrap());
    }

    #[test]
    fn test_read_error_is_io() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk on fire"))
            }
        }
        let err = StreamInput::new(Broken).fill().unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Io);
    }
}
