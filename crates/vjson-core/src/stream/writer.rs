//! Encoder sink over a `Write` destination

use crate::{
    config::StreamConfig,
    encoder::Sink,
    error::{Error, Result, try_reserve},
};
use std::io::Write;
use tracing::trace;

/// Buffers encoder output and writes it out in bursts of at most
/// `flush_threshold` bytes.
///
/// If a write fails the destination holds a prefix of the document; the
/// error is returned and the caller should discard what was written.
pub struct StreamSink<W: Write> {
    writer: W,
    buf: Vec<u8>,
    threshold: usize,
    written: usize,
}

impl<W: Write> StreamSink<W> {
    /// Wrap `writer` with the default flush threshold
    pub fn new(writer: W) -> Self {
        Self::with_config(writer, StreamConfig::default())
    }

    /// Wrap `writer` with a custom flush threshold
    pub fn with_config(writer: W, config: StreamConfig) -> Self {
        Self {
            writer,
            buf: Vec::new(),
            threshold: config.flush_at(),
            written: 0,
        }
    }

    /// Bytes handed to the writer so far
    pub fn bytes_written(&self) -> usize {
        self.written
    }

    /// Give back the underlying writer; unflushed bytes are discarded
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn drain(&mut self) -> Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        trace!("Flushing {} encoded bytes", self.buf.len());
        self.writer.write_all(&self.buf).map_err(Error::Io)?;
        self.written += self.buf.len();
        self.buf.clear();
        Ok(())
    }
}

impl<W: Write> Sink for StreamSink<W> {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let mut rest = bytes;
        while !rest.is_empty() {
            let room = self.threshold - self.buf.len();
            let (now, later) = rest.split_at(room.min(rest.len()));
            try_reserve(&mut self.buf, now.len())?;
            self.buf.extend_from_slice(now);
            if self.buf.len() >= self.threshold {
                self.drain()?;
            }
            rest = later;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.drain()?;
        self.writer.flush().map_err(Error::Io)
    }
}
