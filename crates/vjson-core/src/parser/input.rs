//! Byte cursor the decoder reads through

use crate::error::{Position, Result};

/// Source of input bytes for the decoder.
///
/// The decoder looks at `window()`, consumes a prefix with `advance`, and
/// asks for more bytes with `fill` when a token runs past the window. `fill`
/// must keep every unconsumed byte, so indices into the window stay valid
/// across a refill.
pub trait Input {
    /// Unconsumed bytes currently available
    fn window(&self) -> &[u8];

    /// Consume `n` bytes from the front of the window
    fn advance(&mut self, n: usize);

    /// Make more bytes available; `Ok(false)` once the source is exhausted
    fn fill(&mut self) -> Result<bool>;

    /// Absolute offset of `window()[0]`
    fn offset(&self) -> usize;

    /// Location of `window()[delta]`
    fn position_at(&self, delta: usize) -> Position;
}

/// Input over one complete in-memory slice
#[derive(Debug, Clone)]
pub struct SliceInput<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> SliceInput<'a> {
    /// Create a cursor at the start of `bytes`
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }
}

impl Input for SliceInput<'_> {
    #[inline]
    fn window(&self) -> &[u8] {
        &self.bytes[self.pos..]
    }

    #[inline]
    fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.bytes.len());
    }

    fn fill(&mut self) -> Result<bool> {
        Ok(false)
    }

    fn offset(&self) -> usize {
        self.pos
    }

    fn position_at(&self, delta: usize) -> Position {
        Position::locate(self.bytes, self.pos + delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_input_advance_and_position() {
        let mut input = SliceInput::new(b"[\n  1]");
        input.advance(4);
        assert_eq!(input.window(), b"1]");
        assert_eq!(input.offset(), 4);
        assert_eq!(input.position_at(0), Position::new(4, 2, 3));
        assert!(!input.fill().unwrap());
        input.advance(100);
        assert!(input.window().is_empty());
    }
}
