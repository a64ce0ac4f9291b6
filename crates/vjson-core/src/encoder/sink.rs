//! Output side of the encoder

use crate::error::{Result, try_reserve};

/// Destination for encoded bytes.
///
/// A failed write aborts the encode call; whatever reached the sink before
/// the failure is an incomplete document.
pub trait Sink {
    /// Append `bytes`
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()>;

    /// Append one byte
    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.write_bytes(&[byte])
    }

    /// Called once after the last byte of a document
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl Sink for Vec<u8> {
    #[inline]
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        try_reserve(self, bytes.len())?;
        self.extend_from_slice(bytes);
        Ok(())
    }

    #[inline]
    fn write_byte(&mut self, byte: u8) -> Result<()> {
        try_reserve(self, 1)?;
        self.push(byte);
        Ok(())
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_bytes(bytes)
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        (**self).write_byte(byte)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}
