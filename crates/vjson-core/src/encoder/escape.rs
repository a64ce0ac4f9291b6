//! String literal escaping

use crate::{encoder::Sink, error::Result, parser::simd};

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Write `text` as a quoted JSON string.
///
/// `"` and `\` get a backslash, `\b \f \n \r \t` their short forms, and other
/// control characters `\u00xx` with lowercase hex. With `ensure_ascii`, DEL
/// and every non-ASCII character are written as `\uxxxx`, astral characters
/// as a surrogate pair.
pub fn write_str<S: Sink + ?Sized>(sink: &mut S, text: &str, ensure_ascii: bool) -> Result<()> {
    let bytes = text.as_bytes();
    sink.write_byte(b'"')?;
    let mut start = 0;
    while start < bytes.len() {
        let i = simd::find_escapable(bytes, start, ensure_ascii);
        if i > start {
            sink.write_bytes(&bytes[start..i])?;
        }
        let Some(&byte) = bytes.get(i) else {
            break;
        };
        if byte < 0x80 {
            match byte {
                b'"' => sink.write_bytes(b"\\\"")?,
                b'\\' => sink.write_bytes(b"\\\\")?,
                b'\n' => sink.write_bytes(b"\\n")?,
                b'\r' => sink.write_bytes(b"\\r")?,
                b'\t' => sink.write_bytes(b"\\t")?,
                0x08 => sink.write_bytes(b"\\b")?,
                0x0c => sink.write_bytes(b"\\f")?,
                _ => write_unit(sink, u16::from(byte))?,
            }
            start = i + 1;
        } else {
            // The scan stops at the lead byte, so `i` is a char boundary.
            let Some(ch) = text[i..].chars().next() else {
                break;
            };
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write_unit(sink, *unit)?;
            }
            start = i + ch.len_utf8();
        }
    }
    sink.write_byte(b'"')
}

fn write_unit<S: Sink + ?Sized>(sink: &mut S, unit: u16) -> Result<()> {
    let escape = [
        b'\\',
        b'u',
        HEX[usize::from(unit >> 12)],
        HEX[usize::from((unit >> 8) & 0xf)],
        HEX[usize::from((unit >> 4) & 0xf)],
        HEX[usize::from(unit & 0xf)],
    ];
    sink.write_bytes(&escape)
}
