//! Wide-register byte classification for parsing and escaping hot paths
//!
//! On x86_64 with the `simd-auto` feature the scans use SSE2, which is part of
//! the target baseline and needs no runtime detection. Every other target
//! classifies eight bytes at a time in a `u64`. Both paths finish with a
//! scalar loop over the tail.

/// JSON insignificant whitespace
#[inline(always)]
pub fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

/// Bytes that end a raw run inside a string literal
#[inline(always)]
fn is_string_special(byte: u8) -> bool {
    byte == b'"' || byte == b'\\' || byte < 0x20
}

/// Bytes the encoder cannot copy verbatim
#[inline(always)]
fn is_escapable(byte: u8, ascii_only: bool) -> bool {
    is_string_special(byte) || (ascii_only && byte >= 0x7f)
}

/// Index of the first non-whitespace byte at or after `from`, or `bytes.len()`
#[inline]
pub fn skip_whitespace(bytes: &[u8], from: usize) -> usize {
    let mut i = from;
    // Most tokens are preceded by at most one whitespace byte.
    match bytes.get(i) {
        None => return bytes.len().max(from),
        Some(&b) if !is_whitespace(b) => return i,
        Some(_) => i += 1,
    }
    #[cfg(all(feature = "simd-auto", target_arch = "x86_64"))]
    {
        i = sse2::skip_whitespace(bytes, i);
    }
    while i < bytes.len() && is_whitespace(bytes[i]) {
        i += 1;
    }
    i
}

/// Index of the first `"`, `\` or control byte at or after `from`, or `bytes.len()`
#[inline]
pub fn find_string_special(bytes: &[u8], from: usize) -> usize {
    find_class(bytes, from, false)
}

/// Index of the first byte the encoder must escape, or `bytes.len()`.
///
/// With `ascii_only` every byte from `0x7f` up counts as well.
#[inline]
pub fn find_escapable(bytes: &[u8], from: usize, ascii_only: bool) -> usize {
    find_class(bytes, from, ascii_only)
}

#[inline]
fn find_class(bytes: &[u8], from: usize, high: bool) -> usize {
    if from >= bytes.len() {
        return bytes.len().max(from);
    }
    #[cfg(all(feature = "simd-auto", target_arch = "x86_64"))]
    let mut i = sse2::find_class(bytes, from, high);
    #[cfg(not(all(feature = "simd-auto", target_arch = "x86_64")))]
    let mut i = swar::find_class(bytes, from, high);
    while i < bytes.len() && !is_escapable(bytes[i], high) {
        i += 1;
    }
    i
}

#[cfg(all(feature = "simd-auto", target_arch = "x86_64"))]
mod sse2 {
    use std::arch::x86_64::*;

    const LANES: usize = 16;

    /// Skip whole blocks of whitespace; stops at the exact non-whitespace
    /// byte or where fewer than 16 bytes remain
    pub(super) fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
        while i + LANES <= bytes.len() {
            // SAFETY: `i + LANES <= bytes.len()` keeps the unaligned load in bounds.
            let mask = unsafe {
                let chunk = _mm_loadu_si128(bytes.as_ptr().add(i).cast());
                let space = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b' ' as i8));
                let tab = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b'\t' as i8));
                let lf = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b'\n' as i8));
                let cr = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b'\r' as i8));
                let ws = _mm_or_si128(_mm_or_si128(space, tab), _mm_or_si128(lf, cr));
                _mm_movemask_epi8(ws) as u32
            };
            if mask != 0xFFFF {
                return i + (!mask).trailing_zeros() as usize;
            }
            i += LANES;
        }
        i
    }

    /// Find the block holding the first special byte; returns its exact index
    /// or where fewer than 16 bytes remain
    pub(super) fn find_class(bytes: &[u8], mut i: usize, high: bool) -> usize {
        while i + LANES <= bytes.len() {
            // SAFETY: `i + LANES <= bytes.len()` keeps the unaligned load in bounds.
            let mask = unsafe {
                let chunk = _mm_loadu_si128(bytes.as_ptr().add(i).cast());
                let quote = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b'"' as i8));
                let slash = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b'\\' as i8));
                // unsigned `chunk <= 0x1f`
                let control =
                    _mm_cmpeq_epi8(_mm_min_epu8(chunk, _mm_set1_epi8(0x1f)), chunk);
                let mut hits = _mm_or_si128(_mm_or_si128(quote, slash), control);
                if high {
                    // unsigned `chunk >= 0x7f`
                    let upper = _mm_cmpeq_epi8(_mm_max_epu8(chunk, _mm_set1_epi8(0x7f)), chunk);
                    hits = _mm_or_si128(hits, upper);
                }
                _mm_movemask_epi8(hits) as u32
            };
            if mask != 0 {
                return i + mask.trailing_zeros() as usize;
            }
            i += LANES;
        }
        i
    }
}

#[cfg_attr(all(feature = "simd-auto", target_arch = "x86_64"), allow(dead_code))]
mod swar {
    const ONES: u64 = 0x0101_0101_0101_0101;
    const HIGHS: u64 = 0x8080_8080_8080_8080;

    #[inline(always)]
    fn has_zero(word: u64) -> bool {
        word.wrapping_sub(ONES) & !word & HIGHS != 0
    }

    #[inline(always)]
    fn has_byte(word: u64, byte: u8) -> bool {
        has_zero(word ^ (ONES * u64::from(byte)))
    }

    /// Some byte is below `n`; exact for `n <= 0x80`
    #[inline(always)]
    fn has_less(word: u64, n: u8) -> bool {
        word.wrapping_sub(ONES * u64::from(n)) & !word & HIGHS != 0
    }

    #[inline(always)]
    fn block_has_special(word: u64, high: bool) -> bool {
        has_byte(word, b'"')
            || has_byte(word, b'\\')
            || has_less(word, 0x20)
            || (high && (word & HIGHS != 0 || has_byte(word, 0x7f)))
    }

    /// Skip eight-byte words free of special bytes; returns the start of the
    /// first word holding one, or where fewer than eight bytes remain
    pub(super) fn find_class(bytes: &[u8], from: usize, high: bool) -> usize {
        let mut i = from;
        for chunk in bytes[from..].chunks_exact(8) {
            let word = u64::from_le_bytes(chunk.try_into().unwrap_or([0; 8]));
            if block_has_special(word, high) {
                return i;
            }
            i += 8;
        }
        i
    }

}
