//! Number literal validation and conversion

use once_cell::sync::Lazy;

/// Exact powers of ten representable as doubles
static POW10: Lazy<[f64; 23]> = Lazy::new(|| {
    let mut table = [1.0; 23];
    for i in 1..table.len() {
        table[i] = table[i - 1] * 10.0;
    }
    table
});

/// Mantissas below 2^53 convert to doubles exactly
const MAX_EXACT_DIGITS: u32 = 15;

/// Shape of a literal that passed the JSON number grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    /// `-?(0|[1-9][0-9]*)`
    Integer,
    /// Has a fraction or an exponent
    Decimal,
}

/// Check `text` against `-?(0|[1-9]\d*)(\.\d+)?([eE][+-]?\d+)?`.
///
/// On failure returns the index of the first offending byte (or `text.len()`
/// when the literal ends early).
pub fn check_grammar(text: &[u8]) -> Result<NumberKind, usize> {
    let mut i = 0;
    if text.first() == Some(&b'-') {
        i += 1;
    }
    match text.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => i += digit_run(&text[i..]),
        _ => return Err(i),
    }
    let mut kind = NumberKind::Integer;
    if text.get(i) == Some(&b'.') {
        i += 1;
        let run = digit_run(&text[i..]);
        if run == 0 {
            return Err(i);
        }
        i += run;
        kind = NumberKind::Decimal;
    }
    if matches!(text.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(text.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let run = digit_run(&text[i..]);
        if run == 0 {
            return Err(i);
        }
        i += run;
        kind = NumberKind::Decimal;
    }
    if i == text.len() { Ok(kind) } else { Err(i) }
}

fn digit_run(text: &[u8]) -> usize {
    text.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Parse a grammar-checked integer literal; `None` when it does not fit
pub fn parse_i64(text: &[u8]) -> Option<i64> {
    let (negative, digits) = match text.split_first() {
        Some((b'-', rest)) => (true, rest),
        _ => (false, text),
    };
    let mut acc: i64 = 0;
    for &d in digits {
        let d = i64::from(d.wrapping_sub(b'0'));
        acc = acc.checked_mul(10)?;
        acc = if negative {
            acc.checked_sub(d)?
        } else {
            acc.checked_add(d)?
        };
    }
    Some(acc)
}

/// Parse a JSON number literal into the nearest double.
///
/// Returns `None` if `text` is not a JSON number. Literals beyond the double
/// range become `±inf`; literals below it become `±0.0`.
pub fn parse_f64(text: &[u8]) -> Option<f64> {
    check_grammar(text).ok()?;
    Some(fast_path(text).unwrap_or_else(|| slow_path(text)))
}

// Clinger: an exact mantissa times an exact power of ten rounds once.
fn fast_path(text: &[u8]) -> Option<f64> {
    let (negative, body) = match text.split_first() {
        Some((b'-', rest)) => (true, rest),
        _ => (false, text),
    };
    let mut mantissa: u64 = 0;
    let mut significant = 0u32;
    let mut frac_digits = 0i32;
    let mut in_frac = false;
    let mut rest = body;
    while let Some((&b, tail)) = rest.split_first() {
        match b {
            b'0'..=b'9' => {
                if mantissa != 0 || b != b'0' {
                    significant += 1;
                    if significant > MAX_EXACT_DIGITS {
                        return None;
                    }
                }
                mantissa = mantissa * 10 + u64::from(b - b'0');
                if in_frac {
                    frac_digits += 1;
                }
            }
            b'.' => in_frac = true,
            _ => break,
        }
        rest = tail;
    }
    let mut exp: i32 = 0;
    if let Some((_, tail)) = rest.split_first() {
        let (sign, digits) = match tail.split_first() {
            Some((b'-', d)) => (-1, d),
            Some((b'+', d)) => (1, d),
            _ => (1, tail),
        };
        if digits.len() > 4 {
            return None;
        }
        exp = sign
            * digits
                .iter()
                .fold(0i32, |acc, d| acc * 10 + i32::from(d - b'0'));
    }

    let value = if mantissa == 0 {
        0.0
    } else {
        let exp = exp - frac_digits;
        let scale = *POW10.get(exp.unsigned_abs() as usize)?;
        if exp < 0 {
            mantissa as f64 / scale
        } else {
            mantissa as f64 * scale
        }
    };
    Some(if negative { -value } else { value })
}

fn slow_path(text: &[u8]) -> f64 {
    // Grammar-checked input is ASCII, and core's parser rounds correctly.
    std::str::from_utf8(text)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(f64::NAN)
}
