//! Shortest round-trip double formatting
//!
//! `ryu` produces the shortest digit string that reads back to the same bits;
//! this module only re-lays those digits out the way the reference dialect's
//! `repr` does: positional notation while the decimal exponent is in
//! `[-4, 16)`, `d.ddde±XX` otherwise, and a trailing `.0` on integral values.

/// Longest output: sign, 17 digits, point, `e-308`
const CAPACITY: usize = 32;

/// Decimal exponents at or beyond these bounds switch to scientific notation
const SCI_LOW: i32 = -4;
const SCI_HIGH: i32 = 16;

/// Stack buffer holding one formatted double.
///
/// ```
/// let mut buf = vjson_rs::number::Buffer::new();
/// assert_eq!(buf.format(1e16), "1e+16");
/// assert_eq!(buf.format(0.1), "0.1");
/// assert_eq!(buf.format(f64::NEG_INFINITY), "-Infinity");
/// ```
pub struct Buffer {
    bytes: [u8; CAPACITY],
    len: usize,
    digits: ryu::Buffer,
}

impl Buffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self {
            bytes: [0; CAPACITY],
            len: 0,
            digits: ryu::Buffer::new(),
        }
    }

    /// Format `value`, spelling non-finite values `NaN`, `Infinity`, `-Infinity`
    pub fn format(&mut self, value: f64) -> &str {
        if value.is_nan() {
            return "NaN";
        }
        if value.is_infinite() {
            return if value > 0.0 { "Infinity" } else { "-Infinity" };
        }
        self.format_finite(value)
    }

    /// Format a finite value
    pub fn format_finite(&mut self, value: f64) -> &str {
        self.len = 0;
        let shortest = self.digits.format_finite(value);
        let (negative, digits, decpt) = decompose(shortest.as_bytes());
        let mut out = Writer {
            bytes: &mut self.bytes,
            len: 0,
        };
        if negative {
            out.push(b'-');
        }
        let ndigits = digits.len() as i32;
        if decpt <= SCI_LOW || decpt > SCI_HIGH {
            out.push(digits.as_slice()[0]);
            if ndigits > 1 {
                out.push(b'.');
                out.extend(&digits.as_slice()[1..]);
            }
            out.push(b'e');
            let exp = decpt - 1;
            out.push(if exp < 0 { b'-' } else { b'+' });
            let exp = exp.unsigned_abs();
            if exp < 10 {
                out.push(b'0');
            }
            let mut int = itoa::Buffer::new();
            out.extend(int.format(exp).as_bytes());
        } else if decpt <= 0 {
            out.extend(b"0.");
            for _ in 0..-decpt {
                out.push(b'0');
            }
            out.extend(digits.as_slice());
        } else if decpt < ndigits {
            let (int, frac) = digits.as_slice().split_at(decpt as usize);
            out.extend(int);
            out.push(b'.');
            out.extend(frac);
        } else {
            out.extend(digits.as_slice());
            for _ in 0..decpt - ndigits {
                out.push(b'0');
            }
            out.extend(b".0");
        }
        self.len = out.len;
        // Only ASCII digits, signs, '.', 'e' were written.
        std::str::from_utf8(&self.bytes[..self.len]).unwrap_or("")
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

struct Writer<'a> {
    bytes: &'a mut [u8; CAPACITY],
    len: usize,
}

impl Writer<'_> {
    fn push(&mut self, byte: u8) {
        self.bytes[self.len] = byte;
        self.len += 1;
    }

    fn extend(&mut self, bytes: &[u8]) {
        self.bytes[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
    }
}

/// Significant digits without leading or trailing zeros
struct Digits {
    bytes: [u8; 24],
    len: usize,
}

impl Digits {
    fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    fn len(&self) -> usize {
        self.len
    }
}

/// Split ryu output (`-1.25e-7`, `0.001`, `1e16`, `123.0`) into sign,
/// significant digits, and the decimal point position relative to them:
/// value = 0.DIGITS * 10^decpt
fn decompose(text: &[u8]) -> (bool, Digits, i32) {
    let (negative, text) = match text.split_first() {
        Some((b'-', rest)) => (true, rest),
        _ => (false, text),
    };
    let (mantissa, exp) = match memchr::memchr(b'e', text) {
        Some(at) => (&text[..at], parse_exp(&text[at + 1..])),
        None => (text, 0),
    };
    let int_len = memchr::memchr(b'.', mantissa).unwrap_or(mantissa.len());

    let mut digits = Digits {
        bytes: [0; 24],
        len: 0,
    };
    let mut decpt = int_len as i32 + exp;
    let mut leading = true;
    for &b in mantissa.iter().filter(|b| b.is_ascii_digit()) {
        if leading && b == b'0' {
            decpt -= 1;
            continue;
        }
        leading = false;
        digits.bytes[digits.len] = b;
        digits.len += 1;
    }
    while digits.len > 0 && digits.bytes[digits.len - 1] == b'0' {
        digits.len -= 1;
    }
    if digits.len == 0 {
        digits.bytes[0] = b'0';
        digits.len = 1;
        decpt = 1;
    }
    (negative, digits, decpt)
}

fn parse_exp(text: &[u8]) -> i32 {
    let (sign, digits) = match text.split_first() {
        Some((b'-', rest)) => (-1, rest),
        Some((b'+', rest)) => (1, rest),
        _ => (1, text),
    };
    sign * digits
        .iter()
        .fold(0i32, |acc, d| acc * 10 + i32::from(d - b'0'))
}

/// Format a double into a new `String`
pub fn format_f64(value: f64) -> String {
    Buffer::new().format(value).to_owned()
}
