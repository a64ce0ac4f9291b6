//! String literal body to `String` conversion

use crate::config::SurrogatePolicy;

/// Why a literal body could not be converted; `at` indexes into the body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnescapeError {
    Syntax { at: usize, message: &'static str },
    Utf8 { at: usize },
    Alloc { requested: usize },
}

/// Convert the bytes between the quotes of a string literal.
///
/// Without escapes the body is validated and copied in one step. Otherwise
/// raw runs between backslashes are copied and each escape is resolved,
/// combining `\uD8xx\uDCxx` pairs into one scalar value.
pub(crate) fn unescape(
    body: &[u8],
    escaped: bool,
    surrogates: SurrogatePolicy,
) -> Result<String, UnescapeError> {
    let mut out = String::new();
    out.try_reserve(body.len())
        .map_err(|_| UnescapeError::Alloc {
            requested: body.len(),
        })?;
    if !escaped {
        out.push_str(utf8(body, 0)?);
        return Ok(out);
    }

    let mut i = 0;
    while i < body.len() {
        let slash = memchr::memchr(b'\\', &body[i..]).map_or(body.len(), |p| i + p);
        out.push_str(utf8(&body[i..slash], i)?);
        if slash == body.len() {
            break;
        }
        i = resolve_escape(body, slash, surrogates, &mut out)?;
    }
    Ok(out)
}

fn utf8(bytes: &[u8], base: usize) -> Result<&str, UnescapeError> {
    std::str::from_utf8(bytes).map_err(|e| UnescapeError::Utf8 {
        at: base + e.valid_up_to(),
    })
}

/// Resolve the escape whose backslash is at `at`; returns the index after it
fn resolve_escape(
    body: &[u8],
    at: usize,
    surrogates: SurrogatePolicy,
    out: &mut String,
) -> Result<usize, UnescapeError> {
    let invalid = UnescapeError::Syntax {
        at,
        message: "Invalid \\escape",
    };
    let short = match body.get(at + 1) {
        Some(b'"') => '"',
        Some(b'\\') => '\\',
        Some(b'/') => '/',
        Some(b'b') => '\u{8}',
        Some(b'f') => '\u{c}',
        Some(b'n') => '\n',
        Some(b'r') => '\r',
        Some(b't') => '\t',
        Some(b'u') => return resolve_unicode(body, at, surrogates, out),
        _ => return Err(invalid),
    };
    out.push(short);
    Ok(at + 2)
}

fn resolve_unicode(
    body: &[u8],
    at: usize,
    surrogates: SurrogatePolicy,
    out: &mut String,
) -> Result<usize, UnescapeError> {
    let unit = hex4(body, at + 2).ok_or(UnescapeError::Syntax {
        at,
        message: "Invalid \\uXXXX escape",
    })?;
    let mut next = at + 6;
    let scalar = match unit {
        0xD800..=0xDBFF => {
            let low = match (body.get(next..next + 2), hex4(body, next + 2)) {
                (Some(b"\\u"), Some(low @ 0xDC00..=0xDFFF)) => Some(low),
                _ => None,
            };
            match low {
                Some(low) => {
                    next += 6;
                    Some(0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00))
                }
                None => None,
            }
        }
        0xDC00..=0xDFFF => None,
        _ => Some(unit),
    };
    match scalar.and_then(char::from_u32) {
        Some(c) => out.push(c),
        None => match surrogates {
            SurrogatePolicy::Replace => out.push(char::REPLACEMENT_CHARACTER),
            SurrogatePolicy::Reject => {
                return Err(UnescapeError::Syntax {
                    at,
                    message: "Unpaired surrogate in \\u escape",
                });
            }
        },
    }
    Ok(next)
}

fn hex4(body: &[u8], at: usize) -> Option<u32> {
    let digits = body.get(at..at + 4)?;
    digits.iter().try_fold(0u32, |acc, &d| {
        let v = (d as char).to_digit(16)?;
        Some(acc << 4 | v)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(body: &str) -> Result<String, UnescapeError> {
        unescape(body.as_bytes(), true, SurrogatePolicy::Replace)
    }

    #[test]
    fn test_short_escapes() {
        assert_eq!(run(r#"a\"b\\c\/d\b\f\n\r\t"#).unwrap(), "a\"b\\c/d\u{8}\u{c}\n\r\t");
    }

    #[test]
    fn test_unicode_escapes() {
        assert_eq!(run(r"\u0041\u00e9\u554a").unwrap(), "Aé啊");
        assert_eq!(run(r"\ud800\udc00").unwrap(), "\u{10000}");
        assert_eq!(run(r"\uD83D\uDE00!").unwrap(), "😀!");
    }

    #[test]
    fn test_lone_surrogates_replaced() {
        assert_eq!(run(r"\ud800").unwrap(), "\u{fffd}");
        assert_eq!(run(r"\udc00x").unwrap(), "\u{fffd}x");
        assert_eq!(run(r"\ud800\u0041").unwrap(), "\u{fffd}A");
    }

    #[test]
    fn test_lone_surrogate_rejected() {
        let err = unescape(br"ab\ud800", true, SurrogatePolicy::Reject).unwrap_err();
        assert!(matches!(err, UnescapeError::Syntax { at: 2, .. }));
    }

    #[test]
    fn test_invalid_escapes() {
        assert!(matches!(run(r"\x"), Err(UnescapeError::Syntax { at: 0, .. })));
        assert!(matches!(run(r"ab\u12"), Err(UnescapeError::Syntax { at: 2, .. })));
        assert!(matches!(run(r"\u12g4"), Err(UnescapeError::Syntax { .. })));
    }

    #[test]
    fn test_invalid_utf8_position() {
        let err = unescape(b"ok\xffno", false, SurrogatePolicy::Replace).unwrap_err();
        assert_eq!(err, UnescapeError::Utf8 { at: 2 });
        let err = unescape(b"\\n\xc3", true, SurrogatePolicy::Replace).unwrap_err();
        assert_eq!(err, UnescapeError::Utf8 { at: 2 });
    }
}
