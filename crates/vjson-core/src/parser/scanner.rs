//! Token scanning primitives and a slice tokenizer built on them
//!
//! The primitives work on a window of bytes and report when they run off its
//! end, so the decoder can refill a streaming buffer and resume. [`Scanner`]
//! drives the same primitives over one complete slice.

use crate::{
    error::{Error, Position, Result},
    parser::simd,
};

/// Outcome of scanning the body of a string literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringScan {
    /// Closing quote found at `end`
    Closed {
        /// Index of the closing quote
        end: usize,
        /// A backslash escape occurred in the body
        escaped: bool,
    },
    /// The window ended inside the literal; scan again from `resume` once
    /// more bytes are available
    Open {
        /// Index to resume scanning from
        resume: usize,
        /// A backslash escape occurred so far
        escaped: bool,
    },
    /// Raw control character inside the literal
    Control {
        /// Index of the offending byte
        at: usize,
    },
}

/// Scan a string body starting at `from` (just past the opening quote, or a
/// previous `resume` index).
pub fn scan_string(window: &[u8], from: usize, escaped: bool, allow_control: bool) -> StringScan {
    let mut i = from;
    let mut escaped = escaped;
    loop {
        i = simd::find_string_special(window, i);
        let Some(&byte) = window.get(i) else {
            return StringScan::Open { resume: i, escaped };
        };
        match byte {
            b'"' => return StringScan::Closed { end: i, escaped },
            b'\\' => {
                escaped = true;
                if i + 1 >= window.len() {
                    return StringScan::Open { resume: i, escaped };
                }
                i += 2;
            }
            _ if allow_control => i += 1,
            _ => return StringScan::Control { at: i },
        }
    }
}

/// Candidate number span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberScan {
    /// End of the maximal run of `[0-9+-.eE]`
    pub end: usize,
    /// The run reached the end of the window
    pub at_end: bool,
}

/// Find the maximal number candidate starting at `from`; grammar is checked
/// separately
pub fn scan_number(window: &[u8], from: usize) -> NumberScan {
    let len = window[from.min(window.len())..]
        .iter()
        .take_while(|&&b| matches!(b, b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E'))
        .count();
    let end = from + len;
    NumberScan {
        end,
        at_end: end >= window.len(),
    }
}

/// Result of a fixed-length keyword comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralMatch {
    /// Keyword present
    Matched,
    /// Bytes differ from the keyword
    Mismatch,
    /// The window is too short to decide
    NeedMore,
}

/// Compare `window[at..]` against `keyword`
pub fn match_literal(window: &[u8], at: usize, keyword: &[u8]) -> LiteralMatch {
    let available = &window[at.min(window.len())..];
    if available.len() >= keyword.len() {
        if &available[..keyword.len()] == keyword {
            LiteralMatch::Matched
        } else {
            LiteralMatch::Mismatch
        }
    } else if keyword.starts_with(available) {
        LiteralMatch::NeedMore
    } else {
        LiteralMatch::Mismatch
    }
}

/// Keywords and the token they produce, keyed by first byte
pub(crate) fn keyword_for(first: u8, second: Option<u8>) -> Option<(&'static [u8], TokenKind)> {
    Some(match (first, second) {
        (b't', _) => (b"true", TokenKind::True),
        (b'f', _) => (b"false", TokenKind::False),
        (b'n', _) => (b"null", TokenKind::Null),
        (b'N', _) => (b"NaN", TokenKind::NaN),
        (b'I', _) => (b"Infinity", TokenKind::Infinity),
        (b'-', Some(b'I')) => (b"-Infinity", TokenKind::NegInfinity),
        (b'-', Some(b'N')) => (b"-NaN", TokenKind::NaN),
        _ => return None,
    })
}

/// Structural token categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `{`
    BeginObject,
    /// `}`
    EndObject,
    /// `[`
    BeginArray,
    /// `]`
    EndArray,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// String literal, quotes included
    String,
    /// Number candidate
    Number,
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
    /// `NaN` or `-NaN`
    NaN,
    /// `Infinity`
    Infinity,
    /// `-Infinity`
    NegInfinity,
}

/// One token located in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Category
    pub kind: TokenKind,
    /// Byte offset of the first byte
    pub start: usize,
    /// Length in bytes
    pub len: usize,
    /// String literal contains a backslash escape
    pub escaped: bool,
}

impl Token {
    /// Offset just past the token
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Raw bytes of the token
    pub fn text<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        &input[self.start..self.end()]
    }
}

/// Tokenizer over a complete slice
///
/// ```
/// use vjson_rs::parser::{Scanner, TokenKind};
///
/// let kinds: Vec<_> = Scanner::new(br#"{"a": [1, true]}"#)
///     .map(|token| token.unwrap().kind)
///     .collect();
/// assert_eq!(kinds[0], TokenKind::BeginObject);
/// assert_eq!(kinds.len(), 9);
/// ```
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> Scanner<'a> {
    /// Create a scanner at the start of `input`
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            failed: false,
        }
    }

    /// Offset of the next unread byte
    pub fn position(&self) -> usize {
        self.pos
    }

    fn error(&mut self, at: usize, message: &str) -> Error {
        self.failed = true;
        Error::malformed(Position::locate(self.input, at), message)
    }

    /// Return the next token, `None` at end of input
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        let start = simd::skip_whitespace(self.input, self.pos);
        self.pos = start;
        let Some(&first) = self.input.get(start) else {
            return Ok(None);
        };

        let single = |kind| Token {
            kind,
            start,
            len: 1,
            escaped: false,
        };
        let token = match first {
            b'{' => single(TokenKind::BeginObject),
            b'}' => single(TokenKind::EndObject),
            b'[' => single(TokenKind::BeginArray),
            b']' => single(TokenKind::EndArray),
            b':' => single(TokenKind::Colon),
            b',' => single(TokenKind::Comma),
            b'"' => match scan_string(self.input, start + 1, false, false) {
                StringScan::Closed { end, escaped } => Token {
                    kind: TokenKind::String,
                    start,
                    len: end + 1 - start,
                    escaped,
                },
                StringScan::Open { .. } => {
                    return Err(self.error(start, "Unterminated string starting at"));
                }
                StringScan::Control { at } => {
                    return Err(self.error(at, "Invalid control character at"));
                }
            },
            _ => {
                let second = self.input.get(start + 1).copied();
                if let Some((keyword, kind)) = keyword_for(first, second) {
                    if match_literal(self.input, start, keyword) != LiteralMatch::Matched {
                        return Err(self.error(start, "Expecting value"));
                    }
                    Token {
                        kind,
                        start,
                        len: keyword.len(),
                        escaped: false,
                    }
                } else if first == b'-' || first.is_ascii_digit() {
                    let span = scan_number(self.input, start);
                    Token {
                        kind: TokenKind::Number,
                        start,
                        len: span.end - start,
                        escaped: false,
                    }
                } else {
                    return Err(self.error(start, "Unexpected character"));
                }
            }
        };
        self.pos = token.end();
        Ok(Some(token))
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.next_token().transpose()
    }
}
