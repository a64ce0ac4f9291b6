//! Iterative decoder: grammar state machine over an explicit container stack

use crate::{
    config::{BigIntPolicy, DecodeConfig},
    error::{Error, Result},
    hooks::ObjectHook,
    number::{self, NumberKind},
    parser::{
        input::Input,
        scanner::{self, LiteralMatch, StringScan, TokenKind},
        simd,
        unescape::{UnescapeError, unescape},
    },
    security::DepthTracker,
};
use smallvec::SmallVec;
use vjson_rs_domain::{Map, Value};

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Grammar position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ExpectValue,
    ExpectObjectKeyOrClose,
    ExpectObjectKey,
    ExpectColon,
    ExpectObjectValue,
    ExpectCommaOrObjectClose,
    ExpectArrayValueOrClose,
    ExpectCommaOrArrayClose,
    Done,
}

/// Container under construction
enum Frame {
    Array(Vec<Value>),
    Object { map: Map, key: String },
}

/// One decode call: owns the container stack and borrows the hook
pub(crate) struct Decode<'c, 'h> {
    config: &'c DecodeConfig,
    hook: Option<&'c mut (dyn ObjectHook + 'h)>,
    stack: SmallVec<[Frame; 16]>,
    depth: DepthTracker,
}

impl<'c, 'h> Decode<'c, 'h> {
    pub(crate) fn new(config: &'c DecodeConfig, hook: Option<&'c mut (dyn ObjectHook + 'h)>) -> Self {
        Self {
            config,
            hook,
            stack: SmallVec::new(),
            depth: DepthTracker::with_max_depth(config.max_depth),
        }
    }

    /// Decode exactly one document from `input`
    pub(crate) fn run<I: Input>(mut self, input: &mut I) -> Result<Value> {
        skip_bom(input)?;
        let mut state = State::ExpectValue;
        let mut root = None;

        loop {
            let Some(byte) = skip_whitespace(input)? else {
                if state == State::Done {
                    return self.finish(input, None, root);
                }
                return Err(Error::malformed(input.position_at(0), expectation(state)));
            };

            state = match state {
                State::ExpectValue | State::ExpectObjectValue => {
                    self.value(input, byte, &mut root)?
                }
                State::ExpectArrayValueOrClose if byte == b']' => {
                    input.advance(1);
                    self.close(input, &mut root)?
                }
                State::ExpectArrayValueOrClose => self.value(input, byte, &mut root)?,
                State::ExpectCommaOrArrayClose => match byte {
                    b',' => {
                        input.advance(1);
                        State::ExpectValue
                    }
                    b']' => {
                        input.advance(1);
                        self.close(input, &mut root)?
                    }
                    _ => return Err(unexpected(input, state)),
                },
                State::ExpectObjectKeyOrClose if byte == b'}' => {
                    input.advance(1);
                    self.close(input, &mut root)?
                }
                State::ExpectObjectKeyOrClose | State::ExpectObjectKey => {
                    if byte != b'"' {
                        return Err(unexpected(input, state));
                    }
                    let key = self.string(input)?;
                    if let Some(Frame::Object { key: pending, .. }) = self.stack.last_mut() {
                        *pending = key;
                    }
                    State::ExpectColon
                }
                State::ExpectColon => {
                    if byte != b':' {
                        return Err(unexpected(input, state));
                    }
                    input.advance(1);
                    State::ExpectObjectValue
                }
                State::ExpectCommaOrObjectClose => match byte {
                    b',' => {
                        input.advance(1);
                        State::ExpectObjectKey
                    }
                    b'}' => {
                        input.advance(1);
                        self.close(input, &mut root)?
                    }
                    _ => return Err(unexpected(input, state)),
                },
                State::Done => return self.finish(input, Some(byte), root),
            };
        }
    }

    /// After the top-level value: only whitespace may follow
    fn finish<I: Input>(self, input: &mut I, next: Option<u8>, root: Option<Value>) -> Result<Value> {
        if let Some(byte) = next {
            if self.config.reject_trailing_data {
                let position = input.position_at(0);
                return Err(if starts_value(byte) {
                    Error::trailing(position)
                } else {
                    Error::malformed(position, "Unexpected character after document")
                });
            }
        }
        root.ok_or_else(|| Error::malformed(input.position_at(0), "Expecting value"))
    }

    /// Parse the value starting with `byte`; scalars complete immediately,
    /// containers push a frame
    fn value<I: Input>(&mut self, input: &mut I, byte: u8, root: &mut Option<Value>) -> Result<State> {
        let scalar = match byte {
            b'{' => {
                self.depth.enter_at(Some(input.position_at(0)))?;
                input.advance(1);
                self.stack.push(Frame::Object {
                    map: Map::new(),
                    key: String::new(),
                });
                return Ok(State::ExpectObjectKeyOrClose);
            }
            b'[' => {
                self.depth.enter_at(Some(input.position_at(0)))?;
                input.advance(1);
                self.stack.push(Frame::Array(Vec::new()));
                return Ok(State::ExpectArrayValueOrClose);
            }
            b'"' => Value::String(self.string(input)?),
            _ => {
                let second = peek(input, 1)?;
                match scanner::keyword_for(byte, second) {
                    Some((keyword, kind)) => self.literal(input, keyword, kind)?,
                    None if byte == b'-' || byte.is_ascii_digit() => self.number(input)?,
                    None => {
                        return Err(Error::malformed(input.position_at(0), "Expecting value"));
                    }
                }
            }
        };
        Ok(self.complete(scalar, root))
    }

    /// Attach a finished value to its parent and pick the next state
    fn complete(&mut self, value: Value, root: &mut Option<Value>) -> State {
        match self.stack.last_mut() {
            Some(Frame::Array(items)) => {
                items.push(value);
                State::ExpectCommaOrArrayClose
            }
            Some(Frame::Object { map, key }) => {
                map.insert(std::mem::take(key), value);
                State::ExpectCommaOrObjectClose
            }
            None => {
                *root = Some(value);
                State::Done
            }
        }
    }

    /// Pop the innermost container; objects go through the hook first
    fn close<I: Input>(&mut self, input: &I, root: &mut Option<Value>) -> Result<State> {
        self.depth.exit();
        let value = match self.stack.pop() {
            Some(Frame::Array(items)) => Value::Array(items),
            Some(Frame::Object { map, .. }) => match self.hook.as_deref_mut() {
                Some(hook) => hook.call(map).map_err(|source| Error::Callback {
                    hook: "object_hook",
                    position: Some(input.position_at(0)),
                    source,
                })?,
                None => Value::Object(map),
            },
            None => return Err(Error::malformed(input.position_at(0), "Unbalanced container")),
        };
        Ok(self.complete(value, root))
    }

    fn string<I: Input>(&mut self, input: &mut I) -> Result<String> {
        let mut from = 1;
        let mut escaped = false;
        loop {
            match scanner::scan_string(input.window(), from, escaped, self.config.allow_control_chars) {
                StringScan::Closed { end, escaped } => {
                    let body = &input.window()[1..end];
                    let text = unescape(body, escaped, self.config.surrogates).map_err(|e| match e {
                        UnescapeError::Syntax { at, message } => {
                            Error::malformed(input.position_at(1 + at), message)
                        }
                        UnescapeError::Utf8 { at } => {
                            Error::malformed(input.position_at(1 + at), "Invalid UTF-8 in string")
                        }
                        UnescapeError::Alloc { requested } => Error::allocation(requested),
                    })?;
                    input.advance(end + 1);
                    return Ok(text);
                }
                StringScan::Open { resume, escaped: seen } => {
                    from = resume;
                    escaped = seen;
                    if !input.fill()? {
                        return Err(Error::malformed(
                            input.position_at(0),
                            "Unterminated string starting at",
                        ));
                    }
                }
                StringScan::Control { at } => {
                    return Err(Error::malformed(
                        input.position_at(at),
                        "Invalid control character at",
                    ));
                }
            }
        }
    }

    fn number<I: Input>(&mut self, input: &mut I) -> Result<Value> {
        let end = loop {
            let span = scanner::scan_number(input.window(), 0);
            if !span.at_end || !input.fill()? {
                break span.end;
            }
        };
        if peek(input, end)?.is_some_and(is_word_byte) {
            return Err(Error::malformed(input.position_at(end), "Invalid number literal"));
        }
        let text = &input.window()[..end];
        let kind = number::check_grammar(text)
            .map_err(|at| Error::malformed(input.position_at(at), "Invalid number literal"))?;
        let value = match kind {
            NumberKind::Integer => match number::parse_i64(text) {
                Some(i) => Value::Int(i),
                None => match self.config.big_int {
                    BigIntPolicy::Exact => Value::BigInt(String::from_utf8_lossy(text).into_owned()),
                    BigIntPolicy::Float => Value::Float(parse_float(text, input)?),
                },
            },
            NumberKind::Decimal => Value::Float(parse_float(text, input)?),
        };
        input.advance(end);
        Ok(value)
    }

    fn literal<I: Input>(&mut self, input: &mut I, keyword: &[u8], kind: TokenKind) -> Result<Value> {
        let position = input.position_at(0);
        loop {
            match scanner::match_literal(input.window(), 0, keyword) {
                LiteralMatch::Matched => break,
                LiteralMatch::NeedMore if input.fill()? => continue,
                _ => return Err(Error::malformed(position, "Expecting value")),
            }
        }
        if peek(input, keyword.len())?.is_some_and(is_word_byte) {
            return Err(Error::malformed(position, "Expecting value"));
        }
        let value = match kind {
            TokenKind::True => Value::Bool(true),
            TokenKind::False => Value::Bool(false),
            TokenKind::Null => Value::Null,
            TokenKind::NaN => Value::Float(f64::NAN),
            TokenKind::Infinity => Value::Float(f64::INFINITY),
            TokenKind::NegInfinity => Value::Float(f64::NEG_INFINITY),
            _ => return Err(Error::malformed(position, "Expecting value")),
        };
        if matches!(value, Value::Float(_)) && !self.config.allow_nan {
            return Err(Error::malformed(
                position,
                format!(
                    "Out of range float literal not allowed: {}",
                    String::from_utf8_lossy(keyword)
                ),
            ));
        }
        input.advance(keyword.len());
        Ok(value)
    }
}

fn parse_float<I: Input>(text: &[u8], input: &I) -> Result<f64> {
    number::parse_f64(text)
        .ok_or_else(|| Error::malformed(input.position_at(0), "Invalid number literal"))
}

fn skip_bom<I: Input>(input: &mut I) -> Result<()> {
    while input.window().len() < BOM.len() && BOM.starts_with(input.window()) {
        if !input.fill()? {
            return Ok(());
        }
    }
    if input.window().starts_with(BOM) {
        input.advance(BOM.len());
    }
    Ok(())
}

/// Skip whitespace, refilling as needed; the next byte or `None` at end of input
fn skip_whitespace<I: Input>(input: &mut I) -> Result<Option<u8>> {
    loop {
        let window = input.window();
        let i = simd::skip_whitespace(window, 0);
        if let Some(&byte) = window.get(i) {
            input.advance(i);
            return Ok(Some(byte));
        }
        let consumed = window.len();
        input.advance(consumed);
        if !input.fill()? {
            return Ok(None);
        }
    }
}

fn peek<I: Input>(input: &mut I, at: usize) -> Result<Option<u8>> {
    loop {
        if let Some(&byte) = input.window().get(at) {
            return Ok(Some(byte));
        }
        if !input.fill()? {
            return Ok(None);
        }
    }
}

/// A number or keyword must not run straight into one of these
fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'.' || byte == b'_'
}

fn starts_value(byte: u8) -> bool {
    matches!(byte, b'{' | b'[' | b'"' | b'-' | b'0'..=b'9' | b't' | b'f' | b'n' | b'N' | b'I')
}

fn expectation(state: State) -> &'static str {
    match state {
        State::ExpectValue | State::ExpectObjectValue | State::ExpectArrayValueOrClose => {
            "Expecting value"
        }
        State::ExpectObjectKeyOrClose | State::ExpectObjectKey => {
            "Expecting property name enclosed in double quotes"
        }
        State::ExpectColon => "Expecting ':' delimiter",
        State::ExpectCommaOrObjectClose | State::ExpectCommaOrArrayClose => {
            "Expecting ',' delimiter"
        }
        State::Done => "Extra data",
    }
}

fn unexpected<I: Input>(input: &I, state: State) -> Error {
    Error::malformed(input.position_at(0), expectation(state))
}
