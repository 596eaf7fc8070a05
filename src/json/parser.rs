//! JSON tokenizer and recursive-descent parser.

use crate::json::JsonError;
use crate::{EventHandler, NumberCodec, Status};

const STACK_LIMIT: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    ObjectBegin,
    ObjectEnd,
    ArrayBegin,
    ArrayEnd,
    StringLiteral,
    Number,
    BoolTrue,
    BoolFalse,
    Null,
    ListSeparator,
    ObjectPairSeparator,
    InvalidToken,
    NoInput,
}

#[inline]
fn unit<C: Copy + Into<u16>>(c: C) -> u16 {
    c.into()
}

/// Whitespace between tokens: space, LF, VT, FF, CR. Horizontal tab is not
/// in this set.
#[inline]
fn is_space_or_newline(c: u16) -> bool {
    c == b' ' as u16 || c == b'\n' as u16 || c == 0x0b || c == 0x0c || c == b'\r' as u16
}

/// Skips a `//` or `/* */` comment starting at `start`. Returns the offset
/// just past the comment, or `None` if there is no well-formed comment here.
/// A line comment may run to end-of-input; a block comment must close.
fn skip_comment<C: Copy + Into<u16>>(chars: &[C], start: usize) -> Option<usize> {
    if start >= chars.len() || unit(chars[start]) != b'/' as u16 || start + 1 >= chars.len() {
        return None;
    }
    let mut pos = start + 1;
    if unit(chars[pos]) == b'/' as u16 {
        pos += 1;
        while pos < chars.len() {
            let c = unit(chars[pos]);
            if c == b'\n' as u16 || c == b'\r' as u16 {
                return Some(pos + 1);
            }
            pos += 1;
        }
        return Some(chars.len());
    }
    if unit(chars[pos]) == b'*' as u16 {
        let mut previous = 0u16;
        pos += 1;
        while pos < chars.len() {
            let c = unit(chars[pos]);
            if previous == b'*' as u16 && c == b'/' as u16 {
                return Some(pos + 1);
            }
            previous = c;
            pos += 1;
        }
        return None;
    }
    None
}

fn skip_whitespace_and_comments<C: Copy + Into<u16>>(chars: &[C], start: usize) -> usize {
    let mut pos = start;
    while pos < chars.len() {
        if is_space_or_newline(unit(chars[pos])) {
            pos += 1;
        } else if let Some(comment_end) = skip_comment(chars, pos) {
            pos = comment_end;
        } else {
            break;
        }
    }
    pos
}

/// Matches one of the literal tokens (`null`, `true`, `false`) exactly.
fn parse_const_token<C: Copy + Into<u16>>(chars: &[C], start: usize, token: &str) -> Option<usize> {
    let bytes = token.as_bytes();
    if chars.len() - start < bytes.len() {
        return None;
    }
    for (i, &b) in bytes.iter().enumerate() {
        if unit(chars[start + i]) != b as u16 {
            return None;
        }
    }
    Some(start + bytes.len())
}

/// Reads a run of digits. Leading zeros are only allowed where the grammar
/// says so (fraction and exponent parts).
fn read_int<C: Copy + Into<u16>>(
    chars: &[C],
    start: usize,
    allow_leading_zeros: bool,
) -> Option<usize> {
    let mut pos = start;
    while pos < chars.len() {
        let c = unit(chars[pos]);
        if !(b'0' as u16..=b'9' as u16).contains(&c) {
            break;
        }
        pos += 1;
    }
    let length = pos - start;
    if length == 0 {
        return None;
    }
    if !allow_leading_zeros && length > 1 && unit(chars[start]) == b'0' as u16 {
        return None;
    }
    Some(pos)
}

/// Grabs a number literal: `[minus] int [frac] [exp]` per RFC 4627. Range
/// is validated later, when the literal is converted.
fn parse_number_token<C: Copy + Into<u16>>(chars: &[C], start: usize) -> Option<usize> {
    let mut pos = start;
    if pos < chars.len() && unit(chars[pos]) == b'-' as u16 {
        pos += 1;
    }
    pos = read_int(chars, pos, false)?;
    if pos == chars.len() {
        return Some(pos);
    }

    if unit(chars[pos]) == b'.' as u16 {
        pos += 1;
        pos = read_int(chars, pos, true)?;
        if pos == chars.len() {
            return Some(pos);
        }
    }

    let c = unit(chars[pos]);
    if c == b'e' as u16 || c == b'E' as u16 {
        pos += 1;
        if pos == chars.len() {
            return None;
        }
        let c = unit(chars[pos]);
        if c == b'-' as u16 || c == b'+' as u16 {
            pos += 1;
            if pos == chars.len() {
                return None;
            }
        }
        pos = read_int(chars, pos, true)?;
    }
    Some(pos)
}

fn read_hex_digits<C: Copy + Into<u16>>(chars: &[C], start: usize, digits: usize) -> Option<usize> {
    if chars.len() - start < digits {
        return None;
    }
    for i in 0..digits {
        let c = unit(chars[start + i]);
        let ok = (b'0' as u16..=b'9' as u16).contains(&c)
            || (b'a' as u16..=b'f' as u16).contains(&c)
            || (b'A' as u16..=b'F' as u16).contains(&c);
        if !ok {
            return None;
        }
    }
    Some(start + digits)
}

/// Scans a string literal body starting just after the opening quote;
/// returns the offset past the closing quote. Escape sequences are only
/// shape-checked here; expansion happens in [`decode_string`].
fn parse_string_token<C: Copy + Into<u16>>(chars: &[C], start: usize) -> Option<usize> {
    let mut pos = start;
    while pos < chars.len() {
        let c = unit(chars[pos]);
        pos += 1;
        if c == b'\\' as u16 {
            if pos == chars.len() {
                return None;
            }
            let escaped = unit(chars[pos]);
            pos += 1;
            match escaped {
                c if c == b'x' as u16 => pos = read_hex_digits(chars, pos, 2)?,
                c if c == b'u' as u16 => pos = read_hex_digits(chars, pos, 4)?,
                c if c == b'\\' as u16
                    || c == b'/' as u16
                    || c == b'b' as u16
                    || c == b'f' as u16
                    || c == b'n' as u16
                    || c == b'r' as u16
                    || c == b't' as u16
                    || c == b'v' as u16
                    || c == b'"' as u16 => {}
                _ => return None,
            }
        } else if c == b'"' as u16 {
            return Some(pos);
        }
    }
    None
}

/// Returns the next token together with its start and end offsets, after
/// skipping whitespace and comments.
fn parse_token<C: Copy + Into<u16>>(chars: &[C], start: usize) -> (Token, usize, usize) {
    let token_start = skip_whitespace_and_comments(chars, start);
    if token_start == chars.len() {
        return (Token::NoInput, token_start, token_start);
    }
    let c = unit(chars[token_start]);
    let c8 = if c < 0x80 { c as u8 } else { 0 };
    let parsed = match c8 {
        b'n' => parse_const_token(chars, token_start, "null").map(|end| (Token::Null, end)),
        b't' => parse_const_token(chars, token_start, "true").map(|end| (Token::BoolTrue, end)),
        b'f' => parse_const_token(chars, token_start, "false").map(|end| (Token::BoolFalse, end)),
        b'[' => Some((Token::ArrayBegin, token_start + 1)),
        b']' => Some((Token::ArrayEnd, token_start + 1)),
        b'{' => Some((Token::ObjectBegin, token_start + 1)),
        b'}' => Some((Token::ObjectEnd, token_start + 1)),
        b',' => Some((Token::ListSeparator, token_start + 1)),
        b':' => Some((Token::ObjectPairSeparator, token_start + 1)),
        b'0'..=b'9' | b'-' => {
            parse_number_token(chars, token_start).map(|end| (Token::Number, end))
        }
        b'"' => parse_string_token(chars, token_start + 1).map(|end| (Token::StringLiteral, end)),
        _ => None,
    };
    match parsed {
        Some((token, token_end)) => (token, token_start, token_end),
        None => (Token::InvalidToken, token_start, token_start),
    }
}

#[inline]
fn hex_to_int(c: u16) -> Option<u16> {
    match c {
        c if (b'0' as u16..=b'9' as u16).contains(&c) => Some(c - b'0' as u16),
        c if (b'a' as u16..=b'f' as u16).contains(&c) => Some(c - b'a' as u16 + 10),
        c if (b'A' as u16..=b'F' as u16).contains(&c) => Some(c - b'A' as u16 + 10),
        _ => None,
    }
}

/// Expands the escapes of a string literal body (the code units between the
/// quotes) into UTF-16 code units. `\uXXXX` yields the raw 16-bit value with
/// no surrogate pairing or validation; `\x` is rejected here even though the
/// tokenizer lets it through.
fn decode_string<C: Copy + Into<u16>>(chars: &[C]) -> Option<Vec<u16>> {
    let mut output = Vec::with_capacity(chars.len());
    let mut pos = 0;
    while pos < chars.len() {
        let c = unit(chars[pos]);
        pos += 1;
        if c != b'\\' as u16 {
            output.push(c);
            continue;
        }
        if pos == chars.len() {
            return None;
        }
        let c = unit(chars[pos]);
        pos += 1;
        let c8 = if c < 0x80 { c as u8 } else { 0 };
        match c8 {
            b'x' => return None,
            b'"' | b'/' | b'\\' => output.push(c),
            b'b' => output.push(0x08),
            b'f' => output.push(0x0c),
            b'n' => output.push(0x0a),
            b'r' => output.push(0x0d),
            b't' => output.push(0x09),
            b'v' => output.push(0x0b),
            b'u' => {
                if chars.len() - pos < 4 {
                    return None;
                }
                let value = hex_to_int(unit(chars[pos]))? << 12
                    | hex_to_int(unit(chars[pos + 1]))? << 8
                    | hex_to_int(unit(chars[pos + 2]))? << 4
                    | hex_to_int(unit(chars[pos + 3]))?;
                pos += 4;
                output.push(value);
            }
            _ => return None,
        }
    }
    Some(output)
}

/// Parses JSON from a span of 8- or 16-bit code units, delivering events to
/// `handler`.
///
/// 8-bit input is treated as code units in the 0..256 range (no UTF-8
/// decoding); 16-bit input as UTF-16 code units, with surrogate pairs
/// passing through unchanged. At most one error event is delivered, carrying
/// the offset of the offending token, after which no further events follow.
pub fn parse_json<C: Copy + Into<u16>>(
    codec: &dyn NumberCodec,
    chars: &[C],
    handler: &mut dyn EventHandler,
) {
    let mut parser = Parser {
        codec,
        handler,
        error: false,
    };
    parser.parse(chars);
}

struct Parser<'a> {
    codec: &'a dyn NumberCodec,
    handler: &'a mut dyn EventHandler,
    error: bool,
}

impl Parser<'_> {
    fn parse<C: Copy + Into<u16>>(&mut self, chars: &[C]) {
        let mut pos = 0;
        self.parse_value(chars, &mut pos, 0);
        if self.error {
            return;
        }
        if pos != chars.len() {
            self.report(JsonError::UnprocessedInputRemains, pos);
        }
    }

    fn report(&mut self, error: JsonError, pos: usize) {
        // Only the first error is delivered.
        if !self.error {
            self.error = true;
            self.handler.handle_error(Status::new(error, pos));
        }
    }

    /// Converts a number literal to a double through the injected codec. A
    /// 16-bit literal containing non-ASCII units is invalid.
    fn chars_to_double<C: Copy + Into<u16>>(&self, chars: &[C]) -> Option<f64> {
        let mut buffer = String::with_capacity(chars.len());
        for &c in chars {
            let c = unit(c);
            if c & !0x7f != 0 {
                return None;
            }
            buffer.push(c as u8 as char);
        }
        self.codec.parse_f64(&buffer)
    }

    /// Parses one value starting at `*pos`, leaving `*pos` just past the
    /// value and any trailing whitespace or comments. `depth` is the number
    /// of containers currently open.
    fn parse_value<C: Copy + Into<u16>>(&mut self, chars: &[C], pos: &mut usize, depth: usize) {
        let (token, token_start, token_end) = parse_token(chars, *pos);
        match token {
            Token::InvalidToken => {
                self.report(JsonError::InvalidToken, token_start);
                return;
            }
            Token::NoInput => {
                self.report(JsonError::NoInput, token_start);
                return;
            }
            Token::Null => {
                self.handler.handle_null();
                *pos = token_end;
            }
            Token::BoolTrue => {
                self.handler.handle_bool(true);
                *pos = token_end;
            }
            Token::BoolFalse => {
                self.handler.handle_bool(false);
                *pos = token_end;
            }
            Token::Number => {
                let Some(value) = self.chars_to_double(&chars[token_start..token_end]) else {
                    self.report(JsonError::InvalidNumber, token_start);
                    return;
                };
                if value >= i32::MIN as f64
                    && value <= i32::MAX as f64
                    && (value as i32) as f64 == value
                {
                    self.handler.handle_int32(value as i32);
                } else {
                    self.handler.handle_double(value);
                }
                *pos = token_end;
            }
            Token::StringLiteral => {
                let Some(value) = decode_string(&chars[token_start + 1..token_end - 1]) else {
                    self.report(JsonError::InvalidString, token_start);
                    return;
                };
                self.handler.handle_string16(&value);
                *pos = token_end;
            }
            Token::ArrayBegin => {
                if depth >= STACK_LIMIT {
                    self.report(JsonError::StackLimitExceeded, token_start);
                    return;
                }
                self.handler.handle_array_begin();
                *pos = token_end;
                if !self.parse_array_elements(chars, pos, depth) {
                    return;
                }
                self.handler.handle_array_end();
            }
            Token::ObjectBegin => {
                if depth >= STACK_LIMIT {
                    self.report(JsonError::StackLimitExceeded, token_start);
                    return;
                }
                self.handler.handle_object_begin();
                *pos = token_end;
                if !self.parse_object_members(chars, pos, depth) {
                    return;
                }
                self.handler.handle_object_end();
            }
            Token::ObjectEnd
            | Token::ArrayEnd
            | Token::ListSeparator
            | Token::ObjectPairSeparator => {
                self.report(JsonError::ValueExpected, token_start);
                return;
            }
        }
        *pos = skip_whitespace_and_comments(chars, *pos);
    }

    /// Parses `value (',' value)*` up to and including the closing `]`.
    /// Returns false after reporting an error.
    fn parse_array_elements<C: Copy + Into<u16>>(
        &mut self,
        chars: &[C],
        pos: &mut usize,
        depth: usize,
    ) -> bool {
        loop {
            let (token, _, token_end) = parse_token(chars, *pos);
            if token == Token::ArrayEnd {
                *pos = token_end;
                return true;
            }
            self.parse_value(chars, pos, depth + 1);
            if self.error {
                return false;
            }
            // After a value: a comma or the end of the array.
            let (token, token_start, token_end) = parse_token(chars, *pos);
            match token {
                Token::ListSeparator => {
                    *pos = token_end;
                    let (token, token_start, _) = parse_token(chars, *pos);
                    if token == Token::ArrayEnd {
                        self.report(JsonError::UnexpectedArrayEnd, token_start);
                        return false;
                    }
                }
                Token::ArrayEnd => {
                    *pos = token_end;
                    return true;
                }
                _ => {
                    self.report(JsonError::CommaOrArrayEndExpected, token_start);
                    return false;
                }
            }
        }
    }

    /// Parses `key ':' value (',' key ':' value)*` up to and including the
    /// closing `}`. Returns false after reporting an error.
    fn parse_object_members<C: Copy + Into<u16>>(
        &mut self,
        chars: &[C],
        pos: &mut usize,
        depth: usize,
    ) -> bool {
        loop {
            let (token, token_start, token_end) = parse_token(chars, *pos);
            if token == Token::ObjectEnd {
                *pos = token_end;
                return true;
            }
            if token != Token::StringLiteral {
                self.report(JsonError::StringLiteralExpected, token_start);
                return false;
            }
            let Some(key) = decode_string(&chars[token_start + 1..token_end - 1]) else {
                self.report(JsonError::InvalidString, token_start);
                return false;
            };
            self.handler.handle_string16(&key);
            *pos = token_end;

            let (colon, colon_start, colon_end) = parse_token(chars, *pos);
            if colon != Token::ObjectPairSeparator {
                self.report(JsonError::ColonExpected, colon_start);
                return false;
            }
            *pos = colon_end;

            self.parse_value(chars, pos, depth + 1);
            if self.error {
                return false;
            }
            // After a key/value pair: a comma or the end of the object.
            let (token, token_start, token_end) = parse_token(chars, *pos);
            match token {
                Token::ListSeparator => {
                    *pos = token_end;
                    let (token, token_start, _) = parse_token(chars, *pos);
                    if token == Token::ObjectEnd {
                        self.report(JsonError::UnexpectedObjectEnd, token_start);
                        return false;
                    }
                }
                Token::ObjectEnd => {
                    *pos = token_end;
                    return true;
                }
                _ => {
                    self.report(JsonError::CommaOrObjectEndExpected, token_start);
                    return false;
                }
            }
        }
    }
}
