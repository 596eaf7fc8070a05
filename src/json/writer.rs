//! Event handler that renders minified JSON.

use std::fmt::Write as _;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::{EventHandler, NumberCodec, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    /// Top level, before any container is open.
    None,
    Object,
    Array,
}

/// One frame of the writer's delimiter state: just enough to emit the right
/// commas, colons and brackets.
struct State {
    container: Container,
    size: usize,
}

impl State {
    fn new(container: Container) -> Self {
        State { container, size: 0 }
    }

    /// Runs the delimiter rule before an element is emitted: a comma between
    /// elements, except between a key and its value in an object, which take
    /// a colon. Object keys sit at even indices, values at odd ones.
    fn start_element(&mut self, out: &mut String) {
        debug_assert!(self.container != Container::None || self.size == 0);
        if self.size != 0 {
            let delimiter = if self.size % 2 == 0 || self.container == Container::Array {
                ','
            } else {
                ':'
            };
            out.push(delimiter);
        }
        self.size += 1;
    }
}

/// Event handler that appends minified JSON to a caller-owned string.
///
/// Doubles go through the injected [`NumberCodec`]; strings are escaped per
/// the wire rules (printable ASCII passes through, everything else becomes a
/// lowercase `\uxxxx` escape, surrogate halves separately); binary blobs are
/// rendered as base64 strings. On `handle_error` the status lands in the
/// caller's slot and the output is cleared, after which further events are
/// ignored: the string is empty-or-complete, never a truncated prefix.
pub struct JsonWriter<'a> {
    codec: &'a dyn NumberCodec,
    out: &'a mut String,
    status: &'a mut Option<Status>,
    state: Vec<State>,
}

impl<'a> JsonWriter<'a> {
    pub fn new(
        codec: &'a dyn NumberCodec,
        out: &'a mut String,
        status: &'a mut Option<Status>,
    ) -> Self {
        *status = None;
        JsonWriter {
            codec,
            out,
            status,
            state: vec![State::new(Container::None)],
        }
    }

    fn top(&mut self) -> &mut State {
        self.state.last_mut().expect("state stack never empty")
    }

    fn start_element(&mut self) {
        let out = &mut *self.out;
        self.state
            .last_mut()
            .expect("state stack never empty")
            .start_element(out);
    }
}

impl EventHandler for JsonWriter<'_> {
    fn handle_object_begin(&mut self) {
        if self.status.is_some() {
            return;
        }
        self.start_element();
        self.state.push(State::new(Container::Object));
        self.out.push('{');
    }

    fn handle_object_end(&mut self) {
        if self.status.is_some() {
            return;
        }
        debug_assert!(self.state.len() >= 2);
        debug_assert_eq!(self.top().container, Container::Object);
        self.state.pop();
        self.out.push('}');
    }

    fn handle_array_begin(&mut self) {
        if self.status.is_some() {
            return;
        }
        self.start_element();
        self.state.push(State::new(Container::Array));
        self.out.push('[');
    }

    fn handle_array_end(&mut self) {
        if self.status.is_some() {
            return;
        }
        debug_assert!(self.state.len() >= 2);
        debug_assert_eq!(self.top().container, Container::Array);
        self.state.pop();
        self.out.push(']');
    }

    fn handle_string16(&mut self, chars: &[u16]) {
        if self.status.is_some() {
            return;
        }
        self.start_element();
        self.out.push('"');
        for &ch in chars {
            match ch {
                0x22 => self.out.push_str("\\\""),
                0x5c => self.out.push_str("\\\\"),
                0x08 => self.out.push_str("\\b"),
                0x0c => self.out.push_str("\\f"),
                0x0a => self.out.push_str("\\n"),
                0x0d => self.out.push_str("\\r"),
                0x09 => self.out.push_str("\\t"),
                32..=126 => self.out.push(ch as u8 as char),
                _ => {
                    // Four lowercase hex digits, most significant nibble
                    // first. Surrogate halves are emitted separately, never
                    // re-paired.
                    let _ = write!(self.out, "\\u{ch:04x}");
                }
            }
        }
        self.out.push('"');
    }

    fn handle_binary(&mut self, bytes: &[u8]) {
        if self.status.is_some() {
            return;
        }
        self.start_element();
        self.out.push('"');
        self.out.push_str(&BASE64.encode(bytes));
        self.out.push('"');
    }

    fn handle_double(&mut self, value: f64) {
        if self.status.is_some() {
            return;
        }
        self.start_element();
        let formatted = self.codec.format_f64(value);
        self.out.push_str(&formatted);
    }

    fn handle_int32(&mut self, value: i32) {
        if self.status.is_some() {
            return;
        }
        self.start_element();
        self.out.push_str(&value.to_string());
    }

    fn handle_bool(&mut self, value: bool) {
        if self.status.is_some() {
            return;
        }
        self.start_element();
        self.out.push_str(if value { "true" } else { "false" });
    }

    fn handle_null(&mut self) {
        if self.status.is_some() {
            return;
        }
        self.start_element();
        self.out.push_str("null");
    }

    fn handle_error(&mut self, status: Status) {
        *self.status = Some(status);
        self.out.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::JsonError;
    use crate::StdNumberCodec;

    fn utf16(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    #[test]
    fn writes_a_full_document() {
        let mut out = String::new();
        let mut status = None;
        let mut writer = JsonWriter::new(&StdNumberCodec, &mut out, &mut status);
        writer.handle_object_begin();
        writer.handle_string16(&utf16("msg1"));
        writer.handle_string16(&utf16("Hello, \u{1f30e}."));
        writer.handle_string16(&utf16("msg2"));
        writer.handle_string16(&utf16("\\\u{8}\r\n\t\u{c}\""));
        writer.handle_string16(&utf16("nested"));
        writer.handle_object_begin();
        writer.handle_string16(&utf16("double"));
        writer.handle_double(3.1415);
        writer.handle_string16(&utf16("int"));
        writer.handle_int32(-42);
        writer.handle_string16(&utf16("bool"));
        writer.handle_bool(false);
        writer.handle_string16(&utf16("null"));
        writer.handle_null();
        writer.handle_object_end();
        writer.handle_string16(&utf16("array"));
        writer.handle_array_begin();
        writer.handle_int32(1);
        writer.handle_int32(2);
        writer.handle_int32(3);
        writer.handle_array_end();
        writer.handle_object_end();
        drop(writer);
        assert_eq!(status, None);
        assert_eq!(
            out,
            "{\"msg1\":\"Hello, \\ud83c\\udf0e.\",\
             \"msg2\":\"\\\\\\b\\r\\n\\t\\f\\\"\",\
             \"nested\":{\"double\":3.1415,\"int\":-42,\"bool\":false,\"null\":null},\
             \"array\":[1,2,3]}"
        );
    }

    #[test]
    fn control_characters_use_lowercase_hex() {
        let mut out = String::new();
        let mut status = None;
        let mut writer = JsonWriter::new(&StdNumberCodec, &mut out, &mut status);
        writer.handle_string16(&[0x01, 0x1f, 0x7f, 0x0b, 0xabcd]);
        drop(writer);
        assert_eq!(out, "\"\\u0001\\u001f\\u007f\\u000b\\uabcd\"");
    }

    #[test]
    fn binary_is_rendered_as_base64() {
        let mut out = String::new();
        let mut status = None;
        let mut writer = JsonWriter::new(&StdNumberCodec, &mut out, &mut status);
        writer.handle_array_begin();
        writer.handle_binary(b"Hello, world.");
        writer.handle_binary(&[0xde, 0xad, 0xbe, 0xef]);
        writer.handle_array_end();
        drop(writer);
        assert_eq!(out, "[\"SGVsbG8sIHdvcmxkLg==\",\"3q2+7w==\"]");
    }

    #[test]
    fn error_records_status_and_clears_output() {
        let mut out = String::new();
        let mut status = None;
        let mut writer = JsonWriter::new(&StdNumberCodec, &mut out, &mut status);
        writer.handle_object_begin();
        writer.handle_string16(&utf16("msg1"));
        writer.handle_error(Status::new(JsonError::ValueExpected, 42));
        writer.handle_null();
        writer.handle_object_end();
        drop(writer);
        assert_eq!(status, Some(Status::new(JsonError::ValueExpected, 42)));
        assert_eq!(out, "");
    }

    #[test]
    fn top_level_scalar_has_no_delimiters() {
        let mut out = String::new();
        let mut status = None;
        let mut writer = JsonWriter::new(&StdNumberCodec, &mut out, &mut status);
        writer.handle_double(0.25);
        drop(writer);
        assert_eq!(out, "0.25");
    }
}
