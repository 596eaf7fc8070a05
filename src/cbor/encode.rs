//! Primitive CBOR encoders and the JSON-to-CBOR event handler.

use crate::cbor::constants::{
    initial_byte, ADDITIONAL_1_BYTE, ADDITIONAL_2_BYTES, ADDITIONAL_4_BYTES, ADDITIONAL_8_BYTES,
    BASE64_HINT_TAG, DOUBLE_BYTE, FALSE_BYTE, INDEFINITE_ARRAY_START, INDEFINITE_MAP_START,
    MAJOR_BYTE_STRING, MAJOR_NEGATIVE, MAJOR_STRING, MAJOR_UNSIGNED, NULL_BYTE, STOP_BYTE,
    TRUE_BYTE,
};
use crate::{EventHandler, Status};

/// Writes the start of an item: the initial byte for `major`, then `value`
/// in the smallest width class (embedded, 1, 2, 4 or 8 bytes big-endian).
/// `value` is the payload for integer majors and the length for everything
/// else.
pub fn encode_item_start(major: u8, value: u64, out: &mut Vec<u8>) {
    if value < 24 {
        out.push(initial_byte(major, value as u8));
    } else if value <= u8::MAX as u64 {
        out.push(initial_byte(major, ADDITIONAL_1_BYTE));
        out.push(value as u8);
    } else if value <= u16::MAX as u64 {
        out.push(initial_byte(major, ADDITIONAL_2_BYTES));
        out.extend_from_slice(&(value as u16).to_be_bytes());
    } else if value <= u32::MAX as u64 {
        out.push(initial_byte(major, ADDITIONAL_4_BYTES));
        out.extend_from_slice(&(value as u32).to_be_bytes());
    } else {
        out.push(initial_byte(major, ADDITIONAL_8_BYTES));
        out.extend_from_slice(&value.to_be_bytes());
    }
}

/// Encodes `value` as UNSIGNED (major type 0).
pub fn encode_unsigned(value: u64, out: &mut Vec<u8>) {
    encode_item_start(MAJOR_UNSIGNED, value, out);
}

/// Encodes `value` as UNSIGNED (major type 0) if non-negative, otherwise as
/// NEGATIVE (major type 1) carrying `-(value + 1)`.
pub fn encode_signed(value: i32, out: &mut Vec<u8>) {
    if value >= 0 {
        encode_item_start(MAJOR_UNSIGNED, value as u64, out);
    } else {
        encode_item_start(MAJOR_NEGATIVE, (-1i64 - value as i64) as u64, out);
    }
}

/// Encodes a UTF-16 string as a BYTE_STRING (major type 2) of `2 * len`
/// bytes. Each code unit is written least significant byte first; this is
/// the native representation on the dominant hosts and keeps golden files
/// identical across architectures, unlike the big-endian integer payloads.
pub fn encode_utf16_string(chars: &[u16], out: &mut Vec<u8>) {
    encode_item_start(MAJOR_BYTE_STRING, (chars.len() * 2) as u64, out);
    for &unit in chars {
        out.push(unit as u8);
        out.push((unit >> 8) as u8);
    }
}

/// Encodes a UTF-8 string as STRING (major type 3). The profile restricts
/// these to 7-bit US-ASCII; the reader enforces it.
pub fn encode_utf8_string(bytes: &[u8], out: &mut Vec<u8>) {
    debug_assert!(bytes.iter().all(|&b| b & 0x80 == 0));
    encode_item_start(MAJOR_STRING, bytes.len() as u64, out);
    out.extend_from_slice(bytes);
}

/// Encodes arbitrary bytes as a BYTE_STRING (major type 2) prefixed with tag
/// 22, the hint to render them as base64 in JSON (RFC 7049 section 2.4.4.2).
pub fn encode_binary(bytes: &[u8], out: &mut Vec<u8>) {
    out.push(BASE64_HINT_TAG);
    encode_item_start(MAJOR_BYTE_STRING, bytes.len() as u64, out);
    out.extend_from_slice(bytes);
}

/// Encodes a double as major type 7, additional info 27: the `0xfb` marker
/// followed by the IEEE-754 bit pattern, big-endian.
pub fn encode_double(value: f64, out: &mut Vec<u8>) {
    out.push(DOUBLE_BYTE);
    out.extend_from_slice(&value.to_bits().to_be_bytes());
}

/// Event handler that renders incoming JSON events as the profile's
/// indefinite-length-map envelope into a caller-owned buffer.
///
/// This is a pure transducer: it trusts the upstream parser for structural
/// validity. The first event is expected to be `handle_object_begin`, since
/// a wire message is a map at the top level. On `handle_error` the status
/// lands in the caller's slot and the buffer is cleared, so the output is
/// empty-or-complete, never a truncated prefix.
pub struct CborEncoder<'a> {
    out: &'a mut Vec<u8>,
    status: &'a mut Option<Status>,
}

impl<'a> CborEncoder<'a> {
    pub fn new(out: &'a mut Vec<u8>, status: &'a mut Option<Status>) -> Self {
        *status = None;
        CborEncoder { out, status }
    }
}

impl EventHandler for CborEncoder<'_> {
    fn handle_object_begin(&mut self) {
        if self.status.is_some() {
            return;
        }
        self.out.push(INDEFINITE_MAP_START);
    }

    fn handle_object_end(&mut self) {
        if self.status.is_some() {
            return;
        }
        self.out.push(STOP_BYTE);
    }

    fn handle_array_begin(&mut self) {
        if self.status.is_some() {
            return;
        }
        self.out.push(INDEFINITE_ARRAY_START);
    }

    fn handle_array_end(&mut self) {
        if self.status.is_some() {
            return;
        }
        self.out.push(STOP_BYTE);
    }

    fn handle_string16(&mut self, chars: &[u16]) {
        if self.status.is_some() {
            return;
        }
        encode_utf16_string(chars, self.out);
    }

    fn handle_binary(&mut self, bytes: &[u8]) {
        if self.status.is_some() {
            return;
        }
        encode_binary(bytes, self.out);
    }

    fn handle_double(&mut self, value: f64) {
        if self.status.is_some() {
            return;
        }
        encode_double(value, self.out);
    }

    fn handle_int32(&mut self, value: i32) {
        if self.status.is_some() {
            return;
        }
        encode_signed(value, self.out);
    }

    fn handle_bool(&mut self, value: bool) {
        if self.status.is_some() {
            return;
        }
        self.out.push(if value { TRUE_BYTE } else { FALSE_BYTE });
    }

    fn handle_null(&mut self) {
        if self.status.is_some() {
            return;
        }
        self.out.push(NULL_BYTE);
    }

    fn handle_error(&mut self, status: Status) {
        *self.status = Some(status);
        self.out.clear();
    }
}
