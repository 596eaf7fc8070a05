//! Primitive CBOR decoders and the event-emitting reader.

use crate::cbor::constants::{
    additional_info, major_type, ADDITIONAL_1_BYTE, ADDITIONAL_2_BYTES, ADDITIONAL_4_BYTES,
    ADDITIONAL_8_BYTES, ADDITIONAL_INDEFINITE, BASE64_HINT_TAG, DOUBLE_BYTE, FALSE_BYTE,
    INDEFINITE_ARRAY_START, INDEFINITE_MAP_START, MAJOR_BYTE_STRING, MAJOR_NEGATIVE, MAJOR_STRING,
    MAJOR_TAG, MAJOR_UNSIGNED, NULL_BYTE, STOP_BYTE, TRUE_BYTE,
};
use crate::cbor::CborError;
use crate::{EventHandler, Status};

const STACK_LIMIT: usize = 1000;

/// Reads an item start with a definite value/length: the major type and the
/// value from the smallest-width ladder. Advances `bytes` past the item
/// start only on success; on failure the span is untouched.
fn decode_item_start(bytes: &mut &[u8]) -> Option<(u8, u64)> {
    let (&initial, rest) = bytes.split_first()?;
    let major = major_type(initial);
    let info = additional_info(initial);
    if info < 24 {
        *bytes = rest;
        return Some((major, info as u64));
    }
    let payload = match info {
        ADDITIONAL_1_BYTE => 1,
        ADDITIONAL_2_BYTES => 2,
        ADDITIONAL_4_BYTES => 4,
        ADDITIONAL_8_BYTES => 8,
        _ => return None,
    };
    if rest.len() < payload {
        return None;
    }
    let mut value = 0u64;
    for &byte in &rest[..payload] {
        value = value << 8 | byte as u64;
    }
    *bytes = &rest[payload..];
    Some((major, value))
}

/// Decodes an UNSIGNED (major type 0) item. Advances `bytes` on success.
pub fn decode_unsigned(bytes: &mut &[u8]) -> Option<u64> {
    let mut probe = *bytes;
    let (major, value) = decode_item_start(&mut probe)?;
    if major != MAJOR_UNSIGNED {
        return None;
    }
    *bytes = probe;
    Some(value)
}

/// Decodes an UNSIGNED or NEGATIVE item within i32 range. Advances `bytes`
/// on success.
pub fn decode_signed(bytes: &mut &[u8]) -> Option<i32> {
    let mut probe = *bytes;
    let (major, value) = decode_item_start(&mut probe)?;
    let decoded = match major {
        MAJOR_UNSIGNED => {
            if value > i32::MAX as u64 {
                return None;
            }
            value as i32
        }
        MAJOR_NEGATIVE => {
            if value > i32::MAX as u64 {
                return None;
            }
            (-1i64 - value as i64) as i32
        }
        _ => return None,
    };
    *bytes = probe;
    Some(decoded)
}

/// Decodes a BYTE_STRING (major type 2) with definite length into UTF-16
/// code units, least significant byte first. The byte length must be even.
/// Advances `bytes` on success.
pub fn decode_utf16_string(bytes: &mut &[u8]) -> Option<Vec<u16>> {
    let mut probe = *bytes;
    let (major, num_bytes) = decode_item_start(&mut probe)?;
    if major != MAJOR_BYTE_STRING || num_bytes & 1 != 0 {
        return None;
    }
    let num_bytes = usize::try_from(num_bytes).ok()?;
    if probe.len() < num_bytes {
        return None;
    }
    let mut chars = Vec::with_capacity(num_bytes / 2);
    for pair in probe[..num_bytes].chunks_exact(2) {
        chars.push(pair[0] as u16 | (pair[1] as u16) << 8);
    }
    *bytes = &probe[num_bytes..];
    Some(chars)
}

/// Decodes a STRING (major type 3) with definite length. Every payload byte
/// must be 7-bit US-ASCII; a set high bit is [`CborError::String8MustBe7Bit`]
/// and any framing problem is [`CborError::InvalidString8`]. Advances
/// `bytes` on success.
pub fn decode_utf8_string(bytes: &mut &[u8]) -> Result<Vec<u8>, CborError> {
    let mut probe = *bytes;
    let (major, num_bytes) =
        decode_item_start(&mut probe).ok_or(CborError::InvalidString8)?;
    if major != MAJOR_STRING {
        return Err(CborError::InvalidString8);
    }
    let num_bytes = usize::try_from(num_bytes).map_err(|_| CborError::InvalidString8)?;
    if probe.len() < num_bytes {
        return Err(CborError::InvalidString8);
    }
    let str_bytes = &probe[..num_bytes];
    if str_bytes.iter().any(|&b| b & 0x80 != 0) {
        return Err(CborError::String8MustBe7Bit);
    }
    let out = str_bytes.to_vec();
    *bytes = &probe[num_bytes..];
    Ok(out)
}

/// Decodes a tag-22 binary blob: the `0xd6` tag byte followed by a
/// BYTE_STRING with definite length. Advances `bytes` on success.
pub fn decode_binary(bytes: &mut &[u8]) -> Option<Vec<u8>> {
    let (&tag, rest) = bytes.split_first()?;
    if tag != BASE64_HINT_TAG {
        return None;
    }
    let mut probe = rest;
    let (major, num_bytes) = decode_item_start(&mut probe)?;
    if major != MAJOR_BYTE_STRING {
        return None;
    }
    let num_bytes = usize::try_from(num_bytes).ok()?;
    if probe.len() < num_bytes {
        return None;
    }
    let out = probe[..num_bytes].to_vec();
    *bytes = &probe[num_bytes..];
    Some(out)
}

/// Decodes a double: the `0xfb` marker plus 8 bytes big-endian. Advances
/// `bytes` on success.
pub fn decode_double(bytes: &mut &[u8]) -> Option<f64> {
    if bytes.len() < 9 || bytes[0] != DOUBLE_BYTE {
        return None;
    }
    let mut bits = [0u8; 8];
    bits.copy_from_slice(&bytes[1..9]);
    *bytes = &bytes[9..];
    Some(f64::from_bits(u64::from_be_bytes(bits)))
}

/// Parses one profile message from `bytes`, delivering events to `handler`.
///
/// The message must be a single indefinite-length map; anything else fails
/// with [`CborError::InvalidStartByte`] at position 0. On any error the
/// handler receives exactly one `handle_error` with the number of bytes
/// consumed before the faulting item, and parsing stops. Bytes after the
/// closing stop byte are ignored.
pub fn parse_cbor(bytes: &[u8], handler: &mut dyn EventHandler) {
    if bytes.is_empty() {
        handler.handle_error(Status::new(CborError::NoInput, 0));
        return;
    }
    if bytes[0] != INDEFINITE_MAP_START {
        handler.handle_error(Status::new(CborError::InvalidStartByte, 0));
        return;
    }
    let reader = Reader { total: bytes.len() };
    let mut rest = bytes;
    if let Err(status) = reader.parse_map(&mut rest, 1, handler) {
        handler.handle_error(status);
    }
}

struct Reader {
    total: usize,
}

impl Reader {
    /// Bytes consumed so far; the error position for whatever starts at the
    /// front of `bytes`.
    fn pos(&self, bytes: &[u8]) -> usize {
        self.total - bytes.len()
    }

    /// `depth` is the nesting level of the container being opened, counting
    /// this one; the deepening byte itself is the error position when the
    /// limit is hit.
    fn parse_map(
        &self,
        bytes: &mut &[u8],
        depth: usize,
        handler: &mut dyn EventHandler,
    ) -> Result<(), Status> {
        if depth > STACK_LIMIT {
            return Err(Status::new(CborError::StackLimitExceeded, self.pos(bytes)));
        }
        *bytes = &bytes[1..]; // caller verified the 0xbf
        handler.handle_object_begin();
        loop {
            let Some(&next) = bytes.first() else {
                return Err(Status::new(CborError::UnexpectedEofInMap, self.pos(bytes)));
            };
            if next == STOP_BYTE {
                *bytes = &bytes[1..];
                handler.handle_object_end();
                return Ok(());
            }
            let key_pos = self.pos(bytes);
            if major_type(next) != MAJOR_BYTE_STRING
                || additional_info(next) == ADDITIONAL_INDEFINITE
            {
                return Err(Status::new(CborError::InvalidMapKey, key_pos));
            }
            let key = decode_utf16_string(bytes)
                .ok_or_else(|| Status::new(CborError::InvalidString16, key_pos))?;
            handler.handle_string16(&key);
            self.parse_value(bytes, depth, handler)?;
        }
    }

    fn parse_array(
        &self,
        bytes: &mut &[u8],
        depth: usize,
        handler: &mut dyn EventHandler,
    ) -> Result<(), Status> {
        if depth > STACK_LIMIT {
            return Err(Status::new(CborError::StackLimitExceeded, self.pos(bytes)));
        }
        *bytes = &bytes[1..]; // caller verified the 0x9f
        handler.handle_array_begin();
        loop {
            let Some(&next) = bytes.first() else {
                return Err(Status::new(
                    CborError::UnexpectedEofInArray,
                    self.pos(bytes),
                ));
            };
            if next == STOP_BYTE {
                *bytes = &bytes[1..];
                handler.handle_array_end();
                return Ok(());
            }
            self.parse_value(bytes, depth, handler)?;
        }
    }

    /// `depth` is the number of containers currently open around this value.
    fn parse_value(
        &self,
        bytes: &mut &[u8],
        depth: usize,
        handler: &mut dyn EventHandler,
    ) -> Result<(), Status> {
        let pos = self.pos(bytes);
        let Some(&initial) = bytes.first() else {
            return Err(Status::new(CborError::UnexpectedEofExpectedValue, pos));
        };
        // Sentinels first, then the major-type field.
        match initial {
            TRUE_BYTE => {
                *bytes = &bytes[1..];
                handler.handle_bool(true);
                return Ok(());
            }
            FALSE_BYTE => {
                *bytes = &bytes[1..];
                handler.handle_bool(false);
                return Ok(());
            }
            NULL_BYTE => {
                *bytes = &bytes[1..];
                handler.handle_null();
                return Ok(());
            }
            DOUBLE_BYTE => {
                let value = decode_double(bytes)
                    .ok_or_else(|| Status::new(CborError::InvalidDouble, pos))?;
                handler.handle_double(value);
                return Ok(());
            }
            INDEFINITE_ARRAY_START => return self.parse_array(bytes, depth + 1, handler),
            INDEFINITE_MAP_START => return self.parse_map(bytes, depth + 1, handler),
            _ => {}
        }
        match major_type(initial) {
            MAJOR_UNSIGNED | MAJOR_NEGATIVE => {
                let value = decode_signed(bytes)
                    .ok_or_else(|| Status::new(CborError::InvalidSigned, pos))?;
                handler.handle_int32(value);
                Ok(())
            }
            MAJOR_BYTE_STRING => {
                let chars = decode_utf16_string(bytes)
                    .ok_or_else(|| Status::new(CborError::InvalidString16, pos))?;
                handler.handle_string16(&chars);
                Ok(())
            }
            MAJOR_STRING => {
                let ascii =
                    decode_utf8_string(bytes).map_err(|kind| Status::new(kind, pos))?;
                let chars: Vec<u16> = ascii.iter().map(|&b| b as u16).collect();
                handler.handle_string16(&chars);
                Ok(())
            }
            MAJOR_TAG if initial == BASE64_HINT_TAG => {
                let blob = decode_binary(bytes)
                    .ok_or_else(|| Status::new(CborError::UnsupportedValue, pos))?;
                handler.handle_binary(&blob);
                Ok(())
            }
            // Definite-length containers, other tags and other simple values
            // are outside the profile.
            _ => Err(Status::new(CborError::UnsupportedValue, pos)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cbor::encode::{
        encode_binary, encode_double, encode_signed, encode_unsigned, encode_utf16_string,
    };

    fn decode_all_unsigned(mut bytes: &[u8]) -> Option<u64> {
        let value = decode_unsigned(&mut bytes)?;
        assert!(bytes.is_empty());
        Some(value)
    }

    #[test]
    fn unsigned_roundtrips_boundary_values() {
        for value in [
            0u64,
            23,
            24,
            255,
            256,
            65535,
            65536,
            u32::MAX as u64,
            u32::MAX as u64 + 1,
            u64::MAX,
        ] {
            let mut out = Vec::new();
            encode_unsigned(value, &mut out);
            assert_eq!(decode_all_unsigned(&out), Some(value), "value {value}");
        }
    }

    #[test]
    fn unsigned_rejects_truncation_and_bad_info() {
        let cases: [&[u8]; 4] = [
            // Additional info 24 needs one payload byte.
            &[24],
            // Additional info 27 needs eight payload bytes.
            &[27, 0xaa, 0xbb, 0xcc],
            // Major type 2 is not UNSIGNED.
            &[2 << 5],
            // Additional info 29 is not a width class.
            &[29],
        ];
        for case in cases {
            let mut bytes = case;
            assert_eq!(decode_unsigned(&mut bytes), None, "case {case:?}");
            // Failure must not consume anything.
            assert_eq!(bytes.len(), case.len());
        }
    }

    #[test]
    fn signed_roundtrips_boundary_values() {
        for value in [0i32, -1, 23, -24, -25, i32::MIN, i32::MAX] {
            let mut out = Vec::new();
            encode_signed(value, &mut out);
            let mut bytes = out.as_slice();
            assert_eq!(decode_signed(&mut bytes), Some(value), "value {value}");
            assert!(bytes.is_empty());
        }
    }

    #[test]
    fn signed_rejects_out_of_range() {
        // 2^31 as UNSIGNED: one past i32::MAX.
        let mut out = Vec::new();
        encode_unsigned(1 << 31, &mut out);
        let mut bytes = out.as_slice();
        assert_eq!(decode_signed(&mut bytes), None);
        assert_eq!(bytes.len(), out.len());
        // Major 1 carrying 2^31: one past i32::MIN.
        let mut bytes: &[u8] = &[0x3a, 0x80, 0x00, 0x00, 0x00];
        assert_eq!(decode_signed(&mut bytes), None);
    }

    #[test]
    fn utf16_roundtrips_including_surrogates() {
        let msg: [u16; 10] = [
            'H' as u16, 'e' as u16, 'l' as u16, 'l' as u16, 'o' as u16, ',' as u16, ' ' as u16,
            0xd83c, 0xdf0e, '.' as u16,
        ];
        let mut out = Vec::new();
        encode_utf16_string(&msg, &mut out);
        let mut bytes = out.as_slice();
        assert_eq!(decode_utf16_string(&mut bytes), Some(msg.to_vec()));
        assert!(bytes.is_empty());
    }

    #[test]
    fn utf16_rejects_wrong_major_odd_length_and_bad_info() {
        let cases: [&[u8]; 3] = [
            &[0],
            &[2 << 5 | 1, b'a'],
            &[2 << 5 | 29],
        ];
        for case in cases {
            let mut bytes = case;
            assert_eq!(decode_utf16_string(&mut bytes), None, "case {case:?}");
            assert_eq!(bytes.len(), case.len());
        }
    }

    #[test]
    fn utf8_accepts_ascii_and_rejects_high_bits() {
        let mut bytes: &[u8] = &[3 << 5 | 3, b'f', b'o', b'o'];
        assert_eq!(decode_utf8_string(&mut bytes), Ok(b"foo".to_vec()));
        assert!(bytes.is_empty());

        let mut bytes: &[u8] = &[3 << 5 | 2, 0xc3, 0xa9];
        assert_eq!(
            decode_utf8_string(&mut bytes),
            Err(CborError::String8MustBe7Bit)
        );

        let mut bytes: &[u8] = &[3 << 5 | 5, b'x'];
        assert_eq!(decode_utf8_string(&mut bytes), Err(CborError::InvalidString8));
    }

    #[test]
    fn binary_roundtrips_and_rejects_other_tags() {
        let blob = [0xde, 0xad, 0xbe, 0xef];
        let mut out = Vec::new();
        encode_binary(&blob, &mut out);
        let mut bytes = out.as_slice();
        assert_eq!(decode_binary(&mut bytes), Some(blob.to_vec()));
        assert!(bytes.is_empty());

        // Tag 21 (0xd5) is not the base64 hint.
        let mut bytes: &[u8] = &[0xd5, 2 << 5 | 1, 0x00];
        assert_eq!(decode_binary(&mut bytes), None);
    }

    #[test]
    fn double_roundtrips_boundary_values() {
        for value in [
            0.0,
            1.0,
            -1.0,
            std::f64::consts::PI,
            f64::MIN_POSITIVE,
            f64::MAX,
            f64::INFINITY,
            f64::NEG_INFINITY,
        ] {
            let mut out = Vec::new();
            encode_double(value, &mut out);
            let mut bytes = out.as_slice();
            assert_eq!(decode_double(&mut bytes), Some(value), "value {value}");
            assert!(bytes.is_empty());
        }
        let mut out = Vec::new();
        encode_double(f64::NAN, &mut out);
        let mut bytes = out.as_slice();
        assert!(decode_double(&mut bytes).unwrap().is_nan());
    }

    #[test]
    fn double_rejects_short_payload() {
        let mut bytes: &[u8] = &[0xfb, 0x3f, 0xd5];
        assert_eq!(decode_double(&mut bytes), None);
        assert_eq!(bytes.len(), 3);
    }
}
