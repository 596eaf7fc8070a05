//! The profiled CBOR side of the codec pair.
//!
//! The wire format follows RFC 7049 with additional constraints:
//! - only indefinite-length maps and arrays; a top-level message is exactly
//!   one indefinite-length map;
//! - scalars only within the i32 range, as UNSIGNED/NEGATIVE (majors 0/1);
//! - UTF-16 strings (unbalanced surrogates included) as BYTE_STRING
//!   (major 2) with an even byte count, code units least significant byte
//!   first;
//! - UTF-8 strings (major 3) restricted to 7-bit US-ASCII;
//! - arbitrary byte blobs as BYTE_STRING prefixed with tag 22, the base64
//!   rendering hint;
//! - doubles as major 7 / additional info 27, 8 bytes big-endian.

pub mod constants;
mod decode;
mod encode;
mod error;

pub use constants::{
    BASE64_HINT_TAG, DOUBLE_BYTE, FALSE_BYTE, INDEFINITE_ARRAY_START, INDEFINITE_MAP_START,
    NULL_BYTE, STOP_BYTE, TRUE_BYTE,
};
pub use decode::{
    decode_binary, decode_double, decode_signed, decode_unsigned, decode_utf16_string,
    decode_utf8_string, parse_cbor,
};
pub use encode::{
    encode_binary, encode_double, encode_item_start, encode_signed, encode_unsigned,
    encode_utf16_string, encode_utf8_string, CborEncoder,
};
pub use error::CborError;
