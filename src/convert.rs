//! Whole-message conversions: a parser plus a handler.

use crate::cbor::{parse_cbor, CborEncoder};
use crate::json::{parse_json, JsonWriter};
use crate::{NumberCodec, Status};

/// Converts one JSON message (8- or 16-bit code units) into the CBOR wire
/// encoding. The top-level value must be an object, since a wire message is
/// an indefinite-length map.
pub fn json_to_cbor<C: Copy + Into<u16>>(
    codec: &dyn NumberCodec,
    json: &[C],
) -> Result<Vec<u8>, Status> {
    let mut out = Vec::new();
    let mut status = None;
    let mut encoder = CborEncoder::new(&mut out, &mut status);
    parse_json(codec, json, &mut encoder);
    match status {
        Some(status) => Err(status),
        None => Ok(out),
    }
}

/// Converts one CBOR wire message into minified JSON.
pub fn cbor_to_json(codec: &dyn NumberCodec, bytes: &[u8]) -> Result<String, Status> {
    let mut out = String::new();
    let mut status = None;
    let mut writer = JsonWriter::new(codec, &mut out, &mut status);
    parse_cbor(bytes, &mut writer);
    match status {
        Some(status) => Err(status),
        None => Ok(out),
    }
}
