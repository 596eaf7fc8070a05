//! JSON ⇄ CBOR codecs for inspector-protocol wire messages: compact binary
//! on the wire, human-readable JSON at the edges.
//!
//! Both directions are driven through one push-style [`EventHandler`]
//! interface, so each conversion is a parser plus a handler:
//!
//! - [`json::parse_json`] tokenizes 8- or 16-bit JSON text and delivers
//!   events; pointing it at a [`cbor::CborEncoder`] produces wire bytes.
//! - [`cbor::parse_cbor`] walks a wire message and delivers the same events;
//!   pointing it at a [`json::JsonWriter`] produces minified JSON.
//! - [`json_to_cbor`] and [`cbor_to_json`] are those two compositions.
//!
//! The wire format is CBOR (RFC 7049) restricted to what the protocol
//! needs; see the [`cbor`] module docs for the profile. Parsing never
//! panics on malformed input: the first problem is delivered as a single
//! [`Status`] carrying an error kind and the input offset, and any partial
//! writer output is discarded.
//!
//! ```
//! use wirepack::{cbor_to_json, json_to_cbor, StdNumberCodec};
//!
//! let codec = StdNumberCodec;
//! let wire = json_to_cbor(&codec, br#"{"id":1,"method":"Page.enable"}"#.as_slice()).unwrap();
//! assert_eq!(wire[0], 0xbf);
//! let json = cbor_to_json(&codec, &wire).unwrap();
//! assert_eq!(json, r#"{"id":1,"method":"Page.enable"}"#);
//! ```

pub mod cbor;
pub mod json;

mod convert;
mod handler;
mod num;
mod serialize;
mod status;

pub use convert::{cbor_to_json, json_to_cbor};
pub use handler::EventHandler;
pub use num::{NumberCodec, StdNumberCodec};
pub use serialize::Serializable;
pub use status::{ErrorKind, Status};

pub use cbor::{parse_cbor, CborEncoder, CborError};
pub use json::{parse_json, JsonError, JsonWriter};
