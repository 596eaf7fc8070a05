//! The event-handler interface both parsers drive.

use crate::Status;

/// Push-style sink for parse events.
///
/// The JSON parser and the CBOR reader both deliver a document as a stream of
/// calls on this trait, so converting between the two formats is always "a
/// parser plus a handler": feed JSON text into a [`crate::CborEncoder`], or
/// feed CBOR bytes into a [`crate::JsonWriter`].
///
/// Events arrive in document order. Inside an object, keys (as
/// `handle_string16`) and values alternate; events for a nested container
/// fall strictly between the enclosing begin/end pair.
///
/// String payloads are always 16-bit code units, even when the input was
/// 8-bit; unpaired surrogates pass through untouched.
pub trait EventHandler {
    fn handle_object_begin(&mut self);
    fn handle_object_end(&mut self);
    fn handle_array_begin(&mut self);
    fn handle_array_end(&mut self);
    fn handle_string16(&mut self, chars: &[u16]);
    /// A byte blob (CBOR tag 22). Only the CBOR reader produces these; JSON
    /// input has no syntax for them.
    fn handle_binary(&mut self, bytes: &[u8]);
    fn handle_double(&mut self, value: f64);
    fn handle_int32(&mut self, value: i32);
    fn handle_bool(&mut self, value: bool);
    fn handle_null(&mut self);
    /// At most one error is delivered per parse, possibly after other events
    /// have already been received; the handler must treat it as final and
    /// discard anything it accumulated. No begin/end pairing holds after an
    /// error.
    fn handle_error(&mut self, status: Status);
}
