//! CBOR decode error kinds.

use thiserror::Error;

/// Everything the profile reader can reject.
///
/// Reported through [`crate::Status`]; the position is the number of bytes
/// successfully consumed before the faulting item.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CborError {
    #[error("no input")]
    NoInput,
    #[error("invalid start byte")]
    InvalidStartByte,
    #[error("unexpected eof, expected value")]
    UnexpectedEofExpectedValue,
    #[error("unexpected eof in array")]
    UnexpectedEofInArray,
    #[error("unexpected eof in map")]
    UnexpectedEofInMap,
    #[error("invalid map key")]
    InvalidMapKey,
    #[error("stack limit exceeded")]
    StackLimitExceeded,
    #[error("unsupported value")]
    UnsupportedValue,
    #[error("invalid utf16 byte string")]
    InvalidString16,
    #[error("invalid utf8 string")]
    InvalidString8,
    #[error("utf8 string must be 7 bit")]
    String8MustBe7Bit,
    #[error("invalid double")]
    InvalidDouble,
    #[error("invalid signed integer")]
    InvalidSigned,
}
