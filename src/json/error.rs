//! JSON parse error kinds.

use thiserror::Error;

/// Everything that can go wrong while tokenizing or parsing JSON input.
///
/// Each kind is reported through [`crate::Status`] together with the
/// zero-based offset (in input code units) of the offending token.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum JsonError {
    #[error("unprocessed input remains")]
    UnprocessedInputRemains,
    #[error("stack limit exceeded")]
    StackLimitExceeded,
    #[error("no input")]
    NoInput,
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid number")]
    InvalidNumber,
    #[error("invalid string")]
    InvalidString,
    #[error("unexpected array end")]
    UnexpectedArrayEnd,
    #[error("comma or array end expected")]
    CommaOrArrayEndExpected,
    #[error("string literal expected")]
    StringLiteralExpected,
    #[error("colon expected")]
    ColonExpected,
    #[error("unexpected object end")]
    UnexpectedObjectEnd,
    #[error("comma or object end expected")]
    CommaOrObjectEndExpected,
    #[error("value expected")]
    ValueExpected,
}
