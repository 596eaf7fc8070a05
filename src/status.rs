//! Error status with input position.

use thiserror::Error;

use crate::cbor::CborError;
use crate::json::JsonError;

/// Union of the two codec error families.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    #[error(transparent)]
    Json(#[from] JsonError),
    #[error(transparent)]
    Cbor(#[from] CborError),
}

/// An error kind plus the zero-based offset into the original input at which
/// it was detected. For 8-bit input the offset counts bytes, for 16-bit input
/// it counts code units.
///
/// Statuses are values: parsers deliver exactly one of them through
/// [`crate::EventHandler::handle_error`] and then stop; nothing panics on
/// malformed input.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{kind} at position {pos}")]
pub struct Status {
    pub kind: ErrorKind,
    pub pos: usize,
}

impl Status {
    pub fn new(kind: impl Into<ErrorKind>, pos: usize) -> Self {
        Status {
            kind: kind.into(),
            pos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_displays_kind_and_position() {
        let status = Status::new(JsonError::ColonExpected, 12);
        assert_eq!(status.to_string(), "colon expected at position 12");
        let status = Status::new(CborError::InvalidMapKey, 3);
        assert_eq!(status.to_string(), "invalid map key at position 3");
    }

    #[test]
    fn kinds_compare_across_families() {
        assert_ne!(
            ErrorKind::from(JsonError::NoInput),
            ErrorKind::from(CborError::NoInput)
        );
    }
}
