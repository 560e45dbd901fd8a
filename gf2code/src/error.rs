//! Error types for bit vector arithmetic and generator matrix construction.

use thiserror::Error;

/// Broad classification of a [`CodeError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A malformed argument: bad length, mismatched operands, or a rejected generator row.
    InvalidArgument,
    /// An index outside `[0, len)`.
    IndexOutOfRange,
    /// Elimination found no pivot column for some row.
    Construction,
}

/// Errors raised by [`crate::BitVector`] and the generator matrix builder.
///
/// Every error surfaces at the call that caused it. Nothing is retried and no partial result
/// is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CodeError {
    #[error("bit vectors must have positive length")]
    ZeroLength,

    #[error("index {index} is out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("invalid character {ch:?} at position {position}, expected '0' or '1'")]
    InvalidDigit { ch: char, position: usize },

    /// A generator row must contribute information to the code.
    #[error("generator rows cannot be all zeros")]
    ZeroGenerator,

    #[error("no generator rows added")]
    NoGenerators,

    /// Row `row` has no 1 in any column from `row` onwards.
    #[error("generator matrix cannot be made systematic: no pivot for row {row}")]
    NotSystematic { row: usize },
}

impl CodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodeError::ZeroLength
            | CodeError::LengthMismatch { .. }
            | CodeError::InvalidDigit { .. }
            | CodeError::ZeroGenerator
            | CodeError::NoGenerators => ErrorKind::InvalidArgument,
            CodeError::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            CodeError::NotSystematic { .. } => ErrorKind::Construction,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(CodeError::ZeroLength.kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            CodeError::LengthMismatch {
                expected: 3,
                found: 4
            }
            .kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            CodeError::IndexOutOfRange { index: 5, len: 5 }.kind(),
            ErrorKind::IndexOutOfRange
        );
        assert_eq!(
            CodeError::NotSystematic { row: 0 }.kind(),
            ErrorKind::Construction
        );
    }

    #[test]
    fn messages() {
        assert_eq!(
            CodeError::IndexOutOfRange { index: 7, len: 4 }.to_string(),
            "index 7 is out of range for length 4"
        );
        assert_eq!(
            CodeError::InvalidDigit {
                ch: 'x',
                position: 2
            }
            .to_string(),
            "invalid character 'x' at position 2, expected '0' or '1'"
        );
    }
}
