use llkv_result::Error;

/// Error type for encoding a value into a backing storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// The provided value does not match the storage's element type.
    TypeMismatch {
        expected: &'static str,
        got: &'static str,
    },
    /// A fixed-width payload longer than the column width.
    TooLong { width: usize, len: usize },
}

/// Error type for decoding operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The source does not contain enough bytes to decode a value.
    NotEnoughData { needed: usize, remaining: usize },
    /// The byte format is invalid for the target type (e.g., invalid UTF-8).
    InvalidFormat(&'static str),
}

impl From<EncodeError> for Error {
    fn from(err: EncodeError) -> Self {
        match err {
            EncodeError::TypeMismatch { expected, got } => Error::InvalidArgumentError(format!(
                "value of kind {got} cannot be stored in a {expected} column"
            )),
            EncodeError::TooLong { width, len } => Error::InvalidArgumentError(format!(
                "value of {len} bytes is too long for FixedString({width})"
            )),
        }
    }
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::NotEnoughData { needed, remaining } => Error::eof(needed, remaining),
            DecodeError::InvalidFormat(what) => Error::Corrupted(what.to_string()),
        }
    }
}
