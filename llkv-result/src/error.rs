use std::fmt;

use thiserror::Error;

/// Unified error type for the dictionary-encoding crates.
///
/// Construction-time contract violations surface as
/// [`Error::InvalidArgumentError`]; states that validation should have made
/// unreachable surface as [`Error::LogicalError`]. Everything a byte source
/// can get wrong is reported as either [`Error::UnexpectedEof`] or
/// [`Error::Corrupted`].
///
/// Errors propagate upward with `?`. Nothing in these crates retries.
#[derive(Error, Debug)]
pub enum Error {
    /// Arrow library error while exporting a column to Arrow arrays.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Invalid caller input.
    ///
    /// Raised for:
    /// - index types that are not unsigned integers
    /// - dictionary element types outside {string, fixed string, date,
    ///   datetime, numeric}
    /// - type names that do not parse, or carry the wrong number of arguments
    /// - values whose variant does not match the target column
    /// - dictionary ids that do not fit the column's index width
    ///
    /// The message names the offending type or value.
    #[error("Invalid argument: {0}")]
    InvalidArgumentError(String),

    /// Internal error indicating validation and dispatch disagree.
    ///
    /// This should never occur for a descriptor that passed validation. If it
    /// does, it is a bug, not bad input.
    #[error("Logical error: {0}")]
    LogicalError(String),

    /// A byte source ended before a complete value could be read.
    #[error("unexpected end of stream: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    /// Bytes were read successfully but describe an impossible state.
    ///
    /// Examples: an index id at or beyond the dictionary size, a dictionary
    /// header that exceeds the configured entry limit, or string payloads that
    /// are not valid UTF-8.
    #[error("corrupted stream: {0}")]
    Corrupted(String),
}

impl Error {
    /// Build an [`Error::InvalidArgumentError`] from any displayable value.
    ///
    /// # Examples
    ///
    /// ```
    /// use llkv_result::Error;
    ///
    /// fn parse_width(input: &str) -> Result<usize, Error> {
    ///     input.parse::<usize>().map_err(Error::invalid_argument)
    /// }
    ///
    /// assert_eq!(parse_width("16").unwrap(), 16);
    /// assert!(matches!(parse_width("x"), Err(Error::InvalidArgumentError(_))));
    /// ```
    #[inline]
    pub fn invalid_argument<E: fmt::Display>(err: E) -> Self {
        Error::InvalidArgumentError(err.to_string())
    }

    /// Build an [`Error::Corrupted`] from any displayable value.
    #[inline]
    pub fn corrupted<E: fmt::Display>(err: E) -> Self {
        Error::Corrupted(err.to_string())
    }

    /// Shorthand for a read that needed `needed` bytes but found `remaining`.
    #[inline]
    pub fn eof(needed: usize, remaining: usize) -> Self {
        Error::UnexpectedEof { needed, remaining }
    }
}
