//! Error types and result definitions shared by the LLKV dictionary-encoding
//! crates.
//!
//! Every fallible operation returns [`Result<T>`], whose error is the single
//! [`Error`] enum. Crate-local error types (for example the low-level codec
//! errors in `llkv-data-types`) convert into [`Error`] via `From`, so they
//! propagate with `?` across crate boundaries.
//!
//! # Error Categories
//!
//! - **Contract violations** ([`Error::InvalidArgumentError`]): bad type
//!   descriptors, unparsable type names, mismatched values
//! - **Dispatch bugs** ([`Error::LogicalError`]): states validation should
//!   have excluded
//! - **Short reads** ([`Error::UnexpectedEof`]): a byte source ran dry
//! - **Invariant violations in input** ([`Error::Corrupted`])
//! - **Export failures** ([`Error::Arrow`])

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
