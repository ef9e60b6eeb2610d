//! Low-level codecs shared by the backing storages.
//!
//! - `NativeType`: one fixed-width little-endian codec per numeric native,
//!   generated from [`llkv_for_each_numeric!`](crate::llkv_for_each_numeric).
//! - `varint`: unsigned LEB128 lengths for variable-width payloads.
//! - `date`: text forms of `Date` and `DateTime` day/second counts.

#![forbid(unsafe_code)]

pub mod date;
pub use date::*;

pub mod native;
pub use native::*;

pub mod varint;
pub use varint::*;
