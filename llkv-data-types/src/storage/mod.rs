//! Backing storages for plain element types.
//!
//! Every storage is an append-only vector of values with the scalar and bulk
//! binary codecs of its element type. Composite column types (dictionaries,
//! arrays, nullables) are built from these.

use std::fmt;
use std::hash::Hash;
use std::ops::Range;

use bytes::{Buf, BufMut};

use crate::{DataType, DecodeError, DecodedValue, EncodeError};

mod fixed_string;
mod numeric;
mod string;

pub use fixed_string::FixedStringColumn;
pub use numeric::NumericColumn;
pub use string::StringColumn;

/// Clamps a bulk window `[offset, offset + limit)` to `len` rows. A `limit` of
/// zero selects everything from `offset` to the end.
#[inline]
pub fn bulk_range(len: usize, offset: usize, limit: usize) -> Range<usize> {
    let start = offset.min(len);
    let end = if limit == 0 {
        len
    } else {
        start.saturating_add(limit).min(len)
    };
    start..end
}

pub trait ColumnStorage: Clone + fmt::Debug + Send + Sync + 'static {
    /// Owned identity of one stored value. Two positions hold equal values
    /// iff their keys are equal.
    type Key: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static;

    /// Element type of the stored values as they appear on the wire.
    fn storage_type(&self) -> DataType;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A new empty storage with the same element type and parameters.
    fn clone_empty(&self) -> Self;

    /// Capacity hint for `additional` more values. Never panics on counts
    /// that cannot be allocated.
    fn reserve(&mut self, additional: usize);

    /// Drops the last `n` values, or all of them if fewer are stored.
    fn pop_back(&mut self, n: usize);

    /// Panics if `i >= len()`.
    fn key_at(&self, i: usize) -> Self::Key;

    /// Panics if `i >= len()`.
    fn value_at(&self, i: usize) -> DecodedValue<'_>;

    fn push_value(&mut self, value: DecodedValue<'_>) -> Result<(), EncodeError>;

    /// Appends a copy of `other[i]`.
    fn push_from(&mut self, other: &Self, i: usize);

    /// Appends `other[start..start + len]`.
    fn extend_from(&mut self, other: &Self, start: usize, len: usize);

    fn serialize_binary<B: BufMut>(&self, i: usize, dst: &mut B);

    /// Reads exactly one value and appends it. On error nothing is appended.
    fn deserialize_binary<B: Buf>(&mut self, src: &mut B) -> Result<(), DecodeError>;

    /// Writes the values selected by [`bulk_range`] back to back.
    fn serialize_binary_bulk<B: BufMut>(&self, dst: &mut B, offset: usize, limit: usize) {
        for i in bulk_range(self.len(), offset, limit) {
            self.serialize_binary(i, dst);
        }
    }

    /// Reads up to `limit` values, stopping early when `src` is exhausted at
    /// a value boundary. Returns the number of values appended.
    ///
    /// A value cut short by the end of `src` is an error, in which case every
    /// value appended by this call is dropped again.
    fn deserialize_binary_bulk<B: Buf>(
        &mut self,
        src: &mut B,
        limit: usize,
    ) -> Result<usize, DecodeError> {
        let mut read = 0;
        while read < limit && src.has_remaining() {
            if let Err(err) = self.deserialize_binary(src) {
                self.pop_back(read);
                return Err(err);
            }
            read += 1;
        }
        Ok(read)
    }
}
