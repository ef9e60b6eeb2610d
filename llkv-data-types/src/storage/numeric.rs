use bytes::{Buf, BufMut};

use crate::storage::{ColumnStorage, bulk_range};
use crate::{DataType, DecodeError, DecodedValue, EncodeError, NativeType};

/// Fixed-width numbers, `T::WIDTH` little-endian bytes per value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericColumn<T: NativeType> {
    values: Vec<T>,
}

impl<T: NativeType> NumericColumn<T> {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut values = Vec::new();
        let _ = values.try_reserve(capacity);
        Self { values }
    }

    pub fn from_vec(values: Vec<T>) -> Self {
        Self { values }
    }

    #[inline]
    pub fn push(&mut self, v: T) {
        self.values.push(v);
    }

    #[inline]
    pub fn get(&self, i: usize) -> Option<T> {
        self.values.get(i).copied()
    }

    #[inline]
    pub fn last(&self) -> Option<T> {
        self.values.last().copied()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<T> {
        self.values
    }
}

impl<T: NativeType> ColumnStorage for NumericColumn<T> {
    type Key = u64;

    fn storage_type(&self) -> DataType {
        T::DATA_TYPE
    }

    #[inline]
    fn len(&self) -> usize {
        self.values.len()
    }

    fn clone_empty(&self) -> Self {
        Self::new()
    }

    fn reserve(&mut self, additional: usize) {
        let _ = self.values.try_reserve(additional);
    }

    fn pop_back(&mut self, n: usize) {
        let keep = self.values.len().saturating_sub(n);
        self.values.truncate(keep);
    }

    #[inline]
    fn key_at(&self, i: usize) -> u64 {
        self.values[i].dedup_key()
    }

    #[inline]
    fn value_at(&self, i: usize) -> DecodedValue<'_> {
        self.values[i].into_decoded()
    }

    fn push_value(&mut self, value: DecodedValue<'_>) -> Result<(), EncodeError> {
        let v = T::from_decoded(value).ok_or(EncodeError::TypeMismatch {
            expected: T::NAME,
            got: value.kind_name(),
        })?;
        self.values.push(v);
        Ok(())
    }

    #[inline]
    fn push_from(&mut self, other: &Self, i: usize) {
        self.values.push(other.values[i]);
    }

    fn extend_from(&mut self, other: &Self, start: usize, len: usize) {
        self.values
            .extend_from_slice(&other.values[start..start + len]);
    }

    #[inline]
    fn serialize_binary<B: BufMut>(&self, i: usize, dst: &mut B) {
        self.values[i].put_le(dst);
    }

    fn deserialize_binary<B: Buf>(&mut self, src: &mut B) -> Result<(), DecodeError> {
        self.values.push(T::decode(src)?);
        Ok(())
    }

    fn serialize_binary_bulk<B: BufMut>(&self, dst: &mut B, offset: usize, limit: usize) {
        let range = bulk_range(self.values.len(), offset, limit);
        for v in &self.values[range] {
            v.put_le(dst);
        }
    }

    fn deserialize_binary_bulk<B: Buf>(
        &mut self,
        src: &mut B,
        limit: usize,
    ) -> Result<usize, DecodeError> {
        let available = src.remaining() / T::WIDTH;
        let n = limit.min(available);
        if n < limit && src.remaining() % T::WIDTH != 0 {
            return Err(DecodeError::NotEnoughData {
                needed: T::WIDTH,
                remaining: src.remaining() % T::WIDTH,
            });
        }
        self.values.reserve(n);
        for _ in 0..n {
            self.values.push(T::get_le(src));
        }
        Ok(n)
    }
}
