use bytes::{Buf, BufMut};

use crate::storage::{ColumnStorage, bulk_range};
use crate::{DataType, DecodeError, DecodedValue, EncodeError};

/// Exactly `width` bytes per value. Shorter inputs are zero-padded on the
/// right; longer inputs are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedStringColumn {
    width: usize,
    len: usize,
    data: Vec<u8>,
}

impl FixedStringColumn {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            len: 0,
            data: Vec::new(),
        }
    }

    pub fn with_capacity(width: usize, capacity: usize) -> Self {
        let mut col = Self::new(width);
        col.reserve(capacity);
        col
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn push(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        if bytes.len() > self.width {
            return Err(EncodeError::TooLong {
                width: self.width,
                len: bytes.len(),
            });
        }
        self.data.extend_from_slice(bytes);
        self.data.resize(self.data.len() + self.width - bytes.len(), 0);
        self.len += 1;
        Ok(())
    }

    /// Padded bytes of value `i`. Panics if `i >= len()`.
    #[inline]
    pub fn get(&self, i: usize) -> &[u8] {
        assert!(i < self.len, "index {i} out of bounds for {} values", self.len);
        &self.data[i * self.width..(i + 1) * self.width]
    }

    /// All values back to back.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl ColumnStorage for FixedStringColumn {
    type Key = Box<[u8]>;

    fn storage_type(&self) -> DataType {
        DataType::FixedString(self.width)
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    fn clone_empty(&self) -> Self {
        Self::new(self.width)
    }

    /// Best effort: a byte count that overflows or cannot be allocated
    /// reserves nothing.
    fn reserve(&mut self, additional: usize) {
        if let Some(bytes) = additional.checked_mul(self.width) {
            let _ = self.data.try_reserve(bytes);
        }
    }

    fn pop_back(&mut self, n: usize) {
        self.len = self.len.saturating_sub(n);
        self.data.truncate(self.len * self.width);
    }

    fn key_at(&self, i: usize) -> Box<[u8]> {
        self.get(i).into()
    }

    fn value_at(&self, i: usize) -> DecodedValue<'_> {
        DecodedValue::Bytes(self.get(i))
    }

    fn push_value(&mut self, value: DecodedValue<'_>) -> Result<(), EncodeError> {
        match value {
            DecodedValue::Bytes(b) => self.push(b),
            DecodedValue::Str(s) => self.push(s.as_bytes()),
            other => Err(EncodeError::TypeMismatch {
                expected: "Bytes",
                got: other.kind_name(),
            }),
        }
    }

    fn push_from(&mut self, other: &Self, i: usize) {
        debug_assert_eq!(self.width, other.width);
        self.data.extend_from_slice(other.get(i));
        self.len += 1;
    }

    fn extend_from(&mut self, other: &Self, start: usize, len: usize) {
        debug_assert_eq!(self.width, other.width);
        let w = other.width;
        self.data
            .extend_from_slice(&other.data[start * w..(start + len) * w]);
        self.len += len;
    }

    fn serialize_binary<B: BufMut>(&self, i: usize, dst: &mut B) {
        dst.put_slice(self.get(i));
    }

    fn deserialize_binary<B: Buf>(&mut self, src: &mut B) -> Result<(), DecodeError> {
        if src.remaining() < self.width {
            return Err(DecodeError::NotEnoughData {
                needed: self.width,
                remaining: src.remaining(),
            });
        }
        let start = self.data.len();
        self.data.resize(start + self.width, 0);
        src.copy_to_slice(&mut self.data[start..]);
        self.len += 1;
        Ok(())
    }

    fn serialize_binary_bulk<B: BufMut>(&self, dst: &mut B, offset: usize, limit: usize) {
        let range = bulk_range(self.len, offset, limit);
        dst.put_slice(&self.data[range.start * self.width..range.end * self.width]);
    }
}
