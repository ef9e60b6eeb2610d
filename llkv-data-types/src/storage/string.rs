use bytes::{Buf, BufMut};

use crate::storage::ColumnStorage;
use crate::{DataType, DecodeError, DecodedValue, EncodeError, get_varint, put_varint};

/// Variable-length UTF-8 values in one contiguous buffer.
///
/// Wire form per value: unsigned LEB128 byte length, then the bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringColumn {
    data: String,
    /// End offset of each value in `data`.
    ends: Vec<usize>,
}

impl StringColumn {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(values: usize, bytes: usize) -> Self {
        Self {
            data: String::with_capacity(bytes),
            ends: Vec::with_capacity(values),
        }
    }

    #[inline]
    fn start(&self, i: usize) -> usize {
        if i == 0 { 0 } else { self.ends[i - 1] }
    }

    #[inline]
    pub fn push(&mut self, s: &str) {
        self.data.push_str(s);
        self.ends.push(self.data.len());
    }

    /// Panics if `i >= len()`.
    #[inline]
    pub fn get(&self, i: usize) -> &str {
        &self.data[self.start(i)..self.ends[i]]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        (0..self.ends.len()).map(move |i| self.get(i))
    }

    /// Total payload bytes across all values.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }
}

impl<'a> FromIterator<&'a str> for StringColumn {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut col = StringColumn::new();
        for s in iter {
            col.push(s);
        }
        col
    }
}

impl ColumnStorage for StringColumn {
    type Key = Box<str>;

    fn storage_type(&self) -> DataType {
        DataType::String
    }

    #[inline]
    fn len(&self) -> usize {
        self.ends.len()
    }

    fn clone_empty(&self) -> Self {
        Self::new()
    }

    fn reserve(&mut self, additional: usize) {
        let _ = self.ends.try_reserve(additional);
    }

    fn pop_back(&mut self, n: usize) {
        let keep = self.ends.len().saturating_sub(n);
        self.ends.truncate(keep);
        let end = self.ends.last().copied().unwrap_or(0);
        self.data.truncate(end);
    }

    fn key_at(&self, i: usize) -> Box<str> {
        self.get(i).into()
    }

    fn value_at(&self, i: usize) -> DecodedValue<'_> {
        DecodedValue::Str(self.get(i))
    }

    fn push_value(&mut self, value: DecodedValue<'_>) -> Result<(), EncodeError> {
        match value {
            DecodedValue::Str(s) => {
                self.push(s);
                Ok(())
            }
            other => Err(EncodeError::TypeMismatch {
                expected: "Str",
                got: other.kind_name(),
            }),
        }
    }

    fn push_from(&mut self, other: &Self, i: usize) {
        self.push(other.get(i));
    }

    fn extend_from(&mut self, other: &Self, start: usize, len: usize) {
        if len == 0 {
            return;
        }
        let from = other.start(start);
        let to = other.ends[start + len - 1];
        let shift = self.data.len();
        self.data.push_str(&other.data[from..to]);
        self.ends
            .extend(other.ends[start..start + len].iter().map(|&e| e - from + shift));
    }

    fn serialize_binary<B: BufMut>(&self, i: usize, dst: &mut B) {
        let s = self.get(i);
        put_varint(dst, s.len() as u64);
        dst.put_slice(s.as_bytes());
    }

    fn deserialize_binary<B: Buf>(&mut self, src: &mut B) -> Result<(), DecodeError> {
        let len = get_varint(src)?;
        let len = usize::try_from(len)
            .map_err(|_| DecodeError::InvalidFormat("String length exceeds address space"))?;
        if src.remaining() < len {
            return Err(DecodeError::NotEnoughData {
                needed: len,
                remaining: src.remaining(),
            });
        }
        let raw = src.copy_to_bytes(len);
        let s = std::str::from_utf8(&raw)
            .map_err(|_| DecodeError::InvalidFormat("String value is not valid UTF-8"))?;
        self.push(s);
        Ok(())
    }
}
