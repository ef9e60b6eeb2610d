//! In-memory dictionary-encoded column: a deduplicating dictionary plus one
//! index per row.

use bytes::{Buf, BufMut};
use llkv_data_types::{
    ColumnStorage, DataType, DecodedValue, FixedStringColumn, NumericColumn, OwnedValue,
    StringColumn,
};
use llkv_result::{Error, Result};

use crate::DictionaryEncodedType;
use crate::unique::{RowInsertion, UniqueDictionary};

/// Runs `$body` with `$d` bound to the concrete `UniqueDictionary` inside an
/// [`AnyDictionary`]. Works on both shared and mutable references.
macro_rules! with_dictionary {
    ($any:expr, |$d:ident| $body:expr) => {
        match $any {
            $crate::column::AnyDictionary::String($d) => $body,
            $crate::column::AnyDictionary::FixedString($d) => $body,
            $crate::column::AnyDictionary::UInt8($d) => $body,
            $crate::column::AnyDictionary::UInt16($d) => $body,
            $crate::column::AnyDictionary::UInt32($d) => $body,
            $crate::column::AnyDictionary::UInt64($d) => $body,
            $crate::column::AnyDictionary::Int8($d) => $body,
            $crate::column::AnyDictionary::Int16($d) => $body,
            $crate::column::AnyDictionary::Int32($d) => $body,
            $crate::column::AnyDictionary::Int64($d) => $body,
            $crate::column::AnyDictionary::Float32($d) => $body,
            $crate::column::AnyDictionary::Float64($d) => $body,
        }
    };
}
pub(crate) use with_dictionary;

macro_rules! with_indexes {
    ($idx:expr, |$c:ident| $body:expr) => {
        match $idx {
            $crate::column::IndexArray::UInt8($c) => $body,
            $crate::column::IndexArray::UInt16($c) => $body,
            $crate::column::IndexArray::UInt32($c) => $body,
            $crate::column::IndexArray::UInt64($c) => $body,
        }
    };
}

/// Dictionary with its concrete backing storage.
///
/// `Date` elements use the `UInt16` variant and `DateTime` elements the
/// `UInt32` variant.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyDictionary {
    String(UniqueDictionary<StringColumn>),
    FixedString(UniqueDictionary<FixedStringColumn>),
    UInt8(UniqueDictionary<NumericColumn<u8>>),
    UInt16(UniqueDictionary<NumericColumn<u16>>),
    UInt32(UniqueDictionary<NumericColumn<u32>>),
    UInt64(UniqueDictionary<NumericColumn<u64>>),
    Int8(UniqueDictionary<NumericColumn<i8>>),
    Int16(UniqueDictionary<NumericColumn<i16>>),
    Int32(UniqueDictionary<NumericColumn<i32>>),
    Int64(UniqueDictionary<NumericColumn<i64>>),
    Float32(UniqueDictionary<NumericColumn<f32>>),
    Float64(UniqueDictionary<NumericColumn<f64>>),
}

impl AnyDictionary {
    #[inline]
    pub fn len(&self) -> usize {
        with_dictionary!(self, |d| d.len())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wire type of the stored entries.
    pub fn storage_type(&self) -> DataType {
        with_dictionary!(self, |d| d.storage().storage_type())
    }

    /// Entry `id`, or `None` past the end.
    pub fn value(&self, id: u64) -> Option<DecodedValue<'_>> {
        if id >= self.len() as u64 {
            return None;
        }
        Some(with_dictionary!(self, |d| d.value(id)))
    }

    pub fn clone_empty(&self) -> Self {
        match self {
            AnyDictionary::String(d) => AnyDictionary::String(d.clone_empty()),
            AnyDictionary::FixedString(d) => AnyDictionary::FixedString(d.clone_empty()),
            AnyDictionary::UInt8(d) => AnyDictionary::UInt8(d.clone_empty()),
            AnyDictionary::UInt16(d) => AnyDictionary::UInt16(d.clone_empty()),
            AnyDictionary::UInt32(d) => AnyDictionary::UInt32(d.clone_empty()),
            AnyDictionary::UInt64(d) => AnyDictionary::UInt64(d.clone_empty()),
            AnyDictionary::Int8(d) => AnyDictionary::Int8(d.clone_empty()),
            AnyDictionary::Int16(d) => AnyDictionary::Int16(d.clone_empty()),
            AnyDictionary::Int32(d) => AnyDictionary::Int32(d.clone_empty()),
            AnyDictionary::Int64(d) => AnyDictionary::Int64(d.clone_empty()),
            AnyDictionary::Float32(d) => AnyDictionary::Float32(d.clone_empty()),
            AnyDictionary::Float64(d) => AnyDictionary::Float64(d.clone_empty()),
        }
    }

    /// Deduplicating insert of one value, without touching any index array.
    pub fn insert(&mut self, value: DecodedValue<'_>) -> Result<RowInsertion> {
        with_dictionary!(self, |d| d.insert(value))
    }

    /// All entries in id order.
    pub fn to_owned_values(&self) -> Vec<OwnedValue> {
        with_dictionary!(self, |d| (0..d.len())
            .map(|i| d.value(i as u64).to_owned_value())
            .collect())
    }
}

/// One dictionary id per row, stored at the descriptor's index width.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexArray {
    UInt8(NumericColumn<u8>),
    UInt16(NumericColumn<u16>),
    UInt32(NumericColumn<u32>),
    UInt64(NumericColumn<u64>),
}

impl IndexArray {
    /// `None` unless `index_type` is an unsigned integer.
    pub fn for_type(index_type: &DataType, capacity: usize) -> Option<Self> {
        match index_type {
            DataType::UInt8 => Some(IndexArray::UInt8(NumericColumn::with_capacity(capacity))),
            DataType::UInt16 => Some(IndexArray::UInt16(NumericColumn::with_capacity(capacity))),
            DataType::UInt32 => Some(IndexArray::UInt32(NumericColumn::with_capacity(capacity))),
            DataType::UInt64 => Some(IndexArray::UInt64(NumericColumn::with_capacity(capacity))),
            _ => None,
        }
    }

    pub fn index_type(&self) -> DataType {
        with_indexes!(self, |c| c.storage_type())
    }

    #[inline]
    pub fn len(&self) -> usize {
        with_indexes!(self, |c| c.len())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn get(&self, row: usize) -> Option<u64> {
        with_indexes!(self, |c| c.get(row).map(u64::from))
    }

    /// Largest id representable at this width.
    pub fn max_id(&self) -> u64 {
        match self {
            IndexArray::UInt8(_) => u64::from(u8::MAX),
            IndexArray::UInt16(_) => u64::from(u16::MAX),
            IndexArray::UInt32(_) => u64::from(u32::MAX),
            IndexArray::UInt64(_) => u64::MAX,
        }
    }

    #[inline]
    pub fn fits(&self, id: u64) -> bool {
        id <= self.max_id()
    }

    fn overflow(&self, id: u64) -> Error {
        Error::InvalidArgumentError(format!(
            "dictionary id {id} does not fit index type {}",
            self.index_type()
        ))
    }

    /// Appends `id`, failing without change if it does not fit the width.
    pub fn push(&mut self, id: u64) -> Result<()> {
        if !self.fits(id) {
            return Err(self.overflow(id));
        }
        with_indexes!(self, |c| {
            let narrowed = id.try_into().map_err(|_| {
                Error::LogicalError(format!("index {id} passed the width check but did not narrow"))
            })?;
            c.push(narrowed);
        });
        Ok(())
    }

    pub fn pop_back(&mut self, n: usize) {
        with_indexes!(self, |c| c.pop_back(n))
    }

    pub fn clone_empty(&self) -> Self {
        match self {
            IndexArray::UInt8(_) => IndexArray::UInt8(NumericColumn::new()),
            IndexArray::UInt16(_) => IndexArray::UInt16(NumericColumn::new()),
            IndexArray::UInt32(_) => IndexArray::UInt32(NumericColumn::new()),
            IndexArray::UInt64(_) => IndexArray::UInt64(NumericColumn::new()),
        }
    }

    pub fn to_vec(&self) -> Vec<u64> {
        with_indexes!(self, |c| c.as_slice().iter().map(|&v| u64::from(v)).collect())
    }

    /// Writes rows `[offset, offset + limit)` (clamped; `limit == 0` means to
    /// the end) with the index type's bulk codec.
    pub fn serialize_binary_bulk<B: BufMut>(&self, dst: &mut B, offset: usize, limit: usize) {
        with_indexes!(self, |c| c.serialize_binary_bulk(dst, offset, limit))
    }

    /// Reads up to `limit` ids, see [`ColumnStorage::deserialize_binary_bulk`].
    pub fn deserialize_binary_bulk<B: Buf>(&mut self, src: &mut B, limit: usize) -> Result<usize> {
        with_indexes!(self, |c| Ok(c.deserialize_binary_bulk(src, limit)?))
    }

    /// Appends every id of `chunk`, translated through `remap` when given.
    ///
    /// Each id (after translation) must be below `dictionary_len` and fit this
    /// array's width. All ids are checked before any is appended.
    pub fn extend_checked(
        &mut self,
        chunk: &IndexArray,
        remap: Option<&[u64]>,
        dictionary_len: usize,
    ) -> Result<()> {
        let ids = chunk.to_vec();
        let mut translated = Vec::with_capacity(ids.len());
        for id in ids {
            let local = match remap {
                Some(table) => *usize::try_from(id)
                    .ok()
                    .and_then(|i| table.get(i))
                    .ok_or_else(|| {
                        Error::Corrupted(format!(
                            "index {id} is outside the {} entries read for this session",
                            table.len()
                        ))
                    })?,
                None => id,
            };
            if local >= dictionary_len as u64 {
                return Err(Error::Corrupted(format!(
                    "index {local} is outside a dictionary of {dictionary_len} entries"
                )));
            }
            if !self.fits(local) {
                return Err(self.overflow(local));
            }
            translated.push(local);
        }
        for id in translated {
            self.push(id)?;
        }
        Ok(())
    }
}

/// A dictionary-encoded column value.
///
/// Every id in `indexes` is below `dictionary.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryColumn {
    pub(crate) dictionary: AnyDictionary,
    pub(crate) indexes: IndexArray,
}

impl DictionaryColumn {
    pub(crate) fn from_parts(dictionary: AnyDictionary, indexes: IndexArray) -> Self {
        Self {
            dictionary,
            indexes,
        }
    }

    /// Row count.
    #[inline]
    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    pub fn dictionary(&self) -> &AnyDictionary {
        &self.dictionary
    }

    pub fn indexes(&self) -> &IndexArray {
        &self.indexes
    }

    pub fn dictionary_len(&self) -> usize {
        self.dictionary.len()
    }

    pub fn index_at(&self, row: usize) -> Option<u64> {
        self.indexes.get(row)
    }

    /// Decoded value of `row`.
    pub fn value_at(&self, row: usize) -> Option<DecodedValue<'_>> {
        self.dictionary.value(self.indexes.get(row)?)
    }

    /// Appends one row holding `value`, reusing an equal dictionary entry if
    /// one exists.
    pub fn push_value(&mut self, value: DecodedValue<'_>) -> Result<RowInsertion> {
        let DictionaryColumn {
            dictionary,
            indexes,
        } = self;
        with_dictionary!(dictionary, |d| d
            .stage_with(|s| s.push_value(value).map_err(Error::from))?
            .commit(|id| indexes.push(id)))
    }

    /// A new empty column of the same shape.
    pub fn clone_empty(&self) -> Self {
        Self {
            dictionary: self.dictionary.clone_empty(),
            indexes: self.indexes.clone_empty(),
        }
    }

    /// Fails unless this column's storages are the ones `ty` creates.
    pub fn check_type(&self, ty: &DictionaryEncodedType) -> Result<()> {
        let backing = ty.backing_type();
        let storage = self.dictionary.storage_type();
        if storage != backing || self.indexes.index_type() != *ty.index_type() {
            return Err(Error::InvalidArgumentError(format!(
                "column with {storage} entries and {} indexes does not belong to type {ty}",
                self.indexes.index_type()
            )));
        }
        Ok(())
    }
}
