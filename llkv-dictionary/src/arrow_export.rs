//! Export of dictionary columns as Arrow `DictionaryArray`s.

use std::sync::Arc;

use arrow::array::{
    ArrayRef, Date32Array, DictionaryArray, FixedSizeBinaryArray, Float32Array, Float64Array,
    Int8Array, Int16Array, Int32Array, Int64Array, StringArray, TimestampSecondArray, UInt8Array,
    UInt16Array, UInt32Array, UInt64Array,
};
use arrow::buffer::Buffer;
use arrow::datatypes::{UInt8Type, UInt16Type, UInt32Type, UInt64Type};
use llkv_data_types::DataType;
use llkv_result::{Error, Result};

use crate::DictionaryEncodedType;
use crate::column::{AnyDictionary, DictionaryColumn, IndexArray};

impl DictionaryColumn {
    /// Exports the column as an Arrow `DictionaryArray`.
    ///
    /// Keys use the unsigned type of the index width. Values are `Utf8`,
    /// `FixedSizeBinary`, `Date32`, `Timestamp(Second)` or the matching
    /// primitive type.
    pub fn to_arrow(&self, ty: &DictionaryEncodedType) -> Result<ArrayRef> {
        self.check_type(ty)?;
        let values = self.values_array(ty.element_type())?;
        let array: ArrayRef = match &self.indexes {
            IndexArray::UInt8(keys) => Arc::new(DictionaryArray::<UInt8Type>::try_new(
                UInt8Array::from(keys.as_slice().to_vec()),
                values,
            )?),
            IndexArray::UInt16(keys) => Arc::new(DictionaryArray::<UInt16Type>::try_new(
                UInt16Array::from(keys.as_slice().to_vec()),
                values,
            )?),
            IndexArray::UInt32(keys) => Arc::new(DictionaryArray::<UInt32Type>::try_new(
                UInt32Array::from(keys.as_slice().to_vec()),
                values,
            )?),
            IndexArray::UInt64(keys) => Arc::new(DictionaryArray::<UInt64Type>::try_new(
                UInt64Array::from(keys.as_slice().to_vec()),
                values,
            )?),
        };
        Ok(array)
    }

    fn values_array(&self, element: &DataType) -> Result<ArrayRef> {
        let values: ArrayRef = match (&self.dictionary, element) {
            (AnyDictionary::String(d), _) => {
                Arc::new(StringArray::from_iter_values(d.storage().iter()))
            }
            (AnyDictionary::FixedString(d), _) => {
                let width = i32::try_from(d.storage().width()).map_err(|_| {
                    Error::InvalidArgumentError(format!(
                        "FixedString({}) is too wide for Arrow",
                        d.storage().width()
                    ))
                })?;
                Arc::new(FixedSizeBinaryArray::try_new(
                    width,
                    Buffer::from_slice_ref(d.storage().as_bytes()),
                    None,
                )?)
            }
            (AnyDictionary::UInt16(d), DataType::Date) => Arc::new(Date32Array::from(
                d.storage()
                    .as_slice()
                    .iter()
                    .map(|&days| i32::from(days))
                    .collect::<Vec<_>>(),
            )),
            (AnyDictionary::UInt32(d), DataType::DateTime) => Arc::new(TimestampSecondArray::from(
                d.storage()
                    .as_slice()
                    .iter()
                    .map(|&secs| i64::from(secs))
                    .collect::<Vec<_>>(),
            )),
            (AnyDictionary::UInt8(d), _) => {
                Arc::new(UInt8Array::from(d.storage().as_slice().to_vec()))
            }
            (AnyDictionary::UInt16(d), _) => {
                Arc::new(UInt16Array::from(d.storage().as_slice().to_vec()))
            }
            (AnyDictionary::UInt32(d), _) => {
                Arc::new(UInt32Array::from(d.storage().as_slice().to_vec()))
            }
            (AnyDictionary::UInt64(d), _) => {
                Arc::new(UInt64Array::from(d.storage().as_slice().to_vec()))
            }
            (AnyDictionary::Int8(d), _) => {
                Arc::new(Int8Array::from(d.storage().as_slice().to_vec()))
            }
            (AnyDictionary::Int16(d), _) => {
                Arc::new(Int16Array::from(d.storage().as_slice().to_vec()))
            }
            (AnyDictionary::Int32(d), _) => {
                Arc::new(Int32Array::from(d.storage().as_slice().to_vec()))
            }
            (AnyDictionary::Int64(d), _) => {
                Arc::new(Int64Array::from(d.storage().as_slice().to_vec()))
            }
            (AnyDictionary::Float32(d), _) => {
                Arc::new(Float32Array::from(d.storage().as_slice().to_vec()))
            }
            (AnyDictionary::Float64(d), _) => {
                Arc::new(Float64Array::from(d.storage().as_slice().to_vec()))
            }
        };
        Ok(values)
    }
}
