//! Column factory: picks the backing storages for a descriptor.

use llkv_data_types::{DataType, FixedStringColumn, NumericColumn, StringColumn};
use llkv_result::{Error, Result};

use crate::column::{AnyDictionary, DictionaryColumn, IndexArray};
use crate::unique::UniqueDictionary;
use crate::{DictionaryCodecConfig, DictionaryEncodedType};

impl DictionaryEncodedType {
    /// Creates an empty column with the default configuration.
    pub fn create_column(&self) -> Result<DictionaryColumn> {
        self.create_column_with(&DictionaryCodecConfig::default())
    }

    /// Creates an empty column whose storages match this descriptor.
    pub fn create_column_with(&self, config: &DictionaryCodecConfig) -> Result<DictionaryColumn> {
        let dictionary = dictionary_for(self.element_type(), config.dictionary_capacity_hint)?;
        let indexes = IndexArray::for_type(self.index_type(), config.index_capacity_hint)
            .ok_or_else(|| {
                Error::LogicalError(format!(
                    "index type must be unsigned integer, got {}",
                    self.index_type()
                ))
            })?;
        tracing::debug!(
            ty = %self,
            backing = %dictionary.storage_type(),
            "dictionary column created"
        );
        Ok(DictionaryColumn::from_parts(dictionary, indexes))
    }
}

/// Picks the backing storage for an (already unwrapped) element type.
pub(crate) fn dictionary_for(element: &DataType, capacity: usize) -> Result<AnyDictionary> {
    match element {
        DataType::String => Ok(AnyDictionary::String(UniqueDictionary::with_capacity(
            StringColumn::new(),
            capacity,
        ))),
        DataType::FixedString(width) => Ok(AnyDictionary::FixedString(
            UniqueDictionary::with_capacity(FixedStringColumn::new(*width), capacity),
        )),
        DataType::Date => Ok(AnyDictionary::UInt16(UniqueDictionary::with_capacity(
            NumericColumn::new(),
            capacity,
        ))),
        DataType::DateTime => Ok(AnyDictionary::UInt32(UniqueDictionary::with_capacity(
            NumericColumn::new(),
            capacity,
        ))),
        numeric if numeric.is_numeric() => numeric_dictionary(numeric, capacity),
        other => Err(Error::LogicalError(format!(
            "unexpected dictionary type {other}"
        ))),
    }
}

fn numeric_dictionary(element: &DataType, capacity: usize) -> Result<AnyDictionary> {
    macro_rules! numeric_backing {
        ($variant:ident, $native:ident, $put:ident, $get:ident) => {
            if *element == DataType::$variant {
                return Ok(AnyDictionary::$variant(UniqueDictionary::with_capacity(
                    NumericColumn::<$native>::new(),
                    capacity,
                )));
            }
        };
    }

    llkv_data_types::llkv_for_each_numeric!(numeric_backing);

    Err(Error::LogicalError(format!(
        "unexpected numeric type {element}"
    )))
}
