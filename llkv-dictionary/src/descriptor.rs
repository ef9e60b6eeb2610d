//! The `WithDictionary(element, index)` type descriptor.

use std::fmt;
use std::str::FromStr;

use llkv_data_types::DataType;
use llkv_data_types::parse::split_arguments;
use llkv_result::{Error, Result};

/// Family name used in textual type descriptions.
pub const FAMILY_NAME: &str = "WithDictionary";

/// Immutable description of a dictionary-encoded column: the type of its
/// distinct values and the unsigned integer type of its per-row indexes.
///
/// Two descriptors are equal when both component types are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DictionaryEncodedType {
    dictionary_type: DataType,
    index_type: DataType,
}

impl DictionaryEncodedType {
    /// Validates and builds a descriptor.
    ///
    /// One `Nullable` layer around the element type is allowed and kept; the
    /// type underneath must be a string, fixed string, date, date-time or
    /// number. The index type must be an unsigned integer.
    pub fn try_new(dictionary_type: DataType, index_type: DataType) -> Result<Self> {
        if !index_type.is_unsigned_integer() {
            return Err(Error::InvalidArgumentError(format!(
                "index type of {FAMILY_NAME} must be an unsigned integer, but got {index_type}"
            )));
        }

        let element = dictionary_type.unwrap_nullable();
        let supported = element.is_string_or_fixed_string()
            || element.is_date_or_datetime()
            || element.is_numeric();
        if !supported {
            return Err(Error::InvalidArgumentError(format!(
                "dictionary type of {FAMILY_NAME} must be String, FixedString, Date, DateTime \
                 or a number, but got {dictionary_type}"
            )));
        }
        if let DataType::FixedString(0) = element {
            return Err(Error::InvalidArgumentError(format!(
                "dictionary type of {FAMILY_NAME} has zero width: {dictionary_type}"
            )));
        }

        Ok(Self::new_unchecked(dictionary_type, index_type))
    }

    /// Skips validation. Only the factory's own tests build invalid
    /// descriptors on purpose.
    pub(crate) fn new_unchecked(dictionary_type: DataType, index_type: DataType) -> Self {
        Self {
            dictionary_type,
            index_type,
        }
    }

    /// The element type as declared, including any `Nullable` wrapper.
    pub fn dictionary_type(&self) -> &DataType {
        &self.dictionary_type
    }

    /// The element type with one `Nullable` layer removed. Storage, codecs
    /// and stream topology all work in terms of this type.
    pub fn element_type(&self) -> &DataType {
        self.dictionary_type.unwrap_nullable()
    }

    pub fn index_type(&self) -> &DataType {
        &self.index_type
    }

    /// Type of the values physically held by the dictionary storage. Dates
    /// and date-times live in their unsigned backing types.
    pub fn backing_type(&self) -> DataType {
        match self.element_type() {
            DataType::Date => DataType::UInt16,
            DataType::DateTime => DataType::UInt32,
            other => other.clone(),
        }
    }
}

impl fmt::Display for DictionaryEncodedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{FAMILY_NAME}({}, {})",
            self.dictionary_type, self.index_type
        )
    }
}

impl FromStr for DictionaryEncodedType {
    type Err = Error;

    /// Parses `WithDictionary(<element>, <index>)`.
    fn from_str(text: &str) -> Result<Self> {
        let (family, args) = split_arguments(text)?;
        if family != FAMILY_NAME {
            return Err(Error::InvalidArgumentError(format!(
                "expected {FAMILY_NAME} data type family, got '{family}'"
            )));
        }
        match args.as_deref() {
            Some([element, index]) => {
                Self::try_new(element.parse::<DataType>()?, index.parse::<DataType>()?)
            }
            _ => Err(Error::InvalidArgumentError(format!(
                "{FAMILY_NAME} data type family must have two arguments - \
                 type of elements and type of indexes"
            ))),
        }
    }
}
