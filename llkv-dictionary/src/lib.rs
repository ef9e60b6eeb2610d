//! Dictionary-encoded (low-cardinality) columns.
//!
//! A [`DictionaryEncodedType`] pairs an element type with an unsigned index
//! type. Its columns ([`DictionaryColumn`]) store each distinct value once in
//! a deduplicating dictionary and one small integer id per row.
//!
//! On disk a column is two streams: `DictionaryElements` (entry count plus
//! every entry, written once per session) and `DictionaryIndexes` (one id per
//! row, chunked freely). See [`bulk`] for the layout and session rules and
//! [`DictionaryEncodedType::deserialize_binary`] for the one-row codec.
//!
//! ```
//! use llkv_dictionary::DictionaryEncodedType;
//! use llkv_data_types::DecodedValue;
//!
//! let ty: DictionaryEncodedType = "WithDictionary(String, UInt8)".parse().unwrap();
//! let mut col = ty.create_column().unwrap();
//! for v in ["a", "b", "a"] {
//!     col.push_value(DecodedValue::Str(v)).unwrap();
//! }
//! assert_eq!(col.dictionary_len(), 2);
//! assert_eq!(col.indexes().to_vec(), vec![0, 1, 0]);
//! ```

mod arrow_export;
pub mod bulk;
pub mod column;
pub mod config;
pub mod descriptor;
mod factory;
mod row;
mod topology;
pub mod unique;

pub use bulk::{BulkReader, BulkWriter, DeserializeState, SerializeState};
pub use column::{AnyDictionary, DictionaryColumn, IndexArray};
pub use config::DictionaryCodecConfig;
pub use descriptor::{DictionaryEncodedType, FAMILY_NAME};
pub use llkv_result::{Error, Result};
pub use unique::{MergePlan, RowInsertion, StagedEntry, UniqueDictionary};
