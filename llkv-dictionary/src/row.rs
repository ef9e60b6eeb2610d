//! One-row codecs.
//!
//! Deserializing a row raw-appends the candidate into the dictionary
//! storage, resolves it against the committed entries, and either keeps it
//! (novel value) or retracts it (duplicate). See
//! [`StagedEntry`](crate::unique::StagedEntry).

use bytes::{Buf, BufMut};
use llkv_data_types::{ColumnStorage, DecodedValue, OwnedValue};
use llkv_result::{Error, Result};

use crate::DictionaryEncodedType;
use crate::column::{DictionaryColumn, with_dictionary};
use crate::factory::dictionary_for;
use crate::unique::RowInsertion;

fn row_out_of_range(row: usize, len: usize) -> Error {
    Error::InvalidArgumentError(format!("row {row} is out of range for a column of {len} rows"))
}

impl DictionaryEncodedType {
    /// Writes the dictionary entry that `row` points at, in the element
    /// type's binary form.
    pub fn serialize_binary<B: BufMut>(
        &self,
        column: &DictionaryColumn,
        row: usize,
        sink: &mut B,
    ) -> Result<()> {
        column.check_type(self)?;
        let id = column
            .index_at(row)
            .ok_or_else(|| row_out_of_range(row, column.len()))?;
        with_dictionary!(&column.dictionary, |d| d
            .storage()
            .serialize_binary(id as usize, sink));
        Ok(())
    }

    /// Reads one value and appends it as a new row.
    pub fn deserialize_binary<B: Buf>(
        &self,
        column: &mut DictionaryColumn,
        source: &mut B,
    ) -> Result<RowInsertion> {
        column.check_type(self)?;
        let DictionaryColumn {
            dictionary,
            indexes,
        } = column;
        with_dictionary!(dictionary, |d| d
            .stage_with(|s| s.deserialize_binary(source).map_err(Error::from))?
            .commit(|id| indexes.push(id)))
    }

    /// Renders the value of `row` as text.
    pub fn serialize_text(&self, column: &DictionaryColumn, row: usize) -> Result<String> {
        column.check_type(self)?;
        let value = column
            .value_at(row)
            .ok_or_else(|| row_out_of_range(row, column.len()))?;
        self.element_type().format_text(value)
    }

    /// Parses `text` and appends it as a new row.
    pub fn deserialize_text(
        &self,
        column: &mut DictionaryColumn,
        text: &str,
    ) -> Result<RowInsertion> {
        column.check_type(self)?;
        let value = self.element_type().parse_text(text)?;
        let DictionaryColumn {
            dictionary,
            indexes,
        } = column;
        with_dictionary!(dictionary, |d| d
            .stage_with(|s| s.push_value(value).map_err(Error::from))?
            .commit(|id| indexes.push(id)))
    }

    /// Writes one bare value in the element type's binary form.
    pub fn serialize_value<B: BufMut>(&self, value: &DecodedValue<'_>, sink: &mut B) -> Result<()> {
        let mut scratch = dictionary_for(self.element_type(), 1)?;
        with_dictionary!(&mut scratch, |d| {
            let staged = d.stage_with(|s| s.push_value(*value).map_err(Error::from))?;
            staged.storage().serialize_binary(staged.position(), sink);
        });
        Ok(())
    }

    /// Reads one bare value in the element type's binary form.
    pub fn deserialize_value<B: Buf>(&self, source: &mut B) -> Result<OwnedValue> {
        let mut scratch = dictionary_for(self.element_type(), 1)?;
        with_dictionary!(&mut scratch, |d| {
            let staged = d.stage_with(|s| s.deserialize_binary(source).map_err(Error::from))?;
            let value = staged.value().to_owned_value();
            Ok(value)
        })
    }
}
