//! Chunked two-stream binary codec.
//!
//! Wire layout, all integers little-endian:
//!
//! ```text
//! DictionaryElements : u64 count | count entries (element bulk format)
//! DictionaryIndexes  : one index per row (index bulk format), any chunking
//! ```
//!
//! The dictionary is written once per session, on the first chunk whose
//! `DictionaryElements` stream resolves. Index chunks follow in row order.

use bytes::{Buf, BufMut};
use llkv_data_types::{ColumnStorage, StreamGetter, Substream, SubstreamPath};
use llkv_result::{Error, Result};

use crate::column::{DictionaryColumn, with_dictionary};
use crate::unique::UniqueDictionary;
use crate::{DictionaryCodecConfig, DictionaryEncodedType};

/// Write-side session marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerializeState {
    pub dictionary_written: bool,
}

/// Read-side session marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeserializeState {
    pub dictionary_read: bool,
    /// Incoming id to local id, present when the session's dictionary was
    /// merged into a non-empty one.
    remap: Option<Vec<u64>>,
    max_dictionary_entries: u64,
}

impl Default for DeserializeState {
    fn default() -> Self {
        Self::new(&DictionaryCodecConfig::default())
    }
}

impl DeserializeState {
    pub fn new(config: &DictionaryCodecConfig) -> Self {
        Self {
            dictionary_read: false,
            remap: None,
            max_dictionary_entries: config.max_dictionary_entries,
        }
    }

    /// The translation applied to incoming indexes, if any.
    pub fn remap(&self) -> Option<&[u64]> {
        self.remap.as_deref()
    }
}

impl DictionaryEncodedType {
    /// Writes rows `[offset, offset + limit)` of `column`.
    ///
    /// The dictionary goes to the `DictionaryElements` stream under `path`
    /// unless `state` says it was already written this session. Index rows go
    /// to the `DictionaryIndexes` stream. A stream the getter does not
    /// resolve is skipped. `limit == 0` writes through the last row.
    pub fn serialize_binary_bulk_with_multiple_streams<G>(
        &self,
        column: &DictionaryColumn,
        getter: &mut G,
        path: &mut SubstreamPath,
        offset: usize,
        limit: usize,
        state: &mut SerializeState,
    ) -> Result<()>
    where
        G: StreamGetter,
        G::Stream: BufMut,
    {
        column.check_type(self)?;

        path.push(Substream::DictionaryElements);
        if state.dictionary_written {
            tracing::trace!(offset, "dictionary already written, skipping");
        } else if let Some(sink) = getter.get(path) {
            let entries = column.dictionary.len();
            sink.put_u64_le(entries as u64);
            with_dictionary!(&column.dictionary, |d| d
                .storage()
                .serialize_binary_bulk(sink, 0, 0));
            state.dictionary_written = true;
            tracing::trace!(offset, entries, "dictionary written");
        }

        path.replace_last(Substream::DictionaryIndexes);
        if let Some(sink) = getter.get(path) {
            column.indexes.serialize_binary_bulk(sink, offset, limit);
        }
        path.pop();
        Ok(())
    }

    /// Reads up to `limit` rows into `column` and returns how many were
    /// appended.
    ///
    /// The dictionary is read on the first call of the session whose
    /// `DictionaryElements` stream resolves. An empty target takes the
    /// entries as-is; a non-empty one merges them with deduplication and
    /// translates this session's indexes. Every index is validated against
    /// the dictionary before any is appended.
    pub fn deserialize_binary_bulk_with_multiple_streams<G>(
        &self,
        column: &mut DictionaryColumn,
        getter: &mut G,
        path: &mut SubstreamPath,
        limit: usize,
        state: &mut DeserializeState,
    ) -> Result<usize>
    where
        G: StreamGetter,
        G::Stream: Buf,
    {
        column.check_type(self)?;

        path.push(Substream::DictionaryElements);
        if state.dictionary_read {
            tracing::trace!("dictionary already read, skipping");
        } else if let Some(source) = getter.get(path) {
            match read_dictionary(column, source, state.max_dictionary_entries) {
                Ok(remap) => {
                    state.remap = remap;
                    state.dictionary_read = true;
                }
                Err(err) => {
                    path.pop();
                    return Err(err);
                }
            }
        }

        path.replace_last(Substream::DictionaryIndexes);
        let read = match getter.get(path) {
            Some(source) => read_indexes(column, source, limit, state.remap()),
            None => Ok(0),
        };
        path.pop();
        read
    }

    /// Stateless write: the dictionary is written iff `offset == 0`.
    pub fn serialize_binary_bulk<G>(
        &self,
        column: &DictionaryColumn,
        getter: &mut G,
        offset: usize,
        limit: usize,
    ) -> Result<()>
    where
        G: StreamGetter,
        G::Stream: BufMut,
    {
        let mut state = SerializeState {
            dictionary_written: offset != 0,
        };
        self.serialize_binary_bulk_with_multiple_streams(
            column,
            getter,
            &mut SubstreamPath::new(),
            offset,
            limit,
            &mut state,
        )
    }

    /// Stateless read: the dictionary is read iff `column` has no rows.
    pub fn deserialize_binary_bulk<G>(
        &self,
        column: &mut DictionaryColumn,
        getter: &mut G,
        limit: usize,
    ) -> Result<usize>
    where
        G: StreamGetter,
        G::Stream: Buf,
    {
        let mut state = DeserializeState {
            dictionary_read: !column.is_empty(),
            ..DeserializeState::default()
        };
        self.deserialize_binary_bulk_with_multiple_streams(
            column,
            getter,
            &mut SubstreamPath::new(),
            limit,
            &mut state,
        )
    }

    pub fn bulk_writer(&self) -> BulkWriter<'_> {
        BulkWriter {
            ty: self,
            prefix: SubstreamPath::new(),
            state: SerializeState::default(),
            chunks: 0,
        }
    }

    pub fn bulk_reader(&self) -> BulkReader<'_> {
        self.bulk_reader_with(&DictionaryCodecConfig::default())
    }

    pub fn bulk_reader_with(&self, config: &DictionaryCodecConfig) -> BulkReader<'_> {
        BulkReader {
            ty: self,
            prefix: SubstreamPath::new(),
            state: DeserializeState::new(config),
            rows: 0,
        }
    }
}

/// Reads the count header and entries, then installs them into `column`.
/// Returns the id translation when a merge was needed.
fn read_dictionary<B: Buf>(
    column: &mut DictionaryColumn,
    source: &mut B,
    max_entries: u64,
) -> Result<Option<Vec<u64>>> {
    if source.remaining() < 8 {
        return Err(Error::eof(8, source.remaining()));
    }
    let count = source.get_u64_le();
    if count > max_entries {
        return Err(Error::Corrupted(format!(
            "dictionary header announces {count} entries, limit is {max_entries}"
        )));
    }
    let count = usize::try_from(count)
        .map_err(|_| Error::Corrupted(format!("dictionary of {count} entries is too large")))?;

    let DictionaryColumn {
        dictionary,
        indexes,
    } = column;
    with_dictionary!(dictionary, |d| {
        let incoming = read_entries(d, source, count)?;
        install_entries(d, &incoming, indexes.max_id())
    })
}

fn read_entries<S: ColumnStorage, B: Buf>(
    dict: &UniqueDictionary<S>,
    source: &mut B,
    count: usize,
) -> Result<S> {
    let mut incoming = dict.storage().clone_empty();
    let min_entry_bytes = incoming.storage_type().fixed_width().unwrap_or(1).max(1);
    incoming.reserve(count.min(source.remaining() / min_entry_bytes));
    let read = incoming.deserialize_binary_bulk(source, count)?;
    if read != count {
        return Err(Error::Corrupted(format!(
            "dictionary header announces {count} entries, stream holds {read}"
        )));
    }
    Ok(incoming)
}

fn install_entries<S: ColumnStorage>(
    dict: &mut UniqueDictionary<S>,
    incoming: &S,
    max_id: u64,
) -> Result<Option<Vec<u64>>> {
    if dict.is_empty() {
        dict.insert_assuming_incremental_ids(incoming);
        tracing::trace!(entries = incoming.len(), "dictionary read");
        return Ok(None);
    }

    let plan = dict.plan_merge(incoming);
    if let Some(top) = plan.max_id().filter(|&top| top > max_id) {
        return Err(Error::InvalidArgumentError(format!(
            "merging the incoming dictionary needs id {top}, index width allows {max_id}"
        )));
    }
    dict.apply_merge(incoming, &plan);
    tracing::trace!(
        entries = incoming.len(),
        added = plan.novel.len(),
        "dictionary merged into non-empty target"
    );
    Ok(Some(plan.remap))
}

fn read_indexes<B: Buf>(
    column: &mut DictionaryColumn,
    source: &mut B,
    limit: usize,
    remap: Option<&[u64]>,
) -> Result<usize> {
    let mut chunk = column.indexes.clone_empty();
    let read = chunk.deserialize_binary_bulk(source, limit)?;
    let dictionary_len = column.dictionary.len();
    column
        .indexes
        .extend_checked(&chunk, remap, dictionary_len)?;
    Ok(read)
}

/// A write session over one column. Holds the dictionary-written marker
/// between chunks.
#[derive(Debug)]
pub struct BulkWriter<'a> {
    ty: &'a DictionaryEncodedType,
    prefix: SubstreamPath,
    state: SerializeState,
    chunks: usize,
}

impl BulkWriter<'_> {
    /// Nests this session's streams under `prefix`.
    pub fn with_prefix(mut self, prefix: SubstreamPath) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn state(&self) -> SerializeState {
        self.state
    }

    pub fn write_chunk<G>(
        &mut self,
        column: &DictionaryColumn,
        getter: &mut G,
        offset: usize,
        limit: usize,
    ) -> Result<()>
    where
        G: StreamGetter,
        G::Stream: BufMut,
    {
        let mut path = self.prefix.clone();
        self.ty.serialize_binary_bulk_with_multiple_streams(
            column,
            getter,
            &mut path,
            offset,
            limit,
            &mut self.state,
        )?;
        self.chunks += 1;
        Ok(())
    }

    pub fn finish(self) -> SerializeState {
        tracing::debug!(
            ty = %self.ty,
            chunks = self.chunks,
            dictionary_written = self.state.dictionary_written,
            "bulk write session finished"
        );
        self.state
    }
}

/// A read session into one column. Chunks must be applied in order.
#[derive(Debug)]
pub struct BulkReader<'a> {
    ty: &'a DictionaryEncodedType,
    prefix: SubstreamPath,
    state: DeserializeState,
    rows: usize,
}

impl BulkReader<'_> {
    /// Nests this session's streams under `prefix`.
    pub fn with_prefix(mut self, prefix: SubstreamPath) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn state(&self) -> &DeserializeState {
        &self.state
    }

    pub fn read_chunk<G>(
        &mut self,
        column: &mut DictionaryColumn,
        getter: &mut G,
        limit: usize,
    ) -> Result<usize>
    where
        G: StreamGetter,
        G::Stream: Buf,
    {
        let mut path = self.prefix.clone();
        let read = self.ty.deserialize_binary_bulk_with_multiple_streams(
            column,
            getter,
            &mut path,
            limit,
            &mut self.state,
        )?;
        self.rows += read;
        Ok(read)
    }

    /// Reads chunks of `chunk_rows` until the index stream runs dry.
    pub fn read_to_end<G>(
        &mut self,
        column: &mut DictionaryColumn,
        getter: &mut G,
        chunk_rows: usize,
    ) -> Result<usize>
    where
        G: StreamGetter,
        G::Stream: Buf,
    {
        if chunk_rows == 0 {
            return Err(Error::InvalidArgumentError(
                "chunk size of a bulk read must be positive".into(),
            ));
        }
        let start = self.rows;
        while self.read_chunk(column, getter, chunk_rows)? == chunk_rows {}
        Ok(self.rows - start)
    }

    pub fn finish(self) -> DeserializeState {
        tracing::debug!(
            ty = %self.ty,
            rows = self.rows,
            merged = self.state.remap.is_some(),
            "bulk read session finished"
        );
        self.state
    }
}
