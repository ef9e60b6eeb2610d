#![allow(dead_code)]

use std::sync::Once;

use bytes::{Bytes, BytesMut};
use llkv_data_types::{DataType, DecodedValue, OwnedValue, StreamSet, SubstreamPath};
use llkv_dictionary::{DictionaryColumn, DictionaryEncodedType};

static INIT: Once = Once::new();

/// Install a tracing subscriber once per test binary. `RUST_LOG` overrides
/// the default `info` filter.
pub fn init_tracing_for_tests() {
    INIT.call_once(|| {
        use tracing_subscriber::filter::EnvFilter;
        use tracing_subscriber::fmt;
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_test_writer()
            .try_init();
    });
}

pub fn string_u8() -> DictionaryEncodedType {
    DictionaryEncodedType::try_new(DataType::String, DataType::UInt8).unwrap()
}

/// Column of `ty` holding `values` in order, built through the
/// deduplicating row insert.
pub fn string_column(ty: &DictionaryEncodedType, values: &[&str]) -> DictionaryColumn {
    let mut col = ty.create_column().unwrap();
    for v in values {
        col.push_value(DecodedValue::Str(v)).unwrap();
    }
    col
}

/// Empty sinks for every stream of `ty`.
pub fn sinks(ty: &DictionaryEncodedType) -> StreamSet<BytesMut> {
    StreamSet::with_paths(ty.stream_paths(&SubstreamPath::new()), BytesMut::new)
}

/// Serialize `col` in consecutive windows of the given sizes through one
/// write session and return the frozen streams.
pub fn write_in_chunks(
    ty: &DictionaryEncodedType,
    col: &DictionaryColumn,
    chunk_sizes: &[usize],
) -> StreamSet<Bytes> {
    let mut streams = sinks(ty);
    let mut writer = ty.bulk_writer();
    let mut offset = 0;
    for &limit in chunk_sizes {
        writer.write_chunk(col, &mut streams, offset, limit).unwrap();
        offset += limit;
    }
    writer.finish();
    streams.freeze()
}

pub fn dictionary_strings(col: &DictionaryColumn) -> Vec<String> {
    col.dictionary()
        .to_owned_values()
        .into_iter()
        .map(|v| match v {
            OwnedValue::Str(s) => s,
            other => panic!("expected a string entry, got {other:?}"),
        })
        .collect()
}
