mod common;

use bytes::{BufMut, Bytes, BytesMut};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use llkv_data_types::{DataType, DecodedValue, StreamGetter, StreamSet, Substream, SubstreamPath};
use llkv_dictionary::{DictionaryCodecConfig, DictionaryEncodedType, Error, SerializeState};

/* --------------------------- Shared helpers ---------------------------- */

fn dict_path() -> SubstreamPath {
    SubstreamPath::from([Substream::DictionaryElements])
}

fn index_path() -> SubstreamPath {
    SubstreamPath::from([Substream::DictionaryIndexes])
}

fn stream_bytes(streams: &StreamSet<Bytes>, path: &SubstreamPath) -> Vec<u8> {
    streams.get_ref(path).map(|b| b.to_vec()).unwrap_or_default()
}

/* ------------------------------- Tests --------------------------------- */

#[test]
fn single_chunk_roundtrip() {
    common::init_tracing_for_tests();
    let ty = common::string_u8();
    let col = common::string_column(&ty, &["a", "b", "a", "c"]);
    assert_eq!(common::dictionary_strings(&col), vec!["a", "b", "c"]);
    assert_eq!(col.indexes().to_vec(), vec![0, 1, 0, 2]);

    let mut streams = common::sinks(&ty);
    ty.serialize_binary_bulk(&col, &mut streams, 0, 4).unwrap();
    let mut streams = streams.freeze();

    let mut expected_dict = Vec::new();
    expected_dict.put_u64_le(3);
    expected_dict.extend_from_slice(&[1, b'a', 1, b'b', 1, b'c']);
    assert_eq!(stream_bytes(&streams, &dict_path()), expected_dict);
    assert_eq!(stream_bytes(&streams, &index_path()), vec![0, 1, 0, 2]);

    let mut back = ty.create_column().unwrap();
    assert_eq!(ty.deserialize_binary_bulk(&mut back, &mut streams, 4).unwrap(), 4);
    assert_eq!(common::dictionary_strings(&back), vec!["a", "b", "c"]);
    assert_eq!(back.indexes().to_vec(), vec![0, 1, 0, 2]);
    assert_eq!(back, col);
}

#[test]
fn chunked_serialize_writes_dictionary_once() {
    common::init_tracing_for_tests();
    let ty = common::string_u8();
    let col = common::string_column(&ty, &["a", "b", "a", "c"]);

    let mut streams = common::sinks(&ty);
    ty.serialize_binary_bulk(&col, &mut streams, 0, 2).unwrap();
    let dict_after_first = streams.get_ref(&dict_path()).unwrap().len();
    assert!(dict_after_first > 0);
    assert_eq!(streams.get_ref(&index_path()).unwrap().as_ref(), &[0, 1]);

    ty.serialize_binary_bulk(&col, &mut streams, 2, 2).unwrap();
    assert_eq!(streams.get_ref(&dict_path()).unwrap().len(), dict_after_first);
    assert_eq!(streams.get_ref(&index_path()).unwrap().as_ref(), &[0, 1, 0, 2]);

    let whole = common::write_in_chunks(&ty, &col, &[4]);
    let chunked = streams.freeze();
    assert_eq!(
        stream_bytes(&chunked, &index_path()),
        stream_bytes(&whole, &index_path())
    );
    assert_eq!(
        stream_bytes(&chunked, &dict_path()),
        stream_bytes(&whole, &dict_path())
    );
}

#[test]
fn chunked_deserialize_reads_dictionary_once() {
    common::init_tracing_for_tests();
    let ty = common::string_u8();
    let col = common::string_column(&ty, &["a", "b", "a", "c"]);

    let mut streams = common::write_in_chunks(&ty, &col, &[4]);
    let mut single = ty.create_column().unwrap();
    ty.deserialize_binary_bulk(&mut single, &mut streams.clone(), 4).unwrap();

    let mut chunked = ty.create_column().unwrap();
    assert_eq!(ty.deserialize_binary_bulk(&mut chunked, &mut streams, 2).unwrap(), 2);
    assert!(streams.get_ref(&dict_path()).unwrap().is_empty());
    assert_eq!(chunked.dictionary_len(), 3);

    assert_eq!(ty.deserialize_binary_bulk(&mut chunked, &mut streams, 2).unwrap(), 2);
    assert_eq!(chunked.dictionary_len(), 3);
    assert_eq!(chunked, single);
}

#[test]
fn sessions_chunk_independently_on_both_sides() {
    common::init_tracing_for_tests();
    let ty = common::string_u8();
    let values = ["x", "y", "x", "z", "z", "y", "w"];
    let col = common::string_column(&ty, &values);

    let mut streams = common::write_in_chunks(&ty, &col, &[3, 1, 3]);
    let mut reader = ty.bulk_reader();
    let mut back = ty.create_column().unwrap();
    assert_eq!(reader.read_chunk(&mut back, &mut streams, 2).unwrap(), 2);
    assert!(reader.state().dictionary_read);
    assert_eq!(reader.read_to_end(&mut back, &mut streams, 4).unwrap(), 5);
    let state = reader.finish();
    assert!(state.remap().is_none());
    assert_eq!(back, col);
}

#[test]
fn empty_column_roundtrips_with_zero_header() {
    let ty = common::string_u8();
    let col = ty.create_column().unwrap();
    let mut streams = common::write_in_chunks(&ty, &col, &[0]);
    assert_eq!(stream_bytes(&streams, &dict_path()), vec![0; 8]);
    assert!(stream_bytes(&streams, &index_path()).is_empty());

    let mut back = ty.create_column().unwrap();
    assert_eq!(ty.deserialize_binary_bulk(&mut back, &mut streams, 10).unwrap(), 0);
    assert_eq!(back, col);
}

#[test]
fn unresolved_streams_are_skipped() {
    let ty = common::string_u8();
    let col = common::string_column(&ty, &["a", "b"]);

    let mut only_indexes: StreamSet<BytesMut> = StreamSet::new();
    only_indexes.insert(index_path(), BytesMut::new());
    let mut state = SerializeState::default();
    ty.serialize_binary_bulk_with_multiple_streams(
        &col,
        &mut only_indexes,
        &mut SubstreamPath::new(),
        0,
        0,
        &mut state,
    )
    .unwrap();
    assert!(!state.dictionary_written);
    assert_eq!(only_indexes.get(&index_path()).unwrap().as_ref(), &[0, 1]);

    // A later session chunk that does resolve the dictionary still writes it.
    let mut both = common::sinks(&ty);
    ty.serialize_binary_bulk_with_multiple_streams(
        &col,
        &mut both,
        &mut SubstreamPath::new(),
        1,
        1,
        &mut state,
    )
    .unwrap();
    assert!(state.dictionary_written);
    assert_eq!(both.get(&index_path()).unwrap().as_ref(), &[1]);
    assert!(!both.get(&dict_path()).unwrap().is_empty());
}

#[test]
fn nested_prefix_addresses_nested_streams() {
    let ty = common::string_u8();
    let col = common::string_column(&ty, &["p", "q", "p"]);
    let prefix = SubstreamPath::from([Substream::ArrayElements]);

    let mut streams = StreamSet::with_paths(ty.stream_paths(&prefix), BytesMut::new);
    let mut writer = ty.bulk_writer().with_prefix(prefix.clone());
    writer.write_chunk(&col, &mut streams, 0, 0).unwrap();
    assert!(writer.finish().dictionary_written);
    let mut streams = streams.freeze();
    assert_eq!(
        stream_bytes(&streams, &prefix.child(Substream::DictionaryIndexes)),
        vec![0, 1, 0]
    );

    let mut back = ty.create_column().unwrap();
    let mut reader = ty.bulk_reader().with_prefix(prefix);
    reader.read_to_end(&mut back, &mut streams, 2).unwrap();
    assert_eq!(back, col);
}

#[test]
fn reading_into_populated_column_remaps_indexes() {
    common::init_tracing_for_tests();
    let ty = common::string_u8();
    let source = common::string_column(&ty, &["a", "b", "a", "c"]);
    let mut streams = common::write_in_chunks(&ty, &source, &[2, 2]);

    let mut target = common::string_column(&ty, &["x", "a"]);
    let mut reader = ty.bulk_reader();
    reader.read_chunk(&mut target, &mut streams, 3).unwrap();
    assert_eq!(reader.state().remap(), Some(&[1, 2, 3][..]));
    reader.read_chunk(&mut target, &mut streams, 3).unwrap();

    assert_eq!(common::dictionary_strings(&target), vec!["x", "a", "b", "c"]);
    assert_eq!(target.indexes().to_vec(), vec![0, 1, 1, 2, 1, 3]);
    let rendered: Vec<_> = (0..target.len())
        .map(|row| target.value_at(row).unwrap().to_string())
        .collect();
    assert_eq!(rendered, vec!["x", "a", "a", "b", "a", "c"]);
}

#[test]
fn merge_that_overflows_index_width_changes_nothing() {
    let ty = common::string_u8();
    let words: Vec<String> = (0..200).map(|i| format!("s{i}")).collect();
    let other: Vec<String> = (0..100).map(|i| format!("t{i}")).collect();

    let source = common::string_column(&ty, &other.iter().map(String::as_str).collect::<Vec<_>>());
    let mut streams = common::write_in_chunks(&ty, &source, &[0]);

    let existing: Vec<&str> = words.iter().map(String::as_str).collect();
    let mut target = common::string_column(&ty, &existing);
    let before = target.clone();
    let err = ty
        .bulk_reader()
        .read_chunk(&mut target, &mut streams, 0)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgumentError(_)));
    assert_eq!(target, before);
}

#[test]
fn index_beyond_dictionary_is_corruption() {
    let ty = common::string_u8();
    let mut streams: StreamSet<Bytes> = StreamSet::new();
    let mut dict = BytesMut::new();
    dict.put_u64_le(1);
    dict.put_slice(&[1, b'a']);
    streams.insert(dict_path(), dict.freeze());
    streams.insert(index_path(), Bytes::from_static(&[0, 0, 1]));

    let mut col = ty.create_column().unwrap();
    let err = ty.deserialize_binary_bulk(&mut col, &mut streams, 3).unwrap_err();
    assert!(matches!(err, Error::Corrupted(_)));
    assert!(col.is_empty());
}

#[test]
fn oversized_dictionary_header_is_corruption() {
    let ty = common::string_u8();
    let mut streams: StreamSet<Bytes> = StreamSet::new();
    let mut dict = BytesMut::new();
    dict.put_u64_le(1_000);
    streams.insert(dict_path(), dict.freeze());
    streams.insert(index_path(), Bytes::new());

    let config = DictionaryCodecConfig {
        max_dictionary_entries: 10,
        ..Default::default()
    };
    let mut col = ty.create_column_with(&config).unwrap();
    let err = ty
        .bulk_reader_with(&config)
        .read_chunk(&mut col, &mut streams, 1)
        .unwrap_err();
    assert!(matches!(err, Error::Corrupted(msg) if msg.contains("1000")));
}

#[test]
fn wide_fixed_string_header_fails_without_allocating() {
    let ty: DictionaryEncodedType = format!("WithDictionary(FixedString({}), UInt8)", 1u64 << 62)
        .parse()
        .unwrap();
    let mut streams: StreamSet<Bytes> = StreamSet::new();
    let mut dict = BytesMut::new();
    dict.put_u64_le(4);
    dict.put_slice(&[0; 16]);
    streams.insert(dict_path(), dict.freeze());
    streams.insert(index_path(), Bytes::from_static(&[0]));

    let mut col = ty.create_column().unwrap();
    let err = ty.deserialize_binary_bulk(&mut col, &mut streams, 1).unwrap_err();
    assert!(matches!(err, Error::Corrupted(_) | Error::UnexpectedEof { .. }));
    assert!(col.is_empty());
    assert_eq!(col.dictionary_len(), 0);
}

#[test]
fn huge_capacity_hints_are_ignored() {
    let ty: DictionaryEncodedType = format!("WithDictionary(FixedString({}), UInt64)", 1u64 << 62)
        .parse()
        .unwrap();
    let config = DictionaryCodecConfig {
        dictionary_capacity_hint: usize::MAX,
        index_capacity_hint: usize::MAX,
        ..Default::default()
    };
    let col = ty.create_column_with(&config).unwrap();
    assert!(col.is_empty());
    assert_eq!(col.dictionary_len(), 0);
}

#[test]
fn truncated_dictionary_is_reported() {
    let ty = common::string_u8();

    let mut short_header: StreamSet<Bytes> = StreamSet::new();
    short_header.insert(dict_path(), Bytes::from_static(&[3, 0, 0]));
    let mut col = ty.create_column().unwrap();
    assert!(matches!(
        ty.deserialize_binary_bulk(&mut col, &mut short_header, 1),
        Err(Error::UnexpectedEof { needed: 8, remaining: 3 })
    ));

    let mut missing_entries: StreamSet<Bytes> = StreamSet::new();
    let mut dict = BytesMut::new();
    dict.put_u64_le(3);
    dict.put_slice(&[1, b'a']);
    missing_entries.insert(dict_path(), dict.freeze());
    assert!(matches!(
        ty.deserialize_binary_bulk(&mut col, &mut missing_entries, 1),
        Err(Error::Corrupted(_))
    ));

    let mut torn_entry: StreamSet<Bytes> = StreamSet::new();
    let mut dict = BytesMut::new();
    dict.put_u64_le(1);
    dict.put_slice(&[5, b'a']);
    torn_entry.insert(dict_path(), dict.freeze());
    assert!(matches!(
        ty.deserialize_binary_bulk(&mut col, &mut torn_entry, 1),
        Err(Error::UnexpectedEof { .. })
    ));
    assert_eq!(col.dictionary_len(), 0);
}

#[test]
fn column_of_another_type_is_rejected() {
    let ty = common::string_u8();
    let wide = DictionaryEncodedType::try_new(DataType::String, DataType::UInt16).unwrap();
    let col = common::string_column(&wide, &["a"]);
    let mut streams = common::sinks(&ty);
    assert!(matches!(
        ty.serialize_binary_bulk(&col, &mut streams, 0, 0),
        Err(Error::InvalidArgumentError(_))
    ));
}

#[test]
fn numeric_and_date_elements_roundtrip() {
    common::init_tracing_for_tests();
    let floats = DictionaryEncodedType::try_new(DataType::Float64, DataType::UInt16).unwrap();
    let mut col = floats.create_column().unwrap();
    for v in [1.5, -0.0, 1.5, 0.0, f64::MAX] {
        col.push_value(DecodedValue::Float64(v)).unwrap();
    }
    // Bitwise identity keeps -0.0 and 0.0 apart.
    assert_eq!(col.dictionary_len(), 4);
    let mut streams = common::write_in_chunks(&floats, &col, &[2, 3]);
    let mut back = floats.create_column().unwrap();
    floats.bulk_reader().read_to_end(&mut back, &mut streams, 2).unwrap();
    assert_eq!(back.indexes().to_vec(), vec![0, 1, 0, 2, 3]);

    let dates =
        DictionaryEncodedType::try_new(DataType::nullable(DataType::Date), DataType::UInt8)
            .unwrap();
    let mut col = dates.create_column().unwrap();
    for d in ["2024-01-01", "2024-01-02", "2024-01-01"] {
        dates.deserialize_text(&mut col, d).unwrap();
    }
    let mut streams = common::write_in_chunks(&dates, &col, &[3]);
    let mut back = dates.create_column().unwrap();
    dates.deserialize_binary_bulk(&mut back, &mut streams, 3).unwrap();
    assert_eq!(dates.serialize_text(&back, 2).unwrap(), "2024-01-01");
    assert_eq!(back, col);
}

#[test]
fn randomized_chunking_roundtrips() {
    common::init_tracing_for_tests();
    let mut rng = StdRng::seed_from_u64(0xD1C7);
    let ty = DictionaryEncodedType::try_new(DataType::String, DataType::UInt16).unwrap();

    for _ in 0..20 {
        let vocab: Vec<String> = (0..rng.random_range(1..50))
            .map(|i| format!("v{i}-{}", rng.random_range(0..1000)))
            .collect();
        let rows = rng.random_range(0..400);
        let mut col = ty.create_column().unwrap();
        for _ in 0..rows {
            let word = &vocab[rng.random_range(0..vocab.len())];
            col.push_value(DecodedValue::Str(word)).unwrap();
        }

        let mut chunks = Vec::new();
        let mut covered = 0;
        while covered < rows {
            let n = rng.random_range(1..=64).min(rows - covered);
            chunks.push(n);
            covered += n;
        }
        if chunks.is_empty() {
            chunks.push(0);
        }
        let mut streams = common::write_in_chunks(&ty, &col, &chunks);

        let mut back = ty.create_column().unwrap();
        let mut reader = ty.bulk_reader();
        let read = reader
            .read_to_end(&mut back, &mut streams, rng.random_range(1..=97))
            .unwrap();
        assert_eq!(read, rows);
        assert_eq!(back, col);
    }
}

#[test]
fn disjoint_ranges_serialize_concurrently() {
    common::init_tracing_for_tests();
    let ty = common::string_u8();
    let values: Vec<String> = (0..1_000).map(|i| format!("k{}", i % 37)).collect();
    let col = common::string_column(&ty, &values.iter().map(String::as_str).collect::<Vec<_>>());

    let ranges: Vec<(usize, usize)> = (0..10).map(|i| (i * 100, 100)).collect();
    let parts: Vec<Vec<u8>> = ranges
        .par_iter()
        .map(|&(offset, limit)| {
            let mut streams = common::sinks(&ty);
            ty.serialize_binary_bulk(&col, &mut streams, offset, limit)
                .unwrap();
            let streams = streams.freeze();
            let dict = stream_bytes(&streams, &dict_path());
            assert_eq!(dict.is_empty(), offset != 0);
            stream_bytes(&streams, &index_path())
        })
        .collect();

    let whole = common::write_in_chunks(&ty, &col, &[1_000]);
    assert_eq!(parts.concat(), stream_bytes(&whole, &index_path()));
}
