//! Substream addressing.
//!
//! A column of a composite type is written to several physical byte streams.
//! Each stream is identified by a [`SubstreamPath`]: the chain of
//! [`Substream`] tags walked from the column root down to the leaf that owns
//! it. Paths are produced by `enumerate_streams` and resolved to actual
//! sinks or sources through a caller-supplied [`StreamGetter`].

use std::fmt;

use bytes::{Bytes, BytesMut};
use rustc_hash::FxHashMap;

use crate::DataType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Substream {
    NullMap,
    NullableElements,
    ArraySizes,
    ArrayElements,
    /// The distinct values of a dictionary-encoded column.
    DictionaryElements,
    /// Per-row positions into the dictionary.
    DictionaryIndexes,
}

/// Ordered chain of substream tags, root first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SubstreamPath(Vec<Substream>);

impl SubstreamPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tag: Substream) {
        self.0.push(tag);
    }

    pub fn pop(&mut self) -> Option<Substream> {
        self.0.pop()
    }

    /// Overwrites the deepest tag. Does nothing on an empty path.
    pub fn replace_last(&mut self, tag: Substream) {
        if let Some(last) = self.0.last_mut() {
            *last = tag;
        }
    }

    pub fn last(&self) -> Option<Substream> {
        self.0.last().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Substream] {
        &self.0
    }

    /// Returns a copy of this path with `tag` appended.
    pub fn child(&self, tag: Substream) -> Self {
        let mut out = self.clone();
        out.push(tag);
        out
    }
}

impl From<Vec<Substream>> for SubstreamPath {
    fn from(tags: Vec<Substream>) -> Self {
        Self(tags)
    }
}

impl<const N: usize> From<[Substream; N]> for SubstreamPath {
    fn from(tags: [Substream; N]) -> Self {
        Self(tags.to_vec())
    }
}

impl fmt::Display for SubstreamPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, tag) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{tag:?}")?;
        }
        Ok(())
    }
}

impl DataType {
    /// Visits the path of every leaf stream this type writes, in write order.
    ///
    /// `path` is the prefix of the enclosing column and is restored before
    /// returning.
    pub fn enumerate_streams<F>(&self, visit: &mut F, path: &mut SubstreamPath)
    where
        F: FnMut(&SubstreamPath),
    {
        match self {
            DataType::Nullable(inner) => {
                path.push(Substream::NullMap);
                visit(path);
                path.replace_last(Substream::NullableElements);
                inner.enumerate_streams(visit, path);
                path.pop();
            }
            DataType::Array(inner) => {
                path.push(Substream::ArraySizes);
                visit(path);
                path.replace_last(Substream::ArrayElements);
                inner.enumerate_streams(visit, path);
                path.pop();
            }
            _ => visit(path),
        }
    }

    /// Convenience wrapper collecting every stream path from the root.
    pub fn stream_paths(&self) -> Vec<SubstreamPath> {
        let mut out = Vec::new();
        let mut collect = |p: &SubstreamPath| out.push(p.clone());
        self.enumerate_streams(&mut collect, &mut SubstreamPath::new());
        out
    }
}

/// File-style name of the stream at `path` within column `column`.
///
/// Null maps get `.null`, array sizes `.size<level>` where level counts the
/// enclosing arrays, dictionary entries `.dict`. Every other tag leaves the
/// name unchanged.
pub fn stream_name(column: &str, path: &SubstreamPath) -> String {
    let mut name = column.to_string();
    let mut array_level = 0usize;
    for tag in path.as_slice() {
        match tag {
            Substream::NullMap => name.push_str(".null"),
            Substream::ArraySizes => {
                name.push_str(".size");
                name.push_str(&array_level.to_string());
            }
            Substream::ArrayElements => array_level += 1,
            Substream::DictionaryElements => name.push_str(".dict"),
            Substream::NullableElements | Substream::DictionaryIndexes => {}
        }
    }
    name
}

/// Resolves a substream path to a byte sink or source.
///
/// Returning `None` means the caller has no stream for that path; codecs
/// skip the corresponding part of the payload.
pub trait StreamGetter {
    type Stream;

    fn get(&mut self, path: &SubstreamPath) -> Option<&mut Self::Stream>;
}

/// In-memory [`StreamGetter`] keyed by path.
#[derive(Debug, Clone)]
pub struct StreamSet<S> {
    streams: FxHashMap<SubstreamPath, S>,
}

impl<S> Default for StreamSet<S> {
    fn default() -> Self {
        Self {
            streams: FxHashMap::default(),
        }
    }
}

impl<S> StreamSet<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// One fresh stream per path, built by `make`.
    pub fn with_paths<I, F>(paths: I, mut make: F) -> Self
    where
        I: IntoIterator<Item = SubstreamPath>,
        F: FnMut() -> S,
    {
        let streams = paths.into_iter().map(|p| (p, make())).collect();
        Self { streams }
    }

    pub fn insert(&mut self, path: SubstreamPath, stream: S) -> Option<S> {
        self.streams.insert(path, stream)
    }

    pub fn remove(&mut self, path: &SubstreamPath) -> Option<S> {
        self.streams.remove(path)
    }

    pub fn get_ref(&self, path: &SubstreamPath) -> Option<&S> {
        self.streams.get(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &SubstreamPath> {
        self.streams.keys()
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}

impl StreamSet<BytesMut> {
    /// Turns written sinks into readable sources.
    pub fn freeze(self) -> StreamSet<Bytes> {
        StreamSet {
            streams: self
                .streams
                .into_iter()
                .map(|(p, buf)| (p, buf.freeze()))
                .collect(),
        }
    }
}

impl<S> StreamGetter for StreamSet<S> {
    type Stream = S;

    fn get(&mut self, path: &SubstreamPath) -> Option<&mut S> {
        self.streams.get_mut(path)
    }
}
