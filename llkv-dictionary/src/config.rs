//! Tunables for column creation and bulk reads.

/// Run-time configuration for dictionary columns and their codecs (no hidden
/// constants).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryCodecConfig {
    /// Largest entry count accepted from a `DictionaryElements` header.
    /// Anything above is reported as corruption instead of being allocated.
    pub max_dictionary_entries: u64,
    /// Values to pre-reserve in a new column's dictionary storage.
    pub dictionary_capacity_hint: usize,
    /// Rows to pre-reserve in a new column's index array.
    pub index_capacity_hint: usize,
}

impl Default for DictionaryCodecConfig {
    fn default() -> Self {
        Self {
            max_dictionary_entries: 1 << 32,
            dictionary_capacity_hint: 0,
            index_capacity_hint: 0,
        }
    }
}
