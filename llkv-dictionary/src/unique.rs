//! Deduplicating dictionary container.
//!
//! Values live in a plain [`ColumnStorage`]; a hash map from each value's
//! key to its id provides the dedup lookup. Ids are storage positions: they
//! start at zero, grow by one per admitted value and are never reused.

use llkv_data_types::{ColumnStorage, DecodedValue};
use llkv_result::{Error, Result};
use rustc_hash::FxHashMap;

/// Outcome of inserting one row through the dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowInsertion {
    /// Dictionary id appended to the index array.
    pub id: u64,
    /// `true` if the value was new and its entry was kept.
    pub novel: bool,
}

#[derive(Debug, Clone)]
pub struct UniqueDictionary<S: ColumnStorage> {
    storage: S,
    ids: FxHashMap<S::Key, u64>,
}

/// Dictionaries compare by their entries in id order.
impl<S: ColumnStorage + PartialEq> PartialEq for UniqueDictionary<S> {
    fn eq(&self, other: &Self) -> bool {
        self.storage == other.storage
    }
}

/// Result of planning a merge of foreign entries, see
/// [`UniqueDictionary::plan_merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    /// Local id for every incoming entry, by incoming position.
    pub remap: Vec<u64>,
    /// Incoming positions that become new local entries, in order.
    pub novel: Vec<usize>,
}

impl MergePlan {
    /// Largest local id referenced by the plan.
    pub fn max_id(&self) -> Option<u64> {
        self.remap.iter().copied().max()
    }
}

impl<S: ColumnStorage> UniqueDictionary<S> {
    /// Wraps `storage`. Values already stored keep their positions as ids;
    /// a repeated value resolves to its first position.
    pub fn new(storage: S) -> Self {
        let mut ids = FxHashMap::default();
        for position in 0..storage.len() {
            ids.entry(storage.key_at(position))
                .or_insert(position as u64);
        }
        Self { storage, ids }
    }

    pub fn with_capacity(storage: S, capacity: usize) -> Self {
        let mut dict = Self::new(storage);
        dict.storage.reserve(capacity);
        let _ = dict.ids.try_reserve(capacity);
        dict
    }

    /// Number of distinct entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Read-only view of the backing storage, ids are positions.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Panics if `id` is not a valid entry.
    pub fn value(&self, id: u64) -> DecodedValue<'_> {
        self.storage.value_at(id as usize)
    }

    /// An empty dictionary over the same storage kind.
    pub fn clone_empty(&self) -> Self {
        Self::new(self.storage.clone_empty())
    }

    /// Id of the committed entry equal to the value stored at `position`.
    pub fn find_at(&self, position: usize) -> Option<u64> {
        self.ids.get(&self.storage.key_at(position)).copied()
    }

    /// Looks up `key` among committed entries.
    pub fn find_key(&self, key: &S::Key) -> Option<u64> {
        self.ids.get(key).copied()
    }

    /// Inserts `value` with deduplication and returns its id.
    pub fn insert(&mut self, value: DecodedValue<'_>) -> Result<RowInsertion> {
        self.stage_with(|s| s.push_value(value).map_err(Error::from))?
            .commit(|_| Ok(()))
    }

    /// Raw-appends one candidate value through `append` and returns it as a
    /// staged entry.
    ///
    /// The mutable borrow of the storage ends when `append` returns, so the
    /// append (and any reallocation) is complete before the staged entry can
    /// read the storage for the dedup lookup.
    pub fn stage_with<F>(&mut self, append: F) -> Result<StagedEntry<'_, S>>
    where
        F: FnOnce(&mut S) -> Result<()>,
    {
        let before = self.storage.len();
        if let Err(err) = append(&mut self.storage) {
            let grown = self.storage.len().saturating_sub(before);
            self.storage.pop_back(grown);
            return Err(err);
        }
        let after = self.storage.len();
        if after != before + 1 {
            self.storage.pop_back(after.saturating_sub(before));
            return Err(Error::LogicalError(format!(
                "staging must append exactly one value, storage went from {before} to {after}"
            )));
        }
        Ok(StagedEntry {
            dict: self,
            position: before,
            settled: false,
        })
    }

    /// Appends every entry of `incoming` with ids `len()..len() + n`, in
    /// order and without deduplication.
    ///
    /// The caller guarantees `incoming` holds no duplicates of each other or
    /// of existing entries. If it does, lookups resolve to the first copy.
    pub fn insert_assuming_incremental_ids(&mut self, incoming: &S) {
        let base = self.storage.len();
        self.storage.extend_from(incoming, 0, incoming.len());
        self.ids.reserve(incoming.len());
        for position in base..self.storage.len() {
            self.ids
                .entry(self.storage.key_at(position))
                .or_insert(position as u64);
        }
    }

    /// Computes local ids for `incoming` without touching `self`.
    ///
    /// Entries already present map to their existing id. New entries are
    /// numbered after the current end in first-seen order; duplicates inside
    /// `incoming` share one new id.
    pub fn plan_merge(&self, incoming: &S) -> MergePlan {
        let mut fresh: FxHashMap<S::Key, u64> = FxHashMap::default();
        let mut plan = MergePlan {
            remap: Vec::with_capacity(incoming.len()),
            novel: Vec::new(),
        };
        let mut next = self.storage.len() as u64;
        for position in 0..incoming.len() {
            let key = incoming.key_at(position);
            let id = match self.ids.get(&key).or_else(|| fresh.get(&key)) {
                Some(&id) => id,
                None => {
                    fresh.insert(key, next);
                    plan.novel.push(position);
                    next += 1;
                    next - 1
                }
            };
            plan.remap.push(id);
        }
        plan
    }

    /// Applies a plan produced by [`Self::plan_merge`] for the same
    /// `incoming` storage.
    pub fn apply_merge(&mut self, incoming: &S, plan: &MergePlan) {
        for &position in &plan.novel {
            let id = self.storage.len() as u64;
            self.storage.push_from(incoming, position);
            self.ids.insert(incoming.key_at(position), id);
        }
    }
}

/// A candidate value raw-appended at the end of a dictionary, not yet
/// deduplicated.
///
/// Dropping a staged entry without calling [`StagedEntry::commit`] retracts
/// the candidate.
#[derive(Debug)]
pub struct StagedEntry<'a, S: ColumnStorage> {
    dict: &'a mut UniqueDictionary<S>,
    position: usize,
    settled: bool,
}

impl<S: ColumnStorage> StagedEntry<'_, S> {
    /// Storage position of the candidate, equal to the dictionary size
    /// before staging.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn value(&self) -> DecodedValue<'_> {
        self.dict.storage.value_at(self.position)
    }

    pub fn storage(&self) -> &S {
        &self.dict.storage
    }

    /// Resolves the candidate's id and hands it to `accept` (typically an
    /// index-array append).
    ///
    /// A candidate equal to an existing entry resolves to that entry and is
    /// retracted. A novel candidate keeps its slot and id `position`. If
    /// `accept` fails, the candidate is retracted either way and the
    /// dictionary is left as it was before staging.
    pub fn commit<F>(mut self, accept: F) -> Result<RowInsertion>
    where
        F: FnOnce(u64) -> Result<()>,
    {
        let key = self.dict.storage.key_at(self.position);
        let existing = self.dict.ids.get(&key).copied();
        let id = existing.unwrap_or(self.position as u64);

        accept(id)?;

        self.settled = true;
        match existing {
            Some(_) => {
                self.dict.storage.pop_back(1);
                tracing::trace!(
                    id,
                    position = self.position,
                    "dictionary: duplicate candidate retracted"
                );
                Ok(RowInsertion { id, novel: false })
            }
            None => {
                self.dict.ids.insert(key, id);
                Ok(RowInsertion { id, novel: true })
            }
        }
    }
}

impl<S: ColumnStorage> Drop for StagedEntry<'_, S> {
    fn drop(&mut self) {
        if !self.settled {
            self.dict.storage.pop_back(1);
        }
    }
}
