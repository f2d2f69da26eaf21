//! Per-array identity, versioning and memoized derived state.

use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::sync::OnceCell;
use parking_lot::Mutex;

/// Process-unique identity of one span array instance.
///
/// Copies receive a fresh identity, so a cached "equal to array X" result
/// never leaks onto a different array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArrayId(u64);

impl ArrayId {
    pub(crate) fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        ArrayId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// "Known equal to array `id` at version `version`" results.
#[derive(Debug, Default)]
pub(crate) struct EquivalenceCache {
    entries: Mutex<Vec<(ArrayId, u64)>>,
}

impl EquivalenceCache {
    /// Decide equality with `other`, consulting and maintaining the cache.
    ///
    /// A cached entry only answers for the exact version it was recorded at;
    /// a stale entry falls through to `slow_path` and is refreshed or dropped.
    pub(crate) fn equals_with(
        &self,
        other_id: ArrayId,
        other_version: u64,
        slow_path: impl FnOnce() -> bool,
    ) -> bool {
        let cached_version = self
            .entries
            .lock()
            .iter()
            .find(|(id, _)| *id == other_id)
            .map(|(_, version)| *version);

        if cached_version == Some(other_version) {
            tracing::trace!(?other_id, other_version, "equivalence cache hit");
            return true;
        }

        let equal = slow_path();
        let mut entries = self.entries.lock();
        let position = entries.iter().position(|(id, _)| *id == other_id);
        match (equal, position) {
            (true, Some(ix)) => entries[ix].1 = other_version,
            (true, None) => entries.push((other_id, other_version)),
            (false, Some(ix)) => {
                tracing::trace!(?other_id, "dropping stale equivalence cache entry");
                entries.remove(ix);
            }
            (false, None) => {}
        }
        equal
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.lock().len()
    }

    fn clear(&mut self) {
        self.entries.get_mut().clear();
    }
}

/// Identity, version counter and every cache derived from an array's contents.
#[derive(Debug)]
pub(crate) struct ArrayState {
    pub(crate) id: ArrayId,
    pub(crate) version: u64,
    pub(crate) equivalent: EquivalenceCache,
    pub(crate) hash: OnceCell<u64>,
    pub(crate) normalized: OnceCell<Vec<Option<String>>>,
    pub(crate) first_null: OnceCell<Option<usize>>,
}

impl ArrayState {
    pub(crate) fn new() -> Self {
        Self {
            id: ArrayId::next(),
            version: 0,
            equivalent: EquivalenceCache::default(),
            hash: OnceCell::new(),
            normalized: OnceCell::new(),
            first_null: OnceCell::new(),
        }
    }

    /// Record a mutation: bump the version and drop everything derived from
    /// the old contents.
    pub(crate) fn increment_version(&mut self) {
        self.equivalent.clear();
        self.hash = OnceCell::new();
        self.normalized = OnceCell::new();
        self.first_null = OnceCell::new();
        self.version += 1;
        tracing::trace!(id = ?self.id, version = self.version, "span array mutated");
    }
}
