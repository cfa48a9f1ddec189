use std::cell::RefCell;
use std::cmp::Ordering;
use std::hash::Hash;

use indexmap::IndexMap;

/// A deduplicating registry of `(item, priority)` pairs with a lazily sorted view.
///
/// Items are ordered by the comparator supplied at construction, then by ascending priority,
/// then by first insertion. The sorted order is computed on the first query after a mutation and
/// reused by later queries until the next [`add`](Self::add) or [`clear`](Self::clear).
///
/// The cache makes the pool `!Sync`; give each search worker its own pool.
pub struct PrioritizedCandidatePool<T> {
    entries: IndexMap<T, i32>,
    ordering: fn(&T, &T) -> Ordering,
    cache: RefCell<SortCache<T>>,
}

enum SortCache<T> {
    Dirty,
    Sorted(Vec<T>),
}

impl<T> std::fmt::Debug for PrioritizedCandidatePool<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrioritizedCandidatePool")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl<T> PrioritizedCandidatePool<T>
where
    T: Clone + Eq + Hash,
{
    pub fn new(ordering: fn(&T, &T) -> Ordering) -> Self {
        Self {
            entries: IndexMap::new(),
            ordering,
            cache: RefCell::new(SortCache::Dirty),
        }
    }

    /// Insert `item`, or update the priority of a structurally equal item already present.
    ///
    /// Re-adding keeps the item's original insertion position.
    pub fn add(&mut self, item: T, priority: i32) {
        self.entries.insert(item, priority);
        *self.cache.get_mut() = SortCache::Dirty;
    }

    /// All items satisfying `predicate`, in pool order.
    ///
    /// The pool itself is not modified; the predicate may query the pool again.
    pub fn to_sorted_list(&self, mut predicate: impl FnMut(&T) -> bool) -> Vec<T> {
        let sorted = {
            let mut cache = self.cache.borrow_mut();
            if let SortCache::Dirty = *cache {
                *cache = SortCache::Sorted(self.sort_entries());
            }
            match &*cache {
                SortCache::Sorted(sorted) => sorted.clone(),
                SortCache::Dirty => Vec::new(),
            }
        };
        sorted.into_iter().filter(|item| predicate(item)).collect()
    }

    /// Stored items in insertion order. No ordering guarantee is part of the contract.
    pub fn elements(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&T, i32)> + '_ {
        self.entries.iter().map(|(item, priority)| (item, *priority))
    }

    pub fn priority(&self, item: &T) -> Option<i32> {
        self.entries.get(item).copied()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.entries.contains_key(item)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        *self.cache.get_mut() = SortCache::Dirty;
    }

    fn sort_entries(&self) -> Vec<T> {
        let mut entries: Vec<(&T, i32)> = self.iter().collect();
        // Stable: ties keep insertion order.
        entries.sort_by(|(a, a_priority), (b, b_priority)| {
            (self.ordering)(a, b).then(a_priority.cmp(b_priority))
        });
        entries.into_iter().map(|(item, _)| item.clone()).collect()
    }

    #[cfg(test)]
    fn is_sorted_cached(&self) -> bool {
        matches!(*self.cache.borrow(), SortCache::Sorted(_))
    }
}
