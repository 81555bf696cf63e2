//! Option cache - insertion-ordered identity → option map
//!
//! Pages merged during browsing accumulate here. Keys are unique and keep the
//! position of their first insertion; merging an already known identity only
//! replaces the stored option. There is no eviction: pages are fetched on
//! demand, so the cache is bounded by what the user actually scrolled through.

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};

use crate::identity::{Accessors, Identity};

/// Insertion-ordered store of every option seen while browsing
#[derive(Clone)]
pub struct OptionCache<O, K> {
    entries: IndexMap<K, O, FxBuildHasher>,
}

impl<O, K: Identity> OptionCache<O, K> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::with_hasher(FxBuildHasher),
        }
    }

    /// Insert or overwrite options by identity
    ///
    /// Returns how many identities were new to the cache.
    pub fn merge<I>(&mut self, options: I, accessors: &Accessors<O, K>) -> usize
    where
        I: IntoIterator<Item = O>,
    {
        let before = self.entries.len();
        for option in options {
            let key = accessors.identity_of(&option);
            // IndexMap::insert keeps the original slot for existing keys
            self.entries.insert(key, option);
        }
        self.entries.len() - before
    }

    pub fn lookup(&self, key: &K) -> Option<&O> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Options in first-seen order
    pub fn values(&self) -> impl Iterator<Item = &O> {
        self.entries.values()
    }

    /// Identities in first-seen order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    /// Drop every entry whose identity is not in `keep`
    pub fn retain_keys(&mut self, keep: &FxHashSet<K>) {
        self.entries.retain(|key, _| keep.contains(key));
    }
}

impl<O, K: Identity> Default for OptionCache<O, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O, K: Identity> std::fmt::Debug for OptionCache<O, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionCache")
            .field("len", &self.entries.len())
            .finish()
    }
}
