//! Selection value and resolver
//!
//! The selection is owned by the embedding application. The engine reads it to
//! decide what is checked and proposes new values, but never edits the value it
//! was given: every operation here returns a fresh [`Selection`].

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::cache::OptionCache;
use crate::identity::{Accessors, Identity};

/// Externally owned selected value(s)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection<K> {
    Single(Option<K>),
    /// Ordered, unique identities
    Multiple(Vec<K>),
}

impl<K: Identity> Selection<K> {
    /// Empty selection of the requested shape
    pub fn empty(multiple: bool) -> Self {
        if multiple {
            Selection::Multiple(Vec::new())
        } else {
            Selection::Single(None)
        }
    }

    /// Multi-select value with duplicates removed, first occurrence wins
    pub fn multiple(keys: impl IntoIterator<Item = K>) -> Self {
        let mut seen = FxHashSet::default();
        Selection::Multiple(keys.into_iter().filter(|k| seen.insert(k.clone())).collect())
    }

    pub fn single(key: K) -> Self {
        Selection::Single(Some(key))
    }

    pub fn is_multiple(&self) -> bool {
        matches!(self, Selection::Multiple(_))
    }

    /// Selected identities in order
    pub fn keys(&self) -> &[K] {
        match self {
            Selection::Single(Some(key)) => std::slice::from_ref(key),
            Selection::Single(None) => &[],
            Selection::Multiple(keys) => keys,
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.keys().contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys().len()
    }

    /// Convert to the requested shape
    ///
    /// A multi value collapses to its first identity; a single value becomes a
    /// one-element list.
    pub fn coerce(self, multiple: bool) -> Self {
        match (self, multiple) {
            (Selection::Single(key), true) => Selection::Multiple(key.into_iter().collect()),
            (Selection::Multiple(keys), false) => Selection::Single(keys.into_iter().next()),
            (Selection::Multiple(keys), true) => Selection::multiple(keys),
            (single, false) => single,
        }
    }

    /// Membership toggled for one identity (multi only)
    pub fn toggled(&self, key: &K) -> Self {
        match self {
            Selection::Multiple(keys) if keys.contains(key) => {
                Selection::Multiple(keys.iter().filter(|k| *k != key).cloned().collect())
            }
            Selection::Multiple(keys) => {
                let mut next = keys.clone();
                next.push(key.clone());
                Selection::Multiple(next)
            }
            Selection::Single(_) => Selection::single(key.clone()),
        }
    }

    /// Value with one identity removed
    pub fn without(&self, key: &K) -> Self {
        match self {
            Selection::Multiple(keys) => {
                Selection::Multiple(keys.iter().filter(|k| *k != key).cloned().collect())
            }
            Selection::Single(Some(current)) if current == key => Selection::Single(None),
            single => single.clone(),
        }
    }

    /// Set union, existing order first
    pub fn union<'a>(&self, keys: impl IntoIterator<Item = &'a K>) -> Self {
        Selection::multiple(self.keys().iter().cloned().chain(keys.into_iter().cloned()))
    }

    /// Set difference
    pub fn difference(&self, remove: &FxHashSet<K>) -> Self {
        Selection::Multiple(
            self.keys()
                .iter()
                .filter(|k| !remove.contains(*k))
                .cloned()
                .collect(),
        )
    }

    pub fn key_set(&self) -> FxHashSet<K> {
        self.keys().iter().cloned().collect()
    }
}

/// Tri-state of the select-all checkbox
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectAllState {
    #[default]
    None,
    Some,
    All,
}

/// Options reported to `on_select_option`
#[derive(Clone, Debug, PartialEq)]
pub enum SelectedOptions<O> {
    One(O),
    Many(Vec<O>),
}

/// Visible options plus their identities, index-aligned
#[derive(Clone, Debug)]
pub struct VisibleOptions<O, K> {
    pub options: Vec<O>,
    pub keys: Vec<K>,
}

impl<O, K> Default for VisibleOptions<O, K> {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            keys: Vec::new(),
        }
    }
}

impl<O, K: Identity> VisibleOptions<O, K> {
    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn position(&self, key: &K) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    pub fn get(&self, key: &K) -> Option<&O> {
        self.position(key).map(|i| &self.options[i])
    }
}

/// Build the visible list
///
/// `base` is the cache (browse) or search buffer (search). Selected identities
/// missing from `base` are prepended from the cache, or failing that from
/// `pinned` (selected options only ever seen in a search result); entries with
/// a blank identity are dropped.
pub fn resolve_visible<'a, O, K, I>(
    base: I,
    cache: &OptionCache<O, K>,
    pinned: &OptionCache<O, K>,
    selection: &Selection<K>,
    accessors: &Accessors<O, K>,
) -> VisibleOptions<O, K>
where
    O: Clone + 'a,
    K: Identity,
    I: IntoIterator<Item = &'a O>,
{
    let mut base_keys = Vec::new();
    let mut base_options = Vec::new();
    for option in base {
        base_keys.push(accessors.identity_of(option));
        base_options.push(option.clone());
    }
    let present: FxHashSet<&K> = base_keys.iter().collect();

    // Each missing selected key is prepended in turn, so later keys end up first
    let mut prepended: Vec<(K, O)> = Vec::new();
    for key in selection.keys() {
        if present.contains(key) || prepended.iter().any(|(k, _)| k == key) {
            continue;
        }
        if let Some(option) = cache.lookup(key).or_else(|| pinned.lookup(key)) {
            prepended.push((key.clone(), option.clone()));
        }
    }
    let mut visible = VisibleOptions {
        options: Vec::with_capacity(prepended.len() + base_options.len()),
        keys: Vec::with_capacity(prepended.len() + base_keys.len()),
    };
    let ordered = prepended
        .into_iter()
        .rev()
        .chain(base_keys.into_iter().zip(base_options));
    for (key, option) in ordered {
        if key.is_blank() {
            continue;
        }
        visible.keys.push(key);
        visible.options.push(option);
    }
    visible
}

/// Select-all state over the visible identities
pub fn select_all_state<K: Identity>(visible: &[K], selection: &Selection<K>) -> SelectAllState {
    if !selection.is_multiple() || visible.is_empty() {
        return SelectAllState::None;
    }
    let selected = selection.key_set();
    let count = visible.iter().filter(|k| selected.contains(*k)).count();
    if count == 0 {
        SelectAllState::None
    } else if count == visible.len() {
        SelectAllState::All
    } else {
        SelectAllState::Some
    }
}

/// Selection after pressing select-all over the visible identities
pub fn toggle_select_all<K: Identity>(visible: &[K], selection: &Selection<K>) -> Selection<K> {
    match select_all_state(visible, selection) {
        SelectAllState::All => selection.difference(&visible.iter().cloned().collect()),
        _ => selection.union(visible),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Opt = (u32, &'static str);

    fn accessors() -> Accessors<Opt, u32> {
        Accessors::new(|o: &Opt| o.0, |o: &Opt| o.1.to_string())
    }

    #[test]
    fn test_multiple_dedupes() {
        let sel = Selection::multiple([3, 1, 3, 2, 1]);
        assert_eq!(sel.keys(), &[3, 1, 2]);
    }

    #[test]
    fn test_toggled_and_without_return_new_values() {
        let original = Selection::multiple([1, 2]);
        let added = original.toggled(&3);
        let removed = original.toggled(&1);

        assert_eq!(original.keys(), &[1, 2]);
        assert_eq!(added.keys(), &[1, 2, 3]);
        assert_eq!(removed.keys(), &[2]);
        assert_eq!(original.without(&2).keys(), &[1]);

        let single = Selection::single(5u32);
        assert_eq!(single.toggled(&6), Selection::single(6));
        assert_eq!(single.without(&5), Selection::Single(None));
    }

    #[test]
    fn test_coerce_shapes() {
        assert_eq!(Selection::single(1u32).coerce(true), Selection::Multiple(vec![1]));
        assert_eq!(
            Selection::Multiple(vec![4u32, 5]).coerce(false),
            Selection::single(4)
        );
        assert_eq!(Selection::<u32>::Single(None).coerce(true), Selection::Multiple(vec![]));
    }

    #[test]
    fn test_resolve_prepends_selected_from_cache() {
        let acc = accessors();
        let mut cache = OptionCache::new();
        cache.merge([(1, "a"), (2, "b"), (3, "c")], &acc);

        let buffer: Vec<Opt> = vec![(3, "c"), (9, "z")];
        let selection = Selection::multiple([1, 3, 2, 42]);

        let visible = resolve_visible(buffer.iter(), &cache, &OptionCache::new(), &selection, &acc);
        // 42 is unknown and never fabricated; 2 was prepended last so it leads
        assert_eq!(visible.keys, vec![2, 1, 3, 9]);
        assert_eq!(visible.get(&1), Some(&(1, "a")));
    }

    #[test]
    fn test_resolve_falls_back_to_pinned_options() {
        let acc = accessors();
        let mut cache = OptionCache::new();
        cache.merge([(1, "a"), (2, "b")], &acc);
        let mut pinned = OptionCache::new();
        pinned.merge([(77, "from search"), (1, "stale")], &acc);

        let selection = Selection::multiple([77, 1]);
        let visible = resolve_visible(cache.values(), &cache, &pinned, &selection, &acc);
        assert_eq!(visible.keys, vec![77, 1, 2]);
        // The cache wins over a pinned copy of the same identity
        assert_eq!(visible.get(&1), Some(&(1, "a")));
    }

    #[test]
    fn test_union_keeps_existing_order_first() {
        let sel = Selection::multiple([5u32, 1]);
        let merged = sel.union(&[1, 2, 3]);
        assert_eq!(merged.keys(), &[5, 1, 2, 3]);
    }

    #[test]
    fn test_resolve_filters_blank_identities() {
        let acc: Accessors<(String, &'static str), String> =
            Accessors::new(
                |o: &(String, &'static str)| o.0.clone(),
                |o: &(String, &'static str)| o.1.to_string(),
            );
        let cache = OptionCache::new();
        let base = vec![(String::new(), "blank"), ("k".to_string(), "kept")];

        let visible = resolve_visible(base.iter(), &cache, &cache, &Selection::empty(true), &acc);
        assert_eq!(visible.keys, vec!["k".to_string()]);
    }

    #[test]
    fn test_select_all_state() {
        let visible = [1u32, 2, 3];
        assert_eq!(select_all_state(&visible, &Selection::multiple([])), SelectAllState::None);
        assert_eq!(select_all_state(&visible, &Selection::multiple([2, 7])), SelectAllState::Some);
        assert_eq!(select_all_state(&visible, &Selection::multiple([3, 2, 1])), SelectAllState::All);
        assert_eq!(select_all_state(&[], &Selection::multiple([1])), SelectAllState::None);
        assert_eq!(select_all_state(&visible, &Selection::single(1)), SelectAllState::None);
    }

    #[test]
    fn test_toggle_select_all_twice_restores_set() {
        let visible = [1u32, 2, 3];
        // From "none" and from "all" two presses are an identity on the set
        for start in [vec![], vec![7, 9], vec![1, 2, 3], vec![3, 9, 1, 2]] {
            let original = Selection::multiple(start);
            let twice = toggle_select_all(&visible, &toggle_select_all(&visible, &original));
            assert_eq!(twice.key_set(), original.key_set());
        }
    }

    #[test]
    fn test_toggle_select_all_from_some_selects_everything() {
        let visible = [1u32, 2, 3];
        let once = toggle_select_all(&visible, &Selection::multiple([2u32]));
        assert_eq!(once.keys(), &[2, 1, 3]);
        assert_eq!(select_all_state(&visible, &once), SelectAllState::All);
    }

    #[test]
    fn test_toggle_select_all_from_none_round_trips() {
        let visible = [1u32, 2, 3];
        let original = Selection::multiple([8u32, 9]);
        let once = toggle_select_all(&visible, &original);
        assert_eq!(once.keys(), &[8, 9, 1, 2, 3]);
        let twice = toggle_select_all(&visible, &once);
        assert_eq!(twice.key_set(), original.key_set());
    }
}
