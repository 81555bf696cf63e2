//! Chips for selected options in multi-select mode
//!
//! Only the first `limit` chips are shown; the rest collapse into a
//! "+N more" summary.
//!
//! # Example
//!
//! ```ignore
//! use paged_select_cn::prelude::*;
//!
//! let chips = cn::chips(vec![(1, "Ann".to_string()), (2, "Bob".to_string())])
//!     .limit(1)
//!     .deletable(true);
//! assert_eq!(chips.more_label().as_deref(), Some("+1 more"));
//! ```

use serde::Serialize;

/// Chip visual variants
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum ChipVariant {
    /// Filled chip
    #[default]
    Filled,
    /// Border only
    Outline,
}

/// One selected option rendered as a chip
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Chip<K> {
    pub key: K,
    pub label: String,
    /// Delete button present
    pub deletable: bool,
    pub variant: ChipVariant,
    pub class_name: Option<String>,
}

impl<K> Chip<K> {
    pub fn delete_label(&self) -> String {
        format!("Remove {}", self.label)
    }
}

/// Chip row with overflow summary
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChipList<K> {
    items: Vec<(K, String)>,
    limit: usize,
    deletable: bool,
    variant: ChipVariant,
    class_name: Option<String>,
}

impl<K: Clone> ChipList<K> {
    pub fn new(items: Vec<(K, String)>) -> Self {
        Self {
            items,
            limit: 0,
            deletable: false,
            variant: ChipVariant::default(),
            class_name: None,
        }
    }

    /// Chips shown before collapsing (0 = show all)
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn deletable(mut self, deletable: bool) -> Self {
        self.deletable = deletable;
        self
    }

    pub fn variant(mut self, variant: ChipVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    fn shown(&self) -> usize {
        if self.limit == 0 {
            self.items.len()
        } else {
            self.limit.min(self.items.len())
        }
    }

    /// Visible chips
    pub fn chips(&self) -> Vec<Chip<K>> {
        self.items[..self.shown()]
            .iter()
            .map(|(key, label)| Chip {
                key: key.clone(),
                label: label.clone(),
                deletable: self.deletable,
                variant: self.variant,
                class_name: self.class_name.clone(),
            })
            .collect()
    }

    /// Count of chips hidden behind the summary
    pub fn hidden(&self) -> usize {
        self.items.len() - self.shown()
    }

    pub fn more_label(&self) -> Option<String> {
        match self.hidden() {
            0 => None,
            n => Some(format!("+{} more", n)),
        }
    }
}

/// Create a chip list
pub fn chips<K: Clone>(items: Vec<(K, String)>) -> ChipList<K> {
    ChipList::new(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: u32) -> Vec<(u32, String)> {
        (0..n).map(|i| (i, format!("item {}", i))).collect()
    }

    #[test]
    fn test_limit_collapses_rest() {
        let list = chips(items(5)).limit(2);
        assert_eq!(list.chips().len(), 2);
        assert_eq!(list.hidden(), 3);
        assert_eq!(list.more_label().as_deref(), Some("+3 more"));
    }

    #[test]
    fn test_zero_limit_shows_all() {
        let list = chips(items(5)).limit(0);
        assert_eq!(list.chips().len(), 5);
        assert_eq!(list.more_label(), None);
    }

    #[test]
    fn test_limit_larger_than_items() {
        let list = chips(items(1)).limit(3).deletable(true);
        let shown = list.chips();
        assert_eq!(shown.len(), 1);
        assert!(shown[0].deletable);
        assert_eq!(shown[0].delete_label(), "Remove item 0");
    }
}
