//! Listbox row model
//!
//! The dropdown hands the virtual list a flat sequence of rows: an optional
//! select-all row followed by a hairline divider, an optional status row, and
//! one row per visible option. Rows have a fixed height except the divider.

use crate::selection::SelectAllState;

/// Height of the divider under the select-all row
pub const DIVIDER_HEIGHT: f32 = 1.0;

/// Informational row shown above the options
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListStatus {
    /// A page request is in flight
    LoadingMore {
        next_page: u32,
        total_pages: Option<u32>,
    },
    /// The latest search came back empty
    NoResults { query: String },
    /// Progress through a dataset of known size
    ItemsLoaded { loaded: usize, total: u64 },
}

impl ListStatus {
    pub fn message(&self) -> String {
        match self {
            ListStatus::LoadingMore {
                next_page,
                total_pages: Some(total),
            } if *total > 0 => format!("Loading more options... ({}/{})", next_page, total),
            ListStatus::LoadingMore { .. } => "Loading more options...".to_string(),
            ListStatus::NoResults { query } => format!("No results found for \"{}\"", query),
            ListStatus::ItemsLoaded { loaded, total } => {
                format!("{} of {} items loaded", loaded, total)
            }
        }
    }
}

/// What the dropdown shows when there are no options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmptyState {
    Searching,
    NoOptions,
}

impl EmptyState {
    pub fn message(&self) -> &'static str {
        match self {
            EmptyState::Searching => "Searching...",
            EmptyState::NoOptions => "No options available",
        }
    }
}

/// One row of the listbox
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListRow {
    SelectAll(SelectAllState),
    Divider,
    Status(ListStatus),
    /// Index into the visible option list
    Option(usize),
}

/// Rows plus the geometry the virtual list needs
#[derive(Clone, Debug, PartialEq)]
pub struct Listbox {
    pub rows: Vec<ListRow>,
    pub row_height: f32,
    pub max_visible_items: usize,
}

impl Listbox {
    pub fn build(
        select_all: Option<SelectAllState>,
        status: Option<ListStatus>,
        option_count: usize,
        row_height: f32,
        max_visible_items: usize,
    ) -> Self {
        let mut rows = Vec::with_capacity(option_count + 3);
        if let Some(state) = select_all {
            rows.push(ListRow::SelectAll(state));
            rows.push(ListRow::Divider);
        }
        if let Some(status) = status {
            rows.push(ListRow::Status(status));
        }
        rows.extend((0..option_count).map(ListRow::Option));
        Self {
            rows,
            row_height,
            max_visible_items,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_height_at(&self, index: usize) -> f32 {
        match self.rows.get(index) {
            Some(ListRow::Divider) => DIVIDER_HEIGHT,
            _ => self.row_height,
        }
    }

    /// Heights of every row, in order
    pub fn row_heights(&self) -> Vec<f32> {
        (0..self.rows.len()).map(|i| self.row_height_at(i)).collect()
    }

    /// Height of the viewport: `min(max_visible_items, rows) × row_height`
    pub fn rendered_height(&self) -> f32 {
        self.max_visible_items.min(self.rows.len()) as f32 * self.row_height
    }

    /// Height of all rows laid out
    pub fn content_height(&self) -> f32 {
        (0..self.rows.len()).map(|i| self.row_height_at(i)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_with_select_all_and_status() {
        let listbox = Listbox::build(
            Some(SelectAllState::Some),
            Some(ListStatus::ItemsLoaded {
                loaded: 50,
                total: 1000,
            }),
            3,
            36.0,
            8,
        );
        assert_eq!(
            listbox.rows,
            vec![
                ListRow::SelectAll(SelectAllState::Some),
                ListRow::Divider,
                ListRow::Status(ListStatus::ItemsLoaded {
                    loaded: 50,
                    total: 1000
                }),
                ListRow::Option(0),
                ListRow::Option(1),
                ListRow::Option(2),
            ]
        );
        assert_eq!(listbox.row_height_at(1), DIVIDER_HEIGHT);
        assert_eq!(listbox.content_height(), 5.0 * 36.0 + 1.0);
        assert_eq!(listbox.rendered_height(), 6.0 * 36.0);
    }

    #[test]
    fn test_rendered_height_caps_at_max_visible() {
        let listbox = Listbox::build(None, None, 100, 36.0, 8);
        assert_eq!(listbox.rendered_height(), 288.0);
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(
            ListStatus::LoadingMore {
                next_page: 3,
                total_pages: Some(20)
            }
            .message(),
            "Loading more options... (3/20)"
        );
        assert_eq!(
            ListStatus::LoadingMore {
                next_page: 3,
                total_pages: None
            }
            .message(),
            "Loading more options..."
        );
        assert_eq!(
            ListStatus::NoResults {
                query: "zzz".into()
            }
            .message(),
            "No results found for \"zzz\""
        );
        assert_eq!(
            ListStatus::ItemsLoaded {
                loaded: 100,
                total: 1000
            }
            .message(),
            "100 of 1000 items loaded"
        );
        assert_eq!(EmptyState::Searching.message(), "Searching...");
    }
}
