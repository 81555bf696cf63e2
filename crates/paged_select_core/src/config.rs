//! Widget configuration
//!
//! Every field has a default, so a configuration file only needs the keys it
//! changes:
//!
//! ```toml
//! multiple = true
//! default_page_size = 25
//! search_debounce_ms = 250
//! limit_tags = 3
//! placeholder = "Search users..."
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Height of a single list row in pixels
pub const ROW_HEIGHT: f32 = 36.0;
/// Rows visible in the dropdown before it scrolls
pub const MAX_VISIBLE_ITEMS: usize = 8;
/// Delay between the last keystroke and the search request
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;
/// Page size requested when a response does not say otherwise
pub const DEFAULT_PAGE_SIZE: u32 = 50;
/// Delay before focus is handed back to the input after seed data arrives
pub const FOCUS_DELAY_MS: u64 = 10;
/// Delay before the direct scroll listener is attached after opening
pub const SCROLL_SETUP_DELAY_MS: u64 = 100;

/// Configuration for a paged select
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectConfig {
    /// Multi-select (list of identities) instead of single-select
    pub multiple: bool,
    pub default_page_size: u32,
    pub search_debounce_ms: u64,
    /// Viewport height in rows
    pub max_visible_items: usize,
    pub row_height: f32,
    /// Chips shown before collapsing into "+N more" (0 = show all)
    pub limit_tags: usize,
    pub show_select_all: bool,
    pub select_all_label: String,
    pub clearable: bool,
    pub disabled: bool,
    /// Externally driven loading indicator
    pub loading: bool,
    pub placeholder: String,
    pub label: Option<String>,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            multiple: false,
            default_page_size: DEFAULT_PAGE_SIZE,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            max_visible_items: MAX_VISIBLE_ITEMS,
            row_height: ROW_HEIGHT,
            limit_tags: 2,
            show_select_all: true,
            select_all_label: "Select All".to_string(),
            clearable: true,
            disabled: false,
            loading: false,
            placeholder: "Type to search...".to_string(),
            label: None,
        }
    }
}

impl SelectConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document and validate it
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: SelectConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.default_page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if self.max_visible_items == 0 {
            return Err(ConfigError::ZeroVisibleItems);
        }
        if !self.row_height.is_finite() || self.row_height <= 0.0 {
            return Err(ConfigError::InvalidRowHeight(self.row_height));
        }
        Ok(())
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    pub fn default_page_size(mut self, size: u32) -> Self {
        self.default_page_size = size;
        self
    }

    pub fn search_debounce_ms(mut self, ms: u64) -> Self {
        self.search_debounce_ms = ms;
        self
    }

    pub fn max_visible_items(mut self, rows: usize) -> Self {
        self.max_visible_items = rows;
        self
    }

    pub fn row_height(mut self, px: f32) -> Self {
        self.row_height = px;
        self
    }

    pub fn limit_tags(mut self, limit: usize) -> Self {
        self.limit_tags = limit;
        self
    }

    pub fn show_select_all(mut self, show: bool) -> Self {
        self.show_select_all = show;
        self
    }

    pub fn select_all_label(mut self, label: impl Into<String>) -> Self {
        self.select_all_label = label.into();
        self
    }

    pub fn clearable(mut self, clearable: bool) -> Self {
        self.clearable = clearable;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}
