//! Pagination driver
//!
//! Tracks which page has been loaded, whether more pages exist, and decides
//! from scroll geometry when the next page should be requested.
//!
//! Two scroll paths feed the driver:
//!
//! - the virtual list reports its scroll offset; the list height is derived from
//!   the row count, and the trigger threshold is two rows
//! - the direct scroll fallback reports raw container metrics and uses a fixed
//!   pixel threshold
//!
//! Both paths refuse to trigger until the user has scrolled past one row, so
//! the initial layout never fires a request by itself.

use serde::{Deserialize, Serialize};

use crate::response::NormalizedResponse;

/// Pixel distance from the bottom that triggers loading on the direct scroll path
pub const DIRECT_SCROLL_THRESHOLD: f32 = 50.0;

/// Current pagination position and known totals
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    /// Last successfully loaded page (0 = nothing loaded yet)
    pub current_page: u32,
    pub page_size: u32,
    /// `None` for sources of unknown length
    pub total_pages: Option<u32>,
    pub total_records: Option<u64>,
}

impl PaginationState {
    pub fn new(page_size: u32) -> Self {
        Self {
            current_page: 0,
            page_size,
            total_pages: None,
            total_records: None,
        }
    }

    /// Page that the next request should ask for
    pub fn next_page(&self) -> u32 {
        self.current_page + 1
    }

    /// Whether another page exists after a page of `last_len` items
    pub fn more_after(&self, last_len: usize) -> bool {
        if last_len == 0 {
            return false;
        }
        match self.total_pages {
            Some(total) => self.current_page < total,
            None => last_len == self.page_size as usize,
        }
    }
}

/// Parameters handed to the page loader
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadPageParams {
    /// Always empty for browse loads
    pub search_terms: Vec<String>,
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
}

/// Direction reported by the virtual list for a scroll event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollDirection {
    #[default]
    Forward,
    Backward,
}

/// Scroll event reported by the virtual list capability
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollEvent {
    pub offset: f32,
    pub direction: ScrollDirection,
    /// True when the scroll was caused by a programmatic scroll-to
    pub update_was_requested: bool,
}

impl ScrollEvent {
    /// A user-initiated forward scroll to `offset`
    pub fn forward(offset: f32) -> Self {
        Self {
            offset,
            direction: ScrollDirection::Forward,
            update_was_requested: false,
        }
    }
}

/// Raw metrics from the scroll container (direct scroll path)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f32,
    pub scroll_height: f32,
    pub client_height: f32,
}

/// Pagination state plus the in-flight and exhaustion flags
#[derive(Clone, Debug)]
pub struct PaginationDriver {
    state: PaginationState,
    has_next: bool,
    loading: bool,
    row_height: f32,
    max_visible_items: usize,
}

impl PaginationDriver {
    pub fn new(page_size: u32, row_height: f32, max_visible_items: usize) -> Self {
        Self {
            state: PaginationState::new(page_size),
            has_next: true,
            loading: false,
            row_height,
            max_visible_items,
        }
    }

    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether nothing has been loaded yet
    pub fn is_pristine(&self) -> bool {
        self.state.current_page == 0
    }

    /// Core proximity rule shared by both scroll paths
    pub fn should_load_next(
        &self,
        scroll_position: f32,
        total_height: f32,
        viewport_height: f32,
    ) -> bool {
        self.within(scroll_position, total_height, viewport_height, self.row_height * 2.0)
    }

    fn within(&self, scroll_position: f32, total_height: f32, viewport_height: f32, threshold: f32) -> bool {
        let scrolled_significantly = scroll_position > self.row_height;
        let distance_from_bottom = total_height - scroll_position - viewport_height;
        scrolled_significantly && distance_from_bottom <= threshold
    }

    /// Evaluate a virtual list scroll event for `item_count` option rows
    pub fn should_load_for_scroll(&self, event: &ScrollEvent, item_count: usize) -> bool {
        if event.update_was_requested || event.direction != ScrollDirection::Forward {
            return false;
        }
        let visible = self.max_visible_items.min(item_count);
        let total_height = item_count as f32 * self.row_height;
        let viewport_height = visible as f32 * self.row_height;
        self.should_load_next(event.offset, total_height, viewport_height)
    }

    /// Evaluate raw container metrics from the direct scroll path
    pub fn should_load_for_metrics(&self, metrics: &ScrollMetrics) -> bool {
        self.within(
            metrics.scroll_top,
            metrics.scroll_height,
            metrics.client_height,
            DIRECT_SCROLL_THRESHOLD,
        )
    }

    /// Claim the in-flight slot and produce the request for the next page
    ///
    /// Returns `None` when no more pages are known or a load is in flight.
    pub fn begin(&mut self) -> Option<LoadPageParams> {
        if !self.has_next || self.loading {
            return None;
        }
        self.loading = true;
        Some(LoadPageParams {
            search_terms: Vec::new(),
            page: self.state.next_page(),
            page_size: self.state.page_size,
        })
    }

    /// Record a successful page
    pub fn complete<O>(&mut self, requested_page: u32, response: &NormalizedResponse<O>) {
        self.loading = false;
        self.state.current_page = response.current_page.unwrap_or(requested_page);
        if let Some(size) = response.page_size {
            self.state.page_size = size;
        }
        if response.total_pages.is_some() {
            self.state.total_pages = response.total_pages;
        }
        if response.total_records.is_some() {
            self.state.total_records = response.total_records;
        }
        self.has_next = self.state.more_after(response.data.len());
    }

    /// Release the in-flight slot without touching the page position
    pub fn abandon(&mut self) {
        self.loading = false;
    }

    /// A failed load stops automatic loading until reset
    pub fn fail(&mut self) {
        self.loading = false;
        self.has_next = false;
    }

    /// Adopt pagination carried by seed data
    pub fn seed<O>(&mut self, response: &NormalizedResponse<O>, default_page_size: u32) {
        self.state = PaginationState {
            current_page: response.current_page.unwrap_or(1),
            page_size: response.page_size.unwrap_or(default_page_size),
            total_pages: response.total_pages,
            total_records: if response.structured {
                response.total_records
            } else {
                Some(response.data.len() as u64)
            },
        };
        self.has_next = self.state.more_after(response.data.len());
    }

    /// Forget all progress; the in-flight flag is left to the pending request
    pub fn reset(&mut self, page_size: u32) {
        self.state = PaginationState::new(page_size);
        self.has_next = true;
    }
}
