//! Virtualized list window
//!
//! The dropdown only materializes the rows inside the viewport (plus an
//! overscan margin). [`VirtualWindow`] is the capability the combobox needs
//! from a virtual list: row geometry in, visible range and [`ScrollEvent`]s
//! out. [`ListWindow`] is the default implementation, supporting a fixed row
//! height or per-row heights.

use std::ops::Range;

use paged_select_core::{Listbox, ScrollDirection, ScrollEvent};

/// Rows rendered above and below the viewport
pub const DEFAULT_OVERSCAN: usize = 5;

/// Virtual list capability
pub trait VirtualWindow {
    /// Replace the row geometry; the scroll offset is clamped to the new content
    fn set_row_heights(&mut self, heights: Vec<f32>);

    fn set_viewport_height(&mut self, height: f32);

    fn viewport_height(&self) -> f32;

    fn scroll_offset(&self) -> f32;

    fn total_height(&self) -> f32;

    /// Top edge of row `index`
    fn row_top(&self, index: usize) -> f32;

    /// Rows to render, including overscan
    fn visible_range(&self) -> Range<usize>;

    /// User scroll to `offset`
    fn scroll_to(&mut self, offset: f32) -> ScrollEvent;

    /// Programmatic scroll bringing row `index` to the top
    fn scroll_to_row(&mut self, index: usize) -> ScrollEvent;
}

/// Default [`VirtualWindow`] over cumulative row heights
#[derive(Clone, Debug, PartialEq)]
pub struct ListWindow {
    /// `tops[i]` is the top of row `i`; the last entry is the total height
    tops: Vec<f32>,
    viewport_height: f32,
    scroll_offset: f32,
    overscan: usize,
}

impl ListWindow {
    /// `count` rows of `row_height` each
    pub fn fixed(count: usize, row_height: f32, viewport_height: f32) -> Self {
        Self::variable(vec![row_height; count], viewport_height)
    }

    pub fn variable(heights: Vec<f32>, viewport_height: f32) -> Self {
        let mut window = Self {
            tops: vec![0.0],
            viewport_height,
            scroll_offset: 0.0,
            overscan: DEFAULT_OVERSCAN,
        };
        window.set_row_heights(heights);
        window
    }

    /// Window sized for a listbox
    pub fn for_listbox(listbox: &Listbox) -> Self {
        Self::variable(listbox.row_heights(), listbox.rendered_height())
    }

    pub fn overscan(mut self, rows: usize) -> Self {
        self.overscan = rows;
        self
    }

    pub fn row_count(&self) -> usize {
        self.tops.len() - 1
    }

    fn max_offset(&self) -> f32 {
        (self.total_height() - self.viewport_height).max(0.0)
    }

    fn move_to(&mut self, offset: f32, requested: bool) -> ScrollEvent {
        let offset = offset.clamp(0.0, self.max_offset());
        let direction = if offset < self.scroll_offset {
            ScrollDirection::Backward
        } else {
            ScrollDirection::Forward
        };
        self.scroll_offset = offset;
        ScrollEvent {
            offset,
            direction,
            update_was_requested: requested,
        }
    }

    /// Index of the row containing `y`
    fn row_at(&self, y: f32) -> usize {
        // First top strictly greater than y, minus one
        self.tops
            .partition_point(|top| *top <= y)
            .saturating_sub(1)
            .min(self.row_count().saturating_sub(1))
    }
}

impl VirtualWindow for ListWindow {
    fn set_row_heights(&mut self, heights: Vec<f32>) {
        self.tops.clear();
        self.tops.reserve(heights.len() + 1);
        let mut y = 0.0;
        self.tops.push(y);
        for h in heights {
            y += h.max(0.0);
            self.tops.push(y);
        }
        self.scroll_offset = self.scroll_offset.min(self.max_offset());
    }

    fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height.max(0.0);
        self.scroll_offset = self.scroll_offset.min(self.max_offset());
    }

    fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    fn total_height(&self) -> f32 {
        self.tops.last().copied().unwrap_or(0.0)
    }

    fn row_top(&self, index: usize) -> f32 {
        self.tops[index.min(self.row_count())]
    }

    fn visible_range(&self) -> Range<usize> {
        let count = self.row_count();
        if count == 0 {
            return 0..0;
        }
        let first = self.row_at(self.scroll_offset);
        let bottom = self.scroll_offset + self.viewport_height;
        // Rows whose top is above the bottom edge are at least partly visible
        let last = self.tops[..count].partition_point(|top| *top < bottom);
        first.saturating_sub(self.overscan)..(last + self.overscan).min(count)
    }

    fn scroll_to(&mut self, offset: f32) -> ScrollEvent {
        self.move_to(offset, false)
    }

    fn scroll_to_row(&mut self, index: usize) -> ScrollEvent {
        let top = self.row_top(index);
        self.move_to(top, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_geometry() {
        let w = ListWindow::fixed(100, 36.0, 288.0).overscan(0);
        assert_eq!(w.total_height(), 3600.0);
        assert_eq!(w.row_top(3), 108.0);
        assert_eq!(w.visible_range(), 0..8);
    }

    #[test]
    fn test_visible_range_with_overscan() {
        let mut w = ListWindow::fixed(100, 36.0, 288.0).overscan(2);
        w.scroll_to(360.0);
        // Rows 10..18 in view, two extra each side
        assert_eq!(w.visible_range(), 8..20);
    }

    #[test]
    fn test_scroll_direction_and_clamp() {
        let mut w = ListWindow::fixed(20, 36.0, 288.0);
        let down = w.scroll_to(100.0);
        assert_eq!(down.direction, ScrollDirection::Forward);
        assert!(!down.update_was_requested);

        let up = w.scroll_to(50.0);
        assert_eq!(up.direction, ScrollDirection::Backward);

        let past_end = w.scroll_to(10_000.0);
        assert_eq!(past_end.offset, 20.0 * 36.0 - 288.0);
    }

    #[test]
    fn test_programmatic_scroll_is_flagged() {
        let mut w = ListWindow::fixed(50, 36.0, 288.0);
        let event = w.scroll_to_row(10);
        assert!(event.update_was_requested);
        assert_eq!(event.offset, 360.0);
    }

    #[test]
    fn test_variable_heights_with_divider() {
        let w = ListWindow::variable(vec![36.0, 1.0, 36.0, 36.0], 100.0).overscan(0);
        assert_eq!(w.total_height(), 109.0);
        assert_eq!(w.row_top(2), 37.0);
        assert_eq!(w.visible_range(), 0..4);
    }

    #[test]
    fn test_shrinking_content_clamps_offset() {
        let mut w = ListWindow::fixed(100, 36.0, 288.0);
        w.scroll_to(2000.0);
        w.set_row_heights(vec![36.0; 10]);
        assert_eq!(w.scroll_offset(), 360.0 - 288.0);
    }

    #[test]
    fn test_empty_window() {
        let w = ListWindow::fixed(0, 36.0, 288.0);
        assert_eq!(w.visible_range(), 0..0);
        assert_eq!(w.total_height(), 0.0);
    }
}
