// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The windowing core: which rows to realize for a scroll position.

use core::ops::Range;

use crate::{RowSizeTable, Scalar};

/// Result of a visibility query over the rows of a grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleRows<S: Scalar> {
    /// First realized row (inclusive), overscan included.
    pub start: usize,
    /// One past the last realized row (exclusive), overscan included.
    pub end: usize,
    /// Offset of `start` from the start of the grid.
    ///
    /// Hosts translate the realized block by this amount and stack the rows
    /// beneath each other in flow order.
    pub offset: S,
    /// Total extent of all rows.
    pub total: S,
}

impl<S: Scalar> VisibleRows<S> {
    /// An empty window with nothing to realize.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            start: 0,
            end: 0,
            offset: S::zero(),
            total: S::zero(),
        }
    }

    /// Returns `true` if there are no rows to realize.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Number of realized rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// The realized rows as a range.
    #[must_use]
    pub const fn rows(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns `true` if `row` is realized.
    #[must_use]
    pub const fn contains(&self, row: usize) -> bool {
        row >= self.start && row < self.end
    }

    /// The last realized row, if any.
    #[must_use]
    pub const fn last(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.end - 1)
        }
    }
}

/// Compute the rows to realize for a scroll position.
///
/// - `scroll_offset`: top of the viewport in grid coordinates (`>= 0`).
/// - `viewport_extent`: height of the viewport (`>= 0`).
/// - `overscan`: number of extra rows realized beyond each edge.
///
/// The first visible row is the first whose end lies past `scroll_offset`; the
/// last is the last whose start lies before `scroll_offset + viewport_extent`.
/// Both are then widened by `overscan` rows and clamped to `0..row_count`, so
/// overscan never extends past either end of the list.
///
/// Lookups binary-search the prefix-sum cache, so cost is logarithmic in the
/// row count plus whatever tail of the cache a measurement dirtied.
pub fn compute_visible_rows<S: Scalar>(
    sizes: &mut RowSizeTable<S>,
    scroll_offset: S,
    viewport_extent: S,
    overscan: usize,
) -> VisibleRows<S> {
    let len = sizes.len();
    if len == 0 {
        return VisibleRows::empty();
    }

    let scroll_offset = scroll_offset.max(S::zero());
    let viewport_extent = viewport_extent.max(S::zero());
    let total = sizes.total();

    // The last row starting at or before the offset is the first one ending
    // past it; zero-sized rows share a start and resolve to the later row.
    let first = sizes
        .rows_starting_at_or_before(scroll_offset)
        .saturating_sub(1);

    let last = sizes
        .rows_starting_before(scroll_offset + viewport_extent)
        .saturating_sub(1)
        .max(first);

    let start = first.saturating_sub(overscan);
    let end = last.saturating_add(overscan).saturating_add(1).min(len);

    VisibleRows {
        start,
        end,
        offset: sizes.offset_of(start),
        total,
    }
}

/// Alignment mode when scrolling a specific row into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAlign {
    /// Align the top of the row with the top of the viewport.
    Start,
    /// Center the row within the viewport.
    Center,
    /// Align the bottom of the row with the bottom of the viewport.
    End,
    /// Move just enough to make the row fully visible.
    Nearest,
}

/// Windowing state for one grid: row sizes, scroll position, and overscan.
///
/// This type:
/// - owns the [`RowSizeTable`] for the grid's rows,
/// - stores scroll offset, viewport extent, and overscan (in rows),
/// - caches the last computed [`VisibleRows`] until an input changes.
///
/// Recomputing with unchanged inputs returns the cached window, so repeated
/// render passes cannot drift.
#[derive(Debug, Clone)]
pub struct ScrollWindow<S: Scalar> {
    sizes: RowSizeTable<S>,
    scroll_offset: S,
    viewport_extent: S,
    overscan: usize,

    dirty: bool,
    last: VisibleRows<S>,
}

impl<S: Scalar> ScrollWindow<S> {
    /// Creates a window over `row_count` rows, each seeded with `estimate`.
    #[must_use]
    pub fn new(row_count: usize, estimate: S, overscan: usize) -> Self {
        let mut sizes = RowSizeTable::new(estimate);
        sizes.set_len(row_count);
        Self {
            sizes,
            scroll_offset: S::zero(),
            viewport_extent: S::zero(),
            overscan,
            dirty: true,
            last: VisibleRows::empty(),
        }
    }

    /// Returns the row size table.
    #[must_use]
    pub fn sizes(&self) -> &RowSizeTable<S> {
        &self.sizes
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.sizes.len()
    }

    /// Sets the number of rows, keeping measurements for rows that remain.
    pub fn set_row_count(&mut self, row_count: usize) {
        if row_count != self.sizes.len() {
            self.sizes.set_len(row_count);
            self.dirty = true;
        }
    }

    /// Replaces the extent used for unmeasured rows.
    ///
    /// Measured rows keep their size. Non-finite estimates are ignored.
    pub fn set_estimate(&mut self, estimate: S) {
        if estimate.is_finite() && estimate != self.sizes.estimate() {
            self.sizes.set_estimate(estimate);
            self.dirty = true;
        }
    }

    /// Drops every measurement so all rows use the estimate again.
    pub fn reset_sizes(&mut self) {
        self.sizes.reset();
        self.dirty = true;
    }

    /// Returns the current scroll offset.
    #[must_use]
    pub const fn scroll_offset(&self) -> S {
        self.scroll_offset
    }

    /// Sets the scroll offset. Negative values clamp to zero.
    pub fn set_scroll_offset(&mut self, offset: S) {
        let offset = offset.max(S::zero());
        if offset != self.scroll_offset {
            self.scroll_offset = offset;
            self.dirty = true;
        }
    }

    /// Returns the current viewport extent.
    #[must_use]
    pub const fn viewport_extent(&self) -> S {
        self.viewport_extent
    }

    /// Sets the viewport extent. Negative values clamp to zero.
    pub fn set_viewport_extent(&mut self, extent: S) {
        let extent = extent.max(S::zero());
        if extent != self.viewport_extent {
            self.viewport_extent = extent;
            self.dirty = true;
        }
    }

    /// Returns the overscan, in rows.
    #[must_use]
    pub const fn overscan(&self) -> usize {
        self.overscan
    }

    /// Sets the number of rows realized beyond each viewport edge.
    pub fn set_overscan(&mut self, overscan: usize) {
        if overscan != self.overscan {
            self.overscan = overscan;
            self.dirty = true;
        }
    }

    /// Computes or returns the cached visible window.
    #[must_use]
    pub fn visible_rows(&mut self) -> VisibleRows<S> {
        if self.dirty {
            self.last = compute_visible_rows(
                &mut self.sizes,
                self.scroll_offset,
                self.viewport_extent,
                self.overscan,
            );
            self.dirty = false;
        }
        self.last
    }

    /// Offset of `row` from the start of the grid: the sum of rows `0..row`.
    pub fn offset_of(&mut self, row: usize) -> S {
        self.sizes.offset_of(row)
    }

    /// Total extent of all rows, measured where known and estimated elsewhere.
    pub fn total_size(&mut self) -> S {
        self.sizes.total()
    }

    /// Records the measured extent of `row`.
    ///
    /// Returns `true` if the measurement changed the table. Rows past the end
    /// are ignored.
    pub fn report_measured(&mut self, row: usize, extent: S) -> bool {
        let changed = self.sizes.set_measured(row, extent);
        if changed {
            self.dirty = true;
        }
        changed
    }

    /// Returns the first realized row, if any.
    #[must_use]
    pub fn first_visible_row(&mut self) -> Option<usize> {
        let rows = self.visible_rows();
        (!rows.is_empty()).then_some(rows.start)
    }

    /// Returns the last realized row, if any.
    #[must_use]
    pub fn last_visible_row(&mut self) -> Option<usize> {
        self.visible_rows().last()
    }

    /// Returns `true` if `row` overlaps the viewport, ignoring overscan.
    #[must_use]
    pub fn is_row_partially_visible(&mut self, row: usize) -> bool {
        if row >= self.sizes.len() {
            return false;
        }
        let row_start = self.sizes.offset_of(row);
        let row_end = row_start + self.sizes.extent_of(row);
        let view_end = self.scroll_offset + self.viewport_extent;
        row_end > self.scroll_offset && row_start < view_end
    }

    /// Clamps the scroll offset so the viewport stays within the content.
    pub fn clamp_scroll_to_content(&mut self) {
        let total = self.sizes.total();
        let max_offset = if total > self.viewport_extent {
            total - self.viewport_extent
        } else {
            S::zero()
        };
        if self.scroll_offset > max_offset {
            self.set_scroll_offset(max_offset);
        }
    }

    /// Scrolls so that `row` is brought into view using the given alignment.
    pub fn scroll_to_row(&mut self, row: usize, align: ScrollAlign) {
        let len = self.sizes.len();
        if len == 0 {
            self.set_scroll_offset(S::zero());
            return;
        }
        let row = row.min(len - 1);
        let row_start = self.sizes.offset_of(row);
        let row_end = row_start + self.sizes.extent_of(row);
        let viewport = self.viewport_extent;

        let new_offset = match align {
            ScrollAlign::Start => row_start,
            ScrollAlign::End => (row_end - viewport).max(S::zero()),
            ScrollAlign::Center => {
                let half = S::from_usize(2);
                ((row_start + row_end) / half - viewport / half).max(S::zero())
            }
            ScrollAlign::Nearest => {
                let current = self.scroll_offset;
                if row_start >= current && row_end <= current + viewport {
                    current
                } else if row_start < current {
                    row_start
                } else {
                    (row_end - viewport).max(S::zero())
                }
            }
        };

        self.set_scroll_offset(new_offset);
    }
}
