// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The composition root: columns, rows, window, and end detection per frame.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::num::NonZeroUsize;
use core::ops::Range;

use kurbo::{Size, Vec2};
use smallvec::SmallVec;

use crate::{
    ColumnCountTracker, ColumnProbe, EndReachedDetector, GridOptions, RowPartition, ScrollAlign,
    ScrollMetrics, ScrollSurface, ScrollWindow, Subscription, VisibleRows, row_count,
    select_scroll_surface,
};

bitflags::bitflags! {
    /// Inputs that changed since the last rendered frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Invalidation: u8 {
        /// The column count changed (row sizes were reset).
        const COLUMNS = 1 << 0;
        /// The item count (and so the row count) changed.
        const ROWS = 1 << 1;
        /// The scroll offset or viewport extent changed.
        const SCROLL = 1 << 2;
        /// A measurement replaced a row size.
        const SIZES = 1 << 3;
    }
}

/// One realized row of a [`GridFrame`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow<R> {
    /// Row index.
    pub index: usize,
    /// Flat item indices covered by this row.
    pub items: Range<usize>,
    /// Rendered cells, one per item, in column order.
    pub cells: SmallVec<[R; 4]>,
}

/// The rows realized by one [`GridView::render`] pass.
///
/// Rows are meant to be placed in natural flow order inside a single block
/// translated by [`GridFrame::translation`], inside a container whose height is
/// [`GridFrame::total_size`].
#[derive(Debug, Clone, PartialEq)]
pub struct GridFrame<R> {
    /// Column count the frame was laid out with.
    pub columns: NonZeroUsize,
    /// Total number of rows.
    pub row_count: usize,
    /// The realized window.
    pub window: VisibleRows<f64>,
    /// Realized rows, in order.
    pub rows: Vec<RenderedRow<R>>,
}

impl<R> GridFrame<R> {
    /// Shared translation for the realized block: the offset of its first row.
    #[must_use]
    pub fn translation(&self) -> Vec2 {
        Vec2::new(0.0, self.window.offset)
    }

    /// Total extent of all rows.
    #[must_use]
    pub fn total_size(&self) -> f64 {
        self.window.total
    }

    /// Returns `true` if nothing was realized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A virtualized multi-column grid.
///
/// A `GridView` wires together:
/// - a [`ColumnCountTracker`] sampling the host's column probe,
/// - a [`RowPartition`] of the caller's items into rows,
/// - a [`ScrollWindow`] holding row sizes and scroll state,
/// - an [`EndReachedDetector`] driving the end-of-rows callback.
///
/// Hosts drive it from four event sources and render when
/// [`GridView::needs_render`] says so:
///
/// - probe resizes: [`GridView::on_probe_resize`],
/// - scroll events: [`GridView::on_scroll`] (or [`GridView::set_viewport`]),
/// - post-layout measurements: [`GridView::report_measured`],
/// - item sequence changes: [`GridView::set_item_count`].
///
/// [`GridView::render`] also syncs the item count, but a host that appends
/// items (for example from the end-of-rows callback) has to announce the new
/// count for [`GridView::needs_render`] to see it.
///
/// Each handler runs to completion, so a column change is fully applied before
/// the next scroll event is seen.
///
/// A column change resets every measured row height to the estimate, since the
/// mapping of items to rows changes entirely.
pub struct GridView<P> {
    options: GridOptions,
    columns: ColumnCountTracker<P>,
    window: ScrollWindow<f64>,
    end_reached: EndReachedDetector,
    on_end_reached: Option<Box<dyn FnMut()>>,
    item_count: usize,
    surface: ScrollSurface,
    rendered: Range<usize>,
    invalid: Invalidation,
    subscriptions: SmallVec<[Subscription; 2]>,
}

impl<P: ColumnProbe> GridView<P> {
    /// Creates a view over an empty item sequence.
    #[must_use]
    pub fn new(probe: P, options: GridOptions) -> Self {
        let options = options.sanitized();
        let columns = ColumnCountTracker::new(probe, options.fallback_columns);
        let window = ScrollWindow::new(0, options.estimate_row_height, options.overscan);
        Self {
            options,
            columns,
            window,
            end_reached: EndReachedDetector::new(),
            on_end_reached: None,
            item_count: 0,
            surface: ScrollSurface::default(),
            rendered: 0..0,
            invalid: Invalidation::all(),
            subscriptions: SmallVec::new(),
        }
    }

    /// Returns the options in effect (after sanitizing).
    #[must_use]
    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    /// Style token to apply to both the probe and the real grid.
    #[must_use]
    pub fn class_name(&self) -> Option<&str> {
        self.options.class_name.as_deref()
    }

    /// Installs the callback invoked when the window nears the last row.
    pub fn set_end_reached(&mut self, callback: impl FnMut() + 'static) {
        self.on_end_reached = Some(Box::new(callback));
    }

    /// Removes the end-of-rows callback.
    pub fn clear_end_reached(&mut self) {
        self.on_end_reached = None;
    }

    /// Takes ownership of a host observer; it is released on teardown.
    pub fn attach(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    /// Releases every attached observer.
    ///
    /// Dropping the view does the same.
    pub fn teardown(&mut self) {
        for mut subscription in self.subscriptions.drain(..) {
            subscription.release();
        }
    }

    /// Returns the current column count.
    #[must_use]
    pub fn column_count(&self) -> NonZeroUsize {
        self.columns.current_column_count()
    }

    /// Returns the number of items the view was last told about.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.window.row_count()
    }

    /// Returns the surface chosen by the most recent scroll event.
    #[must_use]
    pub fn scroll_surface(&self) -> ScrollSurface {
        self.surface
    }

    /// Returns the windowing state.
    #[must_use]
    pub fn window(&self) -> &ScrollWindow<f64> {
        &self.window
    }

    /// Returns the inputs that changed since the last frame.
    #[must_use]
    pub fn invalidation(&self) -> Invalidation {
        self.invalid
    }

    /// Returns `true` if any input changed since the last frame.
    #[must_use]
    pub fn needs_render(&self) -> bool {
        !self.invalid.is_empty()
    }

    /// Announces a new item count ahead of the next render.
    ///
    /// Rows are recomputed immediately and the view is invalidated if the
    /// count changed.
    pub fn set_item_count(&mut self, item_count: usize) {
        if item_count == self.item_count {
            return;
        }
        self.item_count = item_count;
        let rows = row_count(item_count, self.column_count());
        self.window.set_row_count(rows);
        self.invalid |= Invalidation::ROWS;
    }

    /// Replaces the height assumed for rows that have not been measured.
    ///
    /// Values that are not finite and positive are ignored.
    pub fn set_estimate_row_height(&mut self, height: f64) {
        if !height.is_finite() || height <= 0.0 || height == self.options.estimate_row_height {
            return;
        }
        self.options.estimate_row_height = height;
        self.window.set_estimate(height);
        self.invalid |= Invalidation::SIZES;
    }

    /// Sets the number of rows realized beyond each viewport edge.
    pub fn set_overscan(&mut self, overscan: usize) {
        if overscan != self.options.overscan {
            self.options.overscan = overscan;
            self.window.set_overscan(overscan);
            self.invalid |= Invalidation::SCROLL;
        }
    }

    /// Handles a resize of the column probe.
    ///
    /// Returns `true` if the column count changed.
    pub fn on_probe_resize(&mut self, probe_size: Size) -> bool {
        match self.columns.on_resize(probe_size) {
            Some(columns) => {
                self.apply_columns(columns);
                true
            }
            None => false,
        }
    }

    /// Samples the column probe outside of a resize notification.
    ///
    /// Returns `true` if the column count changed.
    pub fn resample_columns(&mut self) -> bool {
        match self.columns.resample() {
            Some(columns) => {
                self.apply_columns(columns);
                true
            }
            None => false,
        }
    }

    fn apply_columns(&mut self, columns: NonZeroUsize) {
        let rows = row_count(self.item_count, columns);
        tracing::debug!(
            columns = columns.get(),
            rows,
            "resetting row sizes after column change"
        );
        self.window.reset_sizes();
        self.window.set_row_count(rows);
        self.rendered = 0..0;
        self.invalid |= Invalidation::COLUMNS | Invalidation::ROWS;
    }

    /// Handles a document-level scroll event.
    ///
    /// The scrolling surface is re-selected from `root` and `body` on every
    /// call, since which one scrolls can change as content loads.
    pub fn on_scroll(&mut self, root: &ScrollMetrics, body: &ScrollMetrics) {
        let surface = select_scroll_surface(root);
        if surface != self.surface {
            tracing::trace!(?surface, "scroll surface changed");
            self.surface = surface;
        }
        let metrics = surface.pick(root, body);
        self.set_viewport(
            metrics.scroll_offset - self.options.scroll_margin,
            metrics.client_extent,
        );
    }

    /// Sets the scroll offset (relative to the top of the grid) and viewport
    /// extent directly, for hosts that scroll a dedicated element.
    pub fn set_viewport(&mut self, scroll_offset: f64, viewport_extent: f64) {
        let before = (self.window.scroll_offset(), self.window.viewport_extent());
        self.window.set_scroll_offset(scroll_offset);
        self.window.set_viewport_extent(viewport_extent);
        if (self.window.scroll_offset(), self.window.viewport_extent()) != before {
            self.invalid |= Invalidation::SCROLL;
        }
    }

    /// Records the measured content height of a realized row.
    ///
    /// The configured row gap is added so the gap counts toward the row's
    /// extent. Measurements for rows outside the last rendered frame are
    /// discarded, as the row may have been recycled since it was laid out.
    /// Returns `true` if the measurement changed a row size.
    pub fn report_measured(&mut self, row: usize, content_height: f64) -> bool {
        if !self.rendered.contains(&row) {
            tracing::trace!(row, "discarding measurement for unrealized row");
            return false;
        }
        let changed = self
            .window
            .report_measured(row, content_height + self.options.row_gap);
        if changed {
            self.invalid |= Invalidation::SIZES;
        }
        changed
    }

    /// Offset of `row` from the top of the grid.
    pub fn offset_of(&mut self, row: usize) -> f64 {
        self.window.offset_of(row)
    }

    /// Total extent of all rows.
    pub fn total_size(&mut self) -> f64 {
        self.window.total_size()
    }

    /// The rows that would be realized now.
    #[must_use]
    pub fn visible_rows(&mut self) -> VisibleRows<f64> {
        self.window.visible_rows()
    }

    /// Moves the window so `row` is in view and returns the scroll offset
    /// the host should apply to the scroll surface.
    pub fn scroll_to_row(&mut self, row: usize, align: ScrollAlign) -> f64 {
        let before = self.window.scroll_offset();
        self.window.scroll_to_row(row, align);
        if self.window.scroll_offset() != before {
            self.invalid |= Invalidation::SCROLL;
        }
        self.window.scroll_offset() + self.options.scroll_margin
    }

    /// Renders the realized rows of `items`.
    ///
    /// `render_cell` is called once per realized item with the item and its
    /// flat index. After the frame is built the end-of-rows check runs and the
    /// callback fires if a new crossing happened.
    pub fn render<T, R>(
        &mut self,
        items: &[T],
        mut render_cell: impl FnMut(&T, usize) -> R,
    ) -> GridFrame<R> {
        self.set_item_count(items.len());

        let columns = self.column_count();
        let partition = RowPartition::new(items.len(), columns);
        let window = self.window.visible_rows();

        let rows = window
            .rows()
            .filter_map(|index| {
                let range = partition.row_range(index).ok()?;
                let cells = items[range.clone()]
                    .iter()
                    .zip(range.clone())
                    .map(|(item, i)| render_cell(item, i))
                    .collect();
                Some(RenderedRow {
                    index,
                    items: range,
                    cells,
                })
            })
            .collect();

        self.rendered = window.rows();
        self.invalid = Invalidation::empty();

        let row_count = partition.row_count();
        let threshold = self.options.end_reached_threshold;
        if let Some(notify) = self.on_end_reached.as_mut() {
            self.end_reached
                .check_and_notify(window.last(), row_count, threshold, || notify());
        }

        GridFrame {
            columns,
            row_count,
            window,
            rows,
        }
    }
}

impl<P: fmt::Debug> fmt::Debug for GridView<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridView")
            .field("options", &self.options)
            .field("columns", &self.columns)
            .field("window", &self.window)
            .field("end_reached", &self.end_reached)
            .field("item_count", &self.item_count)
            .field("surface", &self.surface)
            .field("rendered", &self.rendered)
            .field("invalid", &self.invalid)
            .field("subscriptions", &self.subscriptions)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::Cell;
    use core::num::NonZeroUsize;

    use kurbo::{Size, Vec2};

    use super::{GridView, Invalidation};
    use crate::{GridOptions, ScrollMetrics, ScrollSurface, Subscription};

    const PROBE: Size = Size::new(960.0, 0.0);

    fn probe(columns: Rc<Cell<usize>>) -> impl Fn() -> Option<NonZeroUsize> {
        move || NonZeroUsize::new(columns.get())
    }

    fn options() -> GridOptions {
        GridOptions::default()
            .with_estimate_row_height(100.0)
            .with_row_gap(0.0)
            .with_overscan(1)
    }

    #[test]
    fn empty_items_render_nothing_and_never_notify() {
        let columns = Rc::new(Cell::new(3));
        let fired = Rc::new(Cell::new(0));
        let mut view = GridView::new(probe(columns.clone()), options());
        {
            let fired = fired.clone();
            view.set_end_reached(move || fired.set(fired.get() + 1));
        }
        view.set_viewport(0.0, 500.0);
        let items: [u32; 0] = [];
        let frame = view.render(&items, |item, _| *item);
        assert!(frame.is_empty());
        assert_eq!(frame.row_count, 0);
        assert_eq!(frame.total_size(), 0.0);
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn renders_only_realized_rows_with_shared_translation() {
        let columns = Rc::new(Cell::new(3));
        let mut view = GridView::new(probe(columns.clone()), options().with_overscan(1));
        view.set_viewport(0.0, 200.0);

        let items: Vec<u32> = (0..10).collect();
        let frame = view.render(&items, |item, index| (*item, index));
        assert_eq!(frame.row_count, 4);
        let indices: Vec<usize> = frame.rows.iter().map(|r| r.index).collect();
        assert_eq!(indices, [0, 1, 2]);
        assert_eq!(frame.rows[2].items, 6..9);
        assert_eq!(frame.rows[2].cells.as_slice(), &[(6, 6), (7, 7), (8, 8)]);
        assert_eq!(frame.translation(), Vec2::ZERO);
        assert_eq!(frame.total_size(), 400.0);

        view.set_viewport(250.0, 100.0);
        let frame = view.render(&items, |item, _| *item);
        // Visible rows 2..=3, one row of overscan above.
        let indices: Vec<usize> = frame.rows.iter().map(|r| r.index).collect();
        assert_eq!(indices, [1, 2, 3]);
        assert_eq!(frame.translation(), Vec2::new(0.0, 100.0));
        assert_eq!(frame.rows[2].cells.as_slice(), &[9]);
    }

    #[test]
    fn measurements_include_the_row_gap() {
        let columns = Rc::new(Cell::new(2));
        let mut view = GridView::new(probe(columns.clone()), options().with_row_gap(16.0));
        view.set_viewport(0.0, 150.0);
        let items = [1, 2, 3, 4, 5, 6];
        let _ = view.render(&items, |item, _| *item);

        assert!(view.report_measured(0, 84.0));
        assert!(!view.report_measured(0, 84.0), "same height twice is a no-op");
        assert_eq!(view.offset_of(1), 100.0);
        assert_eq!(view.total_size(), 100.0 + 100.0 + 100.0);
        assert!(view.invalidation().contains(Invalidation::SIZES));
    }

    #[test]
    fn measurements_for_unrealized_rows_are_discarded() {
        let columns = Rc::new(Cell::new(1));
        let mut view = GridView::new(probe(columns.clone()), options().with_overscan(0));
        view.set_viewport(0.0, 100.0);
        let items: Vec<u8> = (0..50).collect();
        let _ = view.render(&items, |item, _| *item);

        assert!(!view.report_measured(10, 500.0));
        assert_eq!(view.total_size(), 5000.0);
        assert!(!view.needs_render());
    }

    #[test]
    fn column_change_resets_sizes_and_recomputes_rows() {
        let columns = Rc::new(Cell::new(3));
        let mut view = GridView::new(probe(columns.clone()), options());
        view.set_viewport(0.0, 300.0);
        let items: Vec<u32> = (0..97).collect();
        let _ = view.render(&items, |item, _| *item);
        assert_eq!(view.row_count(), 33);
        assert!(view.report_measured(0, 250.0));
        assert_eq!(view.total_size(), 250.0 + 32.0 * 100.0);

        columns.set(4);
        assert!(view.on_probe_resize(PROBE));
        assert_eq!(view.row_count(), 25);
        assert_eq!(view.window().sizes().measured_count(), 0);
        assert_eq!(view.total_size(), 2500.0);
        assert!(view.invalidation().contains(Invalidation::COLUMNS));

        let frame = view.render(&items, |item, _| *item);
        assert_eq!(frame.columns.get(), 4);
        assert_eq!(frame.rows[0].cells.as_slice(), &[0, 1, 2, 3]);

        // Same count again: nothing to do.
        assert!(!view.on_probe_resize(PROBE));
        // Transient zero keeps the previous count.
        columns.set(0);
        assert!(!view.on_probe_resize(PROBE));
        assert_eq!(view.column_count().get(), 4);
    }

    #[test]
    fn unresolved_probe_uses_fallback_columns() {
        let columns = Rc::new(Cell::new(0));
        let mut view = GridView::new(probe(columns.clone()), options());
        assert_eq!(view.column_count().get(), 3);
        view.set_item_count(7);
        assert_eq!(view.row_count(), 3);
    }

    #[test]
    fn end_reached_fires_once_per_crossing() {
        let columns = Rc::new(Cell::new(1));
        let fired = Rc::new(Cell::new(0));
        let mut view = GridView::new(probe(columns.clone()), options().with_overscan(0));
        {
            let fired = fired.clone();
            view.set_end_reached(move || fired.set(fired.get() + 1));
        }
        view.set_viewport(0.0, 200.0);
        let mut items: Vec<u32> = (0..10).collect();
        let _ = view.render(&items, |item, _| *item);
        assert_eq!(fired.get(), 0);

        // Last visible row 8 is within 2 of the end.
        view.set_viewport(700.0, 200.0);
        let _ = view.render(&items, |item, _| *item);
        assert_eq!(fired.get(), 1);

        view.set_viewport(800.0, 200.0);
        let _ = view.render(&items, |item, _| *item);
        assert_eq!(fired.get(), 1);

        // More data arrived.
        items.extend(10..20);
        let _ = view.render(&items, |item, _| *item);
        assert_eq!(fired.get(), 1);
        view.set_viewport(1700.0, 200.0);
        let _ = view.render(&items, |item, _| *item);
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn scroll_events_pick_the_scrolling_surface() {
        let columns = Rc::new(Cell::new(2));
        let mut view = GridView::new(probe(columns.clone()), options().with_scroll_margin(50.0));
        view.set_item_count(40);

        let root = ScrollMetrics::new(0.0, 600.0, 600.0);
        let body = ScrollMetrics::new(350.0, 600.0, 2100.0);
        view.on_scroll(&root, &body);
        assert_eq!(view.scroll_surface(), ScrollSurface::Body);
        assert_eq!(view.window().scroll_offset(), 300.0);
        assert_eq!(view.window().viewport_extent(), 600.0);

        let root = ScrollMetrics::new(450.0, 600.0, 2100.0);
        view.on_scroll(&root, &body);
        assert_eq!(view.scroll_surface(), ScrollSurface::Root);
        assert_eq!(view.window().scroll_offset(), 400.0);
    }

    #[test]
    fn unchanged_inputs_do_not_invalidate() {
        let columns = Rc::new(Cell::new(2));
        let mut view = GridView::new(probe(columns.clone()), options());
        view.set_viewport(120.0, 300.0);
        let items = [0_u8; 9];
        let first = view.render(&items, |_, i| i);
        assert!(!view.needs_render());

        view.set_viewport(120.0, 300.0);
        view.set_item_count(9);
        assert!(!view.needs_render());
        let second = view.render(&items, |_, i| i);
        assert_eq!(first, second);
    }

    #[test]
    fn appended_items_invalidate_before_the_next_render() {
        let columns = Rc::new(Cell::new(1));
        let mut view = GridView::new(probe(columns.clone()), options().with_overscan(0));
        view.set_viewport(800.0, 300.0);
        let mut items: Vec<u32> = (0..10).collect();
        let frame = view.render(&items, |item, _| *item);
        assert_eq!(frame.window.rows(), 8..10);
        assert!(!view.needs_render());

        items.extend(10..20);
        view.set_item_count(items.len());
        assert!(view.needs_render());
        assert!(view.invalidation().contains(Invalidation::ROWS));
        assert_eq!(view.row_count(), 20);
        assert_eq!(view.visible_rows().rows(), 8..11);

        let frame = view.render(&items, |item, _| *item);
        assert_eq!(frame.window.rows(), 8..11);
        assert_eq!(frame.rows[2].cells.as_slice(), &[10]);
        assert!(!view.needs_render());
    }

    #[test]
    fn estimate_changes_only_move_unmeasured_rows() {
        let columns = Rc::new(Cell::new(2));
        let mut view = GridView::new(probe(columns.clone()), options());
        view.set_viewport(0.0, 150.0);
        let items = [0_u8; 8];
        let _ = view.render(&items, |_, i| i);
        assert!(view.report_measured(0, 120.0));
        let _ = view.render(&items, |_, i| i);

        view.set_estimate_row_height(60.0);
        assert!(view.invalidation().contains(Invalidation::SIZES));
        assert_eq!(view.options().estimate_row_height, 60.0);
        assert_eq!(view.total_size(), 120.0 + 60.0 * 3.0);

        let _ = view.render(&items, |_, i| i);
        view.set_estimate_row_height(-1.0);
        assert!(!view.needs_render());
    }

    #[test]
    fn scroll_to_row_returns_surface_offset() {
        let columns = Rc::new(Cell::new(1));
        let mut view = GridView::new(probe(columns.clone()), options().with_scroll_margin(40.0));
        view.set_item_count(20);
        view.set_viewport(0.0, 300.0);
        assert_eq!(view.scroll_to_row(5, crate::ScrollAlign::Start), 540.0);
        assert_eq!(view.visible_rows().start, 4);
    }

    #[test]
    fn teardown_releases_observers() {
        let released = Rc::new(Cell::new(0));
        let columns = Rc::new(Cell::new(2));
        let mut view = GridView::new(probe(columns.clone()), options());
        for _ in 0..2 {
            let released = released.clone();
            view.attach(Subscription::new(move || released.set(released.get() + 1)));
        }
        view.teardown();
        assert_eq!(released.get(), 2);

        let mut view = GridView::new(probe(columns.clone()), options());
        {
            let released = released.clone();
            view.attach(Subscription::new(move || released.set(released.get() + 1)));
        }
        drop(view);
        assert_eq!(released.get(), 3);
    }
}
