// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_virtual_grid --heading-base-level=0

//! Understory Virtual Grid: row virtualization for multi-column grids.
//!
//! This crate renders a large, growing collection of items as a grid of rows
//! while only realizing the rows near the viewport. Neither the column count
//! nor the row heights are known up front: columns are read from the host's
//! layout engine through a probe, and row heights start from an estimate and
//! are refined as rows are measured.
//!
//! The core pieces are:
//!
//! - [`row_count`] / [`row_items`] / [`RowPartition`]: mapping a flat item
//!   sequence onto rows of `columns` items.
//! - [`RowSizeTable`]: estimate-seeded row extents with a lazily maintained
//!   prefix-sum cache, refined by measurement.
//! - [`ScrollWindow`] and [`compute_visible_rows`]: which rows to realize for a
//!   scroll offset, viewport extent, and overscan (in rows), plus offsets and
//!   total extent.
//! - [`ColumnProbe`] / [`ColumnCountTracker`]: sampling the resolved column
//!   count and republishing it only on change.
//! - [`EndReachedDetector`]: one notification per crossing into the last rows,
//!   so hosts can load more data.
//! - [`select_scroll_surface`]: choosing between the root and body elements as
//!   the scrolling surface, re-evaluated per scroll event.
//! - [`GridView`]: the composition root that ties the above together per
//!   frame and owns host observers as [`Subscription`]s.
//!
//! This crate deliberately does **not** perform layout or painting, and does
//! not virtualize columns. Host frameworks are responsible for:
//!
//! - Keeping a hidden probe element styled like the grid
//!   (see [`GridOptions::class_name`]) and implementing [`ColumnProbe`] over it,
//!   for example with [`count_template_tracks`] on its resolved column template.
//! - Forwarding probe resizes, scroll events, and row measurements.
//! - Placing the rows of each [`GridFrame`] in flow order inside one block
//!   translated by [`GridFrame::translation`].
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_virtual_grid::{GridOptions, GridView, count_template_tracks};
//!
//! // The host's layout engine resolved the probe's template to three tracks.
//! let probe = || count_template_tracks("240px 240px 240px");
//! let options = GridOptions::default()
//!     .with_estimate_row_height(100.0)
//!     .with_row_gap(0.0)
//!     .with_overscan(1);
//! let mut grid = GridView::new(probe, options);
//! grid.set_viewport(0.0, 200.0);
//!
//! let items: Vec<u32> = (0..10).collect();
//! let frame = grid.render(&items, |item, _index| *item);
//!
//! // Four rows exist; rows 0 and 1 are visible and row 2 is overscan.
//! assert_eq!(frame.row_count, 4);
//! assert_eq!(frame.window.rows(), 0..3);
//! assert_eq!(frame.rows[1].cells.as_slice(), &[3, 4, 5]);
//!
//! // After layout, feed the real heights back.
//! grid.report_measured(0, 180.0);
//! assert_eq!(grid.offset_of(1), 180.0);
//! ```
//!
//! ## Windowing without a view
//!
//! [`ScrollWindow`] can be used on its own when the host already knows its
//! row count:
//!
//! ```rust
//! use understory_virtual_grid::ScrollWindow;
//!
//! let mut window = ScrollWindow::new(100, 50.0_f32, 2);
//! window.set_viewport_extent(120.0);
//! window.set_scroll_offset(500.0);
//! let rows = window.visible_rows();
//! assert_eq!(rows.rows(), 8..15);
//! assert_eq!(rows.offset, 400.0);
//! ```
//!
//! All extents and offsets live in one 1D coordinate space (typically logical
//! pixels) and are expected to be finite and non-negative.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo` and `tracing`.
//! - `libm`: enables `no_std` builds that rely on `libm` for `kurbo`'s
//!   floating-point math.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod columns;
mod end_reached;
mod grid_view;
mod options;
mod partition;
mod row_sizes;
mod scalar;
mod subscription;
mod surface;
mod window;

pub use columns::{ColumnCountTracker, ColumnProbe, count_template_tracks};
pub use end_reached::EndReachedDetector;
pub use grid_view::{GridFrame, GridView, Invalidation, RenderedRow};
pub use options::{
    DEFAULT_END_REACHED_THRESHOLD, DEFAULT_ESTIMATE_ROW_HEIGHT, DEFAULT_FALLBACK_COLUMNS,
    DEFAULT_OVERSCAN, DEFAULT_ROW_GAP, GridOptions,
};
pub use partition::{RowOutOfRange, RowPartition, row_count, row_items};
pub use row_sizes::RowSizeTable;
pub use scalar::Scalar;
pub use subscription::Subscription;
pub use surface::{ScrollMetrics, ScrollSurface, select_scroll_surface};
pub use window::{ScrollAlign, ScrollWindow, VisibleRows, compute_visible_rows};
