// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration for a [`GridView`](crate::GridView).

use alloc::borrow::Cow;
use core::num::NonZeroUsize;

/// Default seed for unmeasured rows, in logical pixels.
pub const DEFAULT_ESTIMATE_ROW_HEIGHT: f64 = 320.0;
/// Default spacing below each row, in logical pixels.
pub const DEFAULT_ROW_GAP: f64 = 16.0;
/// Default number of rows realized beyond each viewport edge.
pub const DEFAULT_OVERSCAN: usize = 3;
/// Default size of the end-of-rows zone, in rows.
pub const DEFAULT_END_REACHED_THRESHOLD: usize = 2;
/// Column count used while the probe cannot be resolved.
pub const DEFAULT_FALLBACK_COLUMNS: NonZeroUsize = NonZeroUsize::new(3).unwrap();

/// Options for a [`GridView`](crate::GridView).
///
/// Out-of-range values are not errors: [`GridOptions::sanitized`] replaces them
/// with defaults, and the view always sanitizes what it is given.
#[derive(Debug, Clone, PartialEq)]
pub struct GridOptions {
    /// Extent assumed for rows that have not been measured yet.
    pub estimate_row_height: f64,
    /// Spacing below each row.
    ///
    /// The view adds this to every reported row height, so the gap takes part
    /// in offset math exactly like row content does.
    pub row_gap: f64,
    /// Rows realized beyond each edge of the viewport.
    pub overscan: usize,
    /// Style token shared by the column probe and the real grid.
    ///
    /// Hosts must apply the same token to both so the probe resolves the same
    /// column template as the grid it stands in for.
    pub class_name: Option<Cow<'static, str>>,
    /// How close (in rows) the last realized row must come to the end before
    /// more data is requested. Zero disables the notification.
    pub end_reached_threshold: usize,
    /// Column count used until the probe resolves.
    pub fallback_columns: NonZeroUsize,
    /// Distance from the top of the scroll surface to the top of the grid.
    pub scroll_margin: f64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            estimate_row_height: DEFAULT_ESTIMATE_ROW_HEIGHT,
            row_gap: DEFAULT_ROW_GAP,
            overscan: DEFAULT_OVERSCAN,
            class_name: None,
            end_reached_threshold: DEFAULT_END_REACHED_THRESHOLD,
            fallback_columns: DEFAULT_FALLBACK_COLUMNS,
            scroll_margin: 0.0,
        }
    }
}

impl GridOptions {
    /// Sets the row height estimate.
    #[must_use]
    pub fn with_estimate_row_height(mut self, height: f64) -> Self {
        self.estimate_row_height = height;
        self
    }

    /// Sets the row gap.
    #[must_use]
    pub fn with_row_gap(mut self, gap: f64) -> Self {
        self.row_gap = gap;
        self
    }

    /// Sets the overscan, in rows.
    #[must_use]
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    /// Sets the shared style token.
    #[must_use]
    pub fn with_class_name(mut self, class_name: impl Into<Cow<'static, str>>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Sets the end-of-rows threshold.
    #[must_use]
    pub fn with_end_reached_threshold(mut self, threshold: usize) -> Self {
        self.end_reached_threshold = threshold;
        self
    }

    /// Sets the fallback column count.
    #[must_use]
    pub fn with_fallback_columns(mut self, columns: NonZeroUsize) -> Self {
        self.fallback_columns = columns;
        self
    }

    /// Sets the scroll margin.
    #[must_use]
    pub fn with_scroll_margin(mut self, margin: f64) -> Self {
        self.scroll_margin = margin;
        self
    }

    /// Returns a copy with invalid numeric values replaced by defaults.
    ///
    /// The estimate must be positive and finite; gap and scroll margin must be
    /// finite and non-negative.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        if !(self.estimate_row_height.is_finite() && self.estimate_row_height > 0.0) {
            tracing::warn!(
                estimate_row_height = self.estimate_row_height,
                "invalid row height estimate, using default"
            );
            self.estimate_row_height = DEFAULT_ESTIMATE_ROW_HEIGHT;
        }
        if !(self.row_gap.is_finite() && self.row_gap >= 0.0) {
            tracing::warn!(row_gap = self.row_gap, "invalid row gap, using default");
            self.row_gap = DEFAULT_ROW_GAP;
        }
        if !(self.scroll_margin.is_finite() && self.scroll_margin >= 0.0) {
            tracing::warn!(
                scroll_margin = self.scroll_margin,
                "invalid scroll margin, using zero"
            );
            self.scroll_margin = 0.0;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_ESTIMATE_ROW_HEIGHT, DEFAULT_ROW_GAP, GridOptions};

    #[test]
    fn defaults_match_documented_values() {
        let options = GridOptions::default();
        assert_eq!(options.estimate_row_height, 320.0);
        assert_eq!(options.overscan, 3);
        assert_eq!(options.end_reached_threshold, 2);
        assert_eq!(options.fallback_columns.get(), 3);
        assert_eq!(options.class_name, None);
    }

    #[test]
    fn builder_sets_fields() {
        let options = GridOptions::default()
            .with_estimate_row_height(200.0)
            .with_overscan(1)
            .with_class_name("media-grid")
            .with_end_reached_threshold(4);
        assert_eq!(options.estimate_row_height, 200.0);
        assert_eq!(options.overscan, 1);
        assert_eq!(options.class_name.as_deref(), Some("media-grid"));
        assert_eq!(options.end_reached_threshold, 4);
    }

    #[test]
    fn sanitizing_replaces_invalid_numbers() {
        let options = GridOptions::default()
            .with_estimate_row_height(-1.0)
            .with_row_gap(f64::NAN)
            .with_scroll_margin(f64::INFINITY)
            .sanitized();
        assert_eq!(options.estimate_row_height, DEFAULT_ESTIMATE_ROW_HEIGHT);
        assert_eq!(options.row_gap, DEFAULT_ROW_GAP);
        assert_eq!(options.scroll_margin, 0.0);

        let valid = GridOptions::default().with_row_gap(0.0);
        assert_eq!(valid.clone().sanitized(), valid);
    }
}
