// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Detecting when the realized window approaches the end of the rows.

/// Fires once per crossing into the last `threshold` rows.
///
/// A crossing is identified by the row count it happened at. Once a
/// notification fires, moving around inside the threshold zone does not fire
/// again; more rows have to arrive (moving the zone) and the last realized row
/// has to differ from the one that fired last time.
///
/// A `threshold` of zero never fires, and neither does an empty grid. A
/// threshold at or above the row count puts every row inside the zone, so the
/// first window fires immediately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EndReachedDetector {
    watermark: Option<Watermark>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Watermark {
    last_visible: usize,
    row_count: usize,
}

impl EndReachedDetector {
    /// Creates a detector that has not fired yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { watermark: None }
    }

    /// Returns the last realized row at the most recent notification, if any.
    #[must_use]
    pub fn watermark(&self) -> Option<usize> {
        self.watermark.map(|w| w.last_visible)
    }

    /// Checks the last realized row against the end of the grid.
    ///
    /// `last_visible` is `None` for an empty window. Returns `true` exactly when
    /// the caller should request more data; the watermark is updated before
    /// returning.
    pub fn check(
        &mut self,
        last_visible: Option<usize>,
        row_count: usize,
        threshold: usize,
    ) -> bool {
        let Some(last_visible) = last_visible else {
            return false;
        };
        if threshold == 0 || row_count == 0 {
            return false;
        }
        if last_visible < row_count.saturating_sub(threshold) {
            return false;
        }
        if self
            .watermark
            .is_some_and(|mark| mark.last_visible == last_visible || mark.row_count == row_count)
        {
            return false;
        }
        self.watermark = Some(Watermark {
            last_visible,
            row_count,
        });
        true
    }

    /// Like [`EndReachedDetector::check`], invoking `notify` when it fires.
    pub fn check_and_notify(
        &mut self,
        last_visible: Option<usize>,
        row_count: usize,
        threshold: usize,
        notify: impl FnOnce(),
    ) -> bool {
        let fired = self.check(last_visible, row_count, threshold);
        if fired {
            tracing::debug!(last_visible, row_count, threshold, "end of rows reached");
            notify();
        }
        fired
    }
}
