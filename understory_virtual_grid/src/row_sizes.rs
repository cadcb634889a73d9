// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-row extents seeded by an estimate and refined by measurement.

use alloc::vec::Vec;

use crate::Scalar;

/// Row extents backed by a lazily-maintained prefix-sum cache.
///
/// Every row starts at the estimate passed to [`RowSizeTable::new`]. Hosts
/// overwrite entries with real measurements through [`RowSizeTable::set_measured`];
/// entries persist when rows scroll out of view so offsets stay stable.
///
/// Offsets are cached as prefix sums. A measurement marks the cache dirty from
/// that row onward and the next offset or total query recomputes only the
/// dirty tail, so unchanged inputs never cause a full re-sum.
#[derive(Clone, Debug)]
pub struct RowSizeTable<S: Scalar> {
    estimate: S,
    extents: Vec<S>,
    measured: Vec<bool>,
    prefix_starts: Vec<S>,
    dirty_from: Option<usize>,
}

impl<S: Scalar> RowSizeTable<S> {
    /// Creates an empty table whose rows default to `estimate`.
    ///
    /// Negative estimates are clamped to zero.
    #[must_use]
    pub fn new(estimate: S) -> Self {
        Self {
            estimate: clamp_extent(estimate),
            extents: Vec::new(),
            measured: Vec::new(),
            prefix_starts: Vec::new(),
            dirty_from: Some(0),
        }
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.extents.len()
    }

    /// Returns `true` if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extents.is_empty()
    }

    /// Returns the extent used for rows that have not been measured.
    #[must_use]
    pub fn estimate(&self) -> S {
        self.estimate
    }

    /// Replaces the estimate and re-seeds every unmeasured row with it.
    pub fn set_estimate(&mut self, estimate: S) {
        let estimate = clamp_extent(estimate);
        if estimate == self.estimate {
            return;
        }
        self.estimate = estimate;
        let first_unmeasured = self.measured.iter().position(|m| !m);
        for (extent, measured) in self.extents.iter_mut().zip(&self.measured) {
            if !measured {
                *extent = estimate;
            }
        }
        if let Some(first) = first_unmeasured {
            self.mark_dirty(first);
        }
    }

    /// Resizes the table to `len` rows.
    ///
    /// New rows receive the estimate; rows past `len` are dropped along with
    /// their measurements.
    pub fn set_len(&mut self, len: usize) {
        let old = self.extents.len();
        if len == old {
            return;
        }
        self.extents.resize(len, self.estimate);
        self.measured.resize(len, false);
        self.prefix_starts.resize(len, S::zero());
        self.mark_dirty(old.min(len));
    }

    /// Forgets every measurement, returning all rows to the estimate.
    pub fn reset(&mut self) {
        self.extents.fill(self.estimate);
        self.measured.fill(false);
        self.mark_dirty(0);
    }

    /// Records a measured extent for `row`.
    ///
    /// Returns `true` if the table changed. Reporting the same extent twice is a
    /// no-op, as is reporting a row past the end. Negative extents clamp to zero
    /// and non-finite extents are ignored.
    pub fn set_measured(&mut self, row: usize, extent: S) -> bool {
        if row >= self.extents.len() || !extent.is_finite() {
            return false;
        }
        let extent = clamp_extent(extent);
        if self.measured[row] && self.extents[row] == extent {
            return false;
        }
        self.measured[row] = true;
        if self.extents[row] != extent {
            self.extents[row] = extent;
            self.mark_dirty(row);
        }
        true
    }

    /// Returns `true` if `row` holds a real measurement.
    #[must_use]
    pub fn is_measured(&self, row: usize) -> bool {
        self.measured.get(row).copied().unwrap_or(false)
    }

    /// Returns how many rows hold a real measurement.
    #[must_use]
    pub fn measured_count(&self) -> usize {
        self.measured.iter().filter(|m| **m).count()
    }

    /// Returns the extent of `row`, or zero past the end.
    #[must_use]
    pub fn extent_of(&self, row: usize) -> S {
        self.extents.get(row).copied().unwrap_or_else(S::zero)
    }

    /// Returns the offset of `row` from the start of the grid.
    ///
    /// This is the sum of extents of rows `0..row`; `row == len()` yields the
    /// total extent.
    pub fn offset_of(&mut self, row: usize) -> S {
        let len = self.extents.len();
        if row == 0 || len == 0 {
            return S::zero();
        }
        if row >= len {
            return self.total();
        }
        self.ensure_prefix();
        self.prefix_starts[row]
    }

    /// Returns the sum of all row extents.
    pub fn total(&mut self) -> S {
        let len = self.extents.len();
        if len == 0 {
            return S::zero();
        }
        self.ensure_prefix();
        self.prefix_starts[len - 1] + self.extents[len - 1]
    }

    /// Returns the number of rows whose start lies at or before `offset`.
    ///
    /// Equivalently, the index one past the last row starting at or before
    /// `offset` (ties resolve toward the later row).
    pub(crate) fn rows_starting_at_or_before(&mut self, offset: S) -> usize {
        if self.extents.is_empty() {
            return 0;
        }
        self.ensure_prefix();
        self.prefix_starts.partition_point(|start| *start <= offset)
    }

    /// Returns the number of rows whose start lies strictly before `offset`.
    pub(crate) fn rows_starting_before(&mut self, offset: S) -> usize {
        if self.extents.is_empty() {
            return 0;
        }
        self.ensure_prefix();
        self.prefix_starts.partition_point(|start| *start < offset)
    }

    fn mark_dirty(&mut self, from: usize) {
        self.dirty_from = Some(self.dirty_from.map_or(from, |d| d.min(from)));
    }

    fn ensure_prefix(&mut self) {
        let len = self.extents.len();
        let Some(dirty_from) = self.dirty_from.take() else {
            return;
        };
        if dirty_from >= len {
            return;
        }
        let mut pos = if dirty_from == 0 {
            S::zero()
        } else {
            self.prefix_starts[dirty_from - 1] + self.extents[dirty_from - 1]
        };
        for i in dirty_from..len {
            self.prefix_starts[i] = pos;
            pos = pos + self.extents[i];
        }
    }
}

fn clamp_extent<S: Scalar>(extent: S) -> S {
    if extent.is_sign_negative() {
        S::zero()
    } else {
        extent
    }
}
