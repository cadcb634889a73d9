// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapping a flat item sequence onto rows of a fixed column count.
//!
//! Rows are synthetic: row `r` holds items `r * columns .. min((r + 1) * columns, len)`.
//! Nothing here is stored per row, so a column change simply yields a new partition.

use core::num::NonZeroUsize;
use core::ops::Range;

/// Error returned when a row index is past the end of the partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("row {row} is out of range for a partition of {row_count} rows")]
pub struct RowOutOfRange {
    /// The requested row.
    pub row: usize,
    /// Number of rows in the partition at the time of the request.
    pub row_count: usize,
}

/// Number of rows needed to hold `len` items in `columns` columns.
///
/// This is `ceil(len / columns)`, and `0` for an empty sequence.
#[must_use]
pub const fn row_count(len: usize, columns: NonZeroUsize) -> usize {
    len.div_ceil(columns.get())
}

/// Returns the items belonging to row `row`.
///
/// The last row may be shorter than `columns`. Rows at or past
/// [`row_count`] are an error rather than an empty slice, so callers notice
/// when they index with a stale row count.
pub fn row_items<T>(
    items: &[T],
    columns: NonZeroUsize,
    row: usize,
) -> Result<&[T], RowOutOfRange> {
    let range = RowPartition::new(items.len(), columns).row_range(row)?;
    Ok(&items[range])
}

/// A flat sequence of `len` items laid out `columns` per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowPartition {
    len: usize,
    columns: NonZeroUsize,
}

impl RowPartition {
    /// Creates a partition of `len` items into rows of `columns` items.
    #[must_use]
    pub const fn new(len: usize, columns: NonZeroUsize) -> Self {
        Self { len, columns }
    }

    /// Returns the number of items.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if there are no items.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of items per row.
    #[must_use]
    pub const fn columns(&self) -> NonZeroUsize {
        self.columns
    }

    /// Returns the number of rows, `ceil(len / columns)`.
    #[must_use]
    pub const fn row_count(&self) -> usize {
        row_count(self.len, self.columns)
    }

    /// Returns the item index range covered by `row`.
    pub fn row_range(&self, row: usize) -> Result<Range<usize>, RowOutOfRange> {
        let row_count = self.row_count();
        if row >= row_count {
            return Err(RowOutOfRange { row, row_count });
        }
        let start = row * self.columns.get();
        let end = start.saturating_add(self.columns.get()).min(self.len);
        Ok(start..end)
    }

    /// Returns the row containing item `index`.
    ///
    /// The result is `index / columns`; it is not checked against `len`.
    #[must_use]
    pub const fn row_of_item(&self, index: usize) -> usize {
        index / self.columns.get()
    }

    /// Returns the zero-based column of item `index` within its row.
    #[must_use]
    pub const fn column_of_item(&self, index: usize) -> usize {
        index % self.columns.get()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;
    use core::num::NonZeroUsize;

    use super::{RowOutOfRange, RowPartition, row_count, row_items};

    fn cols(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn row_count_is_ceiling_division() {
        assert_eq!(row_count(0, cols(3)), 0);
        assert_eq!(row_count(1, cols(3)), 1);
        assert_eq!(row_count(3, cols(3)), 1);
        assert_eq!(row_count(10, cols(3)), 4);
        assert_eq!(row_count(97, cols(3)), 33);
        assert_eq!(row_count(97, cols(4)), 25);
        assert_eq!(row_count(5, cols(1)), 5);
    }

    #[test]
    fn rows_cover_every_item_exactly_once() {
        let items: Vec<u32> = (0..23).collect();
        for c in 1..=7 {
            let rows = row_count(items.len(), cols(c));
            let mut seen = Vec::new();
            for r in 0..rows {
                let slice = row_items(&items, cols(c), r).unwrap();
                assert!(!slice.is_empty(), "row {r} with {c} columns is empty");
                assert!(slice.len() <= c, "row {r} wider than {c} columns");
                seen.extend_from_slice(slice);
            }
            assert_eq!(seen, items);
        }
    }

    #[test]
    fn last_row_is_partial() {
        let items = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j'];
        assert_eq!(row_items(&items, cols(3), 0), Ok(&items[0..3]));
        assert_eq!(row_items(&items, cols(3), 3), Ok(&items[9..10]));
    }

    #[test]
    fn rows_past_the_end_are_an_error() {
        let items = [1, 2, 3, 4];
        assert_eq!(
            row_items(&items, cols(3), 2),
            Err(RowOutOfRange {
                row: 2,
                row_count: 2
            })
        );
        let empty: [u8; 0] = [];
        assert_eq!(
            row_items(&empty, cols(3), 0),
            Err(RowOutOfRange {
                row: 0,
                row_count: 0
            })
        );
    }

    #[test]
    fn item_to_row_and_column_mapping() {
        let partition = RowPartition::new(10, cols(4));
        assert_eq!(partition.row_count(), 3);
        assert_eq!(partition.row_of_item(0), 0);
        assert_eq!(partition.row_of_item(3), 0);
        assert_eq!(partition.row_of_item(4), 1);
        assert_eq!(partition.column_of_item(4), 0);
        assert_eq!(partition.column_of_item(7), 3);
        assert_eq!(partition.row_range(2), Ok(8..10));
    }
}
