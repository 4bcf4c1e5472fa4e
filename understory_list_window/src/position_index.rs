// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cumulative position index: prefix sums over a [`HeightCache`].

use alloc::vec::Vec;

use crate::{HeightCache, Scalar};

/// A contiguous range of rows together with the pixel span it covers.
///
/// `from` and `to` are both inclusive augmented row indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexRange<S: Scalar> {
    /// First row of the range.
    pub from: usize,
    /// Last row of the range (inclusive).
    pub to: usize,
    /// Offset of the top edge of `from`.
    pub from_position: S,
    /// Offset of the bottom edge of `to`.
    pub to_position: S,
}

impl<S: Scalar> IndexRange<S> {
    /// Number of rows covered by the range.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.to + 1 - self.from
    }

    /// Always `false`; an `IndexRange` covers at least one row.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns `true` if `index` lies within the range.
    #[must_use]
    pub const fn contains(&self, index: usize) -> bool {
        self.from <= index && index <= self.to
    }
}

/// Read-only prefix sums derived from a [`HeightCache`].
///
/// Entry `i` holds the cumulative *upper bound* of row `i`, that is the sum of
/// heights `0..=i`. The index is never patched in place: build a new one from
/// the full cache whenever the cache changes, so offsets are always consistent
/// with a single cache generation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CumulativePositionIndex<S: Scalar> {
    upper_bounds: Vec<S>,
}

impl<S: Scalar> CumulativePositionIndex<S> {
    /// Creates an index over zero rows.
    #[must_use]
    pub fn new() -> Self {
        Self {
            upper_bounds: Vec::new(),
        }
    }

    /// Builds the prefix sums for every row in `cache`.
    #[must_use]
    pub fn build(cache: &HeightCache<S>) -> Self {
        let mut upper_bounds = Vec::with_capacity(cache.len());
        let mut sum = S::zero();
        for height in cache.as_slice() {
            sum = sum + *height;
            upper_bounds.push(sum);
        }
        debug_assert!(
            upper_bounds.windows(2).all(|w| w[0] <= w[1]),
            "cumulative positions must be non-decreasing"
        );
        Self { upper_bounds }
    }

    /// Number of rows covered by the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.upper_bounds.len()
    }

    /// Returns `true` if the index covers no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.upper_bounds.is_empty()
    }

    /// Total height of all rows.
    #[must_use]
    pub fn total_height(&self) -> S {
        self.upper_bounds.last().copied().unwrap_or_else(S::zero)
    }

    /// Cumulative upper bound of row `index` (its bottom edge), if it exists.
    #[must_use]
    pub fn upper_bound(&self, index: usize) -> Option<S> {
        self.upper_bounds.get(index).copied()
    }

    /// All cumulative upper bounds, one per row.
    #[must_use]
    pub fn upper_bounds(&self) -> &[S] {
        &self.upper_bounds
    }

    /// Offset of the top edge of row `index`.
    ///
    /// Returns zero for `index == 0` and for indices past the end of the index.
    #[must_use]
    pub fn from_position(&self, index: usize) -> S {
        if index == 0 {
            return S::zero();
        }
        self.upper_bounds
            .get(index - 1)
            .copied()
            .unwrap_or_else(S::zero)
    }

    /// Height of row `index` as seen by this index generation.
    #[must_use]
    pub fn height_of(&self, index: usize) -> Option<S> {
        let upper = self.upper_bound(index)?;
        Some(upper - self.from_position(index))
    }

    /// First row whose upper bound is at or past `position`.
    ///
    /// Positions past the end resolve to the last row. Returns `None` when the
    /// index is empty.
    #[must_use]
    pub fn row_at_position(&self, position: S) -> Option<usize> {
        let last = self.upper_bounds.len().checked_sub(1)?;
        let found = self.upper_bounds.partition_point(|upper| *upper < position);
        Some(found.min(last))
    }

    /// Finds the rows covering the pixel span `[from_position, to_position]`.
    ///
    /// `from` is the first row whose upper bound reaches `from_position`, and
    /// `to` the first row whose upper bound reaches `to_position`. The returned
    /// `from_position` is the top edge of `from`; `to_position` is the upper
    /// bound of `to`, which is the total height when `to_position` lies past
    /// the end of the content.
    #[must_use]
    pub fn find_visible_index(&self, from_position: S, to_position: S) -> Option<IndexRange<S>> {
        let from = self.row_at_position(from_position)?;
        let to = self.row_at_position(to_position)?.max(from);
        Some(self.range(from, to))
    }

    /// Builds an [`IndexRange`] for rows `from..=to`, clamped to the index.
    ///
    /// On an empty index this degenerates to row zero with zero offsets.
    #[must_use]
    pub fn range(&self, from: usize, to: usize) -> IndexRange<S> {
        let last = self.upper_bounds.len().saturating_sub(1);
        let to = to.min(last);
        let from = from.min(to);
        IndexRange {
            from,
            to,
            from_position: self.from_position(from),
            to_position: self.upper_bound(to).unwrap_or_else(S::zero),
        }
    }
}
