// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-row height storage with a default fallback.

use alloc::vec::Vec;

use crate::Scalar;

/// Heights of every row in the augmented sequence.
///
/// Each slot holds either the last measured height of that row or the default
/// row height. The cache is a pure data holder: it never rebuilds derived
/// state itself. Callers rebuild a [`CumulativePositionIndex`] when
/// [`HeightCache::merge`] reports a change or after [`HeightCache::resize`].
///
/// [`CumulativePositionIndex`]: crate::CumulativePositionIndex
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeightCache<S: Scalar> {
    heights: Vec<S>,
}

impl<S: Scalar> HeightCache<S> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
        }
    }

    /// Creates a cache from explicit heights.
    ///
    /// Negative and non-finite heights are stored as zero.
    #[must_use]
    pub fn from_heights<I: IntoIterator<Item = S>>(heights: I) -> Self {
        Self {
            heights: heights.into_iter().map(sanitize_height).collect(),
        }
    }

    /// Number of rows covered by the cache.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Returns `true` if the cache covers no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Height of row `index`, if it exists.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<S> {
        self.heights.get(index).copied()
    }

    /// All heights, in augmented-row order.
    #[must_use]
    pub fn as_slice(&self) -> &[S] {
        &self.heights
    }

    /// Reallocates the cache to `len` rows.
    ///
    /// Heights for rows `0..min(old_len, len)` are kept by position; new slots
    /// receive `default_height`.
    pub fn resize(&mut self, len: usize, default_height: S) {
        self.heights.resize(len, sanitize_height(default_height));
    }

    /// Overwrites the heights of the given rows.
    ///
    /// Indices outside the cache are ignored. Returns `true` if at least one
    /// stored height actually changed; when it returns `false` the cache is
    /// untouched and no downstream rebuild is needed.
    pub fn merge<I>(&mut self, partial: I) -> bool
    where
        I: IntoIterator<Item = (usize, S)>,
    {
        let mut changed = false;
        for (index, height) in partial {
            let Some(slot) = self.heights.get_mut(index) else {
                continue;
            };
            let height = sanitize_height(height);
            if *slot != height {
                *slot = height;
                changed = true;
            }
        }
        changed
    }

    /// Sum of heights over `range`, clamped to the cache.
    #[must_use]
    pub fn sum_range(&self, range: core::ops::Range<usize>) -> S {
        let end = range.end.min(self.heights.len());
        let start = range.start.min(end);
        self.heights[start..end]
            .iter()
            .fold(S::zero(), |acc, h| acc + *h)
    }
}

fn sanitize_height<S: Scalar>(height: S) -> S {
    if height.is_finite() && !height.is_sign_negative() {
        height
    } else {
        S::zero()
    }
}
