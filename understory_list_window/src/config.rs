// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tunables for a [`VirtualList`](crate::VirtualList).

use crate::Scalar;

/// Default number of rows realized beyond each edge of the viewport.
pub const DEFAULT_OVERSCAN_COUNT: usize = 3;

/// Default delay before the single retry of a scroll-to-index request.
pub const DEFAULT_SCROLL_RETRY_DELAY_MS: u64 = 300;

const DEFAULT_ROW_HEIGHT: u16 = 100;
const DEFAULT_VIEWPORT_HEIGHT: u16 = 300;

/// Configuration shared by the components of a [`VirtualList`](crate::VirtualList).
///
/// All fields have sane defaults; use the `with_*` builders to override them.
/// Invalid values (non-finite, negative, or zero where a positive extent is
/// required) are replaced by the defaults rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListConfig<S: Scalar> {
    /// Height assumed for rows that have not been measured yet.
    pub default_row_height: S,
    /// Rows realized beyond each edge of the visible range.
    pub overscan_count: usize,
    /// Viewport height used when the host reports zero or a non-finite value.
    pub fallback_viewport_height: S,
    /// Whether the list is anchored to its bottom edge (chat-style).
    pub reversed: bool,
    /// How close the reported scroll offset must be to the bottom for the
    /// initial anchoring scroll to count as settled.
    pub anchor_tolerance: S,
    /// Delay, in host milliseconds, before a scroll-to-index request is retried once.
    pub scroll_retry_delay_ms: u64,
}

impl<S: Scalar> Default for ListConfig<S> {
    fn default() -> Self {
        Self {
            default_row_height: S::from_u16(DEFAULT_ROW_HEIGHT),
            overscan_count: DEFAULT_OVERSCAN_COUNT,
            fallback_viewport_height: S::from_u16(DEFAULT_VIEWPORT_HEIGHT),
            reversed: false,
            anchor_tolerance: S::from_u16(1),
            scroll_retry_delay_ms: DEFAULT_SCROLL_RETRY_DELAY_MS,
        }
    }
}

impl<S: Scalar> ListConfig<S> {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the height assumed for unmeasured rows.
    #[must_use]
    pub fn with_default_row_height(mut self, height: S) -> Self {
        self.default_row_height = positive_or(height, S::from_u16(DEFAULT_ROW_HEIGHT));
        self
    }

    /// Sets the overscan row count.
    #[must_use]
    pub fn with_overscan_count(mut self, count: usize) -> Self {
        self.overscan_count = count;
        self
    }

    /// Sets the viewport height used when the host reports an unusable one.
    #[must_use]
    pub fn with_fallback_viewport_height(mut self, height: S) -> Self {
        self.fallback_viewport_height =
            positive_or(height, S::from_u16(DEFAULT_VIEWPORT_HEIGHT));
        self
    }

    /// Anchors the list to its bottom edge.
    #[must_use]
    pub fn reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    /// Sets the tolerance used to decide that the initial anchoring scroll has landed.
    #[must_use]
    pub fn with_anchor_tolerance(mut self, tolerance: S) -> Self {
        self.anchor_tolerance = if tolerance.is_finite() && !tolerance.is_sign_negative() {
            tolerance
        } else {
            S::from_u16(1)
        };
        self
    }

    /// Sets the scroll-to-index retry delay in host milliseconds.
    #[must_use]
    pub fn with_scroll_retry_delay_ms(mut self, delay: u64) -> Self {
        self.scroll_retry_delay_ms = delay;
        self
    }

    /// Returns `height` if it is a usable viewport height, else the fallback.
    pub(crate) fn sanitize_viewport_height(&self, height: S) -> S {
        positive_or(height, self.fallback_viewport_height)
    }
}

/// Returns `value` if it is finite and strictly positive, else `fallback`.
pub(crate) fn positive_or<S: Scalar>(value: S, fallback: S) -> S {
    if value.is_finite() && value > S::zero() {
        value
    } else {
        fallback
    }
}
