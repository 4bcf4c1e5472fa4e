// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visible and overscan window computation.

use crate::{CumulativePositionIndex, IndexRange, Scalar};

/// Direction of the last scroll movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollDirection {
    /// The scroll offset decreased.
    Up,
    /// The scroll offset increased or stayed the same.
    #[default]
    Down,
}

/// A pixel span in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span<S: Scalar> {
    /// Start of the span.
    pub from: S,
    /// End of the span.
    pub to: S,
}

/// Host-driven viewport state, replaced wholesale on every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState<S: Scalar> {
    /// Scroll offset reported by the host, measured from the top of the surface.
    pub scroll_top: S,
    /// Height of the viewport.
    pub height: S,
    /// Rows realized beyond each edge of the visible range.
    pub overscan_count: usize,
    /// Whether content is anchored to the bottom edge.
    pub reversed: bool,
}

/// The rows a host should realize for the current viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window<S: Scalar> {
    /// Rows intersecting the viewport, or `None` for an empty list.
    pub visible_index: Option<IndexRange<S>>,
    /// Visible rows expanded by the overscan count, or `None` for an empty list.
    pub overscan_index: Option<IndexRange<S>>,
    /// The viewport span in content coordinates.
    ///
    /// For reversed lists content coordinates are measured from the bottom
    /// edge, so `from` is the distance between the viewport's bottom and the
    /// bottom of the content.
    pub positions: Span<S>,
    /// Direction of the scroll movement that produced this window.
    pub direction: ScrollDirection,
}

impl<S: Scalar> Window<S> {
    /// A window over zero rows.
    #[must_use]
    pub fn empty(direction: ScrollDirection) -> Self {
        Self {
            visible_index: None,
            overscan_index: None,
            positions: Span {
                from: S::zero(),
                to: S::zero(),
            },
            direction,
        }
    }

    /// Returns `true` if the window covers no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overscan_index.is_none()
    }

    /// Returns `true` if the overscan range touches the last of `row_count` rows.
    #[must_use]
    pub fn reaches_end(&self, row_count: usize) -> bool {
        match (self.overscan_index, row_count.checked_sub(1)) {
            (Some(range), Some(last)) => range.to >= last,
            _ => false,
        }
    }
}

/// Expands the visible range for `[from_position, to_position]` by
/// `overscan_count` rows on each side.
///
/// The expanded bounds are clamped to `0..=len - 1`, and their positions are
/// recomputed from `index`. Returns `None` for an empty index.
#[must_use]
pub fn find_overscan_index<S: Scalar>(
    index: &CumulativePositionIndex<S>,
    from_position: S,
    to_position: S,
    overscan_count: usize,
) -> Option<IndexRange<S>> {
    let visible = index.find_visible_index(from_position, to_position)?;
    Some(index.range(
        visible.from.saturating_sub(overscan_count),
        visible.to.saturating_add(overscan_count),
    ))
}

/// Maps a viewport onto content coordinates.
///
/// Top-anchored lists use `[scroll_top, scroll_top + height]`. Bottom-anchored
/// lists measure from the bottom of the content, so the span starts at
/// `total_height - (scroll_top + height)`. Both ends are clamped to
/// `[0, total_height]`.
#[must_use]
pub fn viewport_span<S: Scalar>(viewport: &ViewportState<S>, total_height: S) -> Span<S> {
    let zero = S::zero();
    let from = if viewport.reversed {
        total_height - (viewport.scroll_top + viewport.height)
    } else {
        viewport.scroll_top
    };
    let from = from.clamp_to(zero, total_height);
    let to = (from + viewport.height).clamp_to(zero, total_height);
    Span { from, to }
}

/// Computes windows and tracks scroll direction between ticks.
///
/// The only state carried across calls is the previous scroll offset; the
/// window itself is derived purely from the viewport and the position index.
#[derive(Debug, Clone)]
pub struct WindowCalculator<S: Scalar> {
    last_scroll_top: Option<S>,
    fallback_viewport_height: S,
}

impl<S: Scalar> WindowCalculator<S> {
    /// Creates a calculator that substitutes `fallback_viewport_height` for
    /// unusable viewport heights.
    #[must_use]
    pub fn new(fallback_viewport_height: S) -> Self {
        Self {
            last_scroll_top: None,
            fallback_viewport_height,
        }
    }

    /// Forgets the previous scroll offset, as on a fresh mount.
    pub fn reset(&mut self) {
        self.last_scroll_top = None;
    }

    /// Scroll offset seen by the previous [`WindowCalculator::compute_window`] call.
    #[must_use]
    pub fn last_scroll_top(&self) -> Option<S> {
        self.last_scroll_top
    }

    /// Computes the window for `viewport` over `index`.
    ///
    /// The viewport is sanitized before any arithmetic: a zero or non-finite
    /// height is replaced by the fallback height, and a non-finite scroll
    /// offset by the previous one.
    pub fn compute_window(
        &mut self,
        viewport: ViewportState<S>,
        index: &CumulativePositionIndex<S>,
    ) -> Window<S> {
        let viewport = self.sanitize(viewport);
        let direction = match self.last_scroll_top {
            Some(last) if viewport.scroll_top < last => ScrollDirection::Up,
            _ => ScrollDirection::Down,
        };
        self.last_scroll_top = Some(viewport.scroll_top);

        if index.is_empty() {
            return Window::empty(direction);
        }

        let positions = viewport_span(&viewport, index.total_height());
        let visible_index = index.find_visible_index(positions.from, positions.to);
        let overscan_index =
            find_overscan_index(index, positions.from, positions.to, viewport.overscan_count);

        Window {
            visible_index,
            overscan_index,
            positions,
            direction,
        }
    }

    fn sanitize(&self, mut viewport: ViewportState<S>) -> ViewportState<S> {
        if !(viewport.height.is_finite() && viewport.height > S::zero()) {
            viewport.height = self.fallback_viewport_height;
        }
        if !viewport.scroll_top.is_finite() {
            viewport.scroll_top = self.last_scroll_top.unwrap_or_else(S::zero);
        }
        viewport.scroll_top = viewport.scroll_top.max(S::zero());
        viewport
    }
}
