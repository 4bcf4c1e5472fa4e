// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll anchoring for bottom-anchored (reversed) lists.
//!
//! A reversed list starts life scrolled to its bottom edge and must stay
//! visually pinned there as rows are inserted. [`ReversedScrollAnchor`] is a
//! small state machine that:
//!
//! - asks the host to scroll to the bottom on mount,
//! - waits until the host reports that offset before opening the notification
//!   gate,
//! - turns structural total-height changes into corrective scroll deltas,
//! - and schedules the single retry of a scroll-to-index request.
//!
//! The anchor only produces [`ScrollRequest`]s. Hosts drain them with
//! [`ReversedScrollAnchor::take_request`] and apply them to their scroll
//! surface. Only one request is held at a time: a newer request supersedes
//! the pending one.

use crate::{ListConfig, Scalar};

/// Lifecycle of the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorPhase {
    /// Mounted, no scroll issued yet.
    Uninitialized,
    /// A scroll-to-bottom request is in flight.
    Anchoring,
    /// The host confirmed the anchoring scroll; notifications may flow.
    Steady,
}

/// Why the total content height changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentChange {
    /// Rows were inserted or removed.
    Structural,
    /// Measured heights refined existing rows.
    Measurement,
}

/// An imperative scroll the host surface must honor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollRequest<S: Scalar> {
    /// Scroll so the top of the viewport sits at this offset.
    To(S),
    /// Scroll to the bottom of the content.
    ToBottom,
    /// Adjust the current offset by this delta.
    By(S),
}

impl<S: Scalar> ScrollRequest<S> {
    /// Combines a newer request with the one it replaces.
    ///
    /// Absolute requests win outright. A delta is relative to the last offset
    /// the host applied, so it is folded into a pending request that has not
    /// been applied yet.
    #[must_use]
    pub fn supersede(pending: Option<Self>, next: Self) -> Self {
        match (pending, next) {
            (Some(Self::By(a)), Self::By(b)) => Self::By(a + b),
            (Some(Self::To(offset)), Self::By(delta)) => Self::To(offset + delta),
            (Some(Self::ToBottom), Self::By(_)) => Self::ToBottom,
            (_, next) => next,
        }
    }

    /// Resolves the request against the host's current state.
    ///
    /// `max_scroll_top` is the largest offset the surface can reach. The
    /// result is clamped to `[0, max_scroll_top]`.
    #[must_use]
    pub fn resolve(self, current_scroll_top: S, max_scroll_top: S) -> S {
        let zero = S::zero();
        let max = max_scroll_top.max(zero);
        match self {
            Self::To(offset) => offset.clamp_to(zero, max),
            Self::ToBottom => max,
            Self::By(delta) => (current_scroll_top + delta).clamp_to(zero, max),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingRetry {
    initial_index: usize,
    due_at_ms: u64,
}

/// Keeps a bottom-anchored list visually stable and gates notifications.
///
/// For top-anchored lists the anchor starts out [`AnchorPhase::Steady`] and
/// never issues corrective deltas; it is still used to hold scroll requests
/// and scroll-to-index retries.
#[derive(Debug, Clone)]
pub struct ReversedScrollAnchor<S: Scalar> {
    reversed: bool,
    phase: AnchorPhase,
    tolerance: S,
    retry_delay_ms: u64,
    pending: Option<ScrollRequest<S>>,
    retry: Option<PendingRetry>,
}

impl<S: Scalar> ReversedScrollAnchor<S> {
    /// Creates an anchor configured from `config`.
    #[must_use]
    pub fn new(config: &ListConfig<S>) -> Self {
        Self {
            reversed: config.reversed,
            phase: initial_phase(config.reversed),
            tolerance: config.anchor_tolerance,
            retry_delay_ms: config.scroll_retry_delay_ms,
            pending: None,
            retry: None,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> AnchorPhase {
        self.phase
    }

    /// Returns `true` once initial anchoring has settled.
    ///
    /// Scroll and load-more notifications are suppressed until then.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.phase == AnchorPhase::Steady
    }

    /// Returns to the freshly-mounted state, dropping pending requests.
    pub fn reset(&mut self) {
        self.phase = initial_phase(self.reversed);
        self.pending = None;
        self.retry = None;
    }

    /// Issues the initial scroll-to-bottom request if none was issued yet.
    pub fn mount(&mut self) {
        if self.phase == AnchorPhase::Uninitialized {
            self.request(ScrollRequest::ToBottom);
            self.set_phase(AnchorPhase::Anchoring);
        }
    }

    /// Records a scroll offset reported by the host.
    ///
    /// While anchoring, an offset within tolerance of the bottom settles the
    /// anchor. Returns `true` if this call settled it.
    pub fn on_host_scroll(&mut self, scroll_top: S, max_scroll_top: S) -> bool {
        if self.phase != AnchorPhase::Anchoring || self.pending.is_some() {
            return false;
        }
        let bottom = max_scroll_top.max(S::zero());
        if scroll_top.distance(bottom) > self.tolerance {
            return false;
        }
        self.set_phase(AnchorPhase::Steady);
        true
    }

    /// Settles the anchor if the pending request would leave a host at
    /// `scroll_top` where it is.
    ///
    /// Hosts do not report a scroll that did not move the surface, which is
    /// what `ToBottom` amounts to when the content fits the viewport. Returns
    /// `true` if this call settled the anchor.
    pub fn settle_in_place(&mut self, scroll_top: S, max_scroll_top: S) -> bool {
        if self.phase != AnchorPhase::Anchoring {
            return false;
        }
        let Some(request) = self.pending else {
            return false;
        };
        if request
            .resolve(scroll_top, max_scroll_top)
            .distance(scroll_top)
            > self.tolerance
        {
            return false;
        }
        self.set_phase(AnchorPhase::Steady);
        true
    }

    /// Reacts to a change of the total content height.
    ///
    /// In the steady phase, structural changes of a reversed list request a
    /// corrective delta equal to the height delta so the bottom edge stays put.
    /// While anchoring, any change re-issues the scroll to the bottom, since
    /// the previous target is stale.
    pub fn on_total_height_changed(&mut self, previous: S, current: S, change: ContentChange) {
        if !self.reversed || previous == current {
            return;
        }
        match (self.phase, change) {
            (AnchorPhase::Steady, ContentChange::Structural) => {
                self.request(ScrollRequest::By(current - previous));
            }
            (AnchorPhase::Anchoring, _) => self.request(ScrollRequest::ToBottom),
            _ => {}
        }
    }

    /// Stores `request`, superseding any request the host has not taken yet.
    pub fn request(&mut self, request: ScrollRequest<S>) {
        let next = ScrollRequest::supersede(self.pending.take(), request);
        #[cfg(feature = "tracing")]
        tracing::debug!(?next, "scroll request");
        self.pending = Some(next);
    }

    /// Requests a scroll to `offset` for the row with `initial_index` and
    /// schedules one retry `retry_delay_ms` after `now_ms`.
    ///
    /// A newer scroll-to-index request replaces the scheduled retry.
    pub fn request_index(&mut self, offset: S, initial_index: usize, now_ms: u64) {
        self.request(ScrollRequest::To(offset));
        self.retry = Some(PendingRetry {
            initial_index,
            due_at_ms: now_ms.saturating_add(self.retry_delay_ms),
        });
    }

    /// Returns the row to re-target if its retry is due at `now_ms`.
    ///
    /// Each scheduled retry fires at most once.
    pub fn take_due_retry(&mut self, now_ms: u64) -> Option<usize> {
        let retry = self.retry?;
        if now_ms < retry.due_at_ms {
            return None;
        }
        self.retry = None;
        #[cfg(feature = "tracing")]
        tracing::debug!(initial_index = retry.initial_index, "retrying scroll to index");
        Some(retry.initial_index)
    }

    /// The request waiting for the host, if any.
    #[must_use]
    pub fn pending_request(&self) -> Option<ScrollRequest<S>> {
        self.pending
    }

    /// Hands the pending request to the host.
    pub fn take_request(&mut self) -> Option<ScrollRequest<S>> {
        self.pending.take()
    }

    fn set_phase(&mut self, phase: AnchorPhase) {
        #[cfg(feature = "tracing")]
        tracing::debug!(from = ?self.phase, to = ?phase, "anchor phase");
        self.phase = phase;
    }
}

fn initial_phase(reversed: bool) -> AnchorPhase {
    if reversed {
        AnchorPhase::Uninitialized
    } else {
        AnchorPhase::Steady
    }
}
