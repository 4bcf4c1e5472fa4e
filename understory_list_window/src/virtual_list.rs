// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The orchestrator that owns every component and runs the frame loop.

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::{
    AnchorPhase, ContentChange, CumulativePositionIndex, GroupHeight, GroupLayout, GroupedRows,
    HeightCache, ListConfig, ListEntry, ListEvents, NearestGroups, ReversedScrollAnchor, Scalar,
    ScrollDirection, ScrollEvent, ScrollRequest, ViewportState, Window, WindowCalculator,
};

/// Edge of the content that placement offsets are measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Offsets grow downwards from the top of the content.
    Top,
    /// Offsets grow upwards from the bottom of the content (reversed lists).
    Bottom,
}

/// Where the host should place one realized row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowPlacement<S: Scalar> {
    /// Augmented index of the row.
    pub index: usize,
    /// Distance between `edge` and the row's near side.
    pub offset: S,
    /// Height currently assumed for the row.
    pub height: S,
    /// Edge `offset` is measured from.
    pub edge: Edge,
    /// Whether the entry is a synthetic group header.
    pub is_group_header: bool,
    /// Whether the header is pinned to the viewport (sticky).
    pub pinned: bool,
}

/// Output of one [`VirtualList::frame`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame<S: Scalar> {
    /// The window for the current viewport.
    pub window: Window<S>,
    /// Notifications raised during this frame.
    pub events: ListEvents,
    /// Payload for [`ListEvents::SCROLL`] and [`ListEvents::LOAD_MORE`].
    pub notification: Option<ScrollEvent<S>>,
    /// Scroll the host must apply before the next frame.
    pub scroll_request: Option<ScrollRequest<S>>,
}

/// Virtualized row list: the single owner of the windowing components.
///
/// Hosts feed raw events into the list as they arrive:
///
/// - [`VirtualList::set_rows`] / [`VirtualList::set_grouped_rows`] when the
///   row collection changes,
/// - [`VirtualList::on_row_measured`] as rows report their real height,
/// - [`VirtualList::on_scroll_offset_changed`] and
///   [`VirtualList::on_viewport_size_changed`] from the scroll surface,
///
/// and call [`VirtualList::frame`] once per paint tick. Events arriving
/// between two frames are coalesced: only the latest scroll offset is used,
/// and all measurements are merged as one batch followed by a single index
/// rebuild.
#[derive(Debug)]
pub struct VirtualList<T, K = (), S: Scalar = f64> {
    config: ListConfig<S>,
    rows: GroupedRows<T, K>,
    heights: HeightCache<S>,
    index: CumulativePositionIndex<S>,
    groups: GroupLayout<S>,
    calculator: WindowCalculator<S>,
    anchor: ReversedScrollAnchor<S>,

    pending_measurements: HashMap<usize, S>,
    pending_scroll_top: Option<S>,
    scroll_top: S,
    viewport_height: S,

    dirty: bool,
    last_window: Window<S>,
}

impl<T, K, S: Scalar> VirtualList<T, K, S> {
    /// Creates an empty list.
    #[must_use]
    pub fn new(config: ListConfig<S>) -> Self {
        Self {
            calculator: WindowCalculator::new(config.fallback_viewport_height),
            anchor: ReversedScrollAnchor::new(&config),
            viewport_height: config.fallback_viewport_height,
            config,
            rows: GroupedRows::default(),
            heights: HeightCache::new(),
            index: CumulativePositionIndex::new(),
            groups: GroupLayout::default(),
            pending_measurements: HashMap::new(),
            pending_scroll_top: None,
            scroll_top: S::zero(),
            dirty: true,
            last_window: Window::empty(ScrollDirection::Down),
        }
    }

    /// The configuration this list was created with.
    #[must_use]
    pub fn config(&self) -> &ListConfig<S> {
        &self.config
    }

    /// Replaces the row collection without grouping.
    pub fn set_rows<I: IntoIterator<Item = T>>(&mut self, rows: I) {
        self.set_grouped(GroupedRows::ungrouped(rows));
    }

    /// Replaces the row collection, inserting group headers where
    /// `group_key_of` changes.
    ///
    /// See [`GroupedRows::aggregate`].
    pub fn set_grouped_rows<I, F>(&mut self, rows: I, group_key_of: F)
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&T, usize, Option<&T>) -> Option<K>,
        K: Clone + PartialEq,
    {
        self.set_grouped(GroupedRows::aggregate(rows, group_key_of));
    }

    /// Replaces the augmented sequence.
    ///
    /// Known heights are kept by position; new rows start at the default row
    /// height. For reversed lists the total-height delta is turned into a
    /// corrective scroll.
    pub fn set_grouped(&mut self, rows: GroupedRows<T, K>) {
        let previous_total = self.index.total_height();
        self.rows = rows;
        self.heights
            .resize(self.rows.len(), self.config.default_row_height);
        self.rebuild();
        #[cfg(feature = "tracing")]
        tracing::debug!(
            rows = self.rows.row_count(),
            headers = self.rows.group_indices().len(),
            total_height = ?self.index.total_height(),
            "rows changed"
        );
        self.anchor.on_total_height_changed(
            previous_total,
            self.index.total_height(),
            ContentChange::Structural,
        );
    }

    /// The augmented sequence.
    #[must_use]
    pub fn rows(&self) -> &GroupedRows<T, K> {
        &self.rows
    }

    /// All entries of the augmented sequence, headers included.
    #[must_use]
    pub fn entries(&self) -> &[ListEntry<T, K>] {
        self.rows.entries()
    }

    /// Entry at augmented position `index`.
    #[must_use]
    pub fn row_at(&self, index: usize) -> Option<&ListEntry<T, K>> {
        self.rows.get(index)
    }

    /// Length of the augmented sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Current height cache.
    #[must_use]
    pub fn heights(&self) -> &HeightCache<S> {
        &self.heights
    }

    /// Current position index.
    #[must_use]
    pub fn position_index(&self) -> &CumulativePositionIndex<S> {
        &self.index
    }

    /// Total content height; hosts size their scroll surface with it.
    #[must_use]
    pub fn total_height(&self) -> S {
        self.index.total_height()
    }

    /// Scroll offset last applied in a frame.
    #[must_use]
    pub const fn scroll_top(&self) -> S {
        self.scroll_top
    }

    /// Current (sanitized) viewport height.
    #[must_use]
    pub const fn viewport_height(&self) -> S {
        self.viewport_height
    }

    /// Largest scroll offset the host surface can reach.
    #[must_use]
    pub fn max_scroll_top(&self) -> S {
        (self.index.total_height() - self.viewport_height).max(S::zero())
    }

    /// Phase of the scroll anchor.
    #[must_use]
    pub fn anchor_phase(&self) -> AnchorPhase {
        self.anchor.phase()
    }

    /// The viewport as seen by the window calculator.
    #[must_use]
    pub fn viewport_state(&self) -> ViewportState<S> {
        ViewportState {
            scroll_top: self.scroll_top,
            height: self.viewport_height,
            overscan_count: self.config.overscan_count,
            reversed: self.config.reversed,
        }
    }

    /// Records the measured height of the row at augmented `index`.
    ///
    /// The measurement is buffered until the next frame. Non-finite or
    /// non-positive heights, and heights equal to the cached one, are dropped.
    pub fn on_row_measured(&mut self, index: usize, height: S) {
        if !(height.is_finite() && height > S::zero()) {
            return;
        }
        match self.heights.get(index) {
            None => {}
            Some(cached) if cached == height => {
                self.pending_measurements.remove(&index);
            }
            Some(_) => {
                self.pending_measurements.insert(index, height);
            }
        }
    }

    /// Records a scroll offset reported by the host surface.
    ///
    /// Only the latest offset before a frame is used. Non-finite offsets are
    /// ignored; negative ones clamp to zero.
    pub fn on_scroll_offset_changed(&mut self, scroll_top: S) {
        if scroll_top.is_finite() {
            self.pending_scroll_top = Some(scroll_top.max(S::zero()));
        }
    }

    /// Records a new viewport height. Unusable values fall back to the
    /// configured default.
    pub fn on_viewport_size_changed(&mut self, height: S) {
        let height = self.config.sanitize_viewport_height(height);
        if height != self.viewport_height {
            self.viewport_height = height;
            self.dirty = true;
        }
    }

    /// Runs one frame at host time `now_ms`.
    ///
    /// Merges buffered measurements, fires a due scroll-to-index retry,
    /// applies the latest scroll offset, recomputes the window if anything
    /// changed, and collects notifications and the pending scroll request.
    pub fn frame(&mut self, now_ms: u64) -> Frame<S> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("list_frame", rows = self.rows.len(), now_ms).entered();

        self.anchor.mount();
        self.flush_measurements();

        if let Some(initial_index) = self.anchor.take_due_retry(now_ms)
            && let Some(offset) = self.offset_for_row(initial_index)
        {
            self.anchor.request(ScrollRequest::To(offset));
        }

        // Settling re-opens the notification gate, so the window is re-checked
        // even when the offset did not move.
        let max_scroll_top = self.max_scroll_top();
        let mut scrolled = false;
        if let Some(scroll_top) = self.pending_scroll_top.take() {
            scrolled = scroll_top != self.scroll_top;
            self.scroll_top = scroll_top;
            let settled = self.anchor.on_host_scroll(scroll_top, max_scroll_top);
            self.dirty |= scrolled || settled;
        }
        if self.anchor.settle_in_place(self.scroll_top, max_scroll_top) {
            self.dirty = true;
        }

        let recomputed = self.dirty;
        let previous = self.last_window;
        let window = self.compute_window();

        let mut events = ListEvents::empty();
        if recomputed && window != previous {
            events |= ListEvents::WINDOW_CHANGED;
        }
        if self.anchor.is_settled() {
            if scrolled {
                events |= ListEvents::SCROLL;
            }
            if recomputed && window.reaches_end(self.rows.len()) {
                events |= ListEvents::LOAD_MORE;
            }
        }
        let notification = events
            .intersects(ListEvents::SCROLL | ListEvents::LOAD_MORE)
            .then(|| ScrollEvent {
                scroll_top: self.scroll_top,
                direction: window.direction,
                visible_index: window.visible_index,
                overscan_index: window.overscan_index,
            });

        Frame {
            window,
            events,
            notification,
            scroll_request: self.anchor.take_request(),
        }
    }

    /// Returns the window for the current viewport, recomputing it only if
    /// rows, heights, or the viewport changed since the last call.
    pub fn compute_window(&mut self) -> Window<S> {
        if self.dirty {
            self.last_window = self
                .calculator
                .compute_window(self.viewport_state(), &self.index);
            self.dirty = false;
            #[cfg(feature = "tracing")]
            tracing::trace!(window = ?self.last_window, "window computed");
        }
        self.last_window
    }

    /// Scrolls the row whose caller index is `initial_index` into view.
    ///
    /// Reversed lists align the row's bottom edge with the bottom of the
    /// viewport; top-anchored lists align its top edge with the top. The
    /// request is retried once after the configured delay so that heights
    /// measured in the meantime are taken into account. Unknown rows are
    /// ignored.
    pub fn scroll_to_index(&mut self, initial_index: usize, now_ms: u64) {
        if let Some(offset) = self.offset_for_row(initial_index) {
            self.anchor.request_index(offset, initial_index, now_ms);
        }
    }

    /// Asks the host to scroll to `offset`. No-op if already there.
    pub fn request_scroll_to(&mut self, offset: S) {
        if !offset.is_finite() {
            return;
        }
        if offset == self.scroll_top && self.anchor.pending_request().is_none() {
            return;
        }
        self.anchor.request(ScrollRequest::To(offset));
    }

    /// Asks the host to scroll to the bottom of the content.
    pub fn request_scroll_to_bottom(&mut self) {
        self.anchor.request(ScrollRequest::ToBottom);
    }

    /// Hands the pending scroll request to the host outside of a frame.
    pub fn take_scroll_request(&mut self) -> Option<ScrollRequest<S>> {
        self.anchor.take_request()
    }

    /// Block height of the header at augmented `header_index`.
    #[must_use]
    pub fn group_height(&self, header_index: usize) -> Option<GroupHeight<S>> {
        self.groups.group_height(header_index)
    }

    /// Headers relevant to the content span `[from_position, to_position]`.
    #[must_use]
    pub fn nearest_group_indices(&self, from_position: S, to_position: S) -> NearestGroups {
        self.groups
            .nearest_group_indices(&self.index, from_position, to_position)
    }

    /// Rows the host should realize for the current window, with positions.
    ///
    /// The header pinned to the viewport edge, if any, comes first with
    /// `pinned` set; it is pushed out by the next header as that one
    /// approaches. Other header rows outside the sticky span are skipped.
    pub fn placements(&mut self) -> Vec<RowPlacement<S>> {
        let window = self.compute_window();
        let Some(range) = window.overscan_index else {
            return Vec::new();
        };
        let nearest = self.nearest_group_indices(window.positions.from, window.positions.to);
        let edge = if self.config.reversed {
            Edge::Bottom
        } else {
            Edge::Top
        };

        let mut placements = Vec::with_capacity(range.len() + 1);
        if let Some(pinned) = nearest.first {
            placements.push(RowPlacement {
                index: pinned,
                offset: self.pinned_offset(pinned, window.positions.from),
                height: self.index.height_of(pinned).unwrap_or_else(S::zero),
                edge,
                is_group_header: true,
                pinned: true,
            });
        }
        for i in range.from..=range.to {
            if Some(i) == nearest.first {
                continue;
            }
            let is_group_header = self.rows.get(i).is_some_and(ListEntry::is_group_header);
            if is_group_header && !nearest.keeps_header(i) {
                continue;
            }
            placements.push(RowPlacement {
                index: i,
                offset: self.index.from_position(i),
                height: self.index.height_of(i).unwrap_or_else(S::zero),
                edge,
                is_group_header,
                pinned: false,
            });
        }
        placements
    }

    /// Forgets scroll direction and anchoring progress, as on a fresh mount.
    pub fn remount(&mut self) {
        self.calculator.reset();
        self.anchor.reset();
        self.dirty = true;
    }

    fn rebuild(&mut self) {
        debug_assert_eq!(
            self.heights.len(),
            self.rows.len(),
            "height cache must cover the augmented sequence"
        );
        self.index = CumulativePositionIndex::build(&self.heights);
        self.groups = GroupLayout::build(self.rows.group_indices(), &self.heights);
        self.dirty = true;
    }

    fn flush_measurements(&mut self) {
        if self.pending_measurements.is_empty() {
            return;
        }
        #[cfg(feature = "tracing")]
        let batch = self.pending_measurements.len();
        let changed = self.heights.merge(self.pending_measurements.drain());
        #[cfg(feature = "tracing")]
        tracing::trace!(batch, changed, "measurements merged");
        if changed {
            let previous_total = self.index.total_height();
            self.rebuild();
            self.anchor.on_total_height_changed(
                previous_total,
                self.index.total_height(),
                ContentChange::Measurement,
            );
        }
    }

    fn offset_for_row(&self, initial_index: usize) -> Option<S> {
        let position = self.rows.position_of(initial_index)?;
        let from = self.index.from_position(position);
        let max = self.max_scroll_top();
        let offset = if self.config.reversed { max - from } else { from };
        Some(offset.clamp_to(S::zero(), max))
    }

    fn pinned_offset(&self, header: usize, viewport_from: S) -> S {
        let natural = self.index.from_position(header);
        let height = self.index.height_of(header).unwrap_or_else(S::zero);
        let mut offset = viewport_from.max(natural);
        let headers = self.groups.group_indices();
        let next = headers.partition_point(|h| *h <= header);
        if let Some(&next) = headers.get(next)
            && next < self.index.len()
        {
            offset = offset.min(self.index.from_position(next) - height);
        }
        offset.max(natural)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{Edge, VirtualList};
    use crate::{AnchorPhase, ListConfig, ListEvents, ScrollDirection, ScrollRequest};

    fn list(count: usize, config: ListConfig<f64>) -> VirtualList<usize> {
        let mut list = VirtualList::new(config);
        list.set_rows(0..count);
        list.on_viewport_size_changed(300.0);
        list
    }

    fn bounds(range: Option<crate::IndexRange<f64>>) -> (usize, usize) {
        let range = range.expect("non-empty window");
        (range.from, range.to)
    }

    /// Drives a reversed list through its initial anchoring scroll.
    fn settle(list: &mut VirtualList<usize>, now_ms: u64) {
        let frame = list.frame(now_ms);
        let request = frame.scroll_request.expect("anchoring scroll");
        list.on_scroll_offset_changed(request.resolve(list.scroll_top(), list.max_scroll_top()));
        let _ = list.frame(now_ms + 16);
    }

    #[test]
    fn top_anchored_window_tracks_scroll() {
        let mut list = list(30, ListConfig::new());
        let frame = list.frame(0);
        assert_eq!(bounds(frame.window.visible_index), (0, 2));
        assert_eq!(bounds(frame.window.overscan_index), (0, 5));
        assert!(frame.events.contains(ListEvents::WINDOW_CHANGED));
        assert_eq!(frame.scroll_request, None);

        list.on_scroll_offset_changed(100.0);
        list.on_scroll_offset_changed(1000.0);
        let frame = list.frame(16);
        // Only the latest offset of the burst is used.
        assert_eq!(bounds(frame.window.visible_index), (9, 12));
        assert!(frame.events.contains(ListEvents::SCROLL));
        let notification = frame.notification.expect("scroll notification");
        assert_eq!(notification.scroll_top, 1000.0);
        assert_eq!(notification.direction, ScrollDirection::Down);
    }

    #[test]
    fn empty_list_is_quiet() {
        let mut list: VirtualList<usize> = VirtualList::new(ListConfig::new());
        let frame = list.frame(0);
        assert!(frame.window.is_empty());
        assert!(!frame.events.contains(ListEvents::LOAD_MORE));
        assert!(list.placements().is_empty());
    }

    #[test]
    fn load_more_fires_when_reaching_the_tail() {
        let mut list = list(10, ListConfig::new());
        let _ = list.frame(0);
        list.on_scroll_offset_changed(700.0);
        let frame = list.frame(16);
        assert!(frame.events.contains(ListEvents::LOAD_MORE));

        // No change, no repeated notification.
        let frame = list.frame(32);
        assert!(frame.events.is_empty());
    }

    #[test]
    fn measurements_are_batched_into_one_rebuild() {
        let mut list = list(10, ListConfig::new());
        let _ = list.frame(0);
        list.on_row_measured(0, 50.0);
        list.on_row_measured(1, 50.0);
        list.on_row_measured(1, 60.0);
        // Not applied before the frame.
        assert_eq!(list.total_height(), 1000.0);

        let frame = list.frame(16);
        assert_eq!(list.total_height(), 910.0);
        assert_eq!(list.heights().get(1), Some(60.0));
        assert!(frame.events.contains(ListEvents::WINDOW_CHANGED));
    }

    #[test]
    fn unchanged_measurements_do_not_notify() {
        let mut list = list(10, ListConfig::new());
        let _ = list.frame(0);
        list.on_row_measured(3, 100.0);
        list.on_row_measured(4, 0.0);
        list.on_row_measured(5, f64::NAN);
        let frame = list.frame(16);
        assert!(frame.events.is_empty());
        assert_eq!(frame.notification, None);
    }

    #[test]
    fn reversed_list_anchors_before_notifying() {
        let mut list = list(30, ListConfig::new().reversed(true));
        let frame = list.frame(0);
        // The first paint shows the tail rows but must not ask for more.
        assert_eq!(bounds(frame.window.overscan_index), (23, 29));
        assert!(!frame.events.contains(ListEvents::LOAD_MORE));
        assert_eq!(frame.notification, None);
        assert_eq!(frame.scroll_request, Some(ScrollRequest::ToBottom));
        assert_eq!(list.anchor_phase(), AnchorPhase::Anchoring);

        list.on_scroll_offset_changed(2700.0);
        let frame = list.frame(16);
        assert_eq!(list.anchor_phase(), AnchorPhase::Steady);
        assert_eq!(bounds(frame.window.visible_index), (0, 2));
        assert!(frame.events.contains(ListEvents::SCROLL));
        assert!(!frame.events.contains(ListEvents::LOAD_MORE));
    }

    #[test]
    fn short_reversed_list_settles_and_asks_for_more() {
        // Two rows fit the viewport, so scrolling to the bottom moves nothing
        // and the host never reports an offset.
        let mut list = list(2, ListConfig::new().reversed(true));
        let frame = list.frame(0);
        assert_eq!(list.anchor_phase(), AnchorPhase::Steady);
        assert_eq!(frame.scroll_request, Some(ScrollRequest::ToBottom));
        assert_eq!(bounds(frame.window.overscan_index), (0, 1));
        assert!(frame.events.contains(ListEvents::LOAD_MORE));
        assert!(frame.notification.is_some());

        // Idle frames do not repeat it.
        for now in 1..20 {
            assert!(list.frame(now * 16).events.is_empty());
        }
    }

    #[test]
    fn short_reversed_list_with_echoed_offset_asks_for_more() {
        let mut list = list(2, ListConfig::new().reversed(true));
        let mut saw_load_more = false;
        for now in 0..20 {
            let frame = list.frame(now * 16);
            saw_load_more |= frame.events.contains(ListEvents::LOAD_MORE);
            if let Some(request) = frame.scroll_request {
                list.on_scroll_offset_changed(
                    request.resolve(list.scroll_top(), list.max_scroll_top()),
                );
            }
        }
        assert_eq!(list.anchor_phase(), AnchorPhase::Steady);
        assert!(saw_load_more);
    }

    #[test]
    fn appending_to_reversed_list_corrects_scroll() {
        let mut list = list(30, ListConfig::new().reversed(true));
        settle(&mut list, 0);
        assert_eq!(list.total_height(), 3000.0);

        list.set_rows(0..31);
        let frame = list.frame(32);
        assert_eq!(frame.scroll_request, Some(ScrollRequest::By(100.0)));
        assert_eq!(list.total_height(), 3100.0);

        // Applying the delta keeps the bottom rows in place.
        let applied = ScrollRequest::By(100.0).resolve(list.scroll_top(), list.max_scroll_top());
        list.on_scroll_offset_changed(applied);
        let frame = list.frame(48);
        assert_eq!(bounds(frame.window.visible_index), (0, 2));
    }

    #[test]
    fn scroll_to_index_retries_once() {
        let mut list = list(30, ListConfig::new().with_scroll_retry_delay_ms(300));
        let _ = list.frame(0);
        list.scroll_to_index(5, 0);
        let frame = list.frame(16);
        assert_eq!(frame.scroll_request, Some(ScrollRequest::To(500.0)));
        list.on_scroll_offset_changed(500.0);

        // A row above the target gets measured before the retry.
        list.on_row_measured(0, 150.0);
        let frame = list.frame(100);
        assert_eq!(frame.scroll_request, None);
        let frame = list.frame(316);
        assert_eq!(frame.scroll_request, Some(ScrollRequest::To(550.0)));
        let frame = list.frame(700);
        assert_eq!(frame.scroll_request, None);
    }

    #[test]
    fn reversed_scroll_to_index_aligns_bottom_edges() {
        let mut list = list(30, ListConfig::new().reversed(true));
        settle(&mut list, 0);
        list.scroll_to_index(10, 100);
        // max scroll 2700, row 10 starts 1000 above the bottom.
        assert_eq!(list.take_scroll_request(), Some(ScrollRequest::To(1700.0)));
    }

    #[test]
    fn unknown_index_is_ignored() {
        let mut list = list(3, ListConfig::new());
        list.scroll_to_index(99, 0);
        assert_eq!(list.take_scroll_request(), None);
    }

    #[test]
    fn request_scroll_to_current_offset_is_a_no_op() {
        let mut list = list(30, ListConfig::new());
        let _ = list.frame(0);
        list.request_scroll_to(0.0);
        assert_eq!(list.take_scroll_request(), None);
        list.request_scroll_to(250.0);
        assert_eq!(list.take_scroll_request(), Some(ScrollRequest::To(250.0)));
        list.request_scroll_to_bottom();
        assert_eq!(list.take_scroll_request(), Some(ScrollRequest::ToBottom));
    }

    #[test]
    fn placements_pin_the_current_header() {
        let mut list: VirtualList<u32, u32> = VirtualList::new(ListConfig::new());
        // Groups of five rows: headers land at 0, 6, 12, ...
        list.set_grouped_rows(0..30_u32, |row, _, _| Some(row / 5));
        list.on_viewport_size_changed(300.0);
        list.on_scroll_offset_changed(250.0);
        let _ = list.frame(0);

        let placements = list.placements();
        let pinned = placements[0];
        assert!(pinned.pinned);
        assert_eq!(pinned.index, 0);
        assert_eq!(pinned.offset, 250.0);
        assert_eq!(pinned.edge, Edge::Top);
        assert_eq!(placements.iter().filter(|p| p.pinned).count(), 1);

        let headers: Vec<_> = placements
            .iter()
            .filter(|p| p.is_group_header)
            .map(|p| p.index)
            .collect();
        assert_eq!(headers, [0, 6]);
    }

    #[test]
    fn pinned_header_is_pushed_by_the_next_one() {
        let mut list: VirtualList<u32, u32> = VirtualList::new(ListConfig::new());
        list.set_grouped_rows(0..30_u32, |row, _, _| Some(row / 5));
        list.on_viewport_size_changed(300.0);
        // Next header (index 6) starts at 600; the pinned one is 100 tall.
        list.on_scroll_offset_changed(550.0);
        let _ = list.frame(0);
        let placements = list.placements();
        assert_eq!(placements[0].index, 0);
        assert_eq!(placements[0].offset, 500.0);
    }

    #[test]
    fn reversed_placements_measure_from_bottom() {
        let mut list = list(30, ListConfig::new().reversed(true));
        let _ = list.frame(0);
        let placements = list.placements();
        assert_eq!(placements.len(), 7);
        assert_eq!(placements[0].index, 23);
        assert_eq!(placements[0].offset, 2300.0);
        assert_eq!(placements[0].edge, Edge::Bottom);
        assert_eq!(placements[6].offset, 2900.0);
    }

    #[test]
    fn zero_viewport_height_uses_fallback() {
        let mut list = list(30, ListConfig::new());
        list.on_viewport_size_changed(0.0);
        assert_eq!(list.viewport_height(), 300.0);
        let frame = list.frame(0);
        assert_eq!(bounds(frame.window.visible_index), (0, 2));
    }

    #[test]
    fn non_finite_default_row_height_is_tolerated() {
        let mut config = ListConfig::new();
        config.default_row_height = f64::NAN;
        let mut list: VirtualList<usize> = VirtualList::new(config);
        list.set_rows(0..3);
        assert_eq!(list.total_height(), 0.0);
        list.on_row_measured(1, 40.0);
        let _ = list.frame(0);
        assert_eq!(list.total_height(), 40.0);
    }

    #[test]
    fn heights_survive_appends_by_position() {
        let mut list = list(3, ListConfig::new());
        list.on_row_measured(1, 40.0);
        let _ = list.frame(0);
        list.set_rows(0..5);
        assert_eq!(list.heights().as_slice(), &[100.0, 40.0, 100.0, 100.0, 100.0]);
        assert_eq!(list.total_height(), 440.0);
    }
}
