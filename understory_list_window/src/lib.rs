// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_list_window --heading-base-level=0

//! Understory List Window: a windowing engine for long, variable-height lists.
//!
//! Given a list of rows whose heights are only known once they are rendered,
//! this crate decides which rows to realize for the current viewport, where to
//! place them, and how to keep the scroll position stable as heights and
//! contents change. It is renderer-agnostic: hosts own the scroll surface and
//! the row views, and feed raw events into a [`VirtualList`].
//!
//! The building blocks are usable on their own:
//!
//! - [`HeightCache`]: per-row heights, seeded with a default and refined by
//!   measurements merged in batches.
//! - [`CumulativePositionIndex`]: running sums of the cache, answering
//!   position-to-row queries by binary search.
//! - [`GroupedRows`] and [`GroupLayout`]: optional group headers inserted where a
//!   caller-supplied key changes, plus the block heights and nearest-header
//!   queries used for sticky headers.
//! - [`WindowCalculator`]: maps a [`ViewportState`] onto the visible and
//!   overscan row ranges, tracking the [`ScrollDirection`].
//! - [`ReversedScrollAnchor`]: keeps bottom-anchored (chat-style) lists pinned
//!   to their bottom edge and gates notifications until the initial scroll has
//!   settled.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_list_window::{ListConfig, ListEvents, VirtualList};
//!
//! let mut list: VirtualList<u32> = VirtualList::new(ListConfig::new());
//! list.set_rows(0..100);
//! list.on_viewport_size_changed(300.0);
//!
//! // Rows report their real heights as they are laid out.
//! list.on_row_measured(0, 40.0);
//!
//! // Once per paint tick.
//! let frame = list.frame(0);
//! let visible = frame.window.visible_index.unwrap();
//! assert_eq!(visible.from, 0);
//! assert!(frame.events.contains(ListEvents::WINDOW_CHANGED));
//!
//! for placement in list.placements() {
//!     // Position row `placement.index` at `placement.offset`.
//!     assert!(placement.offset >= 0.0);
//! }
//! ```
//!
//! ## Bottom-anchored lists
//!
//! With [`ListConfig::reversed`], content is laid out from the bottom edge. The
//! first frame asks the host to scroll to the bottom; applying every
//! [`ScrollRequest`] a frame returns keeps the newest rows in view while older
//! rows are prepended.
//!
//! ```rust
//! use understory_list_window::{AnchorPhase, ListConfig, ScrollRequest, VirtualList};
//!
//! let mut list: VirtualList<u32> = VirtualList::new(ListConfig::new().reversed(true));
//! list.set_rows(0..30);
//! list.on_viewport_size_changed(300.0);
//!
//! let frame = list.frame(0);
//! assert_eq!(frame.scroll_request, Some(ScrollRequest::ToBottom));
//!
//! list.on_scroll_offset_changed(list.max_scroll_top());
//! let _ = list.frame(16);
//! assert_eq!(list.anchor_phase(), AnchorPhase::Steady);
//! ```
//!
//! Logging goes through [`tracing`](https://docs.rs/tracing) when the
//! `tracing` feature is enabled.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod anchor;
mod config;
mod events;
mod group;
mod height_cache;
mod position_index;
mod scalar;
mod virtual_list;
mod window;

pub use anchor::{AnchorPhase, ContentChange, ReversedScrollAnchor, ScrollRequest};
pub use config::{DEFAULT_OVERSCAN_COUNT, DEFAULT_SCROLL_RETRY_DELAY_MS, ListConfig};
pub use events::{ListEvents, ScrollEvent};
pub use group::{
    GroupHeaderRow, GroupHeight, GroupLayout, GroupedRows, ListEntry, NearestGroups, Row,
};
pub use height_cache::HeightCache;
pub use position_index::{CumulativePositionIndex, IndexRange};
pub use scalar::Scalar;
pub use virtual_list::{Edge, Frame, RowPlacement, VirtualList};
pub use window::{
    ScrollDirection, Span, ViewportState, Window, WindowCalculator, find_overscan_index,
    viewport_span,
};
