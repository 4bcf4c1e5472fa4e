// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Notifications surfaced to the host once per frame.

use bitflags::bitflags;

use crate::{IndexRange, Scalar, ScrollDirection};

bitflags! {
    /// Notifications raised by a single [`VirtualList::frame`](crate::VirtualList::frame) call.
    ///
    /// Each flag is raised at most once per frame. For reversed lists,
    /// [`ListEvents::SCROLL`] and [`ListEvents::LOAD_MORE`] stay clear until the
    /// initial anchoring scroll has settled.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ListEvents: u8 {
        /// The host reported a new scroll offset.
        const SCROLL = 1 << 0;
        /// The overscan range reached the last row; the host may append more.
        const LOAD_MORE = 1 << 1;
        /// The computed window differs from the previous frame's.
        const WINDOW_CHANGED = 1 << 2;
    }
}

/// Payload shared by the scroll and load-more notifications.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent<S: Scalar> {
    /// Scroll offset the window was computed for.
    pub scroll_top: S,
    /// Direction of the movement.
    pub direction: ScrollDirection,
    /// Rows intersecting the viewport.
    pub visible_index: Option<IndexRange<S>>,
    /// Rows to realize, overscan included.
    pub overscan_index: Option<IndexRange<S>>,
}

#[cfg(test)]
mod tests {
    use super::ListEvents;

    #[test]
    fn flags_compose() {
        let events = ListEvents::SCROLL | ListEvents::LOAD_MORE;
        assert!(events.contains(ListEvents::SCROLL));
        assert!(!events.contains(ListEvents::WINDOW_CHANGED));
        assert!(ListEvents::default().is_empty());
    }
}
