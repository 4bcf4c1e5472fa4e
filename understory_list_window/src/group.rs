// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Group-header aggregation over a row sequence.
//!
//! [`GroupedRows::aggregate`] walks the caller's rows once, inserting a
//! synthetic [`GroupHeaderRow`] whenever the group key changes, and attaches
//! the row metadata the rest of the engine relies on. [`GroupLayout`] then
//! derives per-header heights from a [`HeightCache`] and answers the
//! sticky-header queries used while scrolling.

use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::{CumulativePositionIndex, HeightCache, Scalar};

/// A caller row plus the metadata assigned during aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<T> {
    /// The caller's value.
    pub value: T,
    /// Position in the augmented sequence.
    pub index: usize,
    /// Position in the caller's sequence. Header rows never shift it.
    pub initial_index: usize,
    /// Augmented position of the previous data row, skipping headers.
    pub previous_index: Option<usize>,
    /// Augmented position of the next data row, skipping headers.
    pub next_index: Option<usize>,
}

/// Synthetic row marking the start of a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupHeaderRow<K> {
    /// Key shared by the rows of the group.
    pub key: K,
    /// Position in the augmented sequence.
    pub index: usize,
}

/// One entry of the augmented sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEntry<T, K> {
    /// A caller row.
    Row(Row<T>),
    /// A synthetic group header.
    GroupHeader(GroupHeaderRow<K>),
}

impl<T, K> ListEntry<T, K> {
    /// Position in the augmented sequence.
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            Self::Row(row) => row.index,
            Self::GroupHeader(header) => header.index,
        }
    }

    /// Returns `true` for synthetic header entries.
    #[must_use]
    pub fn is_group_header(&self) -> bool {
        matches!(self, Self::GroupHeader(_))
    }

    /// Returns the data row, if this entry is one.
    #[must_use]
    pub fn as_row(&self) -> Option<&Row<T>> {
        match self {
            Self::Row(row) => Some(row),
            Self::GroupHeader(_) => None,
        }
    }
}

/// The augmented sequence produced by one aggregation pass.
#[derive(Debug, Clone)]
pub struct GroupedRows<T, K> {
    entries: Vec<ListEntry<T, K>>,
    group_indices: Vec<usize>,
    // `row_positions[initial_index]` is the augmented position of that row.
    row_positions: Vec<usize>,
}

impl<T, K> Default for GroupedRows<T, K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            group_indices: Vec::new(),
            row_positions: Vec::new(),
        }
    }
}

impl<T, K: Clone + PartialEq> GroupedRows<T, K> {
    /// Builds the augmented sequence for `rows`.
    ///
    /// `group_key_of(row, initial_index, previous_row)` returns the row's group
    /// key, or `None` for "no group". A header is inserted before every row
    /// whose key is `Some` and differs from the previous row's key.
    pub fn aggregate<I, F>(rows: I, mut group_key_of: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&T, usize, Option<&T>) -> Option<K>,
    {
        let rows = rows.into_iter();
        let (lower, _) = rows.size_hint();
        let mut entries: Vec<ListEntry<T, K>> = Vec::with_capacity(lower);
        let mut group_indices = Vec::new();
        let mut row_positions = Vec::with_capacity(lower);
        let mut previous_key: Option<K> = None;
        let mut previous_row: Option<usize> = None;

        for (initial_index, value) in rows.enumerate() {
            let key = {
                let previous = previous_row
                    .and_then(|i| entries[i].as_row())
                    .map(|row| &row.value);
                group_key_of(&value, initial_index, previous)
            };

            if let Some(k) = &key
                && previous_key.as_ref() != Some(k)
            {
                let index = entries.len();
                group_indices.push(index);
                entries.push(ListEntry::GroupHeader(GroupHeaderRow {
                    key: k.clone(),
                    index,
                }));
            }

            let index = entries.len();
            if let Some(prev) = previous_row
                && let Some(ListEntry::Row(prev)) = entries.get_mut(prev)
            {
                prev.next_index = Some(index);
            }
            entries.push(ListEntry::Row(Row {
                value,
                index,
                initial_index,
                previous_index: previous_row,
                next_index: None,
            }));
            row_positions.push(index);
            previous_row = Some(index);
            previous_key = key;
        }

        Self {
            entries,
            group_indices,
            row_positions,
        }
    }
}

impl<T, K> GroupedRows<T, K> {
    /// Builds an augmented sequence with no group headers.
    pub fn ungrouped<I: IntoIterator<Item = T>>(rows: I) -> Self {
        let mut entries: Vec<ListEntry<T, K>> = Vec::new();
        let mut row_positions = Vec::new();
        for (index, value) in rows.into_iter().enumerate() {
            if let Some(ListEntry::Row(prev)) = entries.last_mut() {
                prev.next_index = Some(index);
            }
            entries.push(ListEntry::Row(Row {
                value,
                index,
                initial_index: index,
                previous_index: index.checked_sub(1),
                next_index: None,
            }));
            row_positions.push(index);
        }
        Self {
            entries,
            group_indices: Vec::new(),
            row_positions,
        }
    }

    /// All entries, headers included.
    #[must_use]
    pub fn entries(&self) -> &[ListEntry<T, K>] {
        &self.entries
    }

    /// Length of the augmented sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of caller rows, headers excluded.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_positions.len()
    }

    /// Entry at augmented position `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ListEntry<T, K>> {
        self.entries.get(index)
    }

    /// Augmented positions of all header entries, in order.
    #[must_use]
    pub fn group_indices(&self) -> &[usize] {
        &self.group_indices
    }

    /// Augmented position of the caller row with the given `initial_index`.
    #[must_use]
    pub fn position_of(&self, initial_index: usize) -> Option<usize> {
        self.row_positions.get(initial_index).copied()
    }
}

/// Aggregate extent of one group block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupHeight<S: Scalar> {
    /// Sum of the heights in the block.
    pub height: S,
    /// Offset of the top edge of the block.
    pub from: S,
}

/// Headers relevant to the current viewport, used for sticky-header placement.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NearestGroups {
    /// Latest header at or before the start of the window; the pinned header.
    pub first: Option<usize>,
    /// Earliest header at or after the end of the window.
    pub last: Option<usize>,
    /// Headers inside the window, edges included.
    pub visible: SmallVec<[usize; 4]>,
    /// Sorted, de-duplicated union of `first`, `visible`, and `last`.
    pub all: SmallVec<[usize; 4]>,
}

impl NearestGroups {
    /// Returns `true` if a header at augmented `index` should be realized.
    ///
    /// Headers outside the span of [`NearestGroups::all`] are skipped even if
    /// they fall inside the overscan range.
    #[must_use]
    pub fn keeps_header(&self, index: usize) -> bool {
        match (self.all.first(), self.all.last()) {
            (Some(lo), Some(hi)) => *lo <= index && index <= *hi,
            _ => false,
        }
    }
}

/// Header positions together with the heights of their blocks.
///
/// The block of header `h` covers the augmented range `(p, h]`, where `p` is
/// the previous header (or the start of the list for the first header).
#[derive(Debug, Clone, PartialEq)]
pub struct GroupLayout<S: Scalar> {
    group_indices: Vec<usize>,
    heights: Vec<GroupHeight<S>>,
}

impl<S: Scalar> Default for GroupLayout<S> {
    fn default() -> Self {
        Self {
            group_indices: Vec::new(),
            heights: Vec::new(),
        }
    }
}

impl<S: Scalar> GroupLayout<S> {
    /// Computes block heights for `group_indices` from `cache`.
    ///
    /// `group_indices` must be sorted ascending. Headers past the end of the
    /// cache are kept; their blocks are clamped to the cached rows.
    #[must_use]
    pub fn build(group_indices: &[usize], cache: &HeightCache<S>) -> Self {
        debug_assert!(
            group_indices.windows(2).all(|w| w[0] < w[1]),
            "group indices must be strictly ascending"
        );
        let mut heights = Vec::with_capacity(group_indices.len());
        let mut start = 0;
        let mut from = S::zero();
        for &header in group_indices {
            let height = cache.sum_range(start..header.saturating_add(1));
            heights.push(GroupHeight { height, from });
            from = from + height;
            start = header + 1;
        }
        Self {
            group_indices: group_indices.to_vec(),
            heights,
        }
    }

    /// Augmented positions of the headers.
    #[must_use]
    pub fn group_indices(&self) -> &[usize] {
        &self.group_indices
    }

    /// Block height of the header at augmented `header_index`.
    #[must_use]
    pub fn group_height(&self, header_index: usize) -> Option<GroupHeight<S>> {
        let slot = self.group_indices.binary_search(&header_index).ok()?;
        self.heights.get(slot).copied()
    }

    /// Headers relevant to the pixel span `[from_position, to_position]`.
    ///
    /// The span is resolved to rows with
    /// [`CumulativePositionIndex::find_visible_index`] first. An empty index
    /// yields no headers.
    #[must_use]
    pub fn nearest_group_indices(
        &self,
        index: &CumulativePositionIndex<S>,
        from_position: S,
        to_position: S,
    ) -> NearestGroups {
        let Some(range) = index.find_visible_index(from_position, to_position) else {
            return NearestGroups::default();
        };
        let headers = &self.group_indices;

        let at_or_before_from = headers.partition_point(|h| *h <= range.from);
        let first = at_or_before_from.checked_sub(1).map(|i| headers[i]);

        let before_to = headers.partition_point(|h| *h < range.to);
        let last = headers.get(before_to).copied();

        let visible_start = headers.partition_point(|h| *h < range.from);
        let visible_end = headers.partition_point(|h| *h <= range.to);
        let visible: SmallVec<[usize; 4]> = headers[visible_start..visible_end].into();

        let mut all: SmallVec<[usize; 4]> = SmallVec::new();
        all.extend(first);
        all.extend(visible.iter().copied());
        all.extend(last);
        all.sort_unstable();
        all.dedup();

        NearestGroups {
            first,
            last,
            visible,
            all,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use smallvec::SmallVec;

    use super::{GroupHeight, GroupLayout, GroupedRows, ListEntry, NearestGroups};
    use crate::{CumulativePositionIndex, HeightCache};

    const HEIGHTS: [f64; 13] = [
        100.0, 100.0, 100.0, 50.0, //
        100.0, 100.0, 100.0, 50.0, //
        100.0, 100.0, 100.0, 100.0, 50.0,
    ];

    fn sv(items: &[usize]) -> SmallVec<[usize; 4]> {
        items.into()
    }

    #[test]
    fn headers_are_inserted_where_keys_change() {
        let rows = ["a1", "a2", "b1", "c1", "c2"];
        let grouped: GroupedRows<&str, char> =
            GroupedRows::aggregate(rows, |row, _, _| row.chars().next());

        assert_eq!(grouped.group_indices(), &[0, 3, 5]);
        assert_eq!(grouped.len(), 8);
        assert_eq!(grouped.row_count(), 5);
        assert!(matches!(
            grouped.get(3),
            Some(ListEntry::GroupHeader(h)) if h.key == 'b' && h.index == 3
        ));
        assert_eq!(grouped.position_of(2), Some(4));
    }

    #[test]
    fn none_keys_never_spawn_headers() {
        let rows = [1, 2, 3];
        let grouped: GroupedRows<i32, i32> = GroupedRows::aggregate(rows, |_, _, _| None);
        assert!(grouped.group_indices().is_empty());
        assert_eq!(grouped.len(), 3);
    }

    #[test]
    fn neighbours_skip_headers() {
        let rows = ["a1", "b1", "b2"];
        let grouped: GroupedRows<&str, char> =
            GroupedRows::aggregate(rows, |row, _, _| row.chars().next());
        // Layout: [H(a), a1, H(b), b1, b2]
        let data: Vec<_> = grouped.entries().iter().filter_map(ListEntry::as_row).collect();
        assert_eq!(data[0].index, 1);
        assert_eq!(data[0].previous_index, None);
        assert_eq!(data[0].next_index, Some(3));
        assert_eq!(data[1].previous_index, Some(1));
        assert_eq!(data[1].next_index, Some(4));
        assert_eq!(data[2].next_index, None);
    }

    #[test]
    fn previous_row_is_passed_to_key_function() {
        let rows = [1, 2, 10, 11];
        // Start a new group whenever the gap to the previous row exceeds 5.
        let mut group = 0;
        let grouped: GroupedRows<i32, i32> = GroupedRows::aggregate(rows, |row, _, previous| {
            if previous.is_some_and(|p| row - p > 5) {
                group += 1;
            }
            Some(group)
        });
        assert_eq!(grouped.group_indices(), &[0, 3]);
    }

    #[test]
    fn header_at_head_keeps_initial_indices() {
        let plain: GroupedRows<u32, u32> = GroupedRows::ungrouped([7, 8, 9]);
        let grouped: GroupedRows<u32, u32> = GroupedRows::aggregate([7, 8, 9], |_, _, _| Some(0));

        let initial = |g: &GroupedRows<u32, u32>| -> Vec<(u32, usize)> {
            g.entries()
                .iter()
                .filter_map(ListEntry::as_row)
                .map(|r| (r.value, r.initial_index))
                .collect()
        };
        assert_eq!(initial(&plain), initial(&grouped));
        assert_eq!(grouped.position_of(0), Some(1));
    }

    #[test]
    fn group_heights_sum_each_block() {
        let cache = HeightCache::from_heights(HEIGHTS);
        let layout = GroupLayout::build(&[3, 7, 12], &cache);
        assert_eq!(
            layout.group_height(3),
            Some(GroupHeight {
                height: 350.0,
                from: 0.0
            })
        );
        assert_eq!(
            layout.group_height(7),
            Some(GroupHeight {
                height: 350.0,
                from: 350.0
            })
        );
        assert_eq!(
            layout.group_height(12),
            Some(GroupHeight {
                height: 450.0,
                from: 700.0
            })
        );
        assert_eq!(layout.group_height(5), None);
    }

    #[test]
    fn nearest_group_indices_track_the_window() {
        let cache = HeightCache::from_heights(HEIGHTS);
        let index = CumulativePositionIndex::build(&cache);
        let layout = GroupLayout::build(&[4, 8, 13], &cache);

        assert_eq!(
            layout.nearest_group_indices(&index, 0.0, 300.0),
            NearestGroups {
                first: None,
                visible: sv(&[]),
                last: Some(4),
                all: sv(&[4]),
            }
        );
        assert_eq!(
            layout.nearest_group_indices(&index, 400.0, 649.0),
            NearestGroups {
                first: Some(4),
                visible: sv(&[4]),
                last: Some(8),
                all: sv(&[4, 8]),
            }
        );
        assert_eq!(
            layout.nearest_group_indices(&index, 400.0, 701.0),
            NearestGroups {
                first: Some(4),
                visible: sv(&[4, 8]),
                last: Some(8),
                all: sv(&[4, 8]),
            }
        );
        assert_eq!(
            layout.nearest_group_indices(&index, 700.0, 1150.0),
            NearestGroups {
                first: Some(4),
                visible: sv(&[8]),
                last: Some(13),
                all: sv(&[4, 8, 13]),
            }
        );
    }

    #[test]
    fn keeps_header_uses_the_span_of_all() {
        let nearest = NearestGroups {
            first: Some(4),
            visible: sv(&[8]),
            last: Some(13),
            all: sv(&[4, 8, 13]),
        };
        assert!(nearest.keeps_header(4));
        assert!(nearest.keeps_header(13));
        assert!(!nearest.keeps_header(2));
        assert!(!nearest.keeps_header(20));
        assert!(!NearestGroups::default().keeps_header(0));
    }
}
