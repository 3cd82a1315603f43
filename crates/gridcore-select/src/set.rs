#![forbid(unsafe_code)]

//! Canonical sets of independent rectangular selections.
//!
//! Non-contiguous multi-select (ctrl-click, ctrl-drag) accumulates
//! rectangles. The set keeps itself canonical: overlapping or exactly
//! adjacent rectangles are merged whenever their union is itself a
//! rectangle, and the result is sorted, so structurally equal coverage
//! compares equal.

use crate::range::CellRect;

/// A set of independent rectangular selections with canonical storage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionSet {
    ranges: Vec<CellRect>,
}

impl SelectionSet {
    /// Empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { ranges: Vec::new() }
    }

    /// Canonicalized set from arbitrary rectangles.
    #[must_use]
    pub fn from_ranges(ranges: impl IntoIterator<Item = CellRect>) -> Self {
        let mut set = Self {
            ranges: ranges.into_iter().collect(),
        };
        set.canonicalize();
        set
    }

    /// The canonical rectangles, sorted by (start_row, start_column).
    #[must_use]
    pub fn ranges(&self) -> &[CellRect] {
        &self.ranges
    }

    /// Whether nothing is selected.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Number of canonical rectangles.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Total number of selected cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        // Canonical ranges are disjoint, so spans sum directly.
        self.ranges.iter().map(CellRect::cell_count).sum()
    }

    /// Check whether a cell is covered by any range.
    #[must_use]
    pub fn is_cell_selected(&self, row: usize, column: usize) -> bool {
        self.ranges.iter().any(|r| r.contains(row, column))
    }

    /// Smallest rectangle covering the whole set, if non-empty.
    #[must_use]
    pub fn bounding_box(&self) -> Option<CellRect> {
        self.ranges
            .iter()
            .copied()
            .reduce(|acc, r| acc.union(&r))
    }

    /// Add a rectangle to the selection.
    pub fn add(&mut self, rect: CellRect) {
        self.ranges.push(rect);
        self.canonicalize();
    }

    /// Remove a rectangle's coverage, splitting intersecting ranges.
    pub fn remove(&mut self, rect: CellRect) {
        self.ranges = self
            .ranges
            .iter()
            .flat_map(|r| r.subtract(&rect))
            .collect();
        self.canonicalize();
    }

    /// Flip the coverage of a rectangle (XOR).
    ///
    /// Covered cells inside `rect` become unselected and uncovered ones
    /// become selected; toggling the same rectangle twice is the identity.
    pub fn toggle(&mut self, rect: CellRect) {
        // (S \ R) ∪ (R \ S): subtract R from every range, then add back the
        // parts of R no range covered.
        let mut uncovered = vec![rect];
        for r in &self.ranges {
            uncovered = uncovered
                .iter()
                .flat_map(|piece| piece.subtract(r))
                .collect();
            if uncovered.is_empty() {
                break;
            }
        }
        self.ranges = self
            .ranges
            .iter()
            .flat_map(|r| r.subtract(&rect))
            .collect();
        self.ranges.extend(uncovered);
        self.canonicalize();
    }

    /// Rewrite storage to disjoint rectangles, merge until a fixpoint, sort.
    ///
    /// Two rectangles merge when one contains the other, or when they share
    /// one axis span exactly and overlap or touch on the other axis — the
    /// cases where the union is still a rectangle. Overlapping rectangles
    /// whose union is not a rectangle are split instead, so canonical
    /// ranges are always pairwise disjoint.
    fn canonicalize(&mut self) {
        loop {
            let mut action = None;
            'scan: for i in 0..self.ranges.len() {
                for j in (i + 1)..self.ranges.len() {
                    if let Some(union) = mergeable(&self.ranges[i], &self.ranges[j]) {
                        action = Some((i, j, Some(union)));
                        break 'scan;
                    }
                    if self.ranges[i].intersects(&self.ranges[j]) {
                        action = Some((i, j, None));
                        break 'scan;
                    }
                }
            }
            match action {
                Some((i, j, Some(union))) => {
                    self.ranges.swap_remove(j);
                    self.ranges[i] = union;
                }
                Some((i, j, None)) => {
                    // Carve the overlap out of the later rectangle. Each
                    // carve strictly shrinks total covered multiplicity, so
                    // the loop terminates.
                    let keep = self.ranges[i];
                    let pieces = self.ranges[j].subtract(&keep);
                    self.ranges.swap_remove(j);
                    self.ranges.extend(pieces);
                }
                None => break,
            }
        }
        self.ranges
            .sort_by_key(|r| (r.start_row, r.start_column, r.end_row, r.end_column));
    }
}

/// Union of two rectangles when that union is itself a rectangle.
fn mergeable(a: &CellRect, b: &CellRect) -> Option<CellRect> {
    if a.contains_rect(b) {
        return Some(*a);
    }
    if b.contains_rect(a) {
        return Some(*b);
    }
    let same_rows = a.start_row == b.start_row && a.end_row == b.end_row;
    let same_columns = a.start_column == b.start_column && a.end_column == b.end_column;
    let columns_touch =
        a.start_column <= b.end_column.saturating_add(1) && b.start_column <= a.end_column.saturating_add(1);
    let rows_touch =
        a.start_row <= b.end_row.saturating_add(1) && b.start_row <= a.end_row.saturating_add(1);
    if same_rows && columns_touch {
        return Some(a.union(b));
    }
    if same_columns && rows_touch {
        return Some(a.union(b));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::SelectionSet;
    use crate::range::CellRect;
    use gridcore_core::CellCoord;
    use proptest::prelude::*;

    fn row_span(start: usize, end: usize) -> CellRect {
        CellRect::new(start, end, 0, 3)
    }

    // --- merge ---

    #[test]
    fn merge_canonicalizes_overlapping_and_adjacent_spans() {
        let set = SelectionSet::from_ranges([
            row_span(5, 7),
            row_span(0, 2),
            row_span(3, 4),
            row_span(7, 10),
        ]);
        assert_eq!(set.ranges(), &[row_span(0, 10)]);
    }

    #[test]
    fn merge_keeps_disjoint_ranges_apart() {
        let set = SelectionSet::from_ranges([row_span(0, 2), row_span(5, 7)]);
        assert_eq!(set.len(), 2);
        assert!(set.is_cell_selected(1, 0));
        assert!(!set.is_cell_selected(3, 0));
    }

    #[test]
    fn merge_does_not_weld_different_column_spans() {
        let a = CellRect::new(0, 2, 0, 3);
        let b = CellRect::new(3, 5, 0, 2);
        let set = SelectionSet::from_ranges([a, b]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn merge_absorbs_contained_ranges() {
        let outer = CellRect::new(0, 9, 0, 9);
        let inner = CellRect::new(2, 4, 2, 4);
        let set = SelectionSet::from_ranges([inner, outer]);
        assert_eq!(set.ranges(), &[outer]);
    }

    // --- add / remove ---

    #[test]
    fn add_merges_into_canonical_form() {
        let mut set = SelectionSet::new();
        set.add(row_span(0, 2));
        set.add(row_span(3, 5));
        assert_eq!(set.ranges(), &[row_span(0, 5)]);
    }

    #[test]
    fn remove_splits_covering_range() {
        let mut set = SelectionSet::from_ranges([row_span(0, 10)]);
        set.remove(row_span(4, 6));
        assert_eq!(set.ranges(), &[row_span(0, 3), row_span(7, 10)]);
        assert!(!set.is_cell_selected(5, 0));
        assert!(set.is_cell_selected(3, 0));
    }

    #[test]
    fn remove_untouched_when_disjoint() {
        let mut set = SelectionSet::from_ranges([row_span(0, 2)]);
        set.remove(row_span(8, 9));
        assert_eq!(set.ranges(), &[row_span(0, 2)]);
    }

    // --- toggle ---

    #[test]
    fn toggle_twice_is_identity() {
        let original = SelectionSet::from_ranges([row_span(0, 4), row_span(8, 9)]);
        let mut set = original.clone();
        let rect = row_span(2, 8);
        set.toggle(rect);
        assert_ne!(set, original);
        set.toggle(rect);
        assert_eq!(set, original);
    }

    #[test]
    fn toggle_on_empty_set_adds() {
        let mut set = SelectionSet::new();
        set.toggle(row_span(1, 3));
        assert_eq!(set.ranges(), &[row_span(1, 3)]);
    }

    #[test]
    fn toggle_subset_splits_covering_range() {
        let mut set = SelectionSet::from_ranges([row_span(0, 10)]);
        set.toggle(row_span(4, 6));
        assert_eq!(set.ranges(), &[row_span(0, 3), row_span(7, 10)]);
    }

    #[test]
    fn toggle_partial_overlap_flips_coverage() {
        let mut set = SelectionSet::from_ranges([row_span(0, 4)]);
        set.toggle(row_span(3, 7));
        // 3..=4 flipped off, 5..=7 flipped on.
        assert!(set.is_cell_selected(2, 0));
        assert!(!set.is_cell_selected(3, 0));
        assert!(!set.is_cell_selected(4, 0));
        assert!(set.is_cell_selected(6, 0));
        assert_eq!(set.ranges(), &[row_span(0, 2), row_span(5, 7)]);
    }

    // --- geometry helpers ---

    #[test]
    fn bounding_box_and_cell_count() {
        let set = SelectionSet::from_ranges([
            CellRect::new(0, 1, 0, 1),
            CellRect::new(5, 6, 4, 5),
        ]);
        assert_eq!(set.bounding_box(), Some(CellRect::new(0, 6, 0, 5)));
        assert_eq!(set.cell_count(), 8);
        assert_eq!(SelectionSet::new().bounding_box(), None);
    }

    // --- properties ---

    fn arb_rect() -> impl Strategy<Value = CellRect> {
        (0usize..12, 0usize..12, 0usize..8, 0usize..8).prop_map(|(r1, r2, c1, c2)| {
            CellRect::from_corners(CellCoord::new(r1, c1), CellCoord::new(r2, c2))
        })
    }

    proptest! {
        #[test]
        fn toggle_is_an_involution_on_coverage(
            base in proptest::collection::vec(arb_rect(), 0..4),
            rect in arb_rect(),
        ) {
            let original = SelectionSet::from_ranges(base);
            let mut toggled = original.clone();
            toggled.toggle(rect);
            toggled.toggle(rect);
            for row in 0..12 {
                for column in 0..8 {
                    prop_assert_eq!(
                        toggled.is_cell_selected(row, column),
                        original.is_cell_selected(row, column),
                        "coverage diverged at ({}, {})", row, column
                    );
                }
            }
        }

        #[test]
        fn canonical_ranges_are_disjoint(
            rects in proptest::collection::vec(arb_rect(), 0..5),
        ) {
            let set = SelectionSet::from_ranges(rects);
            let ranges = set.ranges();
            for i in 0..ranges.len() {
                for j in (i + 1)..ranges.len() {
                    prop_assert!(!ranges[i].intersects(&ranges[j]));
                }
            }
        }
    }
}
