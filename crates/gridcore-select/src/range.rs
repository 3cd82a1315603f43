#![forbid(unsafe_code)]

//! Rectangular range primitives.

use gridcore_core::{CellCoord, GridBounds};

/// A rectangle in grid index space with inclusive bounds on both axes.
///
/// Invariant: `start_row <= end_row` and `start_column <= end_column`; the
/// constructors normalize, so a `CellRect` is never empty — the smallest is
/// a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRect {
    /// First row (inclusive).
    pub start_row: usize,
    /// Last row (inclusive).
    pub end_row: usize,
    /// First column (inclusive).
    pub start_column: usize,
    /// Last column (inclusive).
    pub end_column: usize,
}

impl CellRect {
    /// Normalized rectangle from two corner points.
    #[must_use]
    pub fn from_corners(a: CellCoord, b: CellCoord) -> Self {
        Self {
            start_row: a.row.min(b.row),
            end_row: a.row.max(b.row),
            start_column: a.column.min(b.column),
            end_column: a.column.max(b.column),
        }
    }

    /// Normalized rectangle from explicit bounds.
    #[must_use]
    pub fn new(start_row: usize, end_row: usize, start_column: usize, end_column: usize) -> Self {
        Self::from_corners(
            CellCoord::new(start_row, start_column),
            CellCoord::new(end_row, end_column),
        )
    }

    /// Rectangle covering whole rows across the given column span.
    #[must_use]
    pub fn rows(start_row: usize, end_row: usize, start_column: usize, end_column: usize) -> Self {
        Self::new(start_row, end_row, start_column, end_column)
    }

    /// Single-cell rectangle.
    #[must_use]
    pub const fn cell(coord: CellCoord) -> Self {
        Self {
            start_row: coord.row,
            end_row: coord.row,
            start_column: coord.column,
            end_column: coord.column,
        }
    }

    /// Number of rows covered.
    #[inline]
    #[must_use]
    pub const fn row_span(&self) -> usize {
        self.end_row - self.start_row + 1
    }

    /// Number of columns covered.
    #[inline]
    #[must_use]
    pub const fn column_span(&self) -> usize {
        self.end_column - self.start_column + 1
    }

    /// Number of cells covered.
    #[inline]
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.row_span() * self.column_span()
    }

    /// Check whether a cell lies inside the rectangle.
    #[inline]
    #[must_use]
    pub const fn contains(&self, row: usize, column: usize) -> bool {
        row >= self.start_row
            && row <= self.end_row
            && column >= self.start_column
            && column <= self.end_column
    }

    /// Check whether another rectangle lies entirely inside this one.
    #[inline]
    #[must_use]
    pub const fn contains_rect(&self, other: &CellRect) -> bool {
        self.start_row <= other.start_row
            && self.end_row >= other.end_row
            && self.start_column <= other.start_column
            && self.end_column >= other.end_column
    }

    /// Check whether two rectangles share at least one cell.
    #[inline]
    #[must_use]
    pub const fn intersects(&self, other: &CellRect) -> bool {
        self.start_row <= other.end_row
            && other.start_row <= self.end_row
            && self.start_column <= other.end_column
            && other.start_column <= self.end_column
    }

    /// Shared cells of two rectangles, if any.
    #[must_use]
    pub fn intersection(&self, other: &CellRect) -> Option<CellRect> {
        if !self.intersects(other) {
            return None;
        }
        Some(CellRect {
            start_row: self.start_row.max(other.start_row),
            end_row: self.end_row.min(other.end_row),
            start_column: self.start_column.max(other.start_column),
            end_column: self.end_column.min(other.end_column),
        })
    }

    /// Smallest rectangle containing both.
    #[must_use]
    pub fn union(&self, other: &CellRect) -> CellRect {
        CellRect {
            start_row: self.start_row.min(other.start_row),
            end_row: self.end_row.max(other.end_row),
            start_column: self.start_column.min(other.start_column),
            end_column: self.end_column.max(other.end_column),
        }
    }

    /// Grow the rectangle so it covers `point`.
    #[must_use]
    pub fn extended_to(&self, point: CellCoord) -> CellRect {
        self.union(&CellRect::cell(point))
    }

    /// Translate by a signed row/column delta, saturating at zero.
    #[must_use]
    pub fn translated(&self, row_delta: isize, column_delta: isize) -> CellRect {
        let shift = |v: usize, d: isize| {
            if d >= 0 {
                v.saturating_add(d as usize)
            } else {
                v.saturating_sub(d.unsigned_abs())
            }
        };
        CellRect {
            start_row: shift(self.start_row, row_delta),
            end_row: shift(self.end_row, row_delta),
            start_column: shift(self.start_column, column_delta),
            end_column: shift(self.end_column, column_delta),
        }
    }

    /// Clamp the rectangle into `bounds`.
    #[must_use]
    pub fn clamped(&self, bounds: GridBounds) -> CellRect {
        CellRect::from_corners(
            bounds.clamp(CellCoord::new(self.start_row, self.start_column)),
            bounds.clamp(CellCoord::new(self.end_row, self.end_column)),
        )
    }

    /// Cells of `self` not covered by `other`, as at most four disjoint
    /// rectangles (top strip, bottom strip, left and right middle strips).
    ///
    /// Returns `[self]` when the rectangles are disjoint and nothing when
    /// `other` covers `self` entirely.
    #[must_use]
    pub fn subtract(&self, other: &CellRect) -> Vec<CellRect> {
        let Some(overlap) = self.intersection(other) else {
            return vec![*self];
        };
        let mut out = Vec::with_capacity(4);
        if overlap.start_row > self.start_row {
            out.push(CellRect {
                start_row: self.start_row,
                end_row: overlap.start_row - 1,
                start_column: self.start_column,
                end_column: self.end_column,
            });
        }
        if overlap.end_row < self.end_row {
            out.push(CellRect {
                start_row: overlap.end_row + 1,
                end_row: self.end_row,
                start_column: self.start_column,
                end_column: self.end_column,
            });
        }
        if overlap.start_column > self.start_column {
            out.push(CellRect {
                start_row: overlap.start_row,
                end_row: overlap.end_row,
                start_column: self.start_column,
                end_column: overlap.start_column - 1,
            });
        }
        if overlap.end_column < self.end_column {
            out.push(CellRect {
                start_row: overlap.start_row,
                end_row: overlap.end_row,
                start_column: overlap.end_column + 1,
                end_column: self.end_column,
            });
        }
        out
    }

    /// Iterate all covered cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        (self.start_row..=self.end_row).flat_map(move |row| {
            (self.start_column..=self.end_column).map(move |column| CellCoord::new(row, column))
        })
    }
}

/// The active selection: a normalized rectangle plus the gesture endpoints.
///
/// `anchor` is the fixed end of the gesture, `focus` the moving one. They
/// may lie outside the normalized bounds only transiently, before
/// [`SelectionRange::normalized`] runs; the constructors here always hand
/// back a normalized range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionRange {
    /// First row (inclusive).
    pub start_row: usize,
    /// Last row (inclusive).
    pub end_row: usize,
    /// First column (inclusive).
    pub start_column: usize,
    /// Last column (inclusive).
    pub end_column: usize,
    /// Fixed end of the gesture.
    pub anchor: CellCoord,
    /// Moving end of the gesture.
    pub focus: CellCoord,
}

impl SelectionRange {
    /// Normalized range between two gesture endpoints.
    #[must_use]
    pub fn between(anchor: CellCoord, focus: CellCoord) -> Self {
        let rect = CellRect::from_corners(anchor, focus);
        Self {
            start_row: rect.start_row,
            end_row: rect.end_row,
            start_column: rect.start_column,
            end_column: rect.end_column,
            anchor,
            focus,
        }
    }

    /// Range from endpoints clamped into `bounds`.
    #[must_use]
    pub fn create(anchor: CellCoord, focus: CellCoord, bounds: GridBounds) -> Self {
        Self::between(bounds.clamp(anchor), bounds.clamp(focus))
    }

    /// Single-cell range.
    #[must_use]
    pub fn cell(coord: CellCoord) -> Self {
        Self::between(coord, coord)
    }

    /// Re-derive the normalized bounds from anchor and focus.
    ///
    /// Identity for ranges built through the constructors; used after a
    /// caller mutates the endpoints in place.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self::between(self.anchor, self.focus)
    }

    /// Grow the range's bounding box to cover `point` (shift-click,
    /// shift-arrow). The anchor is preserved; `point` becomes the focus.
    #[must_use]
    pub fn extended_to(&self, point: CellCoord) -> Self {
        let rect = self.rect().extended_to(point);
        Self {
            start_row: rect.start_row,
            end_row: rect.end_row,
            start_column: rect.start_column,
            end_column: rect.end_column,
            anchor: self.anchor,
            focus: point,
        }
    }

    /// The geometric rectangle, without gesture endpoints.
    #[inline]
    #[must_use]
    pub const fn rect(&self) -> CellRect {
        CellRect {
            start_row: self.start_row,
            end_row: self.end_row,
            start_column: self.start_column,
            end_column: self.end_column,
        }
    }

    /// Check whether a cell lies inside the range.
    #[inline]
    #[must_use]
    pub const fn contains(&self, row: usize, column: usize) -> bool {
        self.rect().contains(row, column)
    }
}

impl From<CellRect> for SelectionRange {
    fn from(rect: CellRect) -> Self {
        Self {
            start_row: rect.start_row,
            end_row: rect.end_row,
            start_column: rect.start_column,
            end_column: rect.end_column,
            anchor: CellCoord::new(rect.start_row, rect.start_column),
            focus: CellCoord::new(rect.end_row, rect.end_column),
        }
    }
}
