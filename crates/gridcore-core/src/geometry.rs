#![forbid(unsafe_code)]

//! Grid-space coordinates and bounds.

/// A cell position in grid index space (0-indexed, row-major).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellCoord {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub column: usize,
}

impl CellCoord {
    /// Create a new coordinate.
    #[inline]
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl From<(usize, usize)> for CellCoord {
    fn from((row, column): (usize, usize)) -> Self {
        Self { row, column }
    }
}

/// The addressable extent of a grid.
///
/// Coordinates outside the bounds are clamped by callers, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridBounds {
    /// Number of rows.
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
}

impl GridBounds {
    /// Create new bounds.
    #[inline]
    pub const fn new(row_count: usize, column_count: usize) -> Self {
        Self {
            row_count,
            column_count,
        }
    }

    /// Total number of addressable cells.
    #[inline]
    pub const fn cell_count(&self) -> usize {
        self.row_count * self.column_count
    }

    /// Check whether the grid has no addressable cells.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.row_count == 0 || self.column_count == 0
    }

    /// Check whether a coordinate lies inside the bounds.
    #[inline]
    pub const fn contains(&self, coord: CellCoord) -> bool {
        coord.row < self.row_count && coord.column < self.column_count
    }

    /// Largest valid row index, or 0 for an empty grid.
    #[inline]
    pub const fn max_row(&self) -> usize {
        self.row_count.saturating_sub(1)
    }

    /// Largest valid column index, or 0 for an empty grid.
    #[inline]
    pub const fn max_column(&self) -> usize {
        self.column_count.saturating_sub(1)
    }

    /// Clamp a coordinate into the bounds.
    ///
    /// An empty grid clamps everything to the origin.
    #[inline]
    pub const fn clamp(&self, coord: CellCoord) -> CellCoord {
        CellCoord {
            row: if coord.row > self.max_row() {
                self.max_row()
            } else {
                coord.row
            },
            column: if coord.column > self.max_column() {
                self.max_column()
            } else {
                coord.column
            },
        }
    }
}
