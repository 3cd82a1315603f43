#![forbid(unsafe_code)]

//! Row-store seam.
//!
//! The engine never assumes a concrete row shape. Hosts hand it cell access
//! through these traits; [`MemoryRowStore`] is a plain map-backed
//! implementation for hosts without their own backing store and for tests.

use std::collections::HashMap;

use gridcore_core::{CellCoord, CellValue};

/// Read-only cell access.
///
/// Implemented by row stores and by the engine's internal pending-write
/// overlay, so computed columns observe in-flight values during recompute.
pub trait CellReader {
    /// Current value of one cell. Unknown cells resolve to
    /// [`CellValue::Null`].
    fn resolve_cell_value(&self, coord: CellCoord) -> CellValue;
}

/// Host-injected row data access.
pub trait RowStore: CellReader {
    /// Write an edited value into one cell.
    fn apply_edited_value(&mut self, coord: CellCoord, value: CellValue);

    /// Clear one cell back to its empty state.
    fn clear_edited_value(&mut self, coord: CellCoord);
}

/// Map-backed row store.
///
/// Absent cells read as [`CellValue::Null`]; clearing removes the entry.
#[derive(Debug, Clone, Default)]
pub struct MemoryRowStore {
    cells: HashMap<CellCoord, CellValue>,
}

impl MemoryRowStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed one cell, builder style.
    #[must_use]
    pub fn with_cell(mut self, coord: CellCoord, value: CellValue) -> Self {
        self.cells.insert(coord, value);
        self
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell holds a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl CellReader for MemoryRowStore {
    fn resolve_cell_value(&self, coord: CellCoord) -> CellValue {
        self.cells.get(&coord).cloned().unwrap_or_default()
    }
}

impl RowStore for MemoryRowStore {
    fn apply_edited_value(&mut self, coord: CellCoord, value: CellValue) {
        if value.is_null() {
            self.cells.remove(&coord);
        } else {
            self.cells.insert(coord, value);
        }
    }

    fn clear_edited_value(&mut self, coord: CellCoord) {
        self.cells.remove(&coord);
    }
}
