#![forbid(unsafe_code)]

//! Move and fill over a selected rectangle.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::rc::Rc;

use gridcore_core::{CellCoord, CellValue, GridBounds};
use gridcore_graph::{DependencyGraph, EdgeKind, GraphError};
use gridcore_select::{CellRect, SelectionRange};
use gridcore_txn::{Intent, TransactionError, TransactionId, TransactionInput, TransactionService};

use crate::columns::ColumnModel;
use crate::command::{CellPatch, GridCommand, GridCommandExecutor};
use crate::store::{CellReader, RowStore};

/// Mutation failures.
///
/// The row store and the active selection are left at their pre-operation
/// state: the transaction service rolls back partial writes before the
/// error surfaces, and the selection only updates after a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// Recording the mutation failed.
    Transaction(TransactionError),
    /// A dependency token failed to parse or register.
    Graph(GraphError),
}

impl fmt::Display for MutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transaction(err) => err.fmt(f),
            Self::Graph(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for MutationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transaction(err) => Some(err),
            Self::Graph(err) => Some(err),
        }
    }
}

impl From<TransactionError> for MutationError {
    fn from(err: TransactionError) -> Self {
        Self::Transaction(err)
    }
}

impl From<GraphError> for MutationError {
    fn from(err: GraphError) -> Self {
        Self::Graph(err)
    }
}

/// Reads pending patch values over the untouched store, so recompute hooks
/// observe the mutation they are reacting to.
struct Overlay<'a, S: RowStore> {
    store: &'a S,
    pending: &'a HashMap<CellCoord, CellValue>,
}

impl<S: RowStore> CellReader for Overlay<'_, S> {
    fn resolve_cell_value(&self, coord: CellCoord) -> CellValue {
        match self.pending.get(&coord) {
            Some(value) => value.clone(),
            None => self.store.resolve_cell_value(coord),
        }
    }
}

/// Orchestrates move/fill over the active selection.
///
/// Geometry comes from the selection model, recompute decisions from the
/// dependency graph, and every mutation is recorded as one reversible
/// transaction. An operation that changes no cell value records nothing
/// and leaves the engine untouched.
pub struct RangeMutationEngine<S: RowStore, M: ColumnModel> {
    store: Rc<RefCell<S>>,
    columns: M,
    graph: DependencyGraph,
    service: TransactionService<GridCommand, GridCommandExecutor<S>>,
    selection: SelectionRange,
    bounds: GridBounds,
}

impl<S: RowStore, M: ColumnModel> fmt::Debug for RangeMutationEngine<S, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeMutationEngine")
            .field("bounds", &self.bounds)
            .field("selection", &self.selection)
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

impl<S: RowStore, M: ColumnModel> RangeMutationEngine<S, M> {
    /// Build an engine over a row store and column model.
    ///
    /// Every derived column's inputs are registered as `Computed` edges, so
    /// registration fails fast on a malformed token or dependency cycle.
    pub fn new(
        store: S,
        columns: M,
        mut graph: DependencyGraph,
        bounds: GridBounds,
    ) -> Result<Self, MutationError> {
        for column in 0..columns.column_count() {
            if let Some(hook) = columns.computed(column) {
                for input in &hook.inputs {
                    graph.register_dependency(input, &hook.token, EdgeKind::Computed)?;
                }
            }
        }
        let store = Rc::new(RefCell::new(store));
        let service = TransactionService::new(GridCommandExecutor::new(Rc::clone(&store)));
        Ok(Self {
            store,
            columns,
            graph,
            service,
            selection: SelectionRange::cell(CellCoord::new(0, 0)),
            bounds,
        })
    }

    /// Shared handle to the row store.
    #[must_use]
    pub fn store(&self) -> Rc<RefCell<S>> {
        Rc::clone(&self.store)
    }

    /// The column model.
    #[must_use]
    pub fn columns(&self) -> &M {
        &self.columns
    }

    /// The dependency graph.
    #[must_use]
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Register an extra dependency beyond the derived-column edges.
    pub fn register_dependency(
        &mut self,
        source: &str,
        dependent: &str,
        kind: EdgeKind,
    ) -> Result<(), MutationError> {
        Ok(self.graph.register_dependency(source, dependent, kind)?)
    }

    /// The transaction log.
    #[must_use]
    pub fn transactions(&self) -> &TransactionService<GridCommand, GridCommandExecutor<S>> {
        &self.service
    }

    /// Mutable transaction log, for batches and subscriptions.
    pub fn transactions_mut(
        &mut self,
    ) -> &mut TransactionService<GridCommand, GridCommandExecutor<S>> {
        &mut self.service
    }

    /// Grid bounds.
    #[must_use]
    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Replace the grid bounds after the host's data set changes.
    pub fn set_bounds(&mut self, bounds: GridBounds) {
        self.bounds = bounds;
        self.selection = SelectionRange::create(
            self.selection.anchor,
            self.selection.focus,
            bounds,
        );
    }

    /// The active selection.
    #[must_use]
    pub fn selection(&self) -> SelectionRange {
        self.selection
    }

    /// Replace the active selection, clamped into the grid bounds.
    pub fn set_selection(&mut self, range: SelectionRange) {
        self.selection = SelectionRange::create(range.anchor, range.focus, self.bounds);
    }

    /// Undo the most recent mutation.
    pub fn undo(&mut self) -> Result<Option<TransactionId>, MutationError> {
        Ok(self.service.undo()?)
    }

    /// Redo the most recently undone mutation.
    pub fn redo(&mut self) -> Result<Option<TransactionId>, MutationError> {
        Ok(self.service.redo()?)
    }

    // ====================================================================
    // Move
    // ====================================================================

    /// Move the selected rectangle so its top-left corner lands on
    /// `destination`.
    ///
    /// The destination is clamped so the whole rectangle stays inside the
    /// grid. Source values land in writable destination cells, vacated
    /// source cells not covered by the destination are cleared, affected
    /// derived columns recompute, and the selection follows the moved
    /// rectangle. Returns `Ok(None)` without recording anything when no
    /// cell value changes.
    pub fn move_range(
        &mut self,
        destination: CellCoord,
    ) -> Result<Option<TransactionId>, MutationError> {
        if self.bounds.is_empty() {
            return Ok(None);
        }
        let source = self.selection.rect();
        let max_start_row = self.bounds.row_count.saturating_sub(source.row_span());
        let max_start_column = self.bounds.column_count.saturating_sub(source.column_span());
        let row_delta = destination.row.min(max_start_row) as isize - source.start_row as isize;
        let column_delta =
            destination.column.min(max_start_column) as isize - source.start_column as isize;
        if row_delta == 0 && column_delta == 0 {
            return Ok(None);
        }
        let dest = source.translated(row_delta, column_delta);

        let mut patches = Vec::new();
        let mut pending = HashMap::new();
        {
            let store = self.store.borrow();
            // Copies first, then clears; clears never target destination
            // cells, so in-command ordering stays conflict-free.
            for src in source.cells() {
                let dst = CellCoord::new(
                    (src.row as isize + row_delta) as usize,
                    (src.column as isize + column_delta) as usize,
                );
                if !self.writable_pair(src.column, dst.column) {
                    continue;
                }
                let value = store.resolve_cell_value(src);
                let before = store.resolve_cell_value(dst);
                if before != value {
                    pending.insert(dst, value.clone());
                    patches.push(CellPatch::new(dst, before, value));
                }
            }
            for src in source.cells() {
                if dest.contains(src.row, src.column) {
                    continue;
                }
                if !self.columns.flags(src.column).accepts_writes() {
                    continue;
                }
                let before = store.resolve_cell_value(src);
                if !before.is_null() {
                    pending.insert(src, CellValue::Null);
                    patches.push(CellPatch::new(src, before, CellValue::Null));
                }
            }
            self.recompute_derived(&store, &mut patches, &mut pending)?;
        }

        if patches.is_empty() {
            return Ok(None);
        }

        #[cfg(feature = "tracing")]
        gridcore_core::debug!(
            patches = patches.len(),
            row_delta,
            column_delta,
            "move range"
        );

        let id = self.service.apply_transaction(
            TransactionInput::new(vec![GridCommand::SetCells { patches }])
                .with_intent(Intent::Move)
                .with_label("Move range"),
        )?;

        let shift = |c: CellCoord| {
            CellCoord::new(
                (c.row as isize + row_delta) as usize,
                (c.column as isize + column_delta) as usize,
            )
        };
        self.selection =
            SelectionRange::between(shift(self.selection.anchor), shift(self.selection.focus));
        Ok(Some(id))
    }

    // ====================================================================
    // Fill
    // ====================================================================

    /// Fill from the selected rectangle across `preview`.
    ///
    /// The base pattern tiles row-major across the extension, wrapping on
    /// both axes, so dragging five rows down from a two-row base repeats
    /// the two rows alternately. The selection grows to the preview on
    /// success. Returns `Ok(None)` when no cell value changes.
    pub fn fill_range(
        &mut self,
        preview: CellRect,
    ) -> Result<Option<TransactionId>, MutationError> {
        if self.bounds.is_empty() {
            return Ok(None);
        }
        let base = self.selection.rect();
        let preview = preview.clamped(self.bounds).union(&base);
        if preview == base {
            return Ok(None);
        }

        let mut patches = Vec::new();
        let mut pending = HashMap::new();
        {
            let store = self.store.borrow();
            for dst in preview.cells() {
                if base.contains(dst.row, dst.column) {
                    continue;
                }
                let src = wrap_into(&base, dst);
                if !self.writable_pair(src.column, dst.column) {
                    continue;
                }
                let value = store.resolve_cell_value(src);
                let before = store.resolve_cell_value(dst);
                if before != value {
                    pending.insert(dst, value.clone());
                    patches.push(CellPatch::new(dst, before, value));
                }
            }
            self.recompute_derived(&store, &mut patches, &mut pending)?;
        }

        if patches.is_empty() {
            return Ok(None);
        }

        #[cfg(feature = "tracing")]
        gridcore_core::debug!(patches = patches.len(), "fill range");

        let id = self.service.apply_transaction(
            TransactionInput::new(vec![GridCommand::SetCells { patches }])
                .with_intent(Intent::Fill)
                .with_label("Fill range"),
        )?;
        self.selection = SelectionRange::from(preview);
        Ok(Some(id))
    }

    // ====================================================================
    // Shared pieces
    // ====================================================================

    /// Whether a value may flow from `src_column` into `dst_column`.
    fn writable_pair(&self, src_column: usize, dst_column: usize) -> bool {
        use gridcore_core::ColumnFlags;
        self.columns.flags(dst_column).accepts_writes()
            && !self.columns.flags(src_column).contains(ColumnFlags::SELECTION)
    }

    /// Extend `patches` with derived-column recomputes for every row the
    /// base patches touched. `patch.before` reads through the overlay so
    /// reverse-order unwinding restores each intermediate value.
    fn recompute_derived(
        &self,
        store: &S,
        patches: &mut Vec<CellPatch>,
        pending: &mut HashMap<CellCoord, CellValue>,
    ) -> Result<(), MutationError> {
        if patches.is_empty() {
            return Ok(());
        }
        let mut written: BTreeSet<String> = BTreeSet::new();
        let mut rows: BTreeSet<usize> = BTreeSet::new();
        for patch in patches.iter() {
            rows.insert(patch.coord.row);
            if let Some(token) = self.columns.field_token(patch.coord.column) {
                written.insert(token.to_string());
            }
        }

        for column in 0..self.columns.column_count() {
            let Some(hook) = self.columns.computed(column) else {
                continue;
            };
            if !self.graph.affects_any(written.iter(), hook.inputs.iter())? {
                continue;
            }
            for &row in &rows {
                let coord = CellCoord::new(row, column);
                let overlay = Overlay { store, pending };
                let current = overlay.resolve_cell_value(coord);
                let value = (hook.compute)(&overlay, row);
                if value != current {
                    pending.insert(coord, value.clone());
                    patches.push(CellPatch::new(coord, current, value));
                }
            }
        }
        Ok(())
    }
}

/// Map a preview cell onto the base rectangle by wrapping both axes.
fn wrap_into(base: &CellRect, cell: CellCoord) -> CellCoord {
    let row_rel =
        (cell.row as isize - base.start_row as isize).rem_euclid(base.row_span() as isize);
    let column_rel = (cell.column as isize - base.start_column as isize)
        .rem_euclid(base.column_span() as isize);
    CellCoord::new(
        base.start_row + row_rel as usize,
        base.start_column + column_rel as usize,
    )
}
