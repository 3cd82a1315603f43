#![forbid(unsafe_code)]

//! End-to-end flows across the facade: a scroll tick through the
//! virtualizer, and a selection gesture driven through the mutation engine
//! and transaction log.

use gridcore::prelude::*;
use gridcore::{
    Axis, BasicColumns, CellPatch, CellReader, ColumnDef, GridCommand, MemoryRowStore,
    TransactionInput, VerticalLimitInput, vertical_scroll_limit,
};

fn row_context(offset: f64) -> AxisContext {
    AxisContext {
        axis: Axis::Row,
        viewport_size: 200.0,
        scroll_offset: offset,
        virtualization_enabled: true,
        estimated_item_size: 20.0,
        total_count: 100,
        overscan: OverscanConfig::default(),
    }
}

// --- virtualization tick ---

#[test]
fn hundred_row_grid_scroll_tick() {
    let virt = AxisVirtualizer::new();
    let ctx = row_context(1000.0);

    let state = virt.compute_range(1000.0, ScrollMotion::still(), &ctx);
    assert_eq!(state.visible_count, 10);
    assert_eq!(state.pool_size, state.end_index - state.start_index);
    assert!(state.start_index <= 50 && state.end_index >= 60);

    // Content is 2000px in a 200px viewport: the limit is 1800, and a
    // scroll past it clamps so the window ends at the last row.
    let limit = vertical_scroll_limit(&VerticalLimitInput {
        viewport_size: 200.0,
        total_count: 100,
        item_size: 20.0,
        visible_count: 10,
        ..VerticalLimitInput::default()
    });
    assert_eq!(limit, 1800.0);

    let state = virt.compute_range(5000.0, ScrollMotion::still(), &row_context(5000.0));
    assert_eq!(state.offset, 1800.0);
    assert_eq!(state.end_index, 100);
    assert_eq!(state.pool_size, state.end_index - state.start_index);
}

#[test]
fn repeated_ticks_are_structurally_equal() {
    let virt = AxisVirtualizer::new();
    let ctx = row_context(730.0);
    let a = virt.compute_range(730.0, ScrollMotion::still(), &ctx);
    let b = virt.compute_range(730.0, ScrollMotion::still(), &ctx);
    assert_eq!(a, b);
}

// --- selection + mutation + undo ---

fn engine() -> RangeMutationEngine<MemoryRowStore, BasicColumns> {
    let store = MemoryRowStore::new()
        .with_cell(CellCoord::new(0, 1), CellValue::text("alpha"))
        .with_cell(CellCoord::new(1, 1), CellValue::text("beta"));
    let columns = BasicColumns::new(vec![ColumnDef::selection(), ColumnDef::editable("name")]);
    RangeMutationEngine::new(store, columns, DependencyGraph::new(), GridBounds::new(10, 2))
        .unwrap()
}

#[test]
fn gesture_move_undo_redo_flow() {
    let mut eng = engine();

    // Shift-drag from (0,1) down to (1,1), then drag the block to row 5.
    let range = SelectionRange::cell(CellCoord::new(0, 1)).extended_to(CellCoord::new(1, 1));
    eng.set_selection(range);
    let id = eng.move_range(CellCoord::new(5, 1)).unwrap();
    assert!(id.is_some());

    let read = |eng: &RangeMutationEngine<MemoryRowStore, BasicColumns>, row| {
        eng.store()
            .borrow()
            .resolve_cell_value(CellCoord::new(row, 1))
    };
    assert_eq!(read(&eng, 5), CellValue::text("alpha"));
    assert_eq!(read(&eng, 6), CellValue::text("beta"));
    assert!(read(&eng, 0).is_null());

    let snapshot = eng.transactions().snapshot();
    assert_eq!(snapshot.undo_depth, 1);
    assert_eq!(snapshot.last_intent, Some(Intent::Move));

    eng.undo().unwrap();
    assert_eq!(read(&eng, 0), CellValue::text("alpha"));
    assert!(read(&eng, 5).is_null());

    eng.redo().unwrap();
    assert_eq!(read(&eng, 5), CellValue::text("alpha"));
    assert_eq!(eng.transactions().revision(), 3);
}

#[test]
fn snapshot_subscription_follows_engine_mutations() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let mut eng = engine();
    let revisions: Rc<RefCell<Vec<u64>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&revisions);
    eng.transactions_mut()
        .subscribe(move |snap: &TransactionSnapshot| sink.borrow_mut().push(snap.revision));

    eng.set_selection(SelectionRange::cell(CellCoord::new(0, 1)));
    eng.fill_range(CellRect::new(0, 2, 1, 1)).unwrap();
    eng.undo().unwrap();

    assert_eq!(*revisions.borrow(), vec![0, 1, 2]);
}

// --- batches through the engine's transaction log ---

#[test]
fn batched_cell_edits_commit_atomically() {
    let mut eng = engine();
    let patch = |row, text: &str, before: CellValue| {
        GridCommand::SetCells {
            patches: vec![CellPatch::new(
                CellCoord::new(row, 1),
                before,
                CellValue::text(text),
            )],
        }
    };

    let txns = eng.transactions_mut();
    let batch = txns.begin_batch(Some("rename".into()));
    txns.queue_in_batch(
        Some(batch),
        TransactionInput::new(vec![patch(0, "gamma", CellValue::text("alpha"))]),
    )
    .unwrap();
    txns.queue_in_batch(
        Some(batch),
        TransactionInput::new(vec![patch(1, "delta", CellValue::text("beta"))]),
    )
    .unwrap();
    let ids = txns.commit_batch(Some(batch)).unwrap();
    assert_eq!(ids.len(), 2);
    assert_eq!(txns.undo_depth(), 2);

    let read = |eng: &RangeMutationEngine<MemoryRowStore, BasicColumns>, row| {
        eng.store()
            .borrow()
            .resolve_cell_value(CellCoord::new(row, 1))
    };
    assert_eq!(read(&eng, 0), CellValue::text("gamma"));
    assert_eq!(read(&eng, 1), CellValue::text("delta"));

    // Each batched transaction undoes independently, newest first.
    eng.undo().unwrap();
    assert_eq!(read(&eng, 1), CellValue::text("beta"));
    eng.undo().unwrap();
    assert_eq!(read(&eng, 0), CellValue::text("alpha"));
}
