#![forbid(unsafe_code)]

//! The concrete grid command and its executor.

use std::cell::RefCell;
use std::rc::Rc;

use gridcore_core::{CellCoord, CellValue};
use gridcore_txn::{CommandExecutor, ExecContext, ExecError};

use crate::store::RowStore;

/// One reversible cell write: the value before and after.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellPatch {
    /// Target cell.
    pub coord: CellCoord,
    /// Value before the write; rollback payload.
    pub before: CellValue,
    /// Value after the write.
    pub after: CellValue,
}

impl CellPatch {
    /// A patch writing `after` over `before` at `coord`.
    #[must_use]
    pub fn new(coord: CellCoord, before: CellValue, after: CellValue) -> Self {
        Self {
            coord,
            before,
            after,
        }
    }

    /// Whether applying this patch changes anything.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.before == self.after
    }
}

/// Commands the mutation engine records against the transaction log.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridCommand {
    /// Write a set of cell patches.
    SetCells {
        /// Patches in application order.
        patches: Vec<CellPatch>,
    },
}

/// Replays [`GridCommand`]s against a shared row store.
///
/// Forward directions write `after` in order; inverse directions write
/// `before` in reverse order, so overlapping patches within one command
/// unwind correctly.
#[derive(Debug)]
pub struct GridCommandExecutor<S: RowStore> {
    store: Rc<RefCell<S>>,
}

impl<S: RowStore> GridCommandExecutor<S> {
    /// Executor over a shared store handle.
    #[must_use]
    pub fn new(store: Rc<RefCell<S>>) -> Self {
        Self { store }
    }
}

impl<S: RowStore> CommandExecutor<GridCommand> for GridCommandExecutor<S> {
    fn execute(&mut self, command: &GridCommand, ctx: &ExecContext) -> Result<(), ExecError> {
        match command {
            GridCommand::SetCells { patches } => {
                let mut store = self.store.borrow_mut();
                if ctx.direction.is_inverse() {
                    for patch in patches.iter().rev() {
                        write(&mut *store, patch.coord, &patch.before);
                    }
                } else {
                    for patch in patches {
                        write(&mut *store, patch.coord, &patch.after);
                    }
                }
                Ok(())
            }
        }
    }
}

fn write<S: RowStore>(store: &mut S, coord: CellCoord, value: &CellValue) {
    if value.is_null() {
        store.clear_edited_value(coord);
    } else {
        store.apply_edited_value(coord, value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::{CellPatch, GridCommand, GridCommandExecutor};
    use crate::store::{CellReader, MemoryRowStore};
    use gridcore_txn::{CommandExecutor, ExecContext, ExecDirection, TransactionId};
    use gridcore_core::{CellCoord, CellValue};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ctx(direction: ExecDirection) -> ExecContext {
        ExecContext {
            direction,
            transaction_id: TransactionId(0),
            command_index: 0,
            batch_id: None,
        }
    }

    #[test]
    fn apply_writes_after_and_undo_restores_before() {
        let store = Rc::new(RefCell::new(
            MemoryRowStore::new().with_cell(CellCoord::new(0, 0), CellValue::Int(1)),
        ));
        let mut exec = GridCommandExecutor::new(Rc::clone(&store));
        let cmd = GridCommand::SetCells {
            patches: vec![
                CellPatch::new(CellCoord::new(0, 0), CellValue::Int(1), CellValue::Int(9)),
                CellPatch::new(CellCoord::new(0, 1), CellValue::Null, CellValue::Int(2)),
            ],
        };

        exec.execute(&cmd, &ctx(ExecDirection::Apply)).unwrap();
        assert_eq!(
            store.borrow().resolve_cell_value(CellCoord::new(0, 0)),
            CellValue::Int(9)
        );
        assert_eq!(
            store.borrow().resolve_cell_value(CellCoord::new(0, 1)),
            CellValue::Int(2)
        );

        exec.execute(&cmd, &ctx(ExecDirection::Undo)).unwrap();
        assert_eq!(
            store.borrow().resolve_cell_value(CellCoord::new(0, 0)),
            CellValue::Int(1)
        );
        assert!(
            store
                .borrow()
                .resolve_cell_value(CellCoord::new(0, 1))
                .is_null()
        );
    }

    #[test]
    fn null_after_clears_the_cell() {
        let store = Rc::new(RefCell::new(
            MemoryRowStore::new().with_cell(CellCoord::new(2, 2), CellValue::text("x")),
        ));
        let mut exec = GridCommandExecutor::new(Rc::clone(&store));
        let cmd = GridCommand::SetCells {
            patches: vec![CellPatch::new(
                CellCoord::new(2, 2),
                CellValue::text("x"),
                CellValue::Null,
            )],
        };
        exec.execute(&cmd, &ctx(ExecDirection::Apply)).unwrap();
        assert!(store.borrow().is_empty());
        exec.execute(&cmd, &ctx(ExecDirection::Rollback)).unwrap();
        assert_eq!(
            store.borrow().resolve_cell_value(CellCoord::new(2, 2)),
            CellValue::text("x")
        );
    }

    #[test]
    fn noop_patch_detection() {
        let p = CellPatch::new(CellCoord::new(0, 0), CellValue::Int(1), CellValue::Int(1));
        assert!(p.is_noop());
    }
}
