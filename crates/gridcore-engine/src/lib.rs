#![forbid(unsafe_code)]

//! Range mutation engine.
//!
//! Orchestrates move and fill over the active selection rectangle: geometry
//! from `gridcore-select`, recompute decisions from `gridcore-graph`, and
//! reversible recording through `gridcore-txn`. Row data stays behind the
//! [`RowStore`] seam, so the engine never assumes a concrete row shape.

pub mod columns;
pub mod command;
pub mod engine;
pub mod store;

pub use columns::{BasicColumns, ColumnDef, ColumnModel, ComputedColumn};
pub use command::{CellPatch, GridCommand, GridCommandExecutor};
pub use engine::{MutationError, RangeMutationEngine};
pub use store::{CellReader, MemoryRowStore, RowStore};
