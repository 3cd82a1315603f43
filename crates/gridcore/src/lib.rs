#![forbid(unsafe_code)]

//! GridCore public facade crate.
//!
//! Re-exports the deterministic data-grid core: per-axis virtualization,
//! rectangular selection geometry, the dependency graph, the transaction
//! log, and the range mutation engine. The core renders nothing, reads no
//! clock or random source, and performs no I/O; hosts feed it
//! already-measured metrics and already-resolved grid coordinates, and
//! render the plain snapshots it hands back.

// --- Core re-exports -------------------------------------------------------

pub use gridcore_core::{
    Axis, AxisContext, CellCoord, CellValue, ColumnFlags, GridBounds, OverscanConfig,
    VirtualizerState,
};

// --- Virtualization re-exports --------------------------------------------

pub use gridcore_virtual::{
    AxisVirtualizer, ContentLimitClamp, HorizontalLimitInput, OverscanSplit, ScrollClamp,
    ScrollDirection, ScrollMotion, VelocityTracker, VerticalLimitInput, clamp_scroll_offset,
    compute_overscan, horizontal_scroll_limit, split_lead_trail, vertical_scroll_limit,
};

// --- Selection re-exports --------------------------------------------------

pub use gridcore_select::{CellRect, SelectionRange, SelectionSet};

// --- Dependency graph re-exports -------------------------------------------

pub use gridcore_graph::{
    CyclePolicy, DependencyEdge, DependencyGraph, DependencyToken, Domain, EdgeKind, GraphError,
    NodeId, TokenParseError,
};

// --- Transaction re-exports ------------------------------------------------

pub use gridcore_txn::{
    BatchId, CommandExecutor, ExecContext, ExecDirection, ExecError, Intent, SubscriptionId,
    Transaction, TransactionError, TransactionId, TransactionInput, TransactionService,
    TransactionSnapshot,
};

// --- Mutation engine re-exports --------------------------------------------

pub use gridcore_engine::{
    BasicColumns, CellPatch, CellReader, ColumnDef, ColumnModel, ComputedColumn, GridCommand,
    GridCommandExecutor, MemoryRowStore, MutationError, RangeMutationEngine, RowStore,
};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    //! Common imports for day-to-day GridCore usage.
    pub use crate::{
        AxisContext, AxisVirtualizer, CellCoord, CellRect, CellValue, ColumnFlags,
        DependencyGraph, GridBounds, Intent, OverscanConfig, RangeMutationEngine, RowStore,
        ScrollMotion, SelectionRange, SelectionSet, TransactionService, TransactionSnapshot,
        VirtualizerState,
    };
}
