#![forbid(unsafe_code)]

//! Transactional command log with batching and bounded undo/redo.
//!
//! Commands are opaque to the service: it never interprets a payload, only
//! replays it through an injected [`CommandExecutor`] with an explicit
//! [`ExecDirection`]. Committed transactions live on an undo stack until a
//! new transaction supersedes them (clearing redo) or the configured
//! history depth evicts them. Observers receive plain
//! [`TransactionSnapshot`] values — never references into service state.

pub mod command;
pub mod service;

pub use command::{
    BatchId, CommandExecutor, ExecContext, ExecDirection, ExecError, SubscriptionId, TransactionId,
};
pub use service::{
    Intent, Transaction, TransactionError, TransactionInput, TransactionService,
    TransactionSnapshot,
};
