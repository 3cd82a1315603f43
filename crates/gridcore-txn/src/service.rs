#![forbid(unsafe_code)]

//! The transaction service: command log, batches, undo/redo stacks.

use std::collections::HashMap;
use std::fmt;

use crate::command::{
    BatchId, CommandExecutor, ExecContext, ExecDirection, ExecError, SubscriptionId, TransactionId,
};

/// Semantic label attached to a transaction for user-facing undo messaging.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Intent {
    /// Direct cell edit.
    Edit,
    /// Range move gesture.
    Move,
    /// Range fill gesture.
    Fill,
    /// Host-defined intent.
    Other(String),
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Edit => f.write_str("edit"),
            Self::Move => f.write_str("move"),
            Self::Fill => f.write_str("fill"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// Input for committing one transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionInput<C> {
    /// Optional human-readable label.
    pub label: Option<String>,
    /// Optional semantic intent.
    pub intent: Option<Intent>,
    /// Commands in execution order.
    pub commands: Vec<C>,
}

impl<C> TransactionInput<C> {
    /// Input with commands only.
    #[must_use]
    pub fn new(commands: Vec<C>) -> Self {
        Self {
            label: None,
            intent: None,
            commands,
        }
    }

    /// Attach a label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attach an intent.
    #[must_use]
    pub fn with_intent(mut self, intent: Intent) -> Self {
        self.intent = Some(intent);
        self
    }
}

/// A committed transaction retained for replay.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction<C> {
    /// Assigned id.
    pub id: TransactionId,
    /// Optional label.
    pub label: Option<String>,
    /// Optional intent.
    pub intent: Option<Intent>,
    /// Commands in apply order.
    pub commands: Vec<C>,
}

/// The only state exposed to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransactionSnapshot {
    /// Increments on every committed, undone, or redone transaction.
    pub revision: u64,
    /// Whether any batch is open.
    pub pending_batch: bool,
    /// Undo stack depth.
    pub undo_depth: usize,
    /// Redo stack depth.
    pub redo_depth: usize,
    /// Id of the transaction whose effects are currently last-applied.
    pub last_committed: Option<TransactionId>,
    /// Intent of the most recent commit, for host undo messaging.
    pub last_intent: Option<Intent>,
}

/// Transaction service failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    /// The executor failed; partially applied commands were rolled back.
    ExecutionFailed {
        /// Transaction whose command failed.
        transaction_id: TransactionId,
        /// Index of the failing command.
        command_index: usize,
        /// Executor-reported cause.
        source: ExecError,
    },
    /// Commit or rollback of a batch id that was never opened.
    UnknownBatch(BatchId),
}

impl fmt::Display for TransactionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExecutionFailed {
                transaction_id,
                command_index,
                source,
            } => write!(
                f,
                "command {command_index} of transaction {} failed: {source}",
                transaction_id.0
            ),
            Self::UnknownBatch(id) => write!(f, "batch {} is not open", id.0),
        }
    }
}

impl std::error::Error for TransactionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ExecutionFailed { source, .. } => Some(source),
            Self::UnknownBatch(_) => None,
        }
    }
}

struct PendingBatch<C> {
    id: BatchId,
    label: Option<String>,
    queued: Vec<TransactionInput<C>>,
}

type Listener = Box<dyn FnMut(&TransactionSnapshot)>;

/// Command-log based undo/redo service with batching and bounded history.
///
/// All ids come from counters owned by the instance, so independent
/// services never share or leak state.
pub struct TransactionService<C, E: CommandExecutor<C>> {
    executor: E,
    batches: Vec<PendingBatch<C>>,
    store: HashMap<TransactionId, Transaction<C>>,
    undo_stack: Vec<TransactionId>,
    redo_stack: Vec<TransactionId>,
    revision: u64,
    last_committed: Option<TransactionId>,
    last_intent: Option<Intent>,
    max_history_depth: usize,
    next_transaction: u64,
    next_batch: u64,
    next_subscription: u64,
    subscribers: Vec<(SubscriptionId, Listener)>,
}

impl<C, E: CommandExecutor<C>> fmt::Debug for TransactionService<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionService")
            .field("revision", &self.revision)
            .field("open_batches", &self.batches.len())
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl<C, E: CommandExecutor<C>> TransactionService<C, E> {
    /// Default bound on undo history.
    pub const DEFAULT_MAX_HISTORY: usize = 100;

    /// Create a service around an injected executor.
    #[must_use]
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            batches: Vec::new(),
            store: HashMap::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            revision: 0,
            last_committed: None,
            last_intent: None,
            max_history_depth: Self::DEFAULT_MAX_HISTORY,
            next_transaction: 0,
            next_batch: 0,
            next_subscription: 0,
            subscribers: Vec::new(),
        }
    }

    /// Bound the undo history; oldest entries are evicted beyond it.
    #[must_use]
    pub fn with_max_history(mut self, depth: usize) -> Self {
        self.max_history_depth = depth.max(1);
        self
    }

    /// Whether undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Undo stack depth.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Redo stack depth.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Current revision.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// A committed transaction still retained in history.
    #[must_use]
    pub fn transaction(&self, id: TransactionId) -> Option<&Transaction<C>> {
        self.store.get(&id)
    }

    /// Current observer snapshot.
    #[must_use]
    pub fn snapshot(&self) -> TransactionSnapshot {
        TransactionSnapshot {
            revision: self.revision,
            pending_batch: !self.batches.is_empty(),
            undo_depth: self.undo_stack.len(),
            redo_depth: self.redo_stack.len(),
            last_committed: self.last_committed,
            last_intent: self.last_intent.clone(),
        }
    }

    // ====================================================================
    // Subscriptions
    // ====================================================================

    /// Register a snapshot listener.
    ///
    /// The current snapshot is delivered immediately, then again after
    /// every committed/undone/redone/rolled-back transition.
    pub fn subscribe(&mut self, mut listener: impl FnMut(&TransactionSnapshot) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        listener(&self.snapshot());
        self.subscribers.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false for unknown ids.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    fn notify(&mut self) {
        let snapshot = self.snapshot();
        for (_, listener) in &mut self.subscribers {
            listener(&snapshot);
        }
    }

    // ====================================================================
    // Batches
    // ====================================================================

    /// Open a batch. Queued transactions commit or roll back as one unit.
    pub fn begin_batch(&mut self, label: Option<String>) -> BatchId {
        let id = BatchId(self.next_batch);
        self.next_batch += 1;
        self.batches.push(PendingBatch {
            id,
            label,
            queued: Vec::new(),
        });
        id
    }

    /// Queue a transaction into an open batch.
    ///
    /// `batch_id = None` targets the most recently opened batch.
    pub fn queue_in_batch(
        &mut self,
        batch_id: Option<BatchId>,
        input: TransactionInput<C>,
    ) -> Result<(), TransactionError> {
        let batch = self.find_batch_mut(batch_id)?;
        batch.queued.push(input);
        Ok(())
    }

    /// Discard an open batch without executing anything.
    pub fn rollback_batch(&mut self, batch_id: Option<BatchId>) -> Result<(), TransactionError> {
        let index = self.find_batch_index(batch_id)?;
        self.batches.remove(index);
        self.notify();
        Ok(())
    }

    /// Commit an open batch.
    ///
    /// Every queued command runs FIFO through the executor. On the first
    /// failure, already-executed commands are rolled back in reverse order
    /// and the whole batch is discarded — no partial commit is observable.
    /// On success the queued transactions join the undo history in order
    /// and their ids are returned.
    pub fn commit_batch(
        &mut self,
        batch_id: Option<BatchId>,
    ) -> Result<Vec<TransactionId>, TransactionError> {
        let index = self.find_batch_index(batch_id)?;
        let batch = self.batches.remove(index);

        #[cfg(feature = "tracing")]
        tracing::debug!(batch = batch.id.0, queued = batch.queued.len(), "commit batch");

        let transactions: Vec<Transaction<C>> = batch
            .queued
            .into_iter()
            .map(|input| {
                let id = TransactionId(self.next_transaction);
                self.next_transaction += 1;
                Transaction {
                    id,
                    // Unlabeled transactions inherit the batch label.
                    label: input.label.or_else(|| batch.label.clone()),
                    intent: input.intent,
                    commands: input.commands,
                }
            })
            .collect();

        // Flat execution order for prefix rollback.
        let mut executed: Vec<(usize, usize)> = Vec::new();
        for (ti, txn) in transactions.iter().enumerate() {
            for (ci, command) in txn.commands.iter().enumerate() {
                let ctx = ExecContext {
                    direction: ExecDirection::Apply,
                    transaction_id: txn.id,
                    command_index: ci,
                    batch_id: Some(batch.id),
                };
                if let Err(source) = self.executor.execute(command, &ctx) {
                    // Unwind best-effort: a rollback failure cannot make the
                    // batch any less committed than it already is.
                    for &(tj, cj) in executed.iter().rev() {
                        let txn = &transactions[tj];
                        let ctx = ExecContext {
                            direction: ExecDirection::Rollback,
                            transaction_id: txn.id,
                            command_index: cj,
                            batch_id: Some(batch.id),
                        };
                        let _ = self.executor.execute(&txn.commands[cj], &ctx);
                    }
                    return Err(TransactionError::ExecutionFailed {
                        transaction_id: txn.id,
                        command_index: ci,
                        source,
                    });
                }
                executed.push((ti, ci));
            }
        }

        let ids: Vec<TransactionId> = transactions.iter().map(|t| t.id).collect();
        for txn in transactions {
            self.record_commit(txn);
        }
        self.notify();
        Ok(ids)
    }

    // ====================================================================
    // Direct commits
    // ====================================================================

    /// Commit a single transaction outside the batch flow.
    ///
    /// Clears the redo stack (new history invalidates redo). On executor
    /// failure the partially-applied prefix is rolled back in reverse and
    /// the error is returned; the undo history is untouched.
    pub fn apply_transaction(
        &mut self,
        input: TransactionInput<C>,
    ) -> Result<TransactionId, TransactionError> {
        let id = TransactionId(self.next_transaction);
        self.next_transaction += 1;
        let txn = Transaction {
            id,
            label: input.label,
            intent: input.intent,
            commands: input.commands,
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(transaction = id.0, commands = txn.commands.len(), "apply transaction");

        for (ci, command) in txn.commands.iter().enumerate() {
            let ctx = ExecContext {
                direction: ExecDirection::Apply,
                transaction_id: id,
                command_index: ci,
                batch_id: None,
            };
            if let Err(source) = self.executor.execute(command, &ctx) {
                for cj in (0..ci).rev() {
                    let ctx = ExecContext {
                        direction: ExecDirection::Rollback,
                        transaction_id: id,
                        command_index: cj,
                        batch_id: None,
                    };
                    let _ = self.executor.execute(&txn.commands[cj], &ctx);
                }
                return Err(TransactionError::ExecutionFailed {
                    transaction_id: id,
                    command_index: ci,
                    source,
                });
            }
        }

        self.record_commit(txn);
        self.notify();
        Ok(id)
    }

    /// Push a committed transaction onto the undo history.
    fn record_commit(&mut self, txn: Transaction<C>) {
        let id = txn.id;
        self.last_intent = txn.intent.clone();
        self.store.insert(id, txn);
        self.undo_stack.push(id);
        // New history supersedes the redo ids; their stored transactions
        // are unreachable from either stack and must not be retained.
        for stale in self.redo_stack.drain(..) {
            self.store.remove(&stale);
        }
        self.last_committed = Some(id);
        self.revision += 1;
        while self.undo_stack.len() > self.max_history_depth {
            let evicted = self.undo_stack.remove(0);
            self.store.remove(&evicted);
        }
    }

    // ====================================================================
    // Undo / redo
    // ====================================================================

    /// Undo the most recent transaction.
    ///
    /// Commands replay in reverse order with [`ExecDirection::Undo`]. An
    /// empty stack is a normal `Ok(None)`, never an error. If the executor
    /// fails mid-undo, the already-undone suffix is re-applied and the
    /// transaction stays on the undo stack.
    pub fn undo(&mut self) -> Result<Option<TransactionId>, TransactionError> {
        let Some(id) = self.undo_stack.pop() else {
            return Ok(None);
        };
        // Stack and store are kept in lockstep by eviction.
        let Some(txn) = self.store.get(&id) else {
            return Ok(None);
        };

        let total = txn.commands.len();
        for step in 0..total {
            let ci = total - 1 - step;
            let ctx = ExecContext {
                direction: ExecDirection::Undo,
                transaction_id: id,
                command_index: ci,
                batch_id: None,
            };
            if let Err(source) = self.executor.execute(&txn.commands[ci], &ctx) {
                // Re-apply the undone suffix so observable state returns to
                // the pre-undo point, then restore the stack.
                for cj in (ci + 1)..total {
                    let ctx = ExecContext {
                        direction: ExecDirection::Redo,
                        transaction_id: id,
                        command_index: cj,
                        batch_id: None,
                    };
                    let _ = self.executor.execute(&txn.commands[cj], &ctx);
                }
                self.undo_stack.push(id);
                return Err(TransactionError::ExecutionFailed {
                    transaction_id: id,
                    command_index: ci,
                    source,
                });
            }
        }

        self.redo_stack.push(id);
        self.last_committed = self.undo_stack.last().copied();
        self.revision += 1;
        self.notify();
        Ok(Some(id))
    }

    /// Redo the most recently undone transaction.
    ///
    /// Commands replay forward with [`ExecDirection::Redo`]. An empty
    /// stack is a normal `Ok(None)`.
    pub fn redo(&mut self) -> Result<Option<TransactionId>, TransactionError> {
        let Some(id) = self.redo_stack.pop() else {
            return Ok(None);
        };
        let Some(txn) = self.store.get(&id) else {
            return Ok(None);
        };

        for ci in 0..txn.commands.len() {
            let ctx = ExecContext {
                direction: ExecDirection::Redo,
                transaction_id: id,
                command_index: ci,
                batch_id: None,
            };
            if let Err(source) = self.executor.execute(&txn.commands[ci], &ctx) {
                for cj in (0..ci).rev() {
                    let ctx = ExecContext {
                        direction: ExecDirection::Undo,
                        transaction_id: id,
                        command_index: cj,
                        batch_id: None,
                    };
                    let _ = self.executor.execute(&txn.commands[cj], &ctx);
                }
                self.redo_stack.push(id);
                return Err(TransactionError::ExecutionFailed {
                    transaction_id: id,
                    command_index: ci,
                    source,
                });
            }
        }

        self.undo_stack.push(id);
        self.last_committed = Some(id);
        self.revision += 1;
        self.notify();
        Ok(Some(id))
    }

    // ====================================================================
    // Batch lookup
    // ====================================================================

    fn find_batch_index(&self, batch_id: Option<BatchId>) -> Result<usize, TransactionError> {
        match batch_id {
            Some(id) => self
                .batches
                .iter()
                .position(|b| b.id == id)
                .ok_or(TransactionError::UnknownBatch(id)),
            None => {
                if self.batches.is_empty() {
                    Err(TransactionError::UnknownBatch(BatchId(self.next_batch)))
                } else {
                    Ok(self.batches.len() - 1)
                }
            }
        }
    }

    fn find_batch_mut(
        &mut self,
        batch_id: Option<BatchId>,
    ) -> Result<&mut PendingBatch<C>, TransactionError> {
        let index = self.find_batch_index(batch_id)?;
        Ok(&mut self.batches[index])
    }
}
