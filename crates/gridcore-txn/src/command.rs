#![forbid(unsafe_code)]

//! Executor seam: ids, replay directions, and the command executor trait.

use std::fmt;

/// Identity of a committed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransactionId(pub u64);

/// Identity of an open batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchId(pub u64);

/// Handle for cancelling a snapshot subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Why a command is being replayed.
///
/// Matched exhaustively by executors so a missing case is a compile error,
/// not a silently ignored string tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecDirection {
    /// First execution while committing.
    Apply,
    /// Reverse execution while unwinding a failed commit.
    Rollback,
    /// Reverse execution for user-facing undo.
    Undo,
    /// Forward re-execution for user-facing redo.
    Redo,
}

impl ExecDirection {
    /// Whether the executor should apply the command's inverse.
    #[inline]
    #[must_use]
    pub const fn is_inverse(&self) -> bool {
        matches!(self, Self::Rollback | Self::Undo)
    }
}

/// Replay context handed to the executor alongside each command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecContext {
    /// Why this command is running.
    pub direction: ExecDirection,
    /// The transaction being replayed.
    pub transaction_id: TransactionId,
    /// Position of the command within its transaction.
    pub command_index: usize,
    /// The batch being committed, when the replay is part of one.
    pub batch_id: Option<BatchId>,
}

/// Failure reported by an executor for a single command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecError {
    message: String,
}

impl ExecError {
    /// Create an error with a host-facing message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The host-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ExecError {}

/// Executes commands on behalf of the transaction service.
///
/// The service sequences calls strictly: commands within one transaction or
/// batch never run concurrently with each other. A host persisting to a
/// remote store resolves its own asynchrony before returning.
pub trait CommandExecutor<C> {
    /// Execute one command in the given direction.
    fn execute(&mut self, command: &C, ctx: &ExecContext) -> Result<(), ExecError>;
}

impl<C, F> CommandExecutor<C> for F
where
    F: FnMut(&C, &ExecContext) -> Result<(), ExecError>,
{
    fn execute(&mut self, command: &C, ctx: &ExecContext) -> Result<(), ExecError> {
        self(command, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::{ExecContext, ExecDirection, ExecError, TransactionId};

    #[test]
    fn direction_inverse_classification() {
        assert!(ExecDirection::Rollback.is_inverse());
        assert!(ExecDirection::Undo.is_inverse());
        assert!(!ExecDirection::Apply.is_inverse());
        assert!(!ExecDirection::Redo.is_inverse());
    }

    #[test]
    fn exec_error_display() {
        let err = ExecError::new("store rejected write");
        assert_eq!(err.to_string(), "store rejected write");
        assert_eq!(err.message(), "store rejected write");
    }

    #[test]
    fn context_is_plain_data() {
        let ctx = ExecContext {
            direction: ExecDirection::Apply,
            transaction_id: TransactionId(7),
            command_index: 2,
            batch_id: None,
        };
        assert_eq!(ctx, ctx);
    }
}
