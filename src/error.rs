//! Error types for the picker

use thiserror::Error;

use crate::table::ShapeError;

/// Failure of a picker run
#[derive(Debug, Error)]
pub enum PickerError {
    /// stdin/stdout is not a terminal
    #[error("terminal is not interactive")]
    NonInteractiveTerminal,

    #[error("invalid table data: {0}")]
    InvalidTableData(#[from] ShapeError),

    #[error("table has no rows")]
    EmptyTable,

    /// The user backed out with Escape (or the key source ran dry)
    #[error("selection cancelled")]
    UserCancelled,

    /// The session has not stopped yet
    #[error("selection is not yet available")]
    Pending,

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("input task failed: {0}")]
    InputTask(#[from] tokio::task::JoinError),
}

impl PickerError {
    /// True for the normal "user backed out" outcome
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PickerError::UserCancelled)
    }
}

/// Why an incoming table update was discarded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateRejected {
    #[error("update has invalid shape: {0}")]
    Shape(#[from] ShapeError),

    #[error("update has no rows")]
    Empty,

    #[error("update has {found} columns, table has {expected}")]
    ColumnsChanged { expected: usize, found: usize },

    #[error("session already stopped")]
    Stopped,
}
