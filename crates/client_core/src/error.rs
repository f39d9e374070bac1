use thiserror::Error;

use crate::inflight::ActionKey;

/// Why a user action did not complete. Every variant is terminal for the
/// triggering action; nothing is retried automatically.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("No data available. Please upload a file first.")]
    MissingSession,
    #[error("{message}")]
    Transport { message: String },
    #[error("{message}")]
    Service { message: String },
    #[error("Invalid student index {index} (dataset holds {len} records)")]
    InvalidIndex { index: usize, len: usize },
    #[error("Record {index} has no email address")]
    NoContactAddress { index: usize },
    #[error("Record {index} has already been notified")]
    AlreadySent { index: usize },
    #[error("{0}")]
    InvalidUpload(String),
    #[error("{key} is already in progress")]
    Busy { key: ActionKey },
}

impl ActionError {
    /// Rejected before any request was sent.
    pub fn is_client_side(&self) -> bool {
        !matches!(self, Self::Transport { .. } | Self::Service { .. })
    }
}
