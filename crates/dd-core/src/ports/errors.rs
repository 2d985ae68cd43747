use thiserror::Error;

use crate::ids::DocumentId;

/// Failure talking to the backend.
///
/// Clonable so it can travel inside [`RemoteSearchEvent`](crate::search::RemoteSearchEvent).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("invalid document id: {0:?}")]
    InvalidId(String),

    #[error("document not found: {0}")]
    NotFound(DocumentId),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Whether retrying the same request later could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}
