use serde::Serialize;

use crate::document::DocumentCollection;
use crate::ports::ApiError;

/// Remote search lifecycle for the current search session.
///
/// `Idle → Debouncing → Fetching → Idle | Error`. A keystroke while
/// debouncing restarts the timer without a transition.
///
/// 远程搜索状态。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RemoteSearchState {
    #[default]
    Idle,
    Debouncing {
        term: String,
    },
    Fetching {
        seq: u64,
        term: String,
    },
    Error {
        seq: u64,
        message: String,
    },
}

/// Inputs that move [`RemoteSearchState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteSearchTransition {
    /// A debounce timer was (re)started for `term`.
    Scheduled { term: String },
    /// Pending timer dropped, or in-flight work invalidated.
    Cancelled,
    /// Request `seq` went out.
    Issued { seq: u64, term: String },
    /// Response `seq` was accepted and applied.
    Applied { seq: u64 },
    /// Request `seq` failed and the failure was accepted.
    Failed { seq: u64, message: String },
}

impl RemoteSearchState {
    /// Pure transition function.
    ///
    /// Completion of a request only moves the state when it is the request the
    /// state is tracking; a completion that races a newer keystroke leaves
    /// `Debouncing` in place.
    pub fn transition(self, input: RemoteSearchTransition) -> Self {
        use RemoteSearchTransition as T;

        match (self, input) {
            (_, T::Scheduled { term }) => RemoteSearchState::Debouncing { term },
            (_, T::Cancelled) => RemoteSearchState::Idle,
            (_, T::Issued { seq, term }) => RemoteSearchState::Fetching { seq, term },
            (RemoteSearchState::Fetching { seq: current, .. }, T::Applied { seq }) if current == seq => {
                RemoteSearchState::Idle
            }
            (RemoteSearchState::Fetching { seq: current, .. }, T::Failed { seq, message })
                if current == seq =>
            {
                RemoteSearchState::Error { seq, message }
            }
            (state, T::Applied { .. }) | (state, T::Failed { .. }) => state,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            RemoteSearchState::Debouncing { .. } | RemoteSearchState::Fetching { .. }
        )
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            RemoteSearchState::Error { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Notifications for the host UI (spinners, error banners).
#[derive(Debug, Clone)]
pub enum RemoteSearchEvent {
    Started { seq: u64, term: String },
    Succeeded { seq: u64, documents: DocumentCollection },
    Failed { seq: u64, error: ApiError },
}

impl RemoteSearchEvent {
    pub fn seq(&self) -> u64 {
        match self {
            RemoteSearchEvent::Started { seq, .. }
            | RemoteSearchEvent::Succeeded { seq, .. }
            | RemoteSearchEvent::Failed { seq, .. } => *seq,
        }
    }
}
