//! Error types for conversation service operations.

use chat_core::OfferError;
use chat_store::StoreError;
use notifier::NotifyError;
use thiserror::Error;

/// Errors surfaced by conversation service operations.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Caller-supplied argument failed a precondition. User-correctable,
    /// not retryable as-is.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Referenced conversation or message does not exist. The caller's
    /// state is stale; re-fetch rather than retry.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The offer state machine rejected a transition.
    #[error("offer error: {0}")]
    Offer(#[from] OfferError),

    /// Notification fan-out failed after the in-memory mutation applied.
    #[error("notification fan-out failed: {0}")]
    Notification(#[from] NotifyError),

    /// Snapshot persistence failed after the in-memory mutation applied.
    /// Retry the save, not the original action.
    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

impl ChatError {
    pub(crate) fn conversation_not_found(id: &str) -> Self {
        ChatError::NotFound {
            entity: "conversation",
            id: id.to_string(),
        }
    }
}

/// Result type for conversation service operations.
pub type Result<T> = std::result::Result<T, ChatError>;
