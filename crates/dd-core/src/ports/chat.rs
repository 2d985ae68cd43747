use async_trait::async_trait;

use super::ApiError;
use crate::document::ChatExchange;
use crate::ids::DocumentId;

/// Chat API for conversations about one document.
#[async_trait]
pub trait ChatPort: Send + Sync {
    /// Prior exchanges, oldest first.
    async fn history(&self, document_id: &DocumentId) -> Result<Vec<ChatExchange>, ApiError>;

    async fn send(&self, document_id: &DocumentId, message: &str) -> Result<ChatExchange, ApiError>;

    async fn clear(&self, document_id: &DocumentId) -> Result<(), ApiError>;
}
