use async_trait::async_trait;

use super::ApiError;
use crate::document::Document;
use crate::ids::DocumentId;

/// Document retrieval API.
#[async_trait]
pub trait DocumentRepositoryPort: Send + Sync {
    /// All documents, or the server-side search result for `search`.
    ///
    /// The server may rank results (full-text score); order is preserved.
    async fn list_documents(&self, search: Option<&str>) -> Result<Vec<Document>, ApiError>;

    /// Single document including its full text body.
    async fn get_document(&self, id: &DocumentId) -> Result<Document, ApiError>;

    async fn delete_document(&self, id: &DocumentId) -> Result<(), ApiError>;

    async fn update_title(&self, id: &DocumentId, title: &str) -> Result<Document, ApiError>;

    async fn update_content(&self, id: &DocumentId, content: &str) -> Result<Document, ApiError>;
}
