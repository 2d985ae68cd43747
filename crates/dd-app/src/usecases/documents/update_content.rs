use std::sync::Arc;

use anyhow::{Context, Result};
use dd_core::ports::DocumentRepositoryPort;
use dd_core::{Document, DocumentId};
use tracing::info;

use super::ensure_valid_id;

/// Save an edited extracted-text body.
///
/// Empty content is allowed: it clears the text.
pub struct UpdateDocumentContent {
    repository: Arc<dyn DocumentRepositoryPort>,
}

impl UpdateDocumentContent {
    pub fn from_arc(repository: Arc<dyn DocumentRepositoryPort>) -> Self {
        Self { repository }
    }

    #[tracing::instrument(
        name = "usecase.update_document_content.execute",
        skip(self, content),
        fields(document_id = %id, content_len = content.len())
    )]
    pub async fn execute(&self, id: &DocumentId, content: &str) -> Result<Document> {
        ensure_valid_id(id)?;

        let document = self
            .repository
            .update_content(id, content)
            .await
            .with_context(|| format!("Failed to save content of document {id}"))?;

        info!("Document content saved");
        Ok(document)
    }
}
