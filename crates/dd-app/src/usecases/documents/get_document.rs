use std::sync::Arc;

use anyhow::{Context, Result};
use dd_core::ports::DocumentRepositoryPort;
use dd_core::{Document, DocumentId};
use tracing::info;

use super::ensure_valid_id;

/// Load one document with its full extracted text.
pub struct GetDocument {
    repository: Arc<dyn DocumentRepositoryPort>,
}

impl GetDocument {
    pub fn from_arc(repository: Arc<dyn DocumentRepositoryPort>) -> Self {
        Self { repository }
    }

    #[tracing::instrument(name = "usecase.get_document.execute", skip(self), fields(document_id = %id))]
    pub async fn execute(&self, id: &DocumentId) -> Result<Document> {
        ensure_valid_id(id)?;

        let document = self
            .repository
            .get_document(id)
            .await
            .with_context(|| format!("Failed to load document {id}"))?;

        info!(status = %document.status, "Document loaded");
        Ok(document)
    }
}
