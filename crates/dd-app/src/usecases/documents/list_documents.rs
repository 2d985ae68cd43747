use std::sync::Arc;

use anyhow::{Context, Result};
use dd_core::ports::DocumentRepositoryPort;
use dd_core::Document;
use tracing::info;

/// Fetch the document list, optionally narrowed by a server-side search.
pub struct ListDocuments {
    repository: Arc<dyn DocumentRepositoryPort>,
}

impl ListDocuments {
    pub fn from_arc(repository: Arc<dyn DocumentRepositoryPort>) -> Self {
        Self { repository }
    }

    #[tracing::instrument(name = "usecase.list_documents.execute", skip(self))]
    pub async fn execute(&self, search: Option<&str>) -> Result<Vec<Document>> {
        let search = search.map(str::trim).filter(|term| !term.is_empty());
        let documents = self
            .repository
            .list_documents(search)
            .await
            .context("Failed to list documents")?;

        info!(count = documents.len(), "Documents listed");
        Ok(documents)
    }
}
