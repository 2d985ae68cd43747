use std::sync::Arc;

use anyhow::{bail, Context, Result};
use dd_core::ports::DocumentRepositoryPort;
use dd_core::{Document, DocumentId};
use tracing::info;

use super::ensure_valid_id;
use crate::usecases::search::DocumentBrowser;

/// Change a document's display title.
pub struct RenameDocument {
    repository: Arc<dyn DocumentRepositoryPort>,
}

impl RenameDocument {
    pub fn from_arc(repository: Arc<dyn DocumentRepositoryPort>) -> Self {
        Self { repository }
    }

    #[tracing::instrument(name = "usecase.rename_document.execute", skip(self, browser), fields(document_id = %id))]
    pub async fn execute(
        &self,
        id: &DocumentId,
        title: &str,
        browser: Option<&DocumentBrowser>,
    ) -> Result<Document> {
        ensure_valid_id(id)?;
        let title = title.trim();
        if title.is_empty() {
            bail!("Document title must not be empty");
        }

        let document = self
            .repository
            .update_title(id, title)
            .await
            .with_context(|| format!("Failed to rename document {id}"))?;

        if let Some(browser) = browser {
            browser.upsert_document(document.clone());
        }

        info!(title = %document.filename, "Document renamed");
        Ok(document)
    }
}
