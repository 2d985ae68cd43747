use std::sync::Arc;

use anyhow::{Context, Result};
use dd_core::ports::DocumentRepositoryPort;
use dd_core::DocumentId;
use tracing::info;

use super::ensure_valid_id;
use crate::usecases::search::DocumentBrowser;

/// Use case for deleting a document.
///
/// ## Behavior / 行为
/// - Deletes the document on the server
/// - On success, drops it from the mounted browser (if any) so the list
///   updates without a refetch
/// - On failure nothing changes locally
pub struct DeleteDocument {
    repository: Arc<dyn DocumentRepositoryPort>,
}

impl DeleteDocument {
    pub fn from_arc(repository: Arc<dyn DocumentRepositoryPort>) -> Self {
        Self { repository }
    }

    #[tracing::instrument(name = "usecase.delete_document.execute", skip(self, browser), fields(document_id = %id))]
    pub async fn execute(&self, id: &DocumentId, browser: Option<&DocumentBrowser>) -> Result<()> {
        ensure_valid_id(id)?;
        info!("Deleting document");

        self.repository
            .delete_document(id)
            .await
            .with_context(|| format!("Failed to delete document {id}"))?;

        if let Some(browser) = browser {
            browser.remove_document(id);
        }

        info!("Document deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::search::BrowserOptions;
    use crate::usecases::test_support::StubRepository;
    use dd_core::ports::NoopSearchEvents;
    use dd_core::{Document, DocumentStatus};

    fn sample() -> Vec<Document> {
        vec![
            Document::new("1", "lease.pdf", DocumentStatus::Processed),
            Document::new("2", "receipt.png", DocumentStatus::Processed),
        ]
    }

    #[tokio::test]
    async fn removes_from_browser_after_server_delete() {
        let repository = Arc::new(StubRepository::with_documents(sample()));
        let browser = DocumentBrowser::initialize(
            sample(),
            None,
            repository.clone(),
            Arc::new(NoopSearchEvents),
            BrowserOptions::default(),
        );
        let uc = DeleteDocument::from_arc(repository.clone());

        uc.execute(&DocumentId::from("1"), Some(&browser)).await.unwrap();

        assert_eq!(*repository.deleted.lock().unwrap(), vec![DocumentId::from("1")]);
        assert_eq!(browser.visible_page().total_count, 1);
    }

    #[tokio::test]
    async fn failed_delete_keeps_local_copy() {
        let repository = Arc::new(StubRepository::default());
        let browser = DocumentBrowser::initialize(
            sample(),
            None,
            repository.clone(),
            Arc::new(NoopSearchEvents),
            BrowserOptions::default(),
        );
        let uc = DeleteDocument::from_arc(repository);

        assert!(uc.execute(&DocumentId::from("1"), Some(&browser)).await.is_err());
        assert_eq!(browser.visible_page().total_count, 2);
    }
}
