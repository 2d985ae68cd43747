//! Port mocks shared by use case tests.

use std::sync::Mutex;

use async_trait::async_trait;
use dd_core::ports::{
    ApiError, ChatPort, DocumentRepositoryPort, DocumentUploadPort, UploadProgressSender, UploadRequest,
};
use dd_core::{ChatExchange, Document, DocumentId};
use mockall::mock;

mock! {
    pub Chat {}

    #[async_trait]
    impl ChatPort for Chat {
        async fn history(&self, document_id: &DocumentId) -> Result<Vec<ChatExchange>, ApiError>;
        async fn send(&self, document_id: &DocumentId, message: &str) -> Result<ChatExchange, ApiError>;
        async fn clear(&self, document_id: &DocumentId) -> Result<(), ApiError>;
    }
}

mock! {
    pub Uploads {}

    #[async_trait]
    impl DocumentUploadPort for Uploads {
        async fn upload(
            &self,
            request: UploadRequest,
            progress: Option<UploadProgressSender>,
        ) -> Result<Vec<Document>, ApiError>;
    }
}

/// In-memory repository that records mutating calls.
#[derive(Default)]
pub struct StubRepository {
    pub documents: Mutex<Vec<Document>>,
    pub deleted: Mutex<Vec<DocumentId>>,
}

impl StubRepository {
    pub fn with_documents(documents: Vec<Document>) -> Self {
        Self {
            documents: Mutex::new(documents),
            deleted: Mutex::new(Vec::new()),
        }
    }

    fn find(&self, id: &DocumentId) -> Result<Document, ApiError> {
        self.documents
            .lock()
            .unwrap()
            .iter()
            .find(|doc| &doc.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(id.clone()))
    }
}

#[async_trait]
impl DocumentRepositoryPort for StubRepository {
    async fn list_documents(&self, search: Option<&str>) -> Result<Vec<Document>, ApiError> {
        let documents = self.documents.lock().unwrap().clone();
        Ok(match search {
            None => documents,
            Some(term) => documents
                .into_iter()
                .filter(|doc| doc.filename.contains(term))
                .collect(),
        })
    }

    async fn get_document(&self, id: &DocumentId) -> Result<Document, ApiError> {
        self.find(id)
    }

    async fn delete_document(&self, id: &DocumentId) -> Result<(), ApiError> {
        self.find(id)?;
        self.documents.lock().unwrap().retain(|doc| &doc.id != id);
        self.deleted.lock().unwrap().push(id.clone());
        Ok(())
    }

    async fn update_title(&self, id: &DocumentId, title: &str) -> Result<Document, ApiError> {
        let mut documents = self.documents.lock().unwrap();
        let doc = documents
            .iter_mut()
            .find(|doc| &doc.id == id)
            .ok_or_else(|| ApiError::NotFound(id.clone()))?;
        doc.filename = title.to_string();
        Ok(doc.clone())
    }

    async fn update_content(&self, id: &DocumentId, content: &str) -> Result<Document, ApiError> {
        let mut documents = self.documents.lock().unwrap();
        let doc = documents
            .iter_mut()
            .find(|doc| &doc.id == id)
            .ok_or_else(|| ApiError::NotFound(id.clone()))?;
        doc.extracted_text = Some(content.to_string());
        Ok(doc.clone())
    }
}
