//! # Application Dependencies / 应用依赖
//!
//! Parameter grouping for the ports every use case is built from.
//! 用例所需端口的参数打包。

use std::sync::Arc;

use dd_core::config::SearchConfig;
use dd_core::ports::{ChatPort, DocumentRepositoryPort, DocumentUploadPort, SearchEventPort};
use dd_core::{Document, FilterState};

use crate::usecases::chat::{ClearChatHistory, GetChatHistory, SendChatMessage};
use crate::usecases::documents::{
    DeleteDocument, GetDocument, ListDocuments, RenameDocument, UpdateDocumentContent, UploadDocuments,
};
use crate::usecases::search::{BrowserOptions, DocumentBrowser};

/// Application dependency grouping, not a builder.
/// 应用依赖分组（非 Builder，仅参数打包）
///
/// All dependencies are required.
#[derive(Clone)]
pub struct AppDeps {
    // Backend dependencies / 后端依赖
    pub documents: Arc<dyn DocumentRepositoryPort>,
    pub uploads: Arc<dyn DocumentUploadPort>,
    pub chat: Arc<dyn ChatPort>,

    // UI dependencies / UI 依赖
    pub search_events: Arc<dyn SearchEventPort>,
}

impl AppDeps {
    pub fn list_documents(&self) -> ListDocuments {
        ListDocuments::from_arc(self.documents.clone())
    }

    pub fn get_document(&self) -> GetDocument {
        GetDocument::from_arc(self.documents.clone())
    }

    pub fn delete_document(&self) -> DeleteDocument {
        DeleteDocument::from_arc(self.documents.clone())
    }

    pub fn rename_document(&self) -> RenameDocument {
        RenameDocument::from_arc(self.documents.clone())
    }

    pub fn update_document_content(&self) -> UpdateDocumentContent {
        UpdateDocumentContent::from_arc(self.documents.clone())
    }

    pub fn upload_documents(&self) -> UploadDocuments {
        UploadDocuments::from_arc(self.uploads.clone())
    }

    pub fn send_chat_message(&self) -> SendChatMessage {
        SendChatMessage::from_arc(self.chat.clone())
    }

    pub fn get_chat_history(&self) -> GetChatHistory {
        GetChatHistory::from_arc(self.chat.clone())
    }

    pub fn clear_chat_history(&self) -> ClearChatHistory {
        ClearChatHistory::from_arc(self.chat.clone())
    }

    /// Mount a browsing handle over `documents`.
    pub fn document_browser(
        &self,
        documents: Vec<Document>,
        initial: Option<FilterState>,
        search: &SearchConfig,
    ) -> DocumentBrowser {
        DocumentBrowser::initialize(
            documents,
            initial,
            self.documents.clone(),
            self.search_events.clone(),
            BrowserOptions::from(search),
        )
    }
}
