use std::sync::Arc;

use anyhow::{Context, Result};
use dd_core::ports::ChatPort;
use dd_core::{ChatExchange, DocumentId};
use tracing::info;

use crate::usecases::documents::ensure_valid_id;

/// Load prior exchanges about a document, oldest first.
pub struct GetChatHistory {
    chat: Arc<dyn ChatPort>,
}

impl GetChatHistory {
    pub fn from_arc(chat: Arc<dyn ChatPort>) -> Self {
        Self { chat }
    }

    #[tracing::instrument(name = "usecase.get_chat_history.execute", skip(self), fields(document_id = %document_id))]
    pub async fn execute(&self, document_id: &DocumentId) -> Result<Vec<ChatExchange>> {
        ensure_valid_id(document_id)?;

        let history = self
            .chat
            .history(document_id)
            .await
            .context("Failed to load chat history")?;

        info!(exchanges = history.len(), "Chat history loaded");
        Ok(history)
    }
}
