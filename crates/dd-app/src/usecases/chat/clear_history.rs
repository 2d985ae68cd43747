use std::sync::Arc;

use anyhow::{Context, Result};
use dd_core::ports::ChatPort;
use dd_core::DocumentId;
use tracing::info;

use crate::usecases::documents::ensure_valid_id;

/// Delete every exchange about a document.
pub struct ClearChatHistory {
    chat: Arc<dyn ChatPort>,
}

impl ClearChatHistory {
    pub fn from_arc(chat: Arc<dyn ChatPort>) -> Self {
        Self { chat }
    }

    #[tracing::instrument(name = "usecase.clear_chat_history.execute", skip(self), fields(document_id = %document_id))]
    pub async fn execute(&self, document_id: &DocumentId) -> Result<()> {
        ensure_valid_id(document_id)?;

        self.chat
            .clear(document_id)
            .await
            .context("Failed to clear chat history")?;

        info!("Chat history cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::test_support::MockChat;

    #[tokio::test]
    async fn clears_history() {
        let mut chat = MockChat::new();
        chat.expect_clear()
            .withf(|id| id.as_str() == "doc-1")
            .times(1)
            .returning(|_| Ok(()));
        let uc = ClearChatHistory::from_arc(Arc::new(chat));

        uc.execute(&DocumentId::from("doc-1")).await.unwrap();
    }
}
