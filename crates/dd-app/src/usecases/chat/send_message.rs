use std::sync::Arc;

use anyhow::{bail, Context, Result};
use dd_core::ports::ChatPort;
use dd_core::{ChatExchange, DocumentId};
use tracing::info;

use crate::usecases::documents::ensure_valid_id;

/// Ask the assistant a question about one document.
///
/// ## Behavior / 行为
/// - Blank messages are rejected before any request
/// - The message is sent trimmed
/// - Returns the stored exchange including the assistant's answer
pub struct SendChatMessage {
    chat: Arc<dyn ChatPort>,
}

impl SendChatMessage {
    pub fn from_arc(chat: Arc<dyn ChatPort>) -> Self {
        Self { chat }
    }

    #[tracing::instrument(
        name = "usecase.send_chat_message.execute",
        skip(self, message),
        fields(document_id = %document_id, message_len = message.len())
    )]
    pub async fn execute(&self, document_id: &DocumentId, message: &str) -> Result<ChatExchange> {
        ensure_valid_id(document_id)?;
        let message = message.trim();
        if message.is_empty() {
            bail!("Chat message must not be empty");
        }

        let exchange = self
            .chat
            .send(document_id, message)
            .await
            .context("Failed to send chat message")?;

        info!(tools = exchange.used_tools.len(), "Assistant answered");
        Ok(exchange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::test_support::MockChat;
    use dd_core::ports::ApiError;

    fn exchange(message: &str) -> ChatExchange {
        ChatExchange {
            id: None,
            document_id: DocumentId::from("doc-1"),
            user_message: message.to_string(),
            ai_response: "The total is $42.".to_string(),
            created_at: None,
            used_tools: Vec::new(),
        }
    }

    #[tokio::test]
    async fn sends_trimmed_message() {
        let mut chat = MockChat::new();
        chat.expect_send()
            .withf(|id, message| id.as_str() == "doc-1" && message == "What is the total?")
            .times(1)
            .returning(|_, message| Ok(exchange(message)));
        let uc = SendChatMessage::from_arc(Arc::new(chat));

        let result = uc
            .execute(&DocumentId::from("doc-1"), "  What is the total?\n")
            .await
            .unwrap();
        assert_eq!(result.ai_response, "The total is $42.");
    }

    #[tokio::test]
    async fn blank_message_is_rejected() {
        let mut chat = MockChat::new();
        chat.expect_send().never();
        let uc = SendChatMessage::from_arc(Arc::new(chat));

        assert!(uc.execute(&DocumentId::from("doc-1"), " \n\t").await.is_err());
    }

    #[tokio::test]
    async fn backend_failure_is_propagated() {
        let mut chat = MockChat::new();
        chat.expect_send()
            .returning(|_, _| Err(ApiError::Status { status: 500, message: "inference failed".into() }));
        let uc = SendChatMessage::from_arc(Arc::new(chat));

        let err = uc.execute(&DocumentId::from("doc-1"), "hi").await.unwrap_err();
        assert!(err.downcast_ref::<ApiError>().is_some_and(ApiError::is_transient));
    }
}
