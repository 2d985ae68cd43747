use async_trait::async_trait;
use dd_core::ports::{ApiError, ChatPort};
use dd_core::{ChatExchange, DocumentId};
use tracing::debug;

use super::client::ApiClient;
use super::dto::{ChatDto, ChatRequest};
use super::errors::not_found_for;

/// [`ChatPort`] over `/chat`.
#[derive(Debug, Clone)]
pub struct HttpChatApi {
    client: ApiClient,
}

impl HttpChatApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChatPort for HttpChatApi {
    async fn history(&self, document_id: &DocumentId) -> Result<Vec<ChatExchange>, ApiError> {
        let request = self
            .client
            .http()
            .get(self.client.endpoint(&["chat", document_id.as_str()]));
        let records: Vec<ChatDto> = self
            .client
            .send_json(request)
            .await
            .map_err(not_found_for(document_id))?;

        debug!(document_id = %document_id, exchanges = records.len(), "chat history fetched");
        Ok(records
            .into_iter()
            .map(|record| record.into_exchange(document_id))
            .collect())
    }

    async fn send(&self, document_id: &DocumentId, message: &str) -> Result<ChatExchange, ApiError> {
        let request = self
            .client
            .http()
            .post(self.client.endpoint(&["chat", ""]))
            .json(&ChatRequest::new(document_id, message));
        let record: ChatDto = self
            .client
            .send_json(request)
            .await
            .map_err(not_found_for(document_id))?;
        Ok(record.into_exchange(document_id))
    }

    async fn clear(&self, document_id: &DocumentId) -> Result<(), ApiError> {
        let request = self
            .client
            .http()
            .delete(self.client.endpoint(&["chat", document_id.as_str()]));
        self.client.send(request).await?;
        Ok(())
    }
}
