use async_trait::async_trait;
use dd_core::ports::{ApiError, DocumentRepositoryPort};
use dd_core::{Document, DocumentId};
use serde_json::Value;
use tracing::{debug, info_span, Instrument};

use super::client::ApiClient;
use super::dto::{ContentUpdate, DocumentDto, DocumentListDto, TitleUpdate};
use super::errors::not_found_for;

/// [`DocumentRepositoryPort`] over `/documents`.
#[derive(Debug, Clone)]
pub struct HttpDocumentApi {
    client: ApiClient,
}

impl HttpDocumentApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Some update endpoints answer with the record, others with a status
    /// message; fall back to a fresh read in the latter case.
    async fn updated_document(&self, id: &DocumentId, body: Value) -> Result<Document, ApiError> {
        let parsed = serde_json::from_value::<DocumentDto>(body)
            .ok()
            .and_then(DocumentDto::into_document);
        match parsed {
            Some(document) => Ok(document),
            None => {
                debug!(document_id = %id, "update response carried no document, reloading");
                self.get_document(id).await
            }
        }
    }
}

#[async_trait]
impl DocumentRepositoryPort for HttpDocumentApi {
    async fn list_documents(&self, search: Option<&str>) -> Result<Vec<Document>, ApiError> {
        let search = search.map(str::trim).filter(|term| !term.is_empty());
        let span = info_span!("infra.http.list_documents", search = ?search);

        async {
            let mut request = self.client.http().get(self.client.endpoint(&["documents"]));
            if let Some(term) = search {
                request = request.query(&[("search", term)]);
            }
            let payload: DocumentListDto = self.client.send_json(request).await?;
            let documents = payload.into_documents();
            debug!(count = documents.len(), "documents fetched");
            Ok(documents)
        }
        .instrument(span)
        .await
    }

    async fn get_document(&self, id: &DocumentId) -> Result<Document, ApiError> {
        let request = self
            .client
            .http()
            .get(self.client.endpoint(&["documents", id.as_str()]));
        let dto: DocumentDto = self
            .client
            .send_json(request)
            .await
            .map_err(not_found_for(id))?;
        dto.into_document()
            .ok_or_else(|| ApiError::Decode(format!("document {id} has no id in response")))
    }

    async fn delete_document(&self, id: &DocumentId) -> Result<(), ApiError> {
        let request = self
            .client
            .http()
            .delete(self.client.endpoint(&["documents", id.as_str()]));
        self.client.send(request).await.map_err(not_found_for(id))?;
        Ok(())
    }

    async fn update_title(&self, id: &DocumentId, title: &str) -> Result<Document, ApiError> {
        let request = self
            .client
            .http()
            .put(self.client.endpoint(&["documents", id.as_str(), "title"]))
            .json(&TitleUpdate { title });
        let body: Value = self
            .client
            .send_json(request)
            .await
            .map_err(not_found_for(id))?;
        self.updated_document(id, body).await
    }

    async fn update_content(&self, id: &DocumentId, content: &str) -> Result<Document, ApiError> {
        let request = self
            .client
            .http()
            .put(self.client.endpoint(&["documents", id.as_str(), "content"]))
            .json(&ContentUpdate { content });
        let body: Value = self
            .client
            .send_json(request)
            .await
            .map_err(not_found_for(id))?;
        self.updated_document(id, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dd_core::DocumentStatus;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn api(server: &Server) -> HttpDocumentApi {
        let client = ApiClient::with_client(reqwest::Client::new(), &format!("{}/api/v1", server.url())).unwrap();
        HttpDocumentApi::new(client)
    }

    #[tokio::test]
    async fn list_without_search_sends_no_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/documents")
            .match_query(Matcher::Missing)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!([{"_id": "1", "title": "lease.pdf", "status": "processed"}]).to_string())
            .create_async()
            .await;

        let documents = api(&server).list_documents(None).await.unwrap();

        mock.assert_async().await;
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].status, DocumentStatus::Processed);
    }

    #[tokio::test]
    async fn list_passes_trimmed_search_term() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/documents")
            .match_query(Matcher::UrlEncoded("search".into(), "tax report".into()))
            .with_status(200)
            .with_body(json!({"documents": [{"_id": "9", "title": "2023 tax report"}]}).to_string())
            .create_async()
            .await;

        let documents = api(&server).list_documents(Some("  tax report ")).await.unwrap();

        mock.assert_async().await;
        assert_eq!(documents[0].filename, "2023 tax report");
    }

    #[tokio::test]
    async fn server_error_maps_to_status() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v1/documents")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body(r#"{"detail":"database unavailable"}"#)
            .create_async()
            .await;

        let err = api(&server).list_documents(Some("x")).await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 500,
                message: "database unavailable".into()
            }
        );
    }

    #[tokio::test]
    async fn garbage_body_is_a_decode_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v1/documents")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let err = api(&server).list_documents(None).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn missing_document_is_not_found() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v1/documents/404id")
            .with_status(404)
            .with_body(r#"{"detail":"Document not found"}"#)
            .create_async()
            .await;

        let err = api(&server).get_document(&DocumentId::from("404id")).await.unwrap_err();
        assert_eq!(err, ApiError::NotFound(DocumentId::from("404id")));
    }

    #[tokio::test]
    async fn delete_hits_document_path() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/v1/documents/abc")
            .with_status(200)
            .with_body(r#"{"message":"Document deleted successfully"}"#)
            .create_async()
            .await;

        api(&server).delete_document(&DocumentId::from("abc")).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rename_sends_title_and_reads_back_record() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/v1/documents/abc/title")
            .match_body(Matcher::Json(json!({"title": "Lease 2024"})))
            .with_status(200)
            .with_body(json!({"_id": "abc", "title": "Lease 2024"}).to_string())
            .create_async()
            .await;

        let doc = api(&server)
            .update_title(&DocumentId::from("abc"), "Lease 2024")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(doc.filename, "Lease 2024");
    }

    #[tokio::test]
    async fn content_update_reloads_when_response_is_a_message() {
        let mut server = Server::new_async().await;
        let put = server
            .mock("PUT", "/api/v1/documents/abc/content")
            .match_body(Matcher::Json(json!({"content": "# Lease"})))
            .with_status(200)
            .with_body(r#"{"message":"updated"}"#)
            .create_async()
            .await;
        let get = server
            .mock("GET", "/api/v1/documents/abc")
            .with_status(200)
            .with_body(json!({"_id": "abc", "title": "Lease", "extracted_text": "# Lease"}).to_string())
            .create_async()
            .await;

        let doc = api(&server)
            .update_content(&DocumentId::from("abc"), "# Lease")
            .await
            .unwrap();

        put.assert_async().await;
        get.assert_async().await;
        assert_eq!(doc.extracted_text.as_deref(), Some("# Lease"));
    }
}
