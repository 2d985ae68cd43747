use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use dd_core::ports::{ApiError, DocumentUploadPort, UploadFile, UploadProgressSender, UploadRequest};
use dd_core::Document;
use futures_util::stream;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use tracing::{debug, info_span, Instrument};

use super::client::ApiClient;
use super::dto::DocumentDto;
use super::errors::map_reqwest_error;

/// Bytes handed to the HTTP body per progress step.
const CHUNK_SIZE: usize = 64 * 1024;

/// [`DocumentUploadPort`] over `POST /documents/upload`, one request per file.
#[derive(Debug, Clone)]
pub struct HttpUploadApi {
    client: ApiClient,
}

impl HttpUploadApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    async fn upload_one(
        &self,
        file: UploadFile,
        doc_type: Option<&str>,
        progress: Arc<ProgressTracker>,
    ) -> Result<Document, ApiError> {
        let file_name = file.file_name.clone();
        let mut form = Form::new().part("file", file_part(file, progress)?);
        if let Some(doc_type) = doc_type {
            form = form.text("doc_type", doc_type.to_string());
        }

        let request = self
            .client
            .http()
            .post(self.client.endpoint(&["documents", "upload"]))
            .multipart(form);
        let dto: DocumentDto = self.client.send_json(request).await?;
        dto.into_document()
            .ok_or_else(|| ApiError::Decode(format!("upload of {file_name} returned no document id")))
    }
}

#[async_trait]
impl DocumentUploadPort for HttpUploadApi {
    async fn upload(
        &self,
        request: UploadRequest,
        progress: Option<UploadProgressSender>,
    ) -> Result<Vec<Document>, ApiError> {
        let span = info_span!(
            "infra.http.upload_documents",
            files = request.files.len(),
            total_bytes = request.total_bytes()
        );

        async move {
            let tracker = Arc::new(ProgressTracker::new(request.total_bytes(), progress));
            let doc_type = request.doc_type.as_deref();
            let mut created = Vec::with_capacity(request.files.len());

            for file in request.files.iter().cloned() {
                let document = self.upload_one(file, doc_type, tracker.clone()).await?;
                debug!(document_id = %document.id, "file uploaded");
                created.push(document);
            }

            tracker.finish();
            Ok(created)
        }
        .instrument(span)
        .await
    }
}

fn file_part(file: UploadFile, progress: Arc<ProgressTracker>) -> Result<Part, ApiError> {
    let length = file.bytes.len() as u64;
    let chunks: Vec<Bytes> = chunk(file.bytes);
    let body = Body::wrap_stream(stream::iter(chunks.into_iter().map(move |chunk| {
        progress.advance(chunk.len() as u64);
        Ok::<Bytes, std::io::Error>(chunk)
    })));

    let part = Part::stream_with_length(body, length).file_name(file.file_name);
    match file.content_type {
        Some(content_type) => part
            .mime_str(&content_type)
            .map_err(map_reqwest_error),
        None => Ok(part),
    }
}

fn chunk(bytes: Bytes) -> Vec<Bytes> {
    let mut chunks = Vec::with_capacity(bytes.len().div_ceil(CHUNK_SIZE));
    let mut offset = 0;
    while offset < bytes.len() {
        let end = (offset + CHUNK_SIZE).min(bytes.len());
        chunks.push(bytes.slice(offset..end));
        offset = end;
    }
    chunks
}

/// Converts bytes sent into monotonically increasing whole percentages.
struct ProgressTracker {
    total: u64,
    sent: AtomicU64,
    last: AtomicU8,
    sink: Option<UploadProgressSender>,
}

impl ProgressTracker {
    fn new(total: u64, sink: Option<UploadProgressSender>) -> Self {
        Self {
            total,
            sent: AtomicU64::new(0),
            last: AtomicU8::new(0),
            sink,
        }
    }

    fn advance(&self, bytes: u64) {
        let sent = self.sent.fetch_add(bytes, Ordering::Relaxed) + bytes;
        // Hold back 100 until the server has answered.
        let percent = (sent.saturating_mul(100) / self.total.max(1)).min(99) as u8;
        self.report(percent);
    }

    fn finish(&self) {
        self.report(100);
    }

    fn report(&self, percent: u8) {
        let previous = self.last.fetch_max(percent, Ordering::Relaxed);
        if percent > previous {
            if let Some(sink) = &self.sink {
                let _ = sink.send(percent);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use tokio::sync::mpsc;

    fn api(server: &Server) -> HttpUploadApi {
        let client = ApiClient::with_client(reqwest::Client::new(), &format!("{}/api/v1", server.url())).unwrap();
        HttpUploadApi::new(client)
    }

    fn file(name: &str, body: &'static [u8]) -> UploadFile {
        UploadFile {
            file_name: name.to_string(),
            content_type: Some("image/png".to_string()),
            bytes: Bytes::from_static(body),
        }
    }

    #[test]
    fn chunks_cover_the_payload() {
        let bytes = Bytes::from(vec![1u8; CHUNK_SIZE * 2 + 10]);
        let chunks = chunk(bytes);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].len(), 10);
        assert!(chunk(Bytes::new()).is_empty());
    }

    #[test]
    fn progress_is_monotonic_and_ends_at_100() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let tracker = ProgressTracker::new(200, Some(tx));

        tracker.advance(50);
        tracker.advance(0);
        tracker.advance(150);
        tracker.finish();
        tracker.finish();

        let mut seen = Vec::new();
        while let Ok(percent) = rx.try_recv() {
            seen.push(percent);
        }
        assert_eq!(seen, vec![25, 99, 100]);
    }

    #[tokio::test]
    async fn uploads_each_file_with_doc_type() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/documents/upload")
            .match_header("content-type", Matcher::Regex("multipart/form-data".into()))
            .match_body(Matcher::Regex(r#"name="doc_type"\s+receipt"#.into()))
            .with_status(200)
            .with_body(json!({"_id": "new", "title": "Document being processed...", "doc_type": "receipt"}).to_string())
            .expect(2)
            .create_async()
            .await;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let request = UploadRequest {
            files: vec![file("a.png", b"first"), file("b.png", b"second")],
            doc_type: Some("receipt".to_string()),
        };
        let created = api(&server).upload(request, Some(tx)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(created.len(), 2);

        let mut last = 0;
        while let Ok(percent) = rx.try_recv() {
            assert!(percent > last);
            last = percent;
        }
        assert_eq!(last, 100);
    }

    #[tokio::test]
    async fn rejected_upload_reports_detail() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/v1/documents/upload")
            .with_status(422)
            .with_body(r#"{"detail":"unsupported file"}"#)
            .create_async()
            .await;

        let request = UploadRequest {
            files: vec![file("a.exe", b"MZ")],
            doc_type: None,
        };
        let err = api(&server).upload(request, None).await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 422,
                message: "unsupported file".into()
            }
        );
    }
}
