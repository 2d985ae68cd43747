use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;

use super::ApiError;
use crate::document::Document;

/// Receives upload progress as a percentage (0–100), monotonically increasing.
pub type UploadProgressSender = mpsc::UnboundedSender<u8>;

#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub files: Vec<UploadFile>,
    pub doc_type: Option<String>,
}

impl UploadRequest {
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.bytes.len() as u64).sum()
    }
}

/// Document upload API.
#[async_trait]
pub trait DocumentUploadPort: Send + Sync {
    /// Upload every file and return the created records in upload order.
    async fn upload(
        &self,
        request: UploadRequest,
        progress: Option<UploadProgressSender>,
    ) -> Result<Vec<Document>, ApiError>;
}
