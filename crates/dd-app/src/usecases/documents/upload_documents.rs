use std::sync::Arc;

use anyhow::{bail, Context, Result};
use dd_core::ports::{DocumentUploadPort, UploadProgressSender, UploadRequest};
use dd_core::Document;
use tracing::{info, info_span, Instrument};

/// Largest file the backend accepts.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Use case for uploading one or more documents.
///
/// ## Behavior / 行为
/// - Validates every file before anything is sent: at least one file, none
///   empty, none larger than [`MAX_UPLOAD_BYTES`]
/// - Progress (0–100) is forwarded to `progress` while the adapter uploads
/// - Returns the created records in upload order
pub struct UploadDocuments {
    uploads: Arc<dyn DocumentUploadPort>,
}

impl UploadDocuments {
    pub fn from_arc(uploads: Arc<dyn DocumentUploadPort>) -> Self {
        Self { uploads }
    }

    pub async fn execute(
        &self,
        request: UploadRequest,
        progress: Option<UploadProgressSender>,
    ) -> Result<Vec<Document>> {
        let span = info_span!(
            "usecase.upload_documents.execute",
            files = request.files.len(),
            total_bytes = request.total_bytes(),
            doc_type = ?request.doc_type,
        );

        async {
            if request.files.is_empty() {
                bail!("No files selected for upload");
            }
            for file in &request.files {
                if file.bytes.is_empty() {
                    bail!("File {} is empty", file.file_name);
                }
                if file.bytes.len() > MAX_UPLOAD_BYTES {
                    bail!("File {} exceeds the 10MB limit", file.file_name);
                }
            }

            info!("Uploading documents");
            let documents = self
                .uploads
                .upload(request, progress)
                .await
                .context("Failed to upload documents")?;

            info!(created = documents.len(), "Documents uploaded");
            Ok(documents)
        }
        .instrument(span)
        .await
    }
}
