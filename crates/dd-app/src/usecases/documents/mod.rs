//! Document use cases
//! 文档用例

mod delete_document;
mod get_document;
mod list_documents;
mod rename_document;
mod update_content;
mod upload_documents;

pub use delete_document::DeleteDocument;
pub use get_document::GetDocument;
pub use list_documents::ListDocuments;
pub use rename_document::RenameDocument;
pub use update_content::UpdateDocumentContent;
pub use upload_documents::{UploadDocuments, MAX_UPLOAD_BYTES};

use dd_core::ports::ApiError;
use dd_core::DocumentId;

/// Reject ids the backend can never resolve before making a request.
pub(crate) fn ensure_valid_id(id: &DocumentId) -> Result<(), ApiError> {
    if id.is_valid() {
        Ok(())
    } else {
        Err(ApiError::InvalidId(id.to_string()))
    }
}
