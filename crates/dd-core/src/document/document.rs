use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::timestamp::parse_timestamp_millis;
use crate::ids::DocumentId;

/// Processing status reported by the backend.
///
/// 后端返回的文档处理状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Processed,
    Processing,
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Processed => "processed",
            DocumentStatus::Processing => "processing",
            DocumentStatus::Failed => "failed",
            DocumentStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = std::convert::Infallible;

    /// Anything the backend sends that we do not know becomes `Unknown`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "processed" => DocumentStatus::Processed,
            "processing" => DocumentStatus::Processing,
            "failed" => DocumentStatus::Failed,
            _ => DocumentStatus::Unknown,
        })
    }
}

/// A user-uploaded document record.
///
/// The browsing pipeline treats documents as read-only values: it filters,
/// reorders and slices them but never changes a field.
///
/// 用户上传的文档记录（只读值）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    /// Display title
    pub filename: String,
    pub status: DocumentStatus,
    /// ISO-8601 upload timestamp as sent by the backend (may be malformed)
    pub uploaded_at: Option<String>,
    /// Size in bytes
    pub file_size: Option<u64>,
    /// Full extracted text body
    pub extracted_text: Option<String>,
    pub doc_type: Option<String>,
    pub file_type: Option<String>,
}

impl Document {
    pub fn new(id: impl Into<DocumentId>, filename: impl Into<String>, status: DocumentStatus) -> Self {
        Self {
            id: id.into(),
            filename: filename.into(),
            status,
            uploaded_at: None,
            file_size: None,
            extracted_text: None,
            doc_type: None,
            file_type: None,
        }
    }

    pub fn with_uploaded_at(mut self, uploaded_at: impl Into<String>) -> Self {
        self.uploaded_at = Some(uploaded_at.into());
        self
    }

    pub fn with_file_size(mut self, file_size: u64) -> Self {
        self.file_size = Some(file_size);
        self
    }

    pub fn with_extracted_text(mut self, text: impl Into<String>) -> Self {
        self.extracted_text = Some(text.into());
        self
    }

    pub fn with_doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    pub fn with_file_type(mut self, file_type: impl Into<String>) -> Self {
        self.file_type = Some(file_type.into());
        self
    }

    /// Upload time in epoch milliseconds, `None` when missing or unparsable.
    pub fn uploaded_at_millis(&self) -> Option<i64> {
        self.uploaded_at.as_deref().and_then(parse_timestamp_millis)
    }

    pub fn is_pdf(&self) -> bool {
        self.file_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("pdf"))
    }

    /// Text fields searched by the local engine, in match order.
    pub(crate) fn searchable_fields(&self) -> [Option<&str>; 3] {
        [
            Some(self.filename.as_str()),
            self.extracted_text.as_deref(),
            self.doc_type.as_deref(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_str_is_lenient() {
        assert_eq!("processed".parse::<DocumentStatus>().unwrap(), DocumentStatus::Processed);
        assert_eq!(" FAILED ".parse::<DocumentStatus>().unwrap(), DocumentStatus::Failed);
        assert_eq!("archived".parse::<DocumentStatus>().unwrap(), DocumentStatus::Unknown);
    }

    #[test]
    fn test_status_deserializes_unknown_values() {
        let status: DocumentStatus = serde_json::from_str("\"queued\"").unwrap();
        assert_eq!(status, DocumentStatus::Unknown);
        let status: DocumentStatus = serde_json::from_str("\"processing\"").unwrap();
        assert_eq!(status, DocumentStatus::Processing);
    }

    #[test]
    fn test_is_pdf() {
        let doc = Document::new("1", "a.pdf", DocumentStatus::Processed).with_file_type("PDF");
        assert!(doc.is_pdf());
        let doc = Document::new("2", "b.png", DocumentStatus::Processed).with_file_type("image");
        assert!(!doc.is_pdf());
        assert!(!Document::new("3", "c", DocumentStatus::Unknown).is_pdf());
    }

    #[test]
    fn test_uploaded_at_millis_tolerates_garbage() {
        let doc = Document::new("1", "a", DocumentStatus::Processed).with_uploaded_at("not a date");
        assert_eq!(doc.uploaded_at_millis(), None);
        let doc = Document::new("1", "a", DocumentStatus::Processed).with_uploaded_at("2024-01-01");
        assert!(doc.uploaded_at_millis().is_some());
    }
}
