//! Wire shapes of the backend and their mapping onto domain types.
//!
//! The backend is loose about field names: ids come as `_id` or `id` (plain
//! or `{"$oid": ..}`), the title as `title` or `filename`, the upload time as
//! `uploaded_at` or `created_at`, the text body under one of three names.

use dd_core::document::ToolUsage;
use dd_core::{ChatExchange, ChatId, Document, DocumentId, DocumentStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

pub(crate) const UNTITLED: &str = "Untitled Document";

#[derive(Debug, Deserialize)]
pub(crate) struct DocumentDto {
    #[serde(rename = "_id", default)]
    mongo_id: Option<Value>,
    #[serde(default)]
    id: Option<Value>,
    title: Option<String>,
    filename: Option<String>,
    status: Option<String>,
    #[serde(default)]
    uploaded_at: Option<Value>,
    #[serde(default)]
    created_at: Option<Value>,
    #[serde(default)]
    file_size: Option<Value>,
    extracted_text: Option<String>,
    content: Option<String>,
    parsed_content: Option<String>,
    doc_type: Option<String>,
    file_type: Option<String>,
}

impl DocumentDto {
    /// `None` when the record carries no usable id.
    pub(crate) fn into_document(self) -> Option<Document> {
        let id = self
            .mongo_id
            .as_ref()
            .and_then(id_from_value)
            .or_else(|| self.id.as_ref().and_then(id_from_value))?;

        let filename = non_empty(self.title)
            .or_else(|| non_empty(self.filename))
            .unwrap_or_else(|| UNTITLED.to_string());
        let status = self
            .status
            .as_deref()
            .map(|raw| raw.parse::<DocumentStatus>().unwrap_or_default())
            .unwrap_or_default();

        let mut document = Document::new(id, filename, status);
        document.uploaded_at = self
            .uploaded_at
            .as_ref()
            .and_then(timestamp_from_value)
            .or_else(|| self.created_at.as_ref().and_then(timestamp_from_value));
        document.file_size = self.file_size.as_ref().and_then(size_from_value);
        document.extracted_text = non_empty(self.extracted_text)
            .or_else(|| non_empty(self.content))
            .or_else(|| non_empty(self.parsed_content));
        document.doc_type = non_empty(self.doc_type);
        document.file_type = non_empty(self.file_type);
        Some(document)
    }
}

/// `GET /documents` answers with a bare array or `{"documents": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum DocumentListDto {
    List(Vec<DocumentDto>),
    Wrapped { documents: Vec<DocumentDto> },
}

impl DocumentListDto {
    pub(crate) fn into_documents(self) -> Vec<Document> {
        let records = match self {
            DocumentListDto::List(records) | DocumentListDto::Wrapped { documents: records } => records,
        };
        let total = records.len();
        let documents: Vec<Document> = records
            .into_iter()
            .filter_map(DocumentDto::into_document)
            .collect();
        if documents.len() < total {
            warn!(skipped = total - documents.len(), "dropped documents without an id");
        }
        documents
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TitleUpdate<'a> {
    pub title: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ContentUpdate<'a> {
    pub content: &'a str,
}

/// The chat model requires `ai_response`; the server overwrites the placeholder.
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub document_id: &'a str,
    pub user_message: &'a str,
    pub ai_response: &'a str,
}

impl<'a> ChatRequest<'a> {
    pub(crate) fn new(document_id: &'a DocumentId, user_message: &'a str) -> Self {
        Self {
            document_id: document_id.as_str(),
            user_message,
            ai_response: "...",
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatDto {
    #[serde(rename = "_id", default)]
    mongo_id: Option<Value>,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    document_id: Option<Value>,
    #[serde(default)]
    user_message: String,
    #[serde(default)]
    ai_response: String,
    #[serde(default)]
    created_at: Option<Value>,
    #[serde(default)]
    used_tools: Vec<ToolUsage>,
}

impl ChatDto {
    /// `document_id` fills in when the record omits its own.
    pub(crate) fn into_exchange(self, document_id: &DocumentId) -> ChatExchange {
        let id = self
            .mongo_id
            .as_ref()
            .and_then(id_from_value)
            .or_else(|| self.id.as_ref().and_then(id_from_value))
            .map(ChatId::from);
        let owner = self
            .document_id
            .as_ref()
            .and_then(id_from_value)
            .map(DocumentId::from)
            .unwrap_or_else(|| document_id.clone());

        ChatExchange {
            id,
            document_id: owner,
            user_message: self.user_message,
            ai_response: self.ai_response,
            created_at: self.created_at.as_ref().and_then(timestamp_from_value),
            used_tools: self.used_tools,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("$oid").and_then(id_from_value),
        _ => None,
    }
}

fn timestamp_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Object(map) => map.get("$date").and_then(timestamp_from_value),
        _ => None,
    }
}

fn size_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
