use serde::{Deserialize, Serialize};

use crate::ids::{ChatId, DocumentId};

/// A tool the assistant invoked while answering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolUsage {
    pub tool_name: String,
    pub query: Option<String>,
}

/// One question/answer pair about a document.
///
/// 一次针对文档的问答记录。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatExchange {
    pub id: Option<ChatId>,
    pub document_id: DocumentId,
    pub user_message: String,
    pub ai_response: String,
    pub created_at: Option<String>,
    #[serde(default)]
    pub used_tools: Vec<ToolUsage>,
}
