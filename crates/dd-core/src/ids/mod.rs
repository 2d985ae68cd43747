//! ID type wrappers for type safety.

mod id_macro;

use serde::{Deserialize, Serialize};

use id_macro::impl_id;

/// Server-assigned document identifier.
///
/// Ids are opaque strings owned by the backend; the client never generates them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(String);

/// Server-assigned identifier of a single chat exchange.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(String);

impl_id!(DocumentId, ChatId);

impl DocumentId {
    /// Whether the id can be put into a request path.
    ///
    /// Empty ids and the literal `"undefined"` come from broken payloads and
    /// must never reach the backend.
    pub fn is_valid(&self) -> bool {
        let trimmed = self.0.trim();
        !trimmed.is_empty() && trimmed != "undefined"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_document_id() {
        assert!(DocumentId::from("65f1c0a2e4b0").is_valid());
    }

    #[test]
    fn test_invalid_document_ids() {
        assert!(!DocumentId::from("").is_valid());
        assert!(!DocumentId::from("   ").is_valid());
        assert!(!DocumentId::from("undefined").is_valid());
    }

    #[test]
    fn test_document_id_display() {
        let id = DocumentId::from_str("abc");
        assert_eq!(id.to_string(), "abc");
        assert_eq!(id.as_ref(), "abc");
    }
}
