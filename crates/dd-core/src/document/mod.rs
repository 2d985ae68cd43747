//! Document domain models.

mod chat;
mod collection;
mod document;
mod timestamp;

pub use chat::{ChatExchange, ToolUsage};
pub use collection::DocumentCollection;
pub use document::{Document, DocumentStatus};
pub use timestamp::parse_timestamp_millis;
