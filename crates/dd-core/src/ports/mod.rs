//! Port interfaces for the application layer
//!
//! Ports define the contract between the use cases and the backend adapters.
//! Everything behind a port (HTTP, multipart upload, the chat assistant) is an
//! external collaborator; use cases only ever see these traits.

mod chat;
mod document_repository;
mod document_upload;
pub mod errors;
mod search_events;

pub use chat::ChatPort;
pub use document_repository::DocumentRepositoryPort;
pub use document_upload::{DocumentUploadPort, UploadFile, UploadProgressSender, UploadRequest};
pub use errors::ApiError;
pub use search_events::{NoopSearchEvents, SearchEventPort};
