//! REST adapters
//! REST 适配器

mod chat;
mod client;
mod documents;
mod dto;
mod errors;
mod upload;

pub use chat::HttpChatApi;
pub use client::ApiClient;
pub use documents::HttpDocumentApi;
pub use upload::HttpUploadApi;
