//! docdesk infrastructure layer
//!
//! Adapters that implement the `dd-core` ports against the REST backend.

pub mod http;

pub use http::{ApiClient, HttpChatApi, HttpDocumentApi, HttpUploadApi};
