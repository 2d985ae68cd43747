//! # dd-core
//!
//! Core domain models and business logic for docdesk.
//!
//! This crate contains pure business logic without any infrastructure dependencies:
//! the document model, the filter store, the local search engine and the port
//! traits that the infrastructure layer implements.

// Public module exports
pub mod config;
pub mod document;
pub mod ids;
pub mod ports;
pub mod search;

// Re-export commonly used types at the crate root
pub use config::AppConfig;
pub use document::{ChatExchange, Document, DocumentCollection, DocumentStatus};
pub use ids::{ChatId, DocumentId};
pub use search::{
    FilterState, FilterStore, LocalSearchEngine, RemoteSearchEvent, RemoteSearchState,
    SequenceGate, SortDirection, SortField, StatusFilter, VisiblePage, DEFAULT_PAGE_SIZE,
};
