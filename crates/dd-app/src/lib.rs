//! docdesk application layer
//!
//! Use cases over the ports in `dd-core`, plus the [`DocumentBrowser`] handle
//! that owns the search/sort/filter/pagination pipeline and keeps it in sync
//! with server-side search.

pub mod deps;
pub mod usecases;

pub use deps::AppDeps;
pub use usecases::search::{BrowserOptions, DocumentBrowser, RemoteSearchOptions, RemoteSearchSynchronizer};
