//! Document search: the browsing handle and server-side search sync.

mod browser;
mod remote_search;

pub use browser::{BrowserOptions, DocumentBrowser};
pub use remote_search::{CollectionSink, RemoteSearchOptions, RemoteSearchSynchronizer};
