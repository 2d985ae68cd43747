//! Document search pipeline.
//!
//! - [`FilterStore`]: single source of truth for search term, sort, status filter and page
//! - [`LocalSearchEngine`]: pure `(documents, filters) -> VisiblePage`
//! - [`SequenceGate`]: last-response-wins ordering for remote searches
//! - [`RemoteSearchState`]: Idle → Debouncing → Fetching → Idle | Error

mod engine;
mod filter;
mod sequence;
mod state;

pub use engine::{LocalSearchEngine, VisiblePage, DEFAULT_PAGE_SIZE};
pub use filter::{
    FilterState, FilterStore, ParseFilterError, SortDirection, SortField, StatusFilter,
};
pub use sequence::SequenceGate;
pub use state::{RemoteSearchEvent, RemoteSearchState, RemoteSearchTransition};
