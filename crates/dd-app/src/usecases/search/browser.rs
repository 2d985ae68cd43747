//! Document browsing handle
//! 文档浏览句柄
//!
//! Owns the filter state, the current document collection and the cached
//! visible page. Sort, status and page changes recompute synchronously; search
//! term changes reach the local view after a short debounce and the server
//! after a longer one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use dd_core::config::SearchConfig;
use dd_core::ports::{DocumentRepositoryPort, SearchEventPort};
use dd_core::search::{
    FilterState, FilterStore, LocalSearchEngine, RemoteSearchState, SortDirection, SortField,
    StatusFilter, VisiblePage,
};
use dd_core::{Document, DocumentCollection, DocumentId};
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::{debug, info};

use super::remote_search::{CollectionSink, RemoteSearchOptions, RemoteSearchSynchronizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowserOptions {
    pub page_size: usize,
    /// Delay before a non-empty search term reaches the local view
    pub local_debounce: Duration,
    pub remote: RemoteSearchOptions,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for BrowserOptions {
    fn from(config: &SearchConfig) -> Self {
        Self {
            page_size: config.page_size,
            local_debounce: config.local_debounce(),
            remote: RemoteSearchOptions::from(config),
        }
    }
}

struct BrowserState {
    documents: DocumentCollection,
    store: FilterStore,
    /// Search term the local view currently reflects
    applied_term: String,
    view: VisiblePage,
    local_timer: Option<AbortHandle>,
    local_generation: u64,
}

impl BrowserState {
    fn effective_filters(&self) -> FilterState {
        FilterState {
            search_term: self.applied_term.clone(),
            ..self.store.state().clone()
        }
    }

    fn recompute(&mut self, engine: &LocalSearchEngine) {
        self.view = engine.compute(self.documents.as_slice(), &self.effective_filters());
    }

    /// Pull the page back into range after the result set shrank.
    fn clamp_page(&mut self, engine: &LocalSearchEngine) {
        if self.view.page > 1 && self.view.page > self.view.total_pages {
            let total_pages = self.view.total_pages;
            self.store.set_page(self.view.page, total_pages);
            self.recompute(engine);
        }
    }

    fn cancel_local_timer(&mut self) {
        self.local_generation += 1;
        if let Some(handle) = self.local_timer.take() {
            handle.abort();
        }
    }
}

struct BrowserShared {
    engine: LocalSearchEngine,
    local_debounce: Duration,
    state: Mutex<BrowserState>,
    remote: RemoteSearchSynchronizer,
}

impl BrowserShared {
    fn lock(&self) -> MutexGuard<'_, BrowserState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply_pending_term(&self, generation: u64) {
        let mut state = self.lock();
        if state.local_generation != generation {
            return;
        }
        state.local_timer = None;
        state.applied_term = state.store.state().search_term.clone();
        state.recompute(&self.engine);
        debug!(term = %state.applied_term, "search term applied to local view");
    }
}

impl CollectionSink for BrowserShared {
    fn replace_collection(&self, documents: DocumentCollection) {
        let mut state = self.lock();
        state.documents = documents;
        state.store.reset_page();
        state.recompute(&self.engine);
    }
}

/// Handle over one mounted document list.
///
/// ## Behavior / 行为
/// - Every method is synchronous and never fails; bad input is ignored or
///   clamped.
/// - Timers and server requests run on the ambient tokio runtime. Without a
///   runtime, term changes apply to the local view at once and no server
///   query is made.
/// - Dropping the handle (or calling [`shutdown`](Self::shutdown)) aborts
///   pending timers and ignores responses still in flight.
///
/// 所有方法同步执行且不会失败。
pub struct DocumentBrowser {
    shared: Arc<BrowserShared>,
}

impl DocumentBrowser {
    pub fn initialize(
        documents: impl Into<DocumentCollection>,
        initial: Option<FilterState>,
        repository: Arc<dyn DocumentRepositoryPort>,
        events: Arc<dyn SearchEventPort>,
        options: BrowserOptions,
    ) -> Self {
        let engine = LocalSearchEngine::new(options.page_size);
        let store = FilterStore::new(initial.unwrap_or_default());
        let mut state = BrowserState {
            documents: documents.into(),
            applied_term: store.state().search_term.clone(),
            store,
            view: VisiblePage::empty(),
            local_timer: None,
            local_generation: 0,
        };
        state.recompute(&engine);

        info!(
            documents = state.documents.len(),
            page_size = engine.page_size(),
            "document browser mounted"
        );

        let shared = Arc::new_cyclic(|weak: &Weak<BrowserShared>| {
            let sink: Weak<dyn CollectionSink> = weak.clone();
            BrowserShared {
                engine,
                local_debounce: options.local_debounce,
                state: Mutex::new(state),
                remote: RemoteSearchSynchronizer::new(repository, events, sink, options.remote),
            }
        });

        Self { shared }
    }

    pub fn visible_page(&self) -> VisiblePage {
        self.shared.lock().view.clone()
    }

    /// Filter state as last set, including a search term still debouncing.
    pub fn state(&self) -> FilterState {
        self.shared.lock().store.state().clone()
    }

    pub fn remote_state(&self) -> RemoteSearchState {
        self.shared.remote.state()
    }

    pub fn documents(&self) -> DocumentCollection {
        self.shared.lock().documents.clone()
    }

    pub fn page_size(&self) -> usize {
        self.shared.engine.page_size()
    }

    pub fn set_search_term(&self, term: impl Into<String>) {
        let term = term.into();
        {
            let mut state = self.shared.lock();
            if !state.store.set_search_term(term.clone()) {
                return;
            }
            state.cancel_local_timer();
            if term.trim().is_empty() || !self.schedule_local_apply(&mut state) {
                state.applied_term = term.clone();
            }
            state.recompute(&self.shared.engine);
        }
        self.shared.remote.on_term_changed(&term);
    }

    /// `None` keeps the current direction.
    pub fn set_sort(&self, field: SortField, direction: Option<SortDirection>) {
        self.update_filters(|store| store.set_sort(field, direction));
    }

    pub fn set_sort_str(&self, field: &str, direction: Option<&str>) {
        self.update_filters(|store| store.set_sort_str(field, direction));
    }

    pub fn set_status_filter(&self, status: StatusFilter) {
        self.update_filters(|store| store.set_status_filter(status));
    }

    pub fn set_status_filter_str(&self, status: &str) {
        self.update_filters(|store| store.set_status_filter_str(status));
    }

    /// Jump to `page`, clamped into the current page range. Returns the page shown.
    pub fn set_page(&self, page: usize) -> usize {
        let mut state = self.shared.lock();
        let total_pages = state.view.total_pages;
        let page = state.store.set_page(page, total_pages);
        state.recompute(&self.shared.engine);
        page
    }

    /// Clear the search term. A non-empty term triggers a full-list fetch.
    pub fn clear(&self) {
        let had_term = {
            let mut state = self.shared.lock();
            let had_term = !state.store.state().search_term.is_empty();
            state.store.clear();
            state.cancel_local_timer();
            state.applied_term.clear();
            state.recompute(&self.shared.engine);
            had_term
        };

        if had_term {
            self.shared.remote.on_term_changed("");
        } else {
            self.shared.remote.cancel();
        }
    }

    /// Re-run the server query for the current term now.
    pub fn refresh(&self) {
        let term = self.shared.lock().store.state().search_term.clone();
        self.shared.remote.refresh(&term);
    }

    /// Swap in a new collection, as a successful server search would.
    pub fn replace_documents(&self, documents: impl Into<DocumentCollection>) {
        self.shared.replace_collection(documents.into());
    }

    /// Drop one document locally, e.g. after it was deleted on the server.
    pub fn remove_document(&self, id: &DocumentId) -> bool {
        let mut state = self.shared.lock();
        if state.documents.get(id).is_none() {
            return false;
        }
        state.documents = state.documents.without(id);
        state.recompute(&self.shared.engine);
        state.clamp_page(&self.shared.engine);
        true
    }

    /// Replace the document with the same id, e.g. after a rename.
    pub fn upsert_document(&self, document: Document) {
        let mut state = self.shared.lock();
        state.documents = if state.documents.get(&document.id).is_some() {
            state.documents.with_replaced(document)
        } else {
            let mut documents = state.documents.as_slice().to_vec();
            documents.insert(0, document);
            DocumentCollection::new(documents)
        };
        state.recompute(&self.shared.engine);
    }

    /// Abort timers and ignore in-flight responses. Idempotent.
    pub fn shutdown(&self) {
        self.shared.lock().cancel_local_timer();
        self.shared.remote.shutdown();
    }

    fn update_filters(&self, update: impl FnOnce(&mut FilterStore) -> bool) {
        let mut state = self.shared.lock();
        if update(&mut state.store) {
            state.recompute(&self.shared.engine);
        }
    }

    /// Start the local debounce timer. `false` when it cannot run.
    fn schedule_local_apply(&self, state: &mut BrowserState) -> bool {
        if self.shared.local_debounce.is_zero() {
            return false;
        }
        let Ok(runtime) = Handle::try_current() else {
            return false;
        };

        let generation = state.local_generation;
        let delay = self.shared.local_debounce;
        let weak = Arc::downgrade(&self.shared);
        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(shared) = weak.upgrade() {
                shared.apply_pending_term(generation);
            }
        });
        state.local_timer = Some(task.abort_handle());
        true
    }
}

impl Drop for DocumentBrowser {
    fn drop(&mut self) {
        self.shutdown();
    }
}
