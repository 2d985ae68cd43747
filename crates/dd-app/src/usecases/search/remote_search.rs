//! Debounced server-side search with last-response-wins ordering.
//! 防抖的服务端搜索，仅应用最新响应。

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use dd_core::config::SearchConfig;
use dd_core::ports::{DocumentRepositoryPort, SearchEventPort};
use dd_core::search::{RemoteSearchEvent, RemoteSearchState, RemoteSearchTransition, SequenceGate};
use dd_core::DocumentCollection;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::{debug, info, info_span, warn, Instrument};

/// Receives server results that passed the sequence gate.
pub trait CollectionSink: Send + Sync {
    fn replace_collection(&self, documents: DocumentCollection);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteSearchOptions {
    pub debounce: Duration,
    /// Shortest trimmed term (in characters) that triggers a server query
    pub min_term_len: usize,
}

impl Default for RemoteSearchOptions {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for RemoteSearchOptions {
    fn from(config: &SearchConfig) -> Self {
        Self {
            debounce: config.remote_debounce(),
            min_term_len: config.min_remote_term_len,
        }
    }
}

#[derive(Default)]
struct SyncInner {
    gate: SequenceGate,
    state: RemoteSearchState,
    pending: Option<AbortHandle>,
    /// Bumped whenever the pending timer is replaced or dropped
    timer_generation: u64,
    shut_down: bool,
}

impl SyncInner {
    fn cancel_timer(&mut self) {
        self.timer_generation += 1;
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    fn apply(&mut self, input: RemoteSearchTransition) {
        let state = std::mem::take(&mut self.state);
        self.state = state.transition(input);
    }
}

/// Keeps the document collection in sync with server-side search.
///
/// ## Behavior / 行为
/// - A term edit cancels the pending (not yet fired) timer. Terms of at least
///   `min_term_len` characters start a new one; shorter terms only cancel.
/// - An empty term invalidates every in-flight request and fetches the full
///   list immediately.
/// - Each request is tagged by a [`SequenceGate`]; only responses newer than
///   everything already applied reach the [`CollectionSink`].
/// - A fired timer is never aborted by later edits: its response is filtered
///   by the gate instead.
///
/// Timers and requests run as tokio tasks. Calls made outside a runtime are
/// logged and skipped.
///
/// Lock order: the synchronizer lock is taken before the sink's own lock.
/// Callers must not invoke the synchronizer while holding the sink's lock.
#[derive(Clone)]
pub struct RemoteSearchSynchronizer {
    repository: Arc<dyn DocumentRepositoryPort>,
    events: Arc<dyn SearchEventPort>,
    sink: Weak<dyn CollectionSink>,
    options: RemoteSearchOptions,
    inner: Arc<Mutex<SyncInner>>,
}

impl RemoteSearchSynchronizer {
    pub fn new(
        repository: Arc<dyn DocumentRepositoryPort>,
        events: Arc<dyn SearchEventPort>,
        sink: Weak<dyn CollectionSink>,
        options: RemoteSearchOptions,
    ) -> Self {
        Self {
            repository,
            events,
            sink,
            options,
            inner: Arc::new(Mutex::new(SyncInner::default())),
        }
    }

    pub fn state(&self) -> RemoteSearchState {
        self.lock().state.clone()
    }

    pub fn options(&self) -> RemoteSearchOptions {
        self.options
    }

    /// React to an edit of the search term.
    pub fn on_term_changed(&self, term: &str) {
        let trimmed = term.trim();
        let mut inner = self.lock();
        if inner.shut_down {
            return;
        }
        inner.cancel_timer();

        if trimmed.is_empty() {
            inner.gate.invalidate();
            inner.apply(RemoteSearchTransition::Cancelled);
            drop(inner);
            debug!("search cleared, fetching full document list");
            self.spawn_fetch(String::new());
            return;
        }

        if trimmed.chars().count() < self.options.min_term_len {
            if matches!(inner.state, RemoteSearchState::Debouncing { .. }) {
                inner.apply(RemoteSearchTransition::Cancelled);
            }
            return;
        }

        let Ok(runtime) = Handle::try_current() else {
            warn!("no tokio runtime available, remote search skipped");
            return;
        };

        let generation = inner.timer_generation;
        let delay = self.options.debounce;
        let this = self.clone();
        let query = trimmed.to_string();
        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            this.fire(generation, query).await;
        });

        inner.pending = Some(task.abort_handle());
        inner.apply(RemoteSearchTransition::Scheduled {
            term: trimmed.to_string(),
        });
    }

    /// Fetch results for `term` right away, skipping the debounce.
    pub fn refresh(&self, term: &str) {
        {
            let mut inner = self.lock();
            if inner.shut_down {
                return;
            }
            inner.cancel_timer();
        }
        self.spawn_fetch(term.trim().to_string());
    }

    /// Drop the pending timer and ignore every response still in flight.
    pub fn cancel(&self) {
        let mut inner = self.lock();
        inner.cancel_timer();
        inner.gate.invalidate();
        inner.apply(RemoteSearchTransition::Cancelled);
    }

    /// Like [`cancel`](Self::cancel), and refuse all further work.
    pub fn shutdown(&self) {
        self.cancel();
        self.lock().shut_down = true;
        debug!("remote search synchronizer shut down");
    }

    fn lock(&self) -> MutexGuard<'_, SyncInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn spawn_fetch(&self, term: String) {
        match Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(self.clone().fetch(term));
            }
            Err(_) => warn!("no tokio runtime available, remote search skipped"),
        }
    }

    async fn fire(self, generation: u64, term: String) {
        {
            let mut inner = self.lock();
            if inner.shut_down || inner.timer_generation != generation {
                return;
            }
            // From here on the request is in flight and only the gate can drop it.
            inner.pending = None;
        }
        self.fetch(term).await;
    }

    async fn fetch(self, term: String) {
        let seq = {
            let mut inner = self.lock();
            if inner.shut_down {
                return;
            }
            let seq = inner.gate.issue();
            inner.apply(RemoteSearchTransition::Issued {
                seq,
                term: term.clone(),
            });
            seq
        };

        self.events.emit(RemoteSearchEvent::Started {
            seq,
            term: term.clone(),
        });

        let span = info_span!("usecase.remote_search.fetch", seq, term = %term);
        async move {
            let query = (!term.is_empty()).then_some(term.as_str());
            let result = self.repository.list_documents(query).await;

            let mut inner = self.lock();
            if inner.shut_down || !inner.gate.accept(seq) {
                debug!(
                    last_applied = inner.gate.last_applied(),
                    "discarding stale search response"
                );
                return;
            }

            match result {
                Ok(documents) => {
                    let documents = DocumentCollection::new(documents);
                    inner.apply(RemoteSearchTransition::Applied { seq });
                    if let Some(sink) = self.sink.upgrade() {
                        sink.replace_collection(documents.clone());
                    }
                    drop(inner);

                    info!(count = documents.len(), "search results applied");
                    self.events
                        .emit(RemoteSearchEvent::Succeeded { seq, documents });
                }
                Err(error) => {
                    inner.apply(RemoteSearchTransition::Failed {
                        seq,
                        message: error.to_string(),
                    });
                    drop(inner);

                    warn!(error = %error, "search request failed, keeping current documents");
                    self.events.emit(RemoteSearchEvent::Failed { seq, error });
                }
            }
        }
        .instrument(span)
        .await
    }
}
