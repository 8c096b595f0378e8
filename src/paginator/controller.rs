//! Paginator controller
//!
//! Owns the page cache, the metadata store and the loading flag of one
//! paginated collection, and turns navigation into cache lookups or fetches.

use super::config::{PaginatorBuilder, PaginatorConfig};
use super::view::PaginationView;
use crate::cache::{Metadata, PageCache};
use crate::error::{BoxError, PageError};
use crate::hooks::StoreHooks;
use crate::loading::{LoadingGate, LoadingState};
use crate::normalize::{normalize, PageRecord, RawPageResponse};
use crate::source::{from_fn, PageSource};
use crate::types::{PageKey, FIRST_PAGE};
use futures::future::{BoxFuture, FutureExt, Shared};
use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Stream of page numbers produced by navigation
pub type PageChangeStream = Pin<Box<dyn Stream<Item = PageKey> + Send>>;

/// Stream of views produced by [`PaginatorController::get_page`]
pub type ViewStream<T> =
    Pin<Box<dyn Stream<Item = Result<PaginationView<T>, PageError>> + Send>>;

type FetchOutcome<T> = Result<Arc<PageRecord<T>>, PageError>;
type SharedFetch<T> = Shared<BoxFuture<'static, FetchOutcome<T>>>;

/// Create a new paginator with the given config
///
/// Every call returns an independent instance; the caller owns it and is
/// responsible for calling [`PaginatorController::destroy`].
pub fn create_paginator<T>(config: PaginatorConfig) -> PaginatorController<T>
where
    T: Clone + Send + Sync + 'static,
{
    PaginatorController::new(config)
}

/// A navigation request as broadcast to subscribers
///
/// `seq` changes on every emission so re-requesting the current page after
/// an invalidation is observed as a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Navigation {
    page: PageKey,
    seq: u64,
}

struct InFlight<T> {
    seq: u64,
    fetch: SharedFetch<T>,
}

struct State<T> {
    cache: PageCache<T>,
    last_page: Option<u32>,
    invalidated: bool,
    next_fetch_seq: u64,
    written: HashMap<PageKey, u64>,
    in_flight: HashMap<PageKey, InFlight<T>>,
    destroyed: bool,
}

impl<T> State<T> {
    fn new() -> Self {
        Self {
            cache: PageCache::new(),
            last_page: None,
            invalidated: false,
            next_fetch_seq: 1,
            written: HashMap::new(),
            in_flight: HashMap::new(),
            destroyed: false,
        }
    }

    /// Whether a fetch that started after `seq` already wrote `page`
    fn superseded(&self, page: PageKey, seq: u64) -> bool {
        self.written.get(&page).is_some_and(|&newest| seq < newest)
    }
}

struct Inner<T> {
    config: PaginatorConfig,
    hooks: StoreHooks<T>,
    nav: watch::Sender<Navigation>,
    loading: LoadingState,
    gate: LoadingGate,
    metadata: Metadata,
    cancel: CancellationToken,
    state: Mutex<State<T>>,
}

impl<T> Inner<T> {
    fn lock_state(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn current_page(&self) -> PageKey {
        self.nav.borrow().page
    }

    fn clear_cache(&self) {
        let mut state = self.lock_state();
        let dropped = state.cache.len();
        state.cache.clear();
        state.in_flight.clear();
        state.invalidated = true;
        debug!(dropped, "page cache cleared");
    }
}

impl<T> Drop for Inner<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl<T: Clone> Inner<T> {
    /// Commit a finished fetch
    ///
    /// Failures are never cached. A result is written unless a fetch that
    /// started later already wrote the same page. Hooks run without the
    /// state lock held, so they may call back into the paginator.
    fn commit(
        &self,
        page: PageKey,
        seq: u64,
        record: Result<PageRecord<T>, PageError>,
    ) -> FetchOutcome<T> {
        let (previous, record) = {
            let mut state = self.lock_state();
            if state.in_flight.get(&page).is_some_and(|f| f.seq == seq) {
                state.in_flight.remove(&page);
            }

            let record = record?;
            if state.destroyed {
                return Err(PageError::Cancelled { page });
            }
            (state.cache.get(page), record)
        };

        let record = Arc::new(self.hooks.apply(previous.as_deref(), record));

        let mut state = self.lock_state();
        if state.destroyed {
            return Err(PageError::Cancelled { page });
        }
        if state.superseded(page, seq) {
            debug!(page, seq, "discarding result older than cached page");
            return Ok(state.cache.get(page).unwrap_or(record));
        }

        state.cache.set(page, Arc::clone(&record));
        state.written.insert(page, seq);
        state.last_page = Some(record.last_page);
        debug!(page, seq, entities = record.len(), "page cached");

        Ok(record)
    }
}

/// Client-side paginator over a server-paginated collection
///
/// Cloning yields another handle to the same paginator. All handles share
/// one cache, one metadata store and one loading flag.
pub struct PaginatorController<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for PaginatorController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for PaginatorController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginatorController")
            .field("config", &self.inner.config)
            .field("current_page", &self.inner.current_page())
            .field("destroyed", &self.inner.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl<T> PaginatorController<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a paginator with the given config
    pub fn new(config: PaginatorConfig) -> Self {
        PaginatorBuilder::new().config(config).build()
    }

    /// Start building a paginator
    pub fn builder() -> PaginatorBuilder<T> {
        PaginatorBuilder::new()
    }

    pub(super) fn from_builder(builder: PaginatorBuilder<T>) -> Self {
        let PaginatorBuilder {
            config,
            hooks,
            cache_timeout,
        } = builder;

        let (nav, _rx) = watch::channel(Navigation {
            page: config.start_with.max(FIRST_PAGE),
            seq: 0,
        });
        let loading = LoadingState::new();
        let gate = LoadingGate::new(Arc::new(loading.clone()));

        let inner = Arc::new(Inner {
            config,
            hooks,
            nav,
            loading,
            gate,
            metadata: Metadata::new(),
            cancel: CancellationToken::new(),
            state: Mutex::new(State::new()),
        });

        if let Some(trigger) = cache_timeout {
            spawn_cache_timeout(&inner, trigger);
        }

        Self { inner }
    }

    /// The construction-time config
    pub fn config(&self) -> &PaginatorConfig {
        &self.inner.config
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Stream of requested pages
    ///
    /// Yields the current page immediately, then every page change. A slow
    /// consumer observes the latest page. Ends when the paginator is destroyed.
    pub fn page_changes(&self) -> PageChangeStream {
        if self.is_destroyed() {
            return stream::empty().boxed();
        }

        let mut rx = self.inner.nav.subscribe();
        let current = rx.borrow_and_update().page;
        let cancel = self.inner.cancel.clone();

        let changes = stream::unfold((rx, cancel), |(mut rx, cancel)| async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => None,
                changed = rx.changed() => match changed {
                    Ok(()) => {
                        let page = rx.borrow_and_update().page;
                        Some((page, (rx, cancel)))
                    }
                    Err(_) => None,
                },
            }
        });

        stream::once(async move { current }).chain(changes).boxed()
    }

    /// Current page
    pub fn current_page(&self) -> PageKey {
        self.inner.current_page()
    }

    /// `lastPage` of the most recently cached record, if any page was fetched
    pub fn last_known_page(&self) -> Option<u32> {
        self.inner.lock_state().last_page
    }

    /// Check if the current page is the first page
    pub fn is_first(&self) -> bool {
        self.current_page() == FIRST_PAGE
    }

    /// Check if the current page is the last known page
    ///
    /// Always false before the first fetch.
    pub fn is_last(&self) -> bool {
        self.last_known_page().is_some_and(|last| self.current_page() >= last)
    }

    /// Request navigation to a page
    ///
    /// Values below 1, or above the last known page, are clamped. Requesting
    /// the current page does nothing unless the cache was cleared since.
    pub fn set_page(&self, page: PageKey) {
        if self.inner.cancel.is_cancelled() {
            return;
        }

        let mut state = self.inner.lock_state();
        let mut target = page.max(FIRST_PAGE);
        if let Some(last) = state.last_page {
            target = target.min(last);
        }
        if target != page {
            debug!(requested = page, page = target, "clamped page request");
        }

        let current = self.inner.current_page();
        if target == current && !state.invalidated {
            return;
        }

        state.invalidated = false;
        self.inner.nav.send_modify(|nav| {
            nav.page = target;
            nav.seq += 1;
        });
        debug!(from = current, to = target, "page changed");
    }

    /// Go to the next page (no-op on the last page)
    pub fn next_page(&self) {
        if self.is_last() {
            return;
        }
        self.set_page(self.current_page().saturating_add(1));
    }

    /// Go to the previous page (no-op on the first page)
    pub fn prev_page(&self) {
        if self.is_first() {
            return;
        }
        self.set_page(self.current_page() - 1);
    }

    /// Go to the first page
    pub fn first_page(&self) {
        self.set_page(FIRST_PAGE);
    }

    /// Go to the last known page (no-op before the first fetch)
    pub fn last_page(&self) {
        if let Some(last) = self.last_known_page() {
            self.set_page(last);
        }
    }

    // ========================================================================
    // Cache
    // ========================================================================

    /// Invalidate every cached page
    ///
    /// Fetches already running still cache their result when they finish,
    /// but are no longer shared with new requests.
    pub fn clear_cache(&self) {
        self.inner.clear_cache();
    }

    /// Invalidate the cache and request the current page again
    pub fn refresh_current_page(&self) {
        self.clear_cache();
        self.set_page(self.current_page());
    }

    /// Check if a page is cached
    pub fn has_page(&self, page: PageKey) -> bool {
        self.inner.lock_state().cache.has(page)
    }

    /// Cached record for a page
    pub fn cached_page(&self, page: PageKey) -> Option<Arc<PageRecord<T>>> {
        self.inner.lock_state().cache.get(page)
    }

    /// Cached page numbers in ascending order
    pub fn cached_pages(&self) -> Vec<PageKey> {
        self.inner.lock_state().cache.keys()
    }

    // ========================================================================
    // Loading and metadata
    // ========================================================================

    /// Loading flag, raised while a fetch runs
    pub fn loading(&self) -> &LoadingState {
        &self.inner.loading
    }

    /// Check if a fetch is running
    pub fn is_loading(&self) -> bool {
        self.inner.loading.is_loading()
    }

    /// Caller-defined navigation context
    pub fn metadata(&self) -> &Metadata {
        &self.inner.metadata
    }

    // ========================================================================
    // Fetching
    // ========================================================================

    /// Subscribe to views using a request closure
    ///
    /// The closure receives the page being requested.
    pub fn get_page<F, Fut, E>(&self, request: F) -> ViewStream<T>
    where
        F: Fn(PageKey) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<RawPageResponse<T>, E>> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        self.get_page_from(Arc::new(from_fn(request)))
    }

    /// Subscribe to views fetched from a page source
    ///
    /// Yields one item per page change: the cached record when present,
    /// otherwise the fetched, normalized and cached record, or the error
    /// for that request. Only the latest requested page is ever emitted.
    /// Ends when the paginator is destroyed.
    ///
    /// Must be called from within a tokio runtime.
    pub fn get_page_from<S>(&self, source: Arc<S>) -> ViewStream<T>
    where
        S: PageSource<T> + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let driver = Driver {
            inner: Arc::clone(&self.inner),
            source: source as Arc<dyn PageSource<T>>,
            tx,
        };
        tokio::spawn(driver.run());

        stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        })
        .boxed()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Release the paginator
    ///
    /// Ends every page and view stream, cancels running fetches and clears
    /// the metadata. Fetches cancelled here never touch the cache. Safe to
    /// call more than once.
    pub fn destroy(&self) {
        {
            let mut state = self.inner.lock_state();
            if state.destroyed {
                return;
            }
            state.destroyed = true;
            state.in_flight.clear();
        }

        self.inner.cancel.cancel();
        self.inner.metadata.clear();
        debug!("paginator destroyed");
    }

    /// Check if [`destroy`](Self::destroy) was called
    pub fn is_destroyed(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }
}

/// Clears the cache whenever the trigger yields
fn spawn_cache_timeout<T>(inner: &Arc<Inner<T>>, mut trigger: BoxStream<'static, ()>)
where
    T: Send + Sync + 'static,
{
    let weak = Arc::downgrade(inner);
    let cancel = inner.cancel.clone();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                tick = trigger.next() => {
                    let Some(()) = tick else { break };
                    let Some(inner) = weak.upgrade() else { break };
                    debug!("cache timeout fired");
                    inner.clear_cache();
                }
            }
        }
    });
}

/// Per-subscriber task behind [`PaginatorController::get_page_from`]
struct Driver<T> {
    inner: Arc<Inner<T>>,
    source: Arc<dyn PageSource<T>>,
    tx: mpsc::UnboundedSender<Result<PaginationView<T>, PageError>>,
}

/// The fetch the subscriber is currently waiting on
struct Pending<T> {
    page: PageKey,
    fetch: SharedFetch<T>,
}

impl<T> Driver<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn run(self) {
        let mut nav_rx = self.inner.nav.subscribe();
        let first = nav_rx.borrow_and_update().page;
        let mut pending = self.resolve(first);

        loop {
            tokio::select! {
                biased;
                () = self.inner.cancel.cancelled() => break,
                () = self.tx.closed() => break,
                changed = nav_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let page = nav_rx.borrow_and_update().page;
                    if let Some(stale) = pending.take() {
                        debug!(stale = stale.page, page, "superseded pending page request");
                    }
                    pending = self.resolve(page);
                }
                outcome = settle(&mut pending), if pending.is_some() => {
                    let page = pending.take().map_or(0, |p| p.page);
                    let item = outcome
                        .map(|record| PaginationView::from_record(&record, &self.inner.config));
                    if let Err(err) = &item {
                        warn!(page, error = %err, "page request failed");
                    }
                    if self.tx.send(item).is_err() {
                        break;
                    }
                }
            }
        }

        debug!("page subscription closed");
    }

    /// Answer a page request from the cache, or start (or join) its fetch
    fn resolve(&self, page: PageKey) -> Option<Pending<T>> {
        let mut state = self.inner.lock_state();
        if state.destroyed {
            return None;
        }

        let cached = state.cache.get(page);
        if let Some(record) = cached {
            drop(state);
            debug!(page, "page cache hit");
            let view = PaginationView::from_record(&record, &self.inner.config);
            let _ = self.tx.send(Ok(view));
            return None;
        }

        let fetch = if let Some(in_flight) = state.in_flight.get(&page) {
            debug!(page, "joining in-flight fetch");
            in_flight.fetch.clone()
        } else {
            let seq = state.next_fetch_seq;
            state.next_fetch_seq += 1;
            debug!(page, seq, "page cache miss, fetching");

            let fetch = self.start_fetch(page, seq);
            state.in_flight.insert(
                page,
                InFlight {
                    seq,
                    fetch: fetch.clone(),
                },
            );
            fetch
        };

        Some(Pending { page, fetch })
    }

    /// Spawn a gated fetch that runs to completion whoever is listening
    fn start_fetch(&self, page: PageKey, seq: u64) -> SharedFetch<T> {
        let weak: Weak<Inner<T>> = Arc::downgrade(&self.inner);
        let cancel = self.inner.cancel.clone();
        let source = Arc::clone(&self.source);
        let gated = self
            .inner
            .gate
            .run(async move { source.fetch(page).await });

        let fetch = async move {
            let response = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(PageError::Cancelled { page }),
                response = gated => response,
            };

            let record = response
                .map_err(|e| PageError::fetch(page, e))
                .and_then(normalize);

            match weak.upgrade() {
                Some(inner) => inner.commit(page, seq, record),
                None => Err(PageError::Cancelled { page }),
            }
        }
        .boxed()
        .shared();

        tokio::spawn(fetch.clone());
        fetch
    }
}

async fn settle<T: Clone>(pending: &mut Option<Pending<T>>) -> FetchOutcome<T> {
    match pending {
        Some(pending) => (&mut pending.fetch).await,
        None => std::future::pending().await,
    }
}
