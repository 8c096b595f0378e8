//! Tests for paginator module

use super::*;
use crate::error::PageError;
use crate::hooks::StoreHooks;
use crate::normalize::{PageRecord, RawPageResponse};
use crate::source::{MemorySource, PageSource};
use crate::types::PageKey;
use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt};
use pretty_assertions::assert_eq;
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;
use test_case::test_case;
use tokio::sync::{oneshot, watch};

const WAIT: Duration = Duration::from_secs(2);

// ============================================================================
// Helpers
// ============================================================================

/// Source whose pages can be held back, failed or malformed on demand
struct ManualSource {
    per_page: u32,
    last_page: u32,
    blocked: watch::Sender<HashSet<PageKey>>,
    failing: Mutex<HashSet<PageKey>>,
    malformed: Mutex<HashSet<PageKey>>,
    started: AtomicUsize,
    calls: Mutex<Vec<PageKey>>,
}

impl ManualSource {
    fn new(per_page: u32, last_page: u32) -> Arc<Self> {
        let (blocked, _rx) = watch::channel(HashSet::new());
        Arc::new(Self {
            per_page,
            last_page,
            blocked,
            failing: Mutex::new(HashSet::new()),
            malformed: Mutex::new(HashSet::new()),
            started: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn block(&self, page: PageKey) {
        self.blocked.send_modify(|blocked| {
            blocked.insert(page);
        });
    }

    fn release(&self, page: PageKey) {
        self.blocked.send_modify(|blocked| {
            blocked.remove(&page);
        });
    }

    fn fail(&self, page: PageKey) {
        self.failing.lock().unwrap().insert(page);
    }

    fn recover(&self, page: PageKey) {
        self.failing.lock().unwrap().remove(&page);
    }

    fn malform(&self, page: PageKey) {
        self.malformed.lock().unwrap().insert(page);
    }

    fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    fn calls(&self) -> Vec<PageKey> {
        self.calls.lock().unwrap().clone()
    }

    fn calls_for(&self, page: PageKey) -> usize {
        self.calls().iter().filter(|p| **p == page).count()
    }

    fn data_for(&self, page: PageKey) -> Vec<u32> {
        (0..self.per_page).map(|i| page * 100 + i).collect()
    }
}

#[async_trait::async_trait]
impl PageSource<u32> for ManualSource {
    async fn fetch(
        &self,
        page: PageKey,
    ) -> Result<RawPageResponse<u32>, crate::error::BoxError> {
        self.calls.lock().unwrap().push(page);
        self.started.fetch_add(1, Ordering::SeqCst);

        let mut blocked = self.blocked.subscribe();
        let _ = blocked.wait_for(|set| !set.contains(&page)).await;

        if self.failing.lock().unwrap().contains(&page) {
            return Err(format!("page {page} unavailable").into());
        }

        let mut response =
            RawPageResponse::new(self.data_for(page), self.per_page, page, self.last_page);
        if self.malformed.lock().unwrap().contains(&page) {
            response.data = None;
        }
        Ok(response)
    }
}

async fn next_item<S>(views: &mut S) -> Result<PaginationView<u32>, PageError>
where
    S: futures::Stream<Item = Result<PaginationView<u32>, PageError>> + Unpin,
{
    tokio::time::timeout(WAIT, views.next())
        .await
        .expect("timed out waiting for a view")
        .expect("view stream ended")
}

async fn next_view<S>(views: &mut S) -> PaginationView<u32>
where
    S: futures::Stream<Item = Result<PaginationView<u32>, PageError>> + Unpin,
{
    next_item(views).await.expect("page request failed")
}

async fn eventually(condition: impl Fn() -> bool) {
    tokio::time::timeout(WAIT, async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await
    .expect("condition never became true");
}

fn nothing_emitted<S>(views: &mut S) -> bool
where
    S: futures::Stream + Unpin,
{
    views.next().now_or_never().is_none()
}

type Gates = Arc<Mutex<VecDeque<oneshot::Receiver<u32>>>>;

/// Request closure whose calls each wait on the next queued gate
///
/// The value sent through a gate becomes the only entity of the page.
fn gated_request(
    gates: &Gates,
) -> impl Fn(PageKey) -> BoxFuture<'static, Result<RawPageResponse<u32>, String>> + Send + Sync + 'static
{
    let gates = Arc::clone(gates);
    move |page: PageKey| {
        let gate = gates.lock().unwrap().pop_front();
        Box::pin(async move {
            let marker = match gate {
                Some(gate) => gate.await.map_err(|e| e.to_string())?,
                None => return Err("unexpected request".to_string()),
            };
            Ok(RawPageResponse::new(vec![marker], 1, page, 3))
        })
    }
}

fn controller() -> PaginatorController<u32> {
    PaginatorController::new(PaginatorConfig::new())
}

// ============================================================================
// Algorithm Tests
// ============================================================================

#[test_case(1, 10, Some(5), vec![1, 2, 3, 4, 5] ; "window at start")]
#[test_case(5, 10, Some(5), vec![3, 4, 5, 6, 7] ; "window centered")]
#[test_case(10, 10, Some(5), vec![6, 7, 8, 9, 10] ; "window at end")]
#[test_case(2, 3, Some(5), vec![1, 2, 3] ; "window larger than page count")]
#[test_case(4, 10, Some(4), vec![3, 4, 5, 6] ; "even window")]
#[test_case(3, 4, None, vec![1, 2, 3, 4] ; "every page")]
#[test_case(1, 1, Some(5), vec![1] ; "single page")]
#[test_case(9, 3, Some(5), vec![1, 2, 3] ; "current beyond last is clamped")]
#[test_case(u32::MAX, u32::MAX, Some(5), vec![u32::MAX - 4, u32::MAX - 3, u32::MAX - 2, u32::MAX - 1, u32::MAX] ; "window at largest page")]
#[test_case(u32::MAX - 1, u32::MAX, Some(4), vec![u32::MAX - 3, u32::MAX - 2, u32::MAX - 1, u32::MAX] ; "even window near largest page")]
fn test_page_controls(current: u32, last: u32, window: Option<u32>, expected: Vec<u32>) {
    assert_eq!(page_controls(current, last, window), expected);
}

#[test]
fn test_page_controls_invariants() {
    for last in 1..=12 {
        for current in 1..=last {
            for window in [None, Some(1), Some(2), Some(5), Some(20)] {
                let controls = page_controls(current, last, window);
                assert!(controls.contains(&current));
                assert!(controls.iter().all(|p| (1..=last).contains(p)));
                assert!(controls.windows(2).all(|w| w[1] == w[0] + 1));
            }
        }
    }
}

#[test_case(1, 10, 100, 1, 10 ; "first page")]
#[test_case(3, 10, 100, 21, 30 ; "middle page")]
#[test_case(5, 10, 43, 41, 43 ; "partial last page")]
#[test_case(1, 10, 0, 0, 0 ; "empty collection")]
#[test_case(11, 10, 100, 0, 0 ; "page past the end")]
#[test_case(u32::MAX, u32::MAX, u64::MAX, 18_446_744_060_824_649_731, 18_446_744_065_119_617_025 ; "largest page")]
fn test_page_range(current: u32, per_page: u32, total: u64, from: u64, to: u64) {
    assert_eq!(page_range(current, per_page, total), PageRange { from, to });
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_config_default() {
    let config = PaginatorConfig::default();
    assert!(!config.pages_controls);
    assert!(!config.range);
    assert_eq!(config.start_with, 1);
    assert_eq!(config.controls_window, Some(DEFAULT_CONTROLS_WINDOW));
}

#[test]
fn test_config_builder() {
    let config = PaginatorConfig::new()
        .with_controls()
        .with_range()
        .start_with(0)
        .with_controls_window(None);

    assert!(config.pages_controls);
    assert!(config.range);
    assert_eq!(config.start_with, 1);
    assert_eq!(config.controls_window, None);
}

#[tokio::test]
async fn test_factory_returns_independent_instances() {
    let first: PaginatorController<u32> = create_paginator(PaginatorConfig::new());
    let second: PaginatorController<u32> = create_paginator(PaginatorConfig::new());

    first.metadata().set("sort", "name");
    assert!(second.metadata().get("sort").is_none());
}

// ============================================================================
// Navigation Tests
// ============================================================================

#[tokio::test]
async fn test_navigation_before_any_fetch() {
    let paginator = controller();
    assert_eq!(paginator.current_page(), 1);
    assert!(paginator.is_first());
    assert!(!paginator.is_last());
    assert_eq!(paginator.last_known_page(), None);

    // Unknown bounds: any positive page is accepted
    paginator.set_page(40);
    assert_eq!(paginator.current_page(), 40);

    // Last page is unknown, so this is a no-op
    paginator.last_page();
    assert_eq!(paginator.current_page(), 40);

    paginator.set_page(0);
    assert_eq!(paginator.current_page(), 1);

    paginator.prev_page();
    assert_eq!(paginator.current_page(), 1);
}

#[tokio::test]
async fn test_start_with() {
    let paginator: PaginatorController<u32> = PaginatorController::builder().start_with(3).build();
    assert_eq!(paginator.current_page(), 3);
    assert!(!paginator.is_first());

    let mut changes = paginator.page_changes();
    assert_eq!(changes.next().await, Some(3));
}

#[tokio::test]
async fn test_page_changes_replays_latest_to_late_subscriber() {
    let paginator = controller();
    paginator.set_page(2);
    paginator.set_page(4);

    let mut changes = paginator.page_changes();
    assert_eq!(changes.next().await, Some(4));

    paginator.next_page();
    assert_eq!(changes.next().await, Some(5));
}

#[tokio::test]
async fn test_set_same_page_is_noop() {
    let paginator = controller();
    let mut changes = paginator.page_changes();
    assert_eq!(changes.next().await, Some(1));

    paginator.set_page(1);
    assert!(changes.next().now_or_never().is_none());
}

#[tokio::test]
async fn test_navigation_bounds_after_fetch() {
    let source = ManualSource::new(10, 4);
    let paginator = controller();
    let mut views = paginator.get_page_from(Arc::clone(&source));

    next_view(&mut views).await;
    assert_eq!(paginator.last_known_page(), Some(4));

    paginator.last_page();
    assert_eq!(paginator.current_page(), 4);
    assert!(paginator.is_last());
    next_view(&mut views).await;

    paginator.next_page();
    assert_eq!(paginator.current_page(), 4);

    paginator.set_page(99);
    assert_eq!(paginator.current_page(), 4);

    paginator.first_page();
    assert!(paginator.is_first());
    assert!(!paginator.is_last());
}

// ============================================================================
// Cache Tests
// ============================================================================

#[tokio::test]
async fn test_cache_hit_skips_request() {
    let source = ManualSource::new(5, 10);
    let paginator = controller();
    let mut views = paginator.get_page_from(Arc::clone(&source));

    let first = next_view(&mut views).await;
    assert_eq!(first.current_page, 1);
    assert_eq!(first.data, source.data_for(1));

    paginator.next_page();
    let second = next_view(&mut views).await;
    assert_eq!(second.current_page, 2);

    paginator.prev_page();
    let again = next_view(&mut views).await;
    assert_eq!(again, first);
    assert_eq!(source.calls(), vec![1, 2]);
    assert_eq!(paginator.cached_pages(), vec![1, 2]);
}

#[tokio::test]
async fn test_clear_cache_forces_single_refetch() {
    let source = ManualSource::new(5, 10);
    let paginator = controller();
    let mut views = paginator.get_page_from(Arc::clone(&source));
    next_view(&mut views).await;

    paginator.clear_cache();
    assert!(paginator.cached_pages().is_empty());

    // The current page can be requested again after invalidation
    paginator.set_page(1);
    next_view(&mut views).await;
    assert_eq!(source.calls_for(1), 2);

    // But only once
    paginator.set_page(1);
    assert!(nothing_emitted(&mut views));
    assert_eq!(source.calls_for(1), 2);
}

#[tokio::test]
async fn test_refresh_current_page() {
    let source = MemorySource::new((1..=30).collect::<Vec<u32>>(), 10).unwrap();
    let source = Arc::new(source);
    let paginator = controller();
    let mut views = paginator.get_page_from(Arc::clone(&source));
    next_view(&mut views).await;

    paginator.refresh_current_page();
    let view = next_view(&mut views).await;
    assert_eq!(view.data, (1..=10).collect::<Vec<u32>>());
    assert_eq!(source.fetches_for(1), 2);
}

#[tokio::test]
async fn test_cache_timeout_trigger_clears_cache() {
    let (tick_tx, tick_rx) = tokio::sync::mpsc::unbounded_channel::<()>();
    let ticks = futures::stream::unfold(tick_rx, |mut rx| async move {
        rx.recv().await.map(|tick| (tick, rx))
    });

    let source = ManualSource::new(5, 10);
    let paginator: PaginatorController<u32> =
        PaginatorController::builder().cache_timeout(ticks).build();
    paginator.metadata().set("sortBy", "name");
    let mut views = paginator.get_page_from(Arc::clone(&source));
    next_view(&mut views).await;
    assert!(paginator.has_page(1));

    tick_tx.send(()).unwrap();
    eventually(|| !paginator.has_page(1)).await;

    // Metadata is not part of the cache
    assert_eq!(paginator.metadata().get_as::<String>("sortBy"), Some("name".into()));
}

#[tokio::test]
async fn test_cache_timeout_every() {
    let source = ManualSource::new(5, 10);
    let paginator: PaginatorController<u32> = PaginatorController::builder()
        .cache_timeout_every(Duration::from_millis(50))
        .build();
    let mut views = paginator.get_page_from(Arc::clone(&source));
    next_view(&mut views).await;
    assert!(paginator.has_page(1));

    eventually(|| !paginator.has_page(1)).await;
}

#[tokio::test]
async fn test_concurrent_subscribers_share_fetch() {
    let source = ManualSource::new(5, 10);
    source.block(1);
    let paginator = controller();

    let mut first = paginator.get_page_from(Arc::clone(&source));
    let mut second = paginator.get_page_from(Arc::clone(&source));
    eventually(|| source.started() >= 1).await;
    tokio::time::sleep(Duration::from_millis(10)).await;

    source.release(1);
    let a = next_view(&mut first).await;
    let b = next_view(&mut second).await;
    assert_eq!(a, b);
    assert_eq!(source.calls_for(1), 1);
}

#[tokio::test]
async fn test_hooks_run_before_commit() {
    let hooks = StoreHooks::new()
        .pre_add_entity(|n: u32| n + 1)
        .pre_update(|_, mut record| {
            record.total = 7;
            record
        });
    let paginator: PaginatorController<u32> = PaginatorController::builder().hooks(hooks).build();
    let source = ManualSource::new(2, 3);
    let mut views = paginator.get_page_from(Arc::clone(&source));

    let view = next_view(&mut views).await;
    assert_eq!(view.data, vec![101, 102]);
    assert_eq!(view.total, 7);
    assert_eq!(paginator.cached_page(1).unwrap().data, vec![101, 102]);
}

// ============================================================================
// View Shape Tests
// ============================================================================

#[tokio::test]
async fn test_view_without_controls_or_range() {
    let source = ManualSource::new(10, 10);
    let paginator = controller();
    let mut views = paginator.get_page_from(Arc::clone(&source));

    let view = next_view(&mut views).await;
    assert_eq!(view.page_controls, None);
    assert_eq!(view.from, None);
    assert_eq!(view.to, None);
    assert_eq!(view.total, 100);
}

#[tokio::test]
async fn test_view_with_controls_and_range() {
    let source = ManualSource::new(10, 10);
    let paginator: PaginatorController<u32> = PaginatorController::builder()
        .with_controls()
        .with_range()
        .start_with(3)
        .build();
    let mut views = paginator.get_page_from(Arc::clone(&source));

    let view = next_view(&mut views).await;
    assert_eq!(view.current_page, 3);
    assert_eq!(view.page_controls, Some(vec![1, 2, 3, 4, 5]));
    assert_eq!(view.from, Some(21));
    assert_eq!(view.to, Some(30));

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["pageControls"], serde_json::json!([1, 2, 3, 4, 5]));
    assert_eq!(json["currentPage"], 3);
}

#[tokio::test]
async fn test_get_page_with_closure() {
    let paginator = controller();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let mut views = paginator.get_page(move |page: PageKey| {
        counter.fetch_add(1, Ordering::SeqCst);
        async move { Ok::<_, std::io::Error>(RawPageResponse::new(vec![page], 1, page, 3)) }
    });

    assert_eq!(next_view(&mut views).await.data, vec![1]);
    paginator.next_page();
    assert_eq!(next_view(&mut views).await.data, vec![2]);
    paginator.first_page();
    assert_eq!(next_view(&mut views).await.data, vec![1]);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// ============================================================================
// Failure Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_failure_is_not_cached() {
    let source = ManualSource::new(5, 10);
    source.fail(2);
    let paginator = controller();
    let mut views = paginator.get_page_from(Arc::clone(&source));
    next_view(&mut views).await;

    paginator.next_page();
    let err = next_item(&mut views).await.unwrap_err();
    assert!(matches!(err, PageError::Fetch { page: 2, .. }));
    assert!(!paginator.has_page(2));
    assert!(!paginator.is_loading());

    // Other pages are unaffected and the failed page can be retried
    paginator.prev_page();
    assert_eq!(next_view(&mut views).await.current_page, 1);

    source.recover(2);
    paginator.next_page();
    assert_eq!(next_view(&mut views).await.current_page, 2);
    assert_eq!(source.calls_for(2), 2);
}

#[tokio::test]
async fn test_malformed_response_is_validation_error() {
    let source = ManualSource::new(5, 10);
    source.malform(1);
    let paginator = controller();
    let mut views = paginator.get_page_from(Arc::clone(&source));

    let err = next_item(&mut views).await.unwrap_err();
    assert!(err.is_validation());
    assert!(paginator.cached_pages().is_empty());
    assert_eq!(paginator.last_known_page(), None);
}

// ============================================================================
// Concurrency Tests
// ============================================================================

#[tokio::test]
async fn test_latest_page_wins_over_slow_fetch() {
    let source = ManualSource::new(5, 10);
    let paginator = controller();
    let mut views = paginator.get_page_from(Arc::clone(&source));
    next_view(&mut views).await;

    source.block(5);
    paginator.set_page(5);
    eventually(|| source.calls_for(5) == 1).await;

    paginator.set_page(7);
    let view = next_view(&mut views).await;
    assert_eq!(view.current_page, 7);
    assert_eq!(view.data, source.data_for(7));

    // The slow page still lands in the cache, but is never emitted
    source.release(5);
    eventually(|| paginator.has_page(5)).await;
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(nothing_emitted(&mut views));
    assert_eq!(paginator.current_page(), 7);
}

#[tokio::test]
async fn test_returning_to_pending_page_joins_fetch() {
    let source = ManualSource::new(5, 10);
    source.block(2);
    let paginator = controller();
    paginator.set_page(2);
    let mut views = paginator.get_page_from(Arc::clone(&source));
    eventually(|| source.calls_for(2) == 1).await;

    paginator.set_page(3);
    assert_eq!(next_view(&mut views).await.current_page, 3);

    paginator.set_page(2);
    source.release(2);
    assert_eq!(next_view(&mut views).await.current_page, 2);
    assert_eq!(source.calls_for(2), 1);
}

#[tokio::test]
async fn test_in_flight_fetch_survives_invalidation() {
    let source = ManualSource::new(5, 10);
    source.block(1);
    let paginator = controller();
    let mut views = paginator.get_page_from(Arc::clone(&source));
    eventually(|| source.started() == 1).await;

    paginator.clear_cache();
    source.release(1);

    let view = next_view(&mut views).await;
    assert_eq!(view.current_page, 1);
    assert!(paginator.has_page(1));
}

#[tokio::test]
async fn test_older_fetch_never_overwrites_newer() {
    let (first_tx, first_rx) = oneshot::channel::<u32>();
    let (second_tx, second_rx) = oneshot::channel::<u32>();
    let gates = Arc::new(Mutex::new(VecDeque::from([first_rx, second_rx])));

    let paginator = controller();
    let mut views = paginator.get_page(gated_request(&gates));
    eventually(|| gates.lock().unwrap().len() == 1).await;

    // Detach the first fetch and start a second one for the same page
    paginator.refresh_current_page();
    eventually(|| gates.lock().unwrap().is_empty()).await;

    second_tx.send(2).unwrap();
    assert_eq!(next_view(&mut views).await.data, vec![2]);

    // The first fetch finishes last and must not replace the newer record
    first_tx.send(1).unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(paginator.cached_page(1).unwrap().data, vec![2]);
    assert!(nothing_emitted(&mut views));
}

#[tokio::test]
async fn test_superseded_fetch_still_runs_hooks() {
    let (first_tx, first_rx) = oneshot::channel::<u32>();
    let (second_tx, second_rx) = oneshot::channel::<u32>();
    let gates = Arc::new(Mutex::new(VecDeque::from([first_rx, second_rx])));

    let paginator: PaginatorController<u32> = PaginatorController::builder()
        .hooks(StoreHooks::new().pre_add_entity(|n: u32| n + 1000))
        .build();
    let mut waiting = paginator.get_page(gated_request(&gates));
    eventually(|| gates.lock().unwrap().len() == 1).await;

    // A later subscriber starts its own fetch once the first one is detached
    paginator.clear_cache();
    let mut late = paginator.get_page(gated_request(&gates));
    eventually(|| gates.lock().unwrap().is_empty()).await;

    second_tx.send(2).unwrap();
    assert_eq!(next_view(&mut late).await.data, vec![1002]);

    // The older fetch finds nothing cached and reports its own transformed record
    paginator.clear_cache();
    first_tx.send(1).unwrap();
    assert_eq!(next_view(&mut waiting).await.data, vec![1001]);
    assert!(!paginator.has_page(1));
}

#[tokio::test]
async fn test_hooks_may_call_back_into_paginator() {
    let handle: Arc<OnceLock<PaginatorController<u32>>> = Arc::new(OnceLock::new());
    let seen = Arc::new(Mutex::new(Vec::new()));

    let hook_handle = Arc::clone(&handle);
    let hook_seen = Arc::clone(&seen);
    let hooks = StoreHooks::new().pre_update(move |_, record: PageRecord<u32>| {
        if let Some(paginator) = hook_handle.get() {
            hook_seen
                .lock()
                .unwrap()
                .push((paginator.has_page(record.current_page), paginator.cached_pages()));
        }
        record
    });

    let paginator: PaginatorController<u32> = PaginatorController::builder().hooks(hooks).build();
    handle.set(paginator.clone()).unwrap();
    let source = ManualSource::new(2, 3);
    let mut views = paginator.get_page_from(Arc::clone(&source));

    next_view(&mut views).await;
    paginator.next_page();
    next_view(&mut views).await;

    assert_eq!(*seen.lock().unwrap(), vec![(false, vec![]), (false, vec![1])]);
    assert_eq!(paginator.cached_pages(), vec![1, 2]);
    paginator.destroy();
}

#[tokio::test]
async fn test_loading_flag_follows_fetch() {
    let source = ManualSource::new(5, 10);
    source.block(1);
    let paginator = controller();
    assert!(!paginator.is_loading());

    let mut views = paginator.get_page_from(Arc::clone(&source));
    eventually(|| source.started() == 1).await;
    assert!(paginator.is_loading());

    source.release(1);
    next_view(&mut views).await;
    assert!(!paginator.is_loading());

    // Unblocked fetches and cache hits leave the flag lowered
    paginator.set_page(2);
    next_view(&mut views).await;
    paginator.set_page(1);
    next_view(&mut views).await;
    assert!(!paginator.is_loading());
}

// ============================================================================
// Lifecycle Tests
// ============================================================================

#[tokio::test]
async fn test_destroy_is_idempotent_and_ends_streams() {
    let source = ManualSource::new(5, 10);
    let paginator = controller();
    let mut views = paginator.get_page_from(Arc::clone(&source));
    let mut changes = paginator.page_changes();
    next_view(&mut views).await;
    assert_eq!(changes.next().await, Some(1));
    paginator.metadata().set("filter", "open");

    paginator.destroy();
    paginator.destroy();
    assert!(paginator.is_destroyed());

    let end = tokio::time::timeout(WAIT, views.next()).await.unwrap();
    assert!(end.is_none());
    let end = tokio::time::timeout(WAIT, changes.next()).await.unwrap();
    assert!(end.is_none());
    assert!(paginator.metadata().get("filter").is_none());

    // Navigation after destroy does nothing
    paginator.set_page(3);
    assert_eq!(paginator.current_page(), 1);
}

#[tokio::test]
async fn test_destroy_discards_in_flight_fetch() {
    let source = ManualSource::new(5, 10);
    source.block(1);
    let paginator = controller();
    let _views = paginator.get_page_from(Arc::clone(&source));
    eventually(|| source.started() == 1).await;
    assert!(paginator.is_loading());

    paginator.destroy();
    eventually(|| !paginator.is_loading()).await;

    source.release(1);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!paginator.has_page(1));
}

#[tokio::test]
async fn test_destroy_without_pending_work() {
    let paginator = controller();
    paginator.destroy();
    paginator.destroy();
    assert!(paginator.page_changes().next().await.is_none());
}
