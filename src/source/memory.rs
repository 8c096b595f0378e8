//! In-memory page source

use super::types::PageSource;
use crate::error::{BoxError, Error, Result};
use crate::normalize::RawPageResponse;
use crate::types::PageKey;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// Serves a fixed dataset page by page
///
/// Behaves like a server-side paginator: pages past the end come back empty,
/// and every fetch is counted so callers can tell cache hits from misses.
#[derive(Debug)]
pub struct MemorySource<T> {
    items: Vec<T>,
    per_page: u32,
    latency: Option<Duration>,
    report_total: bool,
    fetches: AtomicUsize,
    fetches_per_page: Mutex<HashMap<PageKey, usize>>,
}

impl<T: Clone> MemorySource<T> {
    /// Create a source over `items` with the given page size
    pub fn new(items: Vec<T>, per_page: u32) -> Result<Self> {
        if per_page == 0 {
            return Err(Error::invalid_value("per_page", "must be at least 1"));
        }

        Ok(Self {
            items,
            per_page,
            latency: None,
            report_total: true,
            fetches: AtomicUsize::new(0),
            fetches_per_page: Mutex::new(HashMap::new()),
        })
    }

    /// Delay every response
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Leave `total` out of responses
    #[must_use]
    pub fn without_total(mut self) -> Self {
        self.report_total = false;
        self
    }

    /// Number of the last page (at least 1)
    pub fn last_page(&self) -> u32 {
        let pages = self.items.len().div_ceil(self.per_page as usize).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Total fetches served
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Fetches served for one page
    pub fn fetches_for(&self, page: PageKey) -> usize {
        self.fetches_per_page
            .lock()
            .map(|counts| counts.get(&page).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Build the response for a page without counting it
    pub fn page(&self, page: PageKey) -> RawPageResponse<T> {
        let per_page = self.per_page as usize;
        let start = (page.max(1) as usize - 1).saturating_mul(per_page);
        let data = self
            .items
            .iter()
            .skip(start)
            .take(per_page)
            .cloned()
            .collect();

        let response = RawPageResponse::new(data, self.per_page, page, self.last_page());
        if self.report_total {
            response.with_total(self.items.len() as u64)
        } else {
            response
        }
    }

    fn record_fetch(&self, page: PageKey) {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut counts) = self.fetches_per_page.lock() {
            *counts.entry(page).or_insert(0) += 1;
        }
    }
}

#[async_trait]
impl<T> PageSource<T> for MemorySource<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn fetch(&self, page: PageKey) -> std::result::Result<RawPageResponse<T>, BoxError> {
        self.record_fetch(page);
        debug!(page, "serving page from memory source");

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        Ok(self.page(page))
    }
}
