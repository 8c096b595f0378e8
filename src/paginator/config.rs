//! Paginator configuration and builder

use super::controller::PaginatorController;
use crate::hooks::StoreHooks;
use crate::types::{PageKey, FIRST_PAGE};
use futures::stream::{self, BoxStream, StreamExt};
use futures::Stream;
use std::fmt;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Number of page controls rendered when no window is configured
pub const DEFAULT_CONTROLS_WINDOW: u32 = 5;

/// Construction-time paginator options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginatorConfig {
    /// Compute `page_controls` for every view
    pub pages_controls: bool,
    /// Compute `from` / `to` for every view
    pub range: bool,
    /// Initial page
    pub start_with: PageKey,
    /// Size of the page-control window (`None` renders every page)
    pub controls_window: Option<u32>,
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self {
            pages_controls: false,
            range: false,
            start_with: FIRST_PAGE,
            controls_window: Some(DEFAULT_CONTROLS_WINDOW),
        }
    }
}

impl PaginatorConfig {
    /// Create a config with every option at its default
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable page-control computation
    #[must_use]
    pub fn with_controls(mut self) -> Self {
        self.pages_controls = true;
        self
    }

    /// Enable displayed-range computation
    #[must_use]
    pub fn with_range(mut self) -> Self {
        self.range = true;
        self
    }

    /// Set the initial page (values below 1 start at page 1)
    #[must_use]
    pub fn start_with(mut self, page: PageKey) -> Self {
        self.start_with = page.max(FIRST_PAGE);
        self
    }

    /// Set the page-control window
    #[must_use]
    pub fn with_controls_window(mut self, window: Option<u32>) -> Self {
        self.controls_window = window;
        self
    }
}

/// Builder for [`PaginatorController`]
///
/// Each step consumes the builder and returns the updated one.
pub struct PaginatorBuilder<T> {
    pub(super) config: PaginatorConfig,
    pub(super) hooks: StoreHooks<T>,
    pub(super) cache_timeout: Option<BoxStream<'static, ()>>,
}

impl<T> Default for PaginatorBuilder<T> {
    fn default() -> Self {
        Self {
            config: PaginatorConfig::default(),
            hooks: StoreHooks::default(),
            cache_timeout: None,
        }
    }
}

impl<T> fmt::Debug for PaginatorBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginatorBuilder")
            .field("config", &self.config)
            .field("hooks", &self.hooks)
            .field("cache_timeout", &self.cache_timeout.is_some())
            .finish()
    }
}

impl<T> PaginatorBuilder<T> {
    /// Create a builder with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole config
    #[must_use]
    pub fn config(mut self, config: PaginatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Enable page-control computation
    #[must_use]
    pub fn with_controls(mut self) -> Self {
        self.config = self.config.with_controls();
        self
    }

    /// Enable displayed-range computation
    #[must_use]
    pub fn with_range(mut self) -> Self {
        self.config = self.config.with_range();
        self
    }

    /// Set the initial page
    #[must_use]
    pub fn start_with(mut self, page: PageKey) -> Self {
        self.config = self.config.start_with(page);
        self
    }

    /// Set the page-control window
    #[must_use]
    pub fn controls_window(mut self, window: Option<u32>) -> Self {
        self.config = self.config.with_controls_window(window);
        self
    }

    /// Set the hooks run before a page is committed to the cache
    #[must_use]
    pub fn hooks(mut self, hooks: StoreHooks<T>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Clear the cache every time `trigger` yields
    #[must_use]
    pub fn cache_timeout<S>(mut self, trigger: S) -> Self
    where
        S: Stream<Item = ()> + Send + 'static,
    {
        self.cache_timeout = Some(trigger.boxed());
        self
    }

    /// Clear the cache once per `period`, starting one period after build
    #[must_use]
    pub fn cache_timeout_every(self, period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        let ticks = stream::unfold(None, move |interval: Option<tokio::time::Interval>| async move {
            let mut interval = interval.unwrap_or_else(|| {
                let mut interval = interval_at(Instant::now() + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                interval
            });
            interval.tick().await;
            Some(((), Some(interval)))
        });
        self.cache_timeout(ticks)
    }
}

impl<T> PaginatorBuilder<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Build the paginator
    ///
    /// Must be called from within a tokio runtime when a cache timeout is set.
    pub fn build(self) -> PaginatorController<T> {
        PaginatorController::from_builder(self)
    }
}
