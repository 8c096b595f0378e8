//! Pagination view emitted to subscribers

use super::config::PaginatorConfig;
use super::controls::{page_controls, page_range};
use crate::normalize::PageRecord;
use crate::types::{PageKey, FIRST_PAGE};
use serde::Serialize;

/// One page of data plus the derived navigation data a UI needs
///
/// `page_controls`, `from` and `to` are only computed when enabled in the
/// paginator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationView<T> {
    /// Number of this page
    pub current_page: PageKey,
    /// Page size
    pub per_page: u32,
    /// Number of the last page
    pub last_page: u32,
    /// Total entity count
    pub total: u64,
    /// Entities on this page
    pub data: Vec<T>,
    /// Page numbers to render as controls
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_controls: Option<Vec<PageKey>>,
    /// Position of the first entity shown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<u64>,
    /// Position of the last entity shown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<u64>,
}

impl<T: Clone> PaginationView<T> {
    /// Build a view over a cached record
    pub fn from_record(record: &PageRecord<T>, config: &PaginatorConfig) -> Self {
        let page_controls = config.pages_controls.then(|| {
            page_controls(record.current_page, record.last_page, config.controls_window)
        });
        let range = config
            .range
            .then(|| page_range(record.current_page, record.per_page, record.total));

        Self {
            current_page: record.current_page,
            per_page: record.per_page,
            last_page: record.last_page,
            total: record.total,
            data: record.data.clone(),
            page_controls,
            from: range.map(|r| r.from),
            to: range.map(|r| r.to),
        }
    }
}

impl<T> PaginationView<T> {
    /// Check if this is the first page
    pub fn is_first(&self) -> bool {
        self.current_page == FIRST_PAGE
    }

    /// Check if this is the last page
    pub fn is_last(&self) -> bool {
        self.current_page >= self.last_page
    }
}
