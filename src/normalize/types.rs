//! Raw and normalized page shapes

use crate::types::PageKey;
use serde::{Deserialize, Serialize};

/// A page response exactly as the server sent it
///
/// Every field is optional here so that a malformed response can be
/// reported as a validation error instead of a deserialization failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPageResponse<T> {
    /// Entities on this page
    pub data: Option<Vec<T>>,
    /// Page size used by the server
    #[serde(alias = "per_page")]
    pub per_page: Option<i64>,
    /// Number of the last page
    #[serde(alias = "last_page")]
    pub last_page: Option<i64>,
    /// Number of this page
    #[serde(alias = "current_page")]
    pub current_page: Option<i64>,
    /// Total entity count, when the server knows it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
}

impl<T> RawPageResponse<T> {
    /// Create a well-formed raw response without a total
    pub fn new(data: Vec<T>, per_page: u32, current_page: PageKey, last_page: u32) -> Self {
        Self {
            data: Some(data),
            per_page: Some(i64::from(per_page)),
            last_page: Some(i64::from(last_page)),
            current_page: Some(i64::from(current_page)),
            total: None,
        }
    }

    /// Set the total entity count
    #[must_use]
    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(i64::try_from(total).unwrap_or(i64::MAX));
        self
    }
}

/// Normalized snapshot of one fetched page
///
/// Records are never mutated once cached; a re-fetch replaces the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord<T> {
    /// Entities on this page, in server order
    pub data: Vec<T>,
    /// Page size
    pub per_page: u32,
    /// Number of the last page
    pub last_page: u32,
    /// Number of this page
    pub current_page: PageKey,
    /// Total entity count across all pages
    pub total: u64,
}

impl<T> PageRecord<T> {
    /// Number of entities on this page
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if this page holds no entities
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check if this is the last page
    pub fn is_last(&self) -> bool {
        self.current_page >= self.last_page
    }
}
