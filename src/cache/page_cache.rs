//! Keyed storage of normalized page records

use crate::normalize::PageRecord;
use crate::types::PageKey;
use std::collections::HashMap;
use std::sync::Arc;

/// Cache of fetched pages
///
/// Unbounded and never partially evicted: entries only disappear through
/// [`PageCache::clear`].
#[derive(Debug)]
pub struct PageCache<T> {
    pages: HashMap<PageKey, Arc<PageRecord<T>>>,
}

impl<T> Default for PageCache<T> {
    fn default() -> Self {
        Self {
            pages: HashMap::new(),
        }
    }
}

impl<T> PageCache<T> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the record cached for a page
    pub fn get(&self, key: PageKey) -> Option<Arc<PageRecord<T>>> {
        self.pages.get(&key).cloned()
    }

    /// Store a record, replacing any previous record for the page
    ///
    /// Returns the replaced record.
    pub fn set(
        &mut self,
        key: PageKey,
        record: Arc<PageRecord<T>>,
    ) -> Option<Arc<PageRecord<T>>> {
        self.pages.insert(key, record)
    }

    /// Check if a page is cached
    pub fn has(&self, key: PageKey) -> bool {
        self.pages.contains_key(&key)
    }

    /// Remove every cached page
    pub fn clear(&mut self) {
        self.pages.clear();
    }

    /// Number of cached pages
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Check if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Cached page numbers in ascending order
    pub fn keys(&self) -> Vec<PageKey> {
        let mut keys: Vec<_> = self.pages.keys().copied().collect();
        keys.sort_unstable();
        keys
    }
}
