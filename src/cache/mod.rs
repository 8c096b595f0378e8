//! Page cache and metadata module
//!
//! Holds the per-paginator storage.
//!
//! # Overview
//!
//! The cache module provides:
//! - `PageCache` - Normalized page records keyed by page number, cleared as a whole
//! - `Metadata` - Caller-defined key/value context that survives cache invalidation

mod metadata;
mod page_cache;

pub use metadata::Metadata;
pub use page_cache::PageCache;
