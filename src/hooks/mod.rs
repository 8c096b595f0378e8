//! Write hook module
//!
//! Pre-commit transforms applied whenever a page is written to the cache.
//!
//! # Overview
//!
//! Three hook points are available, each an ordered chain of pure
//! transforms:
//! - `pre_add_entity` - entity entering the cache for the first time
//! - `pre_update_entity` - entity replacing one already cached
//! - `pre_update` - whole page record, just before it is committed
//!
//! A hook point with nothing registered is the identity transform.

mod types;

pub use types::StoreHooks;
