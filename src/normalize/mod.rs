//! Response normalization module
//!
//! Turns raw server page responses into canonical [`PageRecord`]s.
//!
//! # Overview
//!
//! Servers report pagination as `{ perPage, lastPage, currentPage, total?, data }`.
//! The normalizer validates that shape and fills in `total` as
//! `perPage * lastPage` when the server leaves it out.

mod normalizer;
mod types;

pub use normalizer::{normalize, normalize_value};
pub use types::{PageRecord, RawPageResponse};
