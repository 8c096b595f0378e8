// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]

//! # Solidafy Pager
//!
//! Client-side pagination over server-paginated collections.
//!
//! ## Features
//!
//! - **Navigation**: next / previous / first / last / explicit page, clamped
//!   to the last page the server reported
//! - **Page Cache**: each fetched page is kept and served again without a
//!   request until the cache is cleared or times out
//! - **Request Deduplication**: concurrent subscribers share one fetch per page
//! - **Latest Page Wins**: a slow response never replaces a newer page in a view
//! - **Loading Signal**: observable flag raised while a fetch runs
//! - **Derived Data**: page controls and the displayed item range
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use solidafy_pager::{PaginatorConfig, PaginatorController, RawPageResponse};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() {
//!     let paginator = PaginatorController::new(PaginatorConfig::new().with_controls());
//!
//!     let mut views = paginator.get_page(|page| async move {
//!         let users: Vec<String> = fetch_users(page).await?;
//!         Ok::<_, anyhow::Error>(RawPageResponse::new(users, 20, page, 5))
//!     });
//!
//!     while let Some(view) = views.next().await {
//!         // Render the page, then navigate
//!         paginator.next_page();
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     PaginatorController                         │
//! │  set_page()/next_page()   get_page(request) → Stream<View>      │
//! │  clear_cache()            destroy()                             │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌───────────┬──────────┬───────┴───────┬───────────┬─────────────┐
//! │  Source   │ Loading  │   Normalize   │   Cache   │    Hooks    │
//! ├───────────┼──────────┼───────────────┼───────────┼─────────────┤
//! │ Closure   │ Gate     │ Validation    │ Pages     │ pre_add     │
//! │ Memory    │ Watch    │ Defaults      │ Metadata  │ pre_update  │
//! └───────────┴──────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: Document enum variant fields on PageError and Error

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the pager
pub mod error;

/// Common types and type aliases
pub mod types;

/// Raw response normalization
pub mod normalize;

/// Page cache and metadata store
pub mod cache;

/// Loading flag and the gate that drives it
pub mod loading;

/// Hooks run before a page is committed
pub mod hooks;

/// Page sources (request closures, in-memory data)
pub mod source;

/// Paginator controller and derived view data
pub mod paginator;

/// Paginator settings loaded from YAML or JSON
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, PageError, Result};
pub use types::*;

// Re-export commonly used types
pub use config::PaginatorSettings;
pub use normalize::{normalize, PageRecord, RawPageResponse};
pub use paginator::{
    create_paginator, PaginationView, PaginatorBuilder, PaginatorConfig, PaginatorController,
};
pub use source::{MemorySource, PageSource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
