//! Paginator module
//!
//! Client-side navigation over a server-paginated collection, with a page
//! cache, request deduplication and a loading signal.
//!
//! # Overview
//!
//! The paginator module provides:
//! - `PaginatorController` - Navigation, cache lookups and fetch orchestration
//! - `PaginatorBuilder` / `PaginatorConfig` - Construction-time options
//! - `PaginationView` - UI-ready page data with optional controls and range
//! - `page_controls` / `page_range` - The derived-data algorithms
//!
//! # Flow
//!
//! ```text
//! set_page / next_page / ...  ──▶  page_changes (latest page replayed)
//!                                        │
//!                  get_page(request) ◀───┘
//!                        │
//!          cache hit ────┴──── cache miss ──▶ LoadingGate(request) ──▶ normalize ──▶ cache
//!              │                                                                    │
//!              └──────────────────────▶ PaginationView ◀────────────────────────────┘
//! ```

mod config;
mod controller;
mod controls;
mod view;

pub use config::{PaginatorBuilder, PaginatorConfig, DEFAULT_CONTROLS_WINDOW};
pub use controller::{create_paginator, PageChangeStream, PaginatorController, ViewStream};
pub use controls::{page_controls, page_range, PageRange};
pub use view::PaginationView;

#[cfg(test)]
mod tests;
