//! Page source module
//!
//! Abstracts the caller-supplied request function that fetches one raw page.
//!
//! # Overview
//!
//! Any `Fn(PageKey) -> impl Future<Output = Result<RawPageResponse<T>, E>>`
//! becomes a [`PageSource`] through [`from_fn`]. [`MemorySource`] serves
//! pages out of an in-memory dataset, which is handy for demos and tests.

mod memory;
mod types;

pub use memory::MemorySource;
pub use types::{from_fn, FnSource, PageSource};
