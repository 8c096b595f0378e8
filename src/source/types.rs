//! Page source trait and closure adapter

use crate::error::BoxError;
use crate::normalize::RawPageResponse;
use crate::types::PageKey;
use async_trait::async_trait;
use std::fmt;
use std::future::Future;

/// Something that can fetch one raw page
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    /// Fetch the raw response for a page
    async fn fetch(&self, page: PageKey) -> Result<RawPageResponse<T>, BoxError>;
}

/// [`PageSource`] backed by a request closure
pub struct FnSource<F> {
    request: F,
}

impl<F> FnSource<F> {
    /// Wrap a request closure
    pub fn new(request: F) -> Self {
        Self { request }
    }
}

impl<F> fmt::Debug for FnSource<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSource").finish()
    }
}

/// Turn a request closure into a [`PageSource`]
pub fn from_fn<F>(request: F) -> FnSource<F> {
    FnSource::new(request)
}

#[async_trait]
impl<T, F, Fut, E> PageSource<T> for FnSource<F>
where
    T: Send + 'static,
    F: Fn(PageKey) -> Fut + Send + Sync,
    Fut: Future<Output = Result<RawPageResponse<T>, E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    async fn fetch(&self, page: PageKey) -> Result<RawPageResponse<T>, BoxError> {
        (self.request)(page).await.map_err(Into::into)
    }
}
