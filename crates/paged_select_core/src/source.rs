//! Collaborator contracts
//!
//! The embedding application supplies the data: a [`PageLoader`] (required)
//! and optionally a [`SearchProvider`]. Both return boxed futures so they can
//! be stored as trait objects and driven by any executor.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::LoadError;
use crate::pagination::LoadPageParams;
use crate::response::LoadResponse;

/// Result of a collaborator request
pub type SourceResult<O> = Result<LoadResponse<O>, LoadError>;

/// Boxed future returned by collaborators
pub type SourceFuture<O> = Pin<Box<dyn Future<Output = SourceResult<O>> + Send + 'static>>;

/// Loads one browse page
pub trait PageLoader<O>: Send + Sync + 'static {
    fn load_page(&self, params: LoadPageParams) -> SourceFuture<O>;
}

/// Resolves a search for the parsed terms
pub trait SearchProvider<O>: Send + Sync + 'static {
    fn search(&self, terms: Vec<String>) -> SourceFuture<O>;
}

/// Closure-backed loader
pub struct FnLoader<F>(pub F);

impl<O, F, Fut> PageLoader<O> for FnLoader<F>
where
    F: Fn(LoadPageParams) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = SourceResult<O>> + Send + 'static,
{
    fn load_page(&self, params: LoadPageParams) -> SourceFuture<O> {
        Box::pin((self.0)(params))
    }
}

/// Closure-backed search provider
pub struct FnSearch<F>(pub F);

impl<O, F, Fut> SearchProvider<O> for FnSearch<F>
where
    F: Fn(Vec<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = SourceResult<O>> + Send + 'static,
{
    fn search(&self, terms: Vec<String>) -> SourceFuture<O> {
        Box::pin((self.0)(terms))
    }
}

/// Wrap an async closure as a shared page loader
pub fn page_loader<O, F, Fut>(f: F) -> Arc<dyn PageLoader<O>>
where
    O: 'static,
    F: Fn(LoadPageParams) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = SourceResult<O>> + Send + 'static,
{
    Arc::new(FnLoader(f))
}

/// Wrap an async closure as a shared search provider
pub fn search_provider<O, F, Fut>(f: F) -> Arc<dyn SearchProvider<O>>
where
    O: 'static,
    F: Fn(Vec<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = SourceResult<O>> + Send + 'static,
{
    Arc::new(FnSearch(f))
}
