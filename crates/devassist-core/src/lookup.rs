//! Pull-request lookup seam
//!
//! One call per metadata path. Timeouts and retries, if any, belong to the
//! implementation; the aggregator applies neither.

use crate::error::LookupError;
use crate::types::PullRequest;
use async_trait::async_trait;
use devassist_paths::MetadataPath;
use std::future::Future;
use std::sync::Arc;

/// Merged pull requests touching a single metadata path
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrLookup: Send + Sync {
    /// Pull requests for `path`, in service order
    async fn merged_prs(&self, path: &MetadataPath) -> Result<Vec<PullRequest>, LookupError>;
}

#[async_trait]
impl<T: PrLookup + ?Sized> PrLookup for Arc<T> {
    async fn merged_prs(&self, path: &MetadataPath) -> Result<Vec<PullRequest>, LookupError> {
        (**self).merged_prs(path).await
    }
}

/// Adapts an async closure into a [`PrLookup`]
///
/// The closure receives an owned path so the returned future need not
/// borrow from the caller.
#[derive(Debug, Clone)]
pub struct FnLookup<F> {
    f: F,
}

/// Wrap an async closure as a lookup
#[inline]
#[must_use]
pub fn lookup_fn<F, Fut>(f: F) -> FnLookup<F>
where
    F: Fn(MetadataPath) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<PullRequest>, LookupError>> + Send,
{
    FnLookup { f }
}

#[async_trait]
impl<F, Fut> PrLookup for FnLookup<F>
where
    F: Fn(MetadataPath) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<PullRequest>, LookupError>> + Send,
{
    async fn merged_prs(&self, path: &MetadataPath) -> Result<Vec<PullRequest>, LookupError> {
        (self.f)(path.clone()).await
    }
}
