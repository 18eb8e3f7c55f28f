//! Pull-request aggregation
//!
//! Issues one lookup per inferred path, waits for every lookup to settle,
//! and flattens the successful results:
//! - Lookups run concurrently; results are merged back in path order
//! - A failed lookup is logged and contributes nothing
//! - Pull requests are never deduplicated across paths
//!
//! Lookups are plain futures owned by the aggregation future, so dropping
//! an in-flight aggregation cancels every pending lookup.

use crate::error::LookupError;
use crate::links::{LinkBuilder, RepoLinkBuilder};
use crate::lookup::PrLookup;
use crate::types::{AggregationResult, AnnotatedPullRequest, LookupFailure, PullRequest};
use devassist_paths::MetadataPath;
use futures::stream::{self, StreamExt};

/// Aggregate pull requests for `paths`, all lookups in flight at once
///
/// An empty path set returns an empty result without calling `lookup`.
pub async fn aggregate<L, B>(paths: &[MetadataPath], lookup: &L, links: &B) -> AggregationResult
where
    L: PrLookup + ?Sized,
    B: LinkBuilder + ?Sized,
{
    aggregate_bounded(paths, lookup, links, None).await
}

/// Aggregate with at most `max_in_flight` concurrent lookups
///
/// `None` launches every lookup at once. Output order is path order either
/// way.
pub async fn aggregate_bounded<L, B>(
    paths: &[MetadataPath],
    lookup: &L,
    links: &B,
    max_in_flight: Option<usize>,
) -> AggregationResult
where
    L: PrLookup + ?Sized,
    B: LinkBuilder + ?Sized,
{
    if paths.is_empty() {
        tracing::debug!("no paths to look up");
        return AggregationResult::empty();
    }

    let limit = max_in_flight.unwrap_or(paths.len()).clamp(1, paths.len());
    tracing::info!(paths = paths.len(), limit, "looking up merged pull requests");

    let outcomes: Vec<(&MetadataPath, Result<Vec<PullRequest>, LookupError>)> =
        stream::iter(paths)
            .map(|path| async move { (path, lookup.merged_prs(path).await) })
            .buffered(limit)
            .collect()
            .await;

    let mut result = AggregationResult::empty();
    for (path, outcome) in outcomes {
        match outcome {
            Ok(pull_requests) => {
                tracing::debug!(path = %path, count = pull_requests.len(), "lookup succeeded");
                result.pull_requests.extend(
                    pull_requests
                        .into_iter()
                        .map(|pr| annotate(pr, path, links)),
                );
            }
            Err(err) => {
                tracing::warn!(path = %path, error = %err, "lookup failed; skipping path");
                result.failures.push(LookupFailure {
                    path: path.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    tracing::info!(
        pull_requests = result.len(),
        failed_paths = result.failures.len(),
        "aggregation complete"
    );
    result
}

fn annotate<B>(pull_request: PullRequest, path: &MetadataPath, links: &B) -> AnnotatedPullRequest
where
    B: LinkBuilder + ?Sized,
{
    let file_links = pull_request
        .files
        .iter()
        .map(|file| links.file_link(file))
        .collect();
    AnnotatedPullRequest {
        pull_request,
        file_links,
        source_path: path.clone(),
    }
}

/// Owns a lookup and a link builder and aggregates on demand
#[derive(Debug, Clone)]
pub struct PrAggregator<L, B = RepoLinkBuilder> {
    lookup: L,
    links: B,
    max_in_flight: Option<usize>,
}

impl<L: PrLookup, B: LinkBuilder> PrAggregator<L, B> {
    /// Create aggregator
    #[inline]
    #[must_use]
    pub fn new(lookup: L, links: B) -> Self {
        Self {
            lookup,
            links,
            max_in_flight: None,
        }
    }

    /// Bound the number of concurrent lookups
    #[inline]
    #[must_use]
    pub fn with_max_in_flight(mut self, max: Option<usize>) -> Self {
        self.max_in_flight = max;
        self
    }

    /// Aggregate pull requests for `paths`
    pub async fn aggregate(&self, paths: &[MetadataPath]) -> AggregationResult {
        aggregate_bounded(paths, &self.lookup, &self.links, self.max_in_flight).await
    }

    /// Lookup in use
    #[inline]
    #[must_use]
    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Link builder in use
    #[inline]
    #[must_use]
    pub fn links(&self) -> &B {
        &self.links
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::{lookup_fn, MockPrLookup};
    use chrono::{DateTime, Utc};
    use devassist_paths::infer_paths;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn merged() -> DateTime<Utc> {
        "2024-03-10T08:30:00Z".parse().unwrap()
    }

    fn links() -> RepoLinkBuilder {
        RepoLinkBuilder::new("https://example.com/repo/blob/main/")
    }

    fn three_paths() -> Vec<MetadataPath> {
        infer_paths("Contact", None, None).unwrap()
    }

    #[tokio::test]
    async fn failing_path_is_skipped() {
        let paths = three_paths();
        let failing = paths[1].clone();

        let mut mock = MockPrLookup::new();
        mock.expect_merged_prs().times(3).returning(move |path| {
            if *path == failing {
                Err(LookupError::Transport("connection reset".to_string()))
            } else {
                let n = if path.as_str().starts_with("force-app") { 1 } else { 3 };
                Ok(vec![PullRequest::new(n, format!("PR {n}"), merged())
                    .with_files([format!("file{n}.xml")])])
            }
        });

        let result = aggregate(&paths, &mock, &links()).await;

        let numbers: Vec<u64> = result.iter().map(AnnotatedPullRequest::number).collect();
        assert_eq!(numbers, vec![1, 3]);
        for pr in &result {
            assert_eq!(pr.file_links.len(), 1);
        }
        assert_eq!(
            result.pull_requests[0].file_links[0].url,
            "https://example.com/repo/blob/main/file1.xml"
        );
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].path, paths[1]);
    }

    #[tokio::test]
    async fn empty_paths_never_call_lookup() {
        let mut mock = MockPrLookup::new();
        mock.expect_merged_prs().never();

        let result = aggregate(&[], &mock, &links()).await;
        assert!(result.is_empty());
        assert!(!result.has_failures());
    }

    #[tokio::test]
    async fn duplicate_pull_requests_are_kept() {
        let paths = three_paths();
        let lookup = lookup_fn(|path: MetadataPath| async move {
            if path.as_str().starts_with("unpackaged/ui") {
                Ok(Vec::new())
            } else {
                Ok::<_, LookupError>(vec![PullRequest::new(9, "Shared", merged())
                    .with_files(["shared.xml"])])
            }
        });

        let result = aggregate(&paths, &lookup, &links()).await;
        assert_eq!(result.len(), 2);
        assert_eq!(result.pull_requests[0].number(), 9);
        assert_eq!(result.pull_requests[1].number(), 9);
        assert_eq!(result.pull_requests[0].source_path, paths[0]);
        assert_eq!(result.pull_requests[1].source_path, paths[1]);
    }

    #[tokio::test]
    async fn path_order_survives_out_of_order_completion() {
        let paths = three_paths();
        let lookup = lookup_fn(|path: MetadataPath| async move {
            // First path finishes last
            let delay = if path.as_str().starts_with("force-app") { 30 } else { 1 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok::<_, LookupError>(vec![PullRequest::new(0, path.to_string(), merged())])
        });

        let result = aggregate(&paths, &lookup, &links()).await;
        let titles: Vec<&str> = result.iter().map(AnnotatedPullRequest::title).collect();
        let expected: Vec<&str> = paths.iter().map(MetadataPath::as_str).collect();
        assert_eq!(titles, expected);
    }

    #[tokio::test]
    async fn service_order_within_a_path() {
        let paths = vec![three_paths().remove(0)];
        let lookup = lookup_fn(|_path: MetadataPath| async move {
            Ok::<_, LookupError>(vec![
                PullRequest::new(5, "newest", merged()),
                PullRequest::new(2, "older", merged()),
            ])
        });

        let result = aggregate(&paths, &lookup, &links()).await;
        let numbers: Vec<u64> = result.iter().map(AnnotatedPullRequest::number).collect();
        assert_eq!(numbers, vec![5, 2]);
    }

    #[tokio::test]
    async fn file_links_follow_file_order() {
        let paths = vec![three_paths().remove(0)];
        let lookup = lookup_fn(|_path: MetadataPath| async move {
            Ok::<_, LookupError>(vec![PullRequest::new(1, "multi", merged())
                .with_files(["b.xml", "a.xml", "c.xml"])])
        });

        let result = aggregate(&paths, &lookup, &|file: &str| format!("link:{file}")).await;
        let urls: Vec<&str> = result.pull_requests[0]
            .file_links
            .iter()
            .map(|link| link.url.as_str())
            .collect();
        assert_eq!(urls, vec!["link:b.xml", "link:a.xml", "link:c.xml"]);
    }

    #[tokio::test]
    async fn all_lookups_in_flight_together() {
        let paths = three_paths();
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let lookup = {
            let active = Arc::clone(&active);
            let peak = Arc::clone(&peak);
            lookup_fn(move |_path: MetadataPath| {
                let active = Arc::clone(&active);
                let peak = Arc::clone(&peak);
                async move {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                    Ok::<_, LookupError>(Vec::new())
                }
            })
        };

        aggregate(&paths, &lookup, &links()).await;
        assert_eq!(peak.load(Ordering::SeqCst), 3);

        peak.store(0, Ordering::SeqCst);
        let bounded = PrAggregator::new(lookup, links()).with_max_in_flight(Some(1));
        bounded.aggregate(&paths).await;
        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    struct DropCounter(Arc<AtomicUsize>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn dropping_aggregation_cancels_pending_lookups() {
        let paths = three_paths();
        let started = Arc::new(AtomicUsize::new(0));
        let dropped = Arc::new(AtomicUsize::new(0));

        let lookup = {
            let started = Arc::clone(&started);
            let dropped = Arc::clone(&dropped);
            lookup_fn(move |_path: MetadataPath| {
                let started = Arc::clone(&started);
                let guard = DropCounter(Arc::clone(&dropped));
                async move {
                    let _guard = guard;
                    started.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok::<_, LookupError>(Vec::new())
                }
            })
        };

        let outcome = tokio::time::timeout(
            Duration::from_millis(50),
            aggregate(&paths, &lookup, &links()),
        )
        .await;

        assert!(outcome.is_err());
        assert_eq!(started.load(Ordering::SeqCst), 3);
        assert_eq!(dropped.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn every_lookup_failing_yields_empty_result() {
        let paths = three_paths();
        let mut mock = MockPrLookup::new();
        mock.expect_merged_prs().times(3).returning(|_| {
            Err(LookupError::Status {
                status: 404,
                body: "not found".to_string(),
            })
        });

        let aggregator = PrAggregator::new(mock, links());
        let result = aggregator.aggregate(&paths).await;
        assert!(result.is_empty());
        assert_eq!(result.failures.len(), 3);
    }
}
