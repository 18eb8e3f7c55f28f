//! Aggregation behavior over inferred paths.
//!
//! - Partial failures never abort aggregation
//! - Results follow path order, then service order
//! - The same pull request found through two paths is reported twice

use async_trait::async_trait;
use devassist_core::{aggregate, LinkBuilder, LookupError, PrAggregator, PrLookup, PullRequest};
use devassist_paths::{infer_paths, MetadataPath};
use devassist_test_utils::{pull_request, test_links, StaticLookup};
use mockall::mock;
use mockall::predicate::eq;
use pretty_assertions::assert_eq;

mock! {
    Lookup {}

    #[async_trait]
    impl PrLookup for Lookup {
        async fn merged_prs(&self, path: &MetadataPath) -> Result<Vec<PullRequest>, LookupError>;
    }
}

fn contact_paths() -> Vec<MetadataPath> {
    infer_paths("Contact", None, None).unwrap()
}

#[tokio::test]
async fn test_middle_failure_leaves_neighbours() {
    let paths = contact_paths();
    let lookup = StaticLookup::new()
        .with_prs(&paths[0], vec![pull_request(1, &["force-app/main/default/objects/Contact/fields/Email__c.field-meta.xml"])])
        .with_failure(&paths[1], LookupError::Transport("reset".to_string()))
        .with_prs(&paths[2], vec![pull_request(3, &["unpackaged/ui/objects/Contact/fields/Tier__c.field-meta.xml"])]);

    let result = aggregate(&paths, &lookup, &test_links()).await;

    assert_eq!(result.len(), 2);
    assert_eq!(result.pull_requests[0].number(), 1);
    assert_eq!(result.pull_requests[1].number(), 3);
    for pr in &result {
        assert_eq!(pr.file_links.len(), 1);
        assert_eq!(pr.file_links[0].url, test_links().link(&pr.pull_request.files[0]));
    }
    assert_eq!(lookup.call_count(), 3);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].path, paths[1]);
    assert!(result.failures[0].reason.contains("reset"));
}

#[tokio::test]
async fn test_empty_path_set_short_circuits() {
    let lookup = StaticLookup::new();
    let result = aggregate(&[], &lookup, &test_links()).await;

    assert!(result.is_empty());
    assert_eq!(lookup.call_count(), 0);
}

/// Regression: a pull request matching two inferred paths appears once per
/// path. Callers wanting unique entries must ask for `deduplicated()`.
#[tokio::test]
async fn test_shared_pull_request_is_not_deduplicated() {
    let paths = contact_paths();
    let shared = pull_request(77, &["force-app/main/default/objects/Contact/fields/A__c.field-meta.xml"]);
    let lookup = StaticLookup::new()
        .with_prs(&paths[0], vec![shared.clone()])
        .with_prs(&paths[2], vec![shared]);

    let result = aggregate(&paths, &lookup, &test_links()).await;

    let numbers: Vec<u64> = result.iter().map(|pr| pr.number()).collect();
    assert_eq!(numbers, vec![77, 77]);
    assert_eq!(result.deduplicated().len(), 1);
}

#[tokio::test]
async fn test_each_path_looked_up_exactly_once() {
    let paths = infer_paths("Contact", Some("Support"), Some("Agent")).unwrap();
    let mut mock = MockLookup::new();
    for path in &paths {
        mock.expect_merged_prs()
            .with(eq(path.clone()))
            .times(1)
            .returning(|_| Ok(Vec::new()));
    }

    let aggregator = PrAggregator::new(mock, test_links());
    let result = aggregator.aggregate(&paths).await;
    assert!(result.is_empty());
    assert!(!result.has_failures());
}

#[tokio::test]
async fn test_full_context_merge_order() {
    let paths = infer_paths("Contact", Some("Support"), Some("Agent")).unwrap();
    let lookup = StaticLookup::new()
        .with_prs(&paths[11], vec![pull_request(30, &[])])
        .with_prs(&paths[1], vec![pull_request(10, &[]), pull_request(11, &[])])
        .with_prs(&paths[6], vec![pull_request(20, &[])]);

    let result = PrAggregator::new(lookup, test_links())
        .with_max_in_flight(Some(4))
        .aggregate(&paths)
        .await;

    let numbers: Vec<u64> = result.iter().map(|pr| pr.number()).collect();
    assert_eq!(numbers, vec![10, 11, 20, 30]);
    assert_eq!(result.pull_requests[3].source_path, paths[11]);
    assert!(result.pull_requests[0].file_links.is_empty());
}
