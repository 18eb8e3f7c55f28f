//! Core types for DevAssist
//!
//! Defines the pull-request model returned by the search service and the
//! annotated, flattened aggregation result handed to consumers.

use chrono::{DateTime, Utc};
use devassist_paths::MetadataPath;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// Merged pull request as returned by the search service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    /// Pull request number
    #[serde(alias = "id")]
    pub number: u64,
    /// Title
    pub title: String,
    /// Merge timestamp
    pub merged_at: DateTime<Utc>,
    /// Changed files, repository-relative, in service order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub files: Vec<String>,
    /// Link to the pull request itself
    #[serde(default, alias = "htmlUrl", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl PullRequest {
    /// Create pull request without files
    #[inline]
    #[must_use]
    pub fn new(number: u64, title: impl Into<String>, merged_at: DateTime<Utc>) -> Self {
        Self {
            number,
            title: title.into(),
            merged_at,
            files: Vec::new(),
            url: None,
        }
    }

    /// With changed files
    #[inline]
    #[must_use]
    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    /// With pull request link
    #[inline]
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Clickable link to one changed file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLink {
    /// Repository-relative file path
    pub name: String,
    /// Resolved URL
    pub url: String,
}

/// Pull request plus links to every file it changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedPullRequest {
    /// Service record
    #[serde(flatten)]
    pub pull_request: PullRequest,
    /// One link per entry of `pull_request.files`, same order
    pub file_links: Vec<FileLink>,
    /// Inferred path whose lookup returned this pull request
    pub source_path: MetadataPath,
}

impl AnnotatedPullRequest {
    /// Pull request number
    #[inline]
    #[must_use]
    pub fn number(&self) -> u64 {
        self.pull_request.number
    }

    /// Pull request title
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.pull_request.title
    }
}

/// A path whose lookup failed and contributed nothing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupFailure {
    /// Path that was looked up
    pub path: MetadataPath,
    /// Rendered lookup error
    pub reason: String,
}

/// Flattened outcome of one aggregation
///
/// `pull_requests` is ordered by path, then by service order. A pull request
/// returned for several paths appears once per path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    /// Annotated pull requests
    pub pull_requests: Vec<AnnotatedPullRequest>,
    /// Paths that failed, in path order
    pub failures: Vec<LookupFailure>,
}

impl AggregationResult {
    /// Empty result
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of annotated pull requests
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.pull_requests.len()
    }

    /// Whether no pull request was found
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pull_requests.is_empty()
    }

    /// Iterate in result order
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, AnnotatedPullRequest> {
        self.pull_requests.iter()
    }

    /// Whether any lookup failed
    #[inline]
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// First occurrence of each pull request number, in result order
    ///
    /// Opt-in view; the result itself always keeps every occurrence.
    #[must_use]
    pub fn deduplicated(&self) -> Vec<&AnnotatedPullRequest> {
        let mut seen = HashSet::new();
        self.pull_requests
            .iter()
            .filter(|pr| seen.insert(pr.number()))
            .collect()
    }
}

impl IntoIterator for AggregationResult {
    type Item = AnnotatedPullRequest;
    type IntoIter = std::vec::IntoIter<AnnotatedPullRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.pull_requests.into_iter()
    }
}

impl<'a> IntoIterator for &'a AggregationResult {
    type Item = &'a AnnotatedPullRequest;
    type IntoIter = std::slice::Iter<'a, AnnotatedPullRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.pull_requests.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devassist_paths::MetadataKind;

    fn merged() -> DateTime<Utc> {
        "2024-05-01T12:00:00Z".parse().unwrap()
    }

    fn annotated(number: u64, path: &str) -> AnnotatedPullRequest {
        AnnotatedPullRequest {
            pull_request: PullRequest::new(number, format!("PR {number}"), merged()),
            file_links: Vec::new(),
            source_path: MetadataPath::directory(MetadataKind::ObjectFields, &[path]),
        }
    }

    #[test]
    fn pull_request_from_service_json() {
        let pr: PullRequest = serde_json::from_str(
            r#"{"number":42,"title":"Add field","mergedAt":"2024-05-01T12:00:00Z","files":["a/b.xml"]}"#,
        )
        .unwrap();
        assert_eq!(pr.number, 42);
        assert_eq!(pr.merged_at, merged());
        assert_eq!(pr.files, vec!["a/b.xml"]);
        assert_eq!(pr.url, None);
    }

    #[test]
    fn pull_request_accepts_id_and_missing_files() {
        let pr: PullRequest =
            serde_json::from_str(r#"{"id":7,"title":"t","mergedAt":"2024-05-01T12:00:00Z"}"#)
                .unwrap();
        assert_eq!(pr.number, 7);
        assert!(pr.files.is_empty());

        let pr: PullRequest = serde_json::from_str(
            r#"{"id":7,"title":"t","mergedAt":"2024-05-01T12:00:00Z","files":null}"#,
        )
        .unwrap();
        assert!(pr.files.is_empty());
    }

    #[test]
    fn pull_request_builder() {
        let pr = PullRequest::new(1, "title", merged())
            .with_files(["x.xml", "y.xml"])
            .with_url("https://example.com/pr/1");
        assert_eq!(pr.files.len(), 2);
        assert_eq!(pr.url.as_deref(), Some("https://example.com/pr/1"));
    }

    #[test]
    fn annotated_serializes_flat() {
        let value = serde_json::to_value(annotated(3, "root")).unwrap();
        assert_eq!(value["number"], 3);
        assert_eq!(value["mergedAt"], "2024-05-01T12:00:00Z");
        assert_eq!(value["sourcePath"], "root/");
        assert!(value["fileLinks"].as_array().unwrap().is_empty());
    }

    #[test]
    fn deduplicated_is_opt_in() {
        let result = AggregationResult {
            pull_requests: vec![annotated(1, "a"), annotated(2, "a"), annotated(1, "b")],
            failures: Vec::new(),
        };
        assert_eq!(result.len(), 3);

        let unique: Vec<u64> = result.deduplicated().iter().map(|pr| pr.number()).collect();
        assert_eq!(unique, vec![1, 2]);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn empty_result() {
        let result = AggregationResult::empty();
        assert!(result.is_empty());
        assert!(!result.has_failures());
        assert_eq!(result.into_iter().count(), 0);
    }
}
