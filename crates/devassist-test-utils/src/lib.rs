//! Testing utilities for DevAssist workspace
//!
//! Shared fakes and fixtures.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use devassist_core::{ContextError, ContextSource, LookupError, PrLookup, PullRequest, RepoLinkBuilder};
use devassist_paths::{MetadataPath, RecordContext};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const TEST_REPO_BASE: &str = "https://example.com/repo/blob/main/";

pub fn test_links() -> RepoLinkBuilder {
    RepoLinkBuilder::new(TEST_REPO_BASE)
}

pub fn merged_at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap()
}

pub fn pull_request(number: u64, files: &[&str]) -> PullRequest {
    PullRequest::new(number, format!("PR #{number}"), merged_at(1)).with_files(files.iter().copied())
}

/// Lookup answering from a fixed table keyed by path string
///
/// Paths missing from the table answer with an empty list. Every call is
/// recorded in order of arrival.
#[derive(Debug, Default)]
pub struct StaticLookup {
    answers: HashMap<String, Result<Vec<PullRequest>, LookupError>>,
    calls: Mutex<Vec<String>>,
}

impl StaticLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prs(mut self, path: impl AsRef<str>, prs: Vec<PullRequest>) -> Self {
        self.answers.insert(path.as_ref().to_string(), Ok(prs));
        self
    }

    pub fn with_failure(mut self, path: impl AsRef<str>, error: LookupError) -> Self {
        self.answers.insert(path.as_ref().to_string(), Err(error));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl PrLookup for StaticLookup {
    async fn merged_prs(&self, path: &MetadataPath) -> Result<Vec<PullRequest>, LookupError> {
        self.calls.lock().unwrap().push(path.to_string());
        self.answers
            .get(path.as_str())
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Context source with canned answers
#[derive(Debug, Default)]
pub struct StaticContextSource {
    profile: Option<String>,
    records: HashMap<String, RecordContext>,
    calls: AtomicUsize,
}

impl StaticContextSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn with_record(mut self, record_id: impl Into<String>, context: RecordContext) -> Self {
        self.records.insert(record_id.into(), context);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContextSource for StaticContextSource {
    async fn user_profile_name(&self) -> Result<String, ContextError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.profile
            .clone()
            .ok_or_else(|| ContextError::ProfileUnavailable("no profile configured".to_string()))
    }

    async fn record_context(&self, record_id: &str) -> Result<RecordContext, ContextError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.records
            .get(record_id)
            .cloned()
            .ok_or_else(|| ContextError::ContextUnavailable {
                record_id: record_id.to_string(),
                reason: "unknown record".to_string(),
            })
    }
}
