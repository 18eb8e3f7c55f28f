//! Error types for DevAssist Core
//!
//! Provides error handling for:
//! - Invalid record contexts (fatal, nothing is looked up)
//! - Upstream profile / record-context resolution failures
//! - Per-path pull-request lookup failures (recovered by the aggregator)
//! - Configuration problems

use devassist_paths::{InferenceError, RootsError};
use std::path::PathBuf;

/// Main DevAssist error type
#[derive(Debug, thiserror::Error)]
pub enum DevAssistError {
    /// Record context cannot produce any path
    #[error(transparent)]
    InvalidContext(#[from] InferenceError),

    /// Upstream context resolution failed
    #[error("context resolution failed: {0}")]
    Context(#[from] ContextError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// HTTP client could not be constructed
    #[error("http client error: {0}")]
    Client(String),
}

impl DevAssistError {
    /// Whether the error prevents any path generation
    ///
    /// Only an invalid context is fatal to the flow; every other failure
    /// degrades (profile dropped, lookup skipped, inference deferred).
    #[inline]
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidContext(_))
    }
}

/// Failure of a single pull-request lookup
///
/// Never surfaced by the aggregator; recorded as a
/// [`LookupFailure`](crate::types::LookupFailure) instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// Connection or request could not complete
    #[error("transport error: {0}")]
    Transport(String),

    /// Lookup exceeded the request timeout
    #[error("lookup timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Service answered with a non-success status
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected shape
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Any other lookup-specific failure
    #[error("{0}")]
    Other(String),
}

impl LookupError {
    /// Whether the service reported the path as unknown
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

/// Upstream context resolution errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    /// No record identifier could be determined
    #[error("no record id: {0}")]
    RecordIdMissing(String),

    /// Profile lookup failed
    #[error("profile unavailable: {0}")]
    ProfileUnavailable(String),

    /// Record context lookup failed
    #[error("record context unavailable for {record_id}: {reason}")]
    ContextUnavailable { record_id: String, reason: String },
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Source roots unusable
    #[error("invalid source roots: {0}")]
    Roots(#[from] RootsError),

    /// Repository base URL required but not set
    #[error("repo_base_url is not configured")]
    MissingRepoBaseUrl,

    /// PR service URL required but not set
    #[error("service_url is not configured")]
    MissingServiceUrl,

    /// A configured URL does not parse
    #[error("invalid {field} '{value}': {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// Request timeout must be positive
    #[error("request_timeout_secs must be greater than zero")]
    ZeroTimeout,

    /// Concurrency bound must be positive
    #[error("max_concurrent_lookups must be greater than zero")]
    ZeroConcurrency,
}
