//! DevAssist configuration
//!
//! Loaded from TOML; every key is optional and falls back to
//! [`DevAssistConfig::default`].
//!
//! ```toml
//! repo_base_url = "https://github.com/acme/metadata/blob/main/"
//! service_url = "https://devassist.example.com/api/merged-prs"
//! source_roots = ["force-app/main/default", "unpackaged/core", "unpackaged/ui"]
//! request_timeout_secs = 30
//! max_concurrent_lookups = 8
//! ```

use crate::error::ConfigError;
use crate::links::RepoLinkBuilder;
use devassist_paths::{PathInferenceEngine, SourceRoots};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// DevAssist configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DevAssistConfig {
    /// Base URL that changed-file paths are appended to
    pub repo_base_url: Option<String>,
    /// Endpoint of the merged pull-request search service
    pub service_url: Option<String>,
    /// Packaging layers searched, in order
    pub source_roots: SourceRoots,
    /// Per-request timeout for the HTTP lookup
    pub request_timeout_secs: u64,
    /// Upper bound on concurrent lookups; unset means one per path at once
    pub max_concurrent_lookups: Option<usize>,
}

impl DevAssistConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML text and validate
    ///
    /// # Errors
    /// `ConfigError::Parse` on bad TOML or unknown keys, otherwise any
    /// error from [`DevAssistConfig::validate`].
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// `ConfigError::Io` when the file cannot be read, otherwise as
    /// [`DevAssistConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// With repository base URL
    #[inline]
    #[must_use]
    pub fn with_repo_base_url(mut self, url: impl Into<String>) -> Self {
        self.repo_base_url = Some(url.into());
        self
    }

    /// With PR service URL
    #[inline]
    #[must_use]
    pub fn with_service_url(mut self, url: impl Into<String>) -> Self {
        self.service_url = Some(url.into());
        self
    }

    /// With source roots
    #[inline]
    #[must_use]
    pub fn with_source_roots(mut self, roots: SourceRoots) -> Self {
        self.source_roots = roots;
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// With concurrency bound
    #[inline]
    #[must_use]
    pub fn with_max_concurrent_lookups(mut self, max: usize) -> Self {
        self.max_concurrent_lookups = Some(max);
        self
    }

    /// Check every set value is usable
    ///
    /// URLs are only checked when present; use [`Self::link_builder`] and
    /// [`Self::service_endpoint`] to require them.
    ///
    /// # Errors
    /// The first invalid value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.source_roots.validate()?;
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.max_concurrent_lookups == Some(0) {
            return Err(ConfigError::ZeroConcurrency);
        }
        if let Some(url) = &self.repo_base_url {
            parse_url("repo_base_url", url)?;
        }
        if let Some(url) = &self.service_url {
            parse_url("service_url", url)?;
        }
        Ok(())
    }

    /// Request timeout as a duration
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Inference engine over the configured roots
    #[inline]
    #[must_use]
    pub fn inference_engine(&self) -> PathInferenceEngine {
        PathInferenceEngine::new(self.source_roots.clone())
    }

    /// Link builder for the configured repository
    ///
    /// # Errors
    /// `ConfigError::MissingRepoBaseUrl` when unset, `InvalidUrl` when it
    /// does not parse.
    pub fn link_builder(&self) -> Result<RepoLinkBuilder, ConfigError> {
        let base = self
            .repo_base_url
            .as_deref()
            .ok_or(ConfigError::MissingRepoBaseUrl)?;
        parse_url("repo_base_url", base)?;
        Ok(RepoLinkBuilder::new(base))
    }

    /// Parsed PR service endpoint
    ///
    /// # Errors
    /// `ConfigError::MissingServiceUrl` when unset, `InvalidUrl` when it
    /// does not parse.
    pub fn service_endpoint(&self) -> Result<Url, ConfigError> {
        let url = self
            .service_url
            .as_deref()
            .ok_or(ConfigError::MissingServiceUrl)?;
        parse_url("service_url", url)
    }
}

impl Default for DevAssistConfig {
    fn default() -> Self {
        Self {
            repo_base_url: None,
            service_url: None,
            source_roots: SourceRoots::default(),
            request_timeout_secs: 30,
            max_concurrent_lookups: None,
        }
    }
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|err| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        reason: err.to_string(),
    })
}
