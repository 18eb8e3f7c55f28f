//! HTTP client for the merged pull-request search service
//!
//! `GET <service_url>?path=<metadata path>` answered by a JSON array of
//! pull requests. Any non-2xx status, transport failure or undecodable body
//! becomes a [`LookupError`].

use crate::config::DevAssistConfig;
use crate::error::{DevAssistError, LookupError};
use crate::lookup::PrLookup;
use crate::types::PullRequest;
use async_trait::async_trait;
use devassist_paths::MetadataPath;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Url};
use serde::Serialize;
use std::time::Duration;

const USER_AGENT: &str = concat!("devassist/", env!("CARGO_PKG_VERSION"));

/// Longest error body kept in a [`LookupError::Status`], in bytes
pub const MAX_ERROR_BODY_BYTES: usize = 512;

/// Query parameters of one search call
#[derive(Debug, Serialize)]
struct MergedPrQuery<'a> {
    path: &'a str,
}

/// [`PrLookup`] backed by the HTTP search service
#[derive(Debug, Clone)]
pub struct HttpPrLookup {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpPrLookup {
    /// Build a client for `endpoint` with a per-request timeout
    ///
    /// # Errors
    /// `DevAssistError::Client` when the HTTP client cannot be built.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, DevAssistError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|err| DevAssistError::Client(err.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    /// Build from configuration
    ///
    /// # Errors
    /// `DevAssistError::Config` when `service_url` is missing or invalid,
    /// `DevAssistError::Client` when the HTTP client cannot be built.
    pub fn from_config(config: &DevAssistConfig) -> Result<Self, DevAssistError> {
        let endpoint = config.service_endpoint()?;
        Self::new(endpoint, config.request_timeout())
    }

    /// Service endpoint
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn transport_error(&self, err: &reqwest::Error) -> LookupError {
        if err.is_timeout() {
            LookupError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            LookupError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl PrLookup for HttpPrLookup {
    async fn merged_prs(&self, path: &MetadataPath) -> Result<Vec<PullRequest>, LookupError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&MergedPrQuery {
                path: path.as_str(),
            })
            .send()
            .await
            .map_err(|err| self.transport_error(&err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(LookupError::Status {
                status: status.as_u16(),
                body: truncate_body(body),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| self.transport_error(&err))?;
        serde_json::from_slice(&bytes).map_err(|err| LookupError::Malformed(err.to_string()))
    }
}

fn truncate_body(mut body: String) -> String {
    if body.len() <= MAX_ERROR_BODY_BYTES {
        return body;
    }
    let mut end = MAX_ERROR_BODY_BYTES;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body.truncate(end);
    body.push_str("...");
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_kept_whole() {
        assert_eq!(truncate_body("maintenance".to_string()), "maintenance");
        let exact = "x".repeat(MAX_ERROR_BODY_BYTES);
        assert_eq!(truncate_body(exact.clone()), exact);
    }

    #[test]
    fn long_bodies_truncated_on_char_boundary() {
        let body = format!("a{}", "é".repeat(MAX_ERROR_BODY_BYTES));
        let truncated = truncate_body(body);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= MAX_ERROR_BODY_BYTES + 3);
        assert!(truncated.starts_with("aé"));
    }

    #[test]
    fn from_config_requires_service_url() {
        let result = HttpPrLookup::from_config(&DevAssistConfig::default());
        assert!(matches!(result, Err(DevAssistError::Config(_))));
    }

    #[test]
    fn from_config_keeps_endpoint() {
        let config = DevAssistConfig::new().with_service_url("http://localhost:9000/prs");
        let lookup = HttpPrLookup::from_config(&config).unwrap();
        assert_eq!(lookup.endpoint().as_str(), "http://localhost:9000/prs");
    }
}
