//! DevAssist orchestrator
//!
//! Ties the pieces together for one record:
//! - Resolves profile and record context
//! - Infers candidate metadata paths
//! - Aggregates merged pull requests for those paths

use crate::aggregator::PrAggregator;
use crate::config::DevAssistConfig;
use crate::error::{ContextError, DevAssistError};
use crate::http::HttpPrLookup;
use crate::links::{LinkBuilder, RepoLinkBuilder};
use crate::lookup::PrLookup;
use crate::record_url::record_id_from_url;
use crate::resolver::{ContextResolver, ContextSource};
use crate::types::AggregationResult;
use devassist_paths::{MetadataPath, PathInferenceEngine, RecordContext, UserProfile};
use serde::Serialize;

/// Everything produced for one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistReport {
    /// Record context paths were inferred from
    pub context: RecordContext,
    /// Profile used, if any
    pub profile: Option<UserProfile>,
    /// Inferred paths, in lookup order
    pub paths: Vec<MetadataPath>,
    /// Aggregated pull requests
    pub result: AggregationResult,
}

/// The orchestrator
///
/// Owns the context resolver, the inference engine and the aggregator.
#[derive(Debug, Clone)]
pub struct DevAssist<S, L, B = RepoLinkBuilder> {
    resolver: ContextResolver<S>,
    engine: PathInferenceEngine,
    aggregator: PrAggregator<L, B>,
}

impl<S, L, B> DevAssist<S, L, B>
where
    S: ContextSource,
    L: PrLookup,
    B: LinkBuilder,
{
    /// Create orchestrator with the default source roots
    #[inline]
    #[must_use]
    pub fn new(source: S, aggregator: PrAggregator<L, B>) -> Self {
        Self {
            resolver: ContextResolver::new(source),
            engine: PathInferenceEngine::default(),
            aggregator,
        }
    }

    /// With inference engine
    #[inline]
    #[must_use]
    pub fn with_engine(mut self, engine: PathInferenceEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Resolve, infer and aggregate for a record id
    ///
    /// # Errors
    /// `DevAssistError::Context` when the record context cannot be
    /// resolved, `DevAssistError::InvalidContext` when it names no object.
    pub async fn assist_record(&self, record_id: &str) -> Result<AssistReport, DevAssistError> {
        tracing::info!(record_id, "assisting record");
        let resolved = self.resolver.resolve(record_id).await?;
        self.assist_context(resolved.record, resolved.profile).await
    }

    /// Same as [`Self::assist_record`] for a Lightning record page URL
    ///
    /// # Errors
    /// `ContextError::RecordIdMissing` when the URL is not a record page,
    /// otherwise as [`Self::assist_record`].
    pub async fn assist_url(&self, url: &str) -> Result<AssistReport, DevAssistError> {
        let record_id = record_id_from_url(url).ok_or_else(|| {
            ContextError::RecordIdMissing(format!("no record id in URL '{url}'"))
        })?;
        self.assist_record(record_id).await
    }

    /// Infer and aggregate for an already known context
    ///
    /// # Errors
    /// `DevAssistError::InvalidContext` before any lookup is issued.
    pub async fn assist_context(
        &self,
        context: RecordContext,
        profile: Option<UserProfile>,
    ) -> Result<AssistReport, DevAssistError> {
        let paths = self.engine.infer(&context, profile.as_ref())?;
        tracing::info!(
            object = %context.object_name,
            paths = paths.len(),
            "inferred metadata paths"
        );

        let result = self.aggregator.aggregate(&paths).await;
        Ok(AssistReport {
            context,
            profile,
            paths,
            result,
        })
    }

    /// Inference engine in use
    #[inline]
    #[must_use]
    pub fn engine(&self) -> &PathInferenceEngine {
        &self.engine
    }

    /// Aggregator in use
    #[inline]
    #[must_use]
    pub fn aggregator(&self) -> &PrAggregator<L, B> {
        &self.aggregator
    }
}

impl<S: ContextSource> DevAssist<S, HttpPrLookup, RepoLinkBuilder> {
    /// Build an HTTP-backed orchestrator from configuration
    ///
    /// # Errors
    /// `DevAssistError::Config` when `repo_base_url` or `service_url` is
    /// missing or invalid, `DevAssistError::Client` when the HTTP client
    /// cannot be built.
    pub fn from_config(config: &DevAssistConfig, source: S) -> Result<Self, DevAssistError> {
        config.validate()?;
        let links = config.link_builder()?;
        let lookup = HttpPrLookup::from_config(config)?;
        let aggregator =
            PrAggregator::new(lookup, links).with_max_in_flight(config.max_concurrent_lookups);
        Ok(Self::new(source, aggregator).with_engine(config.inference_engine()))
    }
}
