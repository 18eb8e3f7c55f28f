//! Upstream context resolution
//!
//! Fetches the current user's profile and the viewed record's context
//! concurrently and joins them exactly once. A missing profile degrades to
//! "no profile"; a missing record context stops the flow.

use crate::error::ContextError;
use async_trait::async_trait;
use devassist_paths::{RecordContext, UserProfile};
use std::sync::Arc;

/// External services that describe the viewer and the record
#[async_trait]
pub trait ContextSource: Send + Sync {
    /// Profile name of the current user
    async fn user_profile_name(&self) -> Result<String, ContextError>;

    /// Object name and record type for `record_id`
    async fn record_context(&self, record_id: &str) -> Result<RecordContext, ContextError>;
}

#[async_trait]
impl<T: ContextSource + ?Sized> ContextSource for Arc<T> {
    async fn user_profile_name(&self) -> Result<String, ContextError> {
        (**self).user_profile_name().await
    }

    async fn record_context(&self, record_id: &str) -> Result<RecordContext, ContextError> {
        (**self).record_context(record_id).await
    }
}

/// Both inputs of path inference, resolved together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContext {
    /// Record the context was resolved for
    pub record_id: String,
    /// Object and record type
    pub record: RecordContext,
    /// Viewer profile, absent when unavailable
    pub profile: Option<UserProfile>,
}

/// Joins profile and record-context lookups
#[derive(Debug, Clone)]
pub struct ContextResolver<S> {
    source: S,
}

impl<S: ContextSource> ContextResolver<S> {
    /// Create resolver over a source
    #[inline]
    #[must_use]
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Underlying source
    #[inline]
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolve profile and record context for `record_id`
    ///
    /// Both lookups run concurrently; the result is produced once both
    /// have settled.
    ///
    /// # Errors
    /// `ContextError::RecordIdMissing` for a blank id (nothing is called),
    /// `ContextError::ContextUnavailable` when the record context lookup
    /// fails. Profile failures never error.
    pub async fn resolve(&self, record_id: &str) -> Result<ResolvedContext, ContextError> {
        let record_id = record_id.trim();
        if record_id.is_empty() {
            return Err(ContextError::RecordIdMissing(
                "record id is empty".to_string(),
            ));
        }

        let (profile, record) = tokio::join!(
            self.source.user_profile_name(),
            self.source.record_context(record_id),
        );

        let profile = match profile {
            Ok(name) => UserProfile::non_blank(name),
            Err(err) => {
                tracing::warn!(error = %err, "profile unavailable; continuing without it");
                None
            }
        };

        let record = record.map_err(|err| {
            tracing::warn!(record_id, error = %err, "record context unavailable");
            match err {
                err @ ContextError::ContextUnavailable { .. } => err,
                other => ContextError::ContextUnavailable {
                    record_id: record_id.to_string(),
                    reason: other.to_string(),
                },
            }
        })?;

        tracing::debug!(
            record_id,
            object = %record.object_name,
            has_profile = profile.is_some(),
            "resolved record context"
        );
        Ok(ResolvedContext {
            record_id: record_id.to_string(),
            record,
            profile,
        })
    }
}
