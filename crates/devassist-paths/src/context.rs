//! Record context and user profile inputs
//!
//! Both are produced by external collaborators and consumed once per
//! inference cycle.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Object and record type of the record being viewed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordContext {
    /// Object API name (e.g. `Contact`, `Invoice__c`)
    pub object_name: String,
    /// Record type developer name, if the record has one
    #[serde(default)]
    pub record_type: Option<String>,
}

impl RecordContext {
    /// Create context for an object without a record type
    #[inline]
    #[must_use]
    pub fn new(object_name: impl Into<String>) -> Self {
        Self {
            object_name: object_name.into(),
            record_type: None,
        }
    }

    /// With record type
    #[inline]
    #[must_use]
    pub fn with_record_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = Some(record_type.into());
        self
    }

    /// Record type, trimmed, treating an empty name as absent
    #[inline]
    #[must_use]
    pub fn record_type(&self) -> Option<&str> {
        self.record_type
            .as_deref()
            .map(str::trim)
            .filter(|rt| !rt.is_empty())
    }
}

/// Opaque profile identifier of the current user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile(String);

impl UserProfile {
    /// Wrap a profile name
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Wrap a trimmed profile name, `None` when blank
    #[must_use]
    pub fn non_blank(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Profile name without surrounding whitespace
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.trim()
    }

    /// Whether the profile carries no usable name
    #[inline]
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for UserProfile {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
