//! Source roots (packaging layers) searched for metadata

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Default packaging layers, in search order
pub const DEFAULT_SOURCE_ROOTS: [&str; 3] =
    ["force-app/main/default", "unpackaged/core", "unpackaged/ui"];

/// One top-level directory of the tracked repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SourceRoot(String);

impl SourceRoot {
    /// Create root; surrounding slashes are stripped
    #[must_use]
    pub fn new(root: impl AsRef<str>) -> Self {
        Self(root.as_ref().trim().trim_matches('/').to_string())
    }

    /// Root as a string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the root is empty after normalization
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for SourceRoot {
    fn from(root: String) -> Self {
        Self::new(root)
    }
}

impl From<&str> for SourceRoot {
    fn from(root: &str) -> Self {
        Self::new(root)
    }
}

impl From<SourceRoot> for String {
    fn from(root: SourceRoot) -> Self {
        root.0
    }
}

impl Display for SourceRoot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, non-empty list of source roots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRoots(Vec<SourceRoot>);

impl SourceRoots {
    /// Build from an ordered list
    ///
    /// # Errors
    /// Returns `RootsError::Empty` for an empty list and
    /// `RootsError::BlankRoot` when any entry normalizes to nothing.
    pub fn new<I, R>(roots: I) -> Result<Self, RootsError>
    where
        I: IntoIterator<Item = R>,
        R: Into<SourceRoot>,
    {
        let roots: Vec<SourceRoot> = roots.into_iter().map(Into::into).collect();
        let this = Self(roots);
        this.validate()?;
        Ok(this)
    }

    /// Single-layer repository
    #[inline]
    #[must_use]
    pub fn single(root: impl Into<SourceRoot>) -> Self {
        Self(vec![root.into()])
    }

    /// Check the list is usable
    ///
    /// # Errors
    /// Same conditions as [`SourceRoots::new`].
    pub fn validate(&self) -> Result<(), RootsError> {
        if self.0.is_empty() {
            return Err(RootsError::Empty);
        }
        if let Some(idx) = self.0.iter().position(SourceRoot::is_empty) {
            return Err(RootsError::BlankRoot(idx));
        }
        Ok(())
    }

    /// Iterate roots in search order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &SourceRoot> {
        self.0.iter()
    }

    /// Number of roots
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a validated list
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for SourceRoots {
    fn default() -> Self {
        Self(DEFAULT_SOURCE_ROOTS.iter().map(|r| SourceRoot::new(r)).collect())
    }
}

/// Invalid source root configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RootsError {
    /// No roots configured
    #[error("at least one source root is required")]
    Empty,

    /// A root is blank after trimming
    #[error("source root at position {0} is blank")]
    BlankRoot(usize),
}
