//! File link construction

use crate::types::FileLink;

/// Maps a repository-relative file path to a browsable URL
pub trait LinkBuilder: Send + Sync {
    /// URL for `file_path`
    fn link(&self, file_path: &str) -> String;

    /// Link entry for `file_path`
    fn file_link(&self, file_path: &str) -> FileLink {
        FileLink {
            name: file_path.to_string(),
            url: self.link(file_path),
        }
    }
}

/// `<base>/<file>` links against a fixed repository base URL
///
/// Exactly one `/` separates base and file; nothing is percent-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLinkBuilder {
    base: String,
}

impl RepoLinkBuilder {
    /// Create builder for a base URL such as
    /// `https://github.com/acme/metadata/blob/main/`
    #[must_use]
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base: base_url.as_ref().trim_end_matches('/').to_string(),
        }
    }

    /// Base URL without trailing slash
    #[inline]
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }
}

impl LinkBuilder for RepoLinkBuilder {
    fn link(&self, file_path: &str) -> String {
        format!("{}/{}", self.base, file_path.trim_start_matches('/'))
    }
}

impl<F> LinkBuilder for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn link(&self, file_path: &str) -> String {
        self(file_path)
    }
}
