//! Metadata paths inside a tracked repository
//!
//! Provides [`MetadataPath`] and [`MetadataKind`] for addressing the
//! configuration files believed relevant to a record.

use serde::{Serialize, Serializer};
use std::fmt::{self, Display, Formatter};

/// Kind of metadata a path points at
///
/// Each kind knows its directory segment and (for files) its suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetadataKind {
    /// `objects/<Object>/fields/` directory
    ObjectFields,
    /// `objects/<Object>/recordTypes/<Name>.recordType-meta.xml`
    RecordType,
    /// `flexipages/<Name>.flexipage-meta.xml`
    Flexipage,
    /// `layouts/<Name>.layout-meta.xml`
    Layout,
}

impl MetadataKind {
    /// Directory segment holding this kind of metadata
    #[inline]
    #[must_use]
    pub fn directory(self) -> &'static str {
        match self {
            Self::ObjectFields => "fields",
            Self::RecordType => "recordTypes",
            Self::Flexipage => "flexipages",
            Self::Layout => "layouts",
        }
    }

    /// File suffix, `None` for directory kinds
    #[inline]
    #[must_use]
    pub fn extension(self) -> Option<&'static str> {
        match self {
            Self::ObjectFields => None,
            Self::RecordType => Some("recordType-meta.xml"),
            Self::Flexipage => Some("flexipage-meta.xml"),
            Self::Layout => Some("layout-meta.xml"),
        }
    }

    /// Whether paths of this kind name a directory
    #[inline]
    #[must_use]
    pub fn is_directory(self) -> bool {
        self.extension().is_none()
    }
}

impl Display for MetadataKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ObjectFields => "fields",
            Self::RecordType => "recordType",
            Self::Flexipage => "flexipage",
            Self::Layout => "layout",
        };
        f.write_str(name)
    }
}

/// Repository-relative metadata path
///
/// Either a directory (always ends in `/`) or a file carrying a
/// metadata-type suffix.
///
/// # Examples
/// - `force-app/main/default/objects/Contact/fields/`
/// - `force-app/main/default/layouts/Contact-Agent.layout-meta.xml`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MetadataPath {
    raw: String,
    kind: MetadataKind,
}

impl MetadataPath {
    /// Directory path built from segments; a trailing `/` is appended
    #[must_use]
    pub fn directory(kind: MetadataKind, segments: &[&str]) -> Self {
        let mut raw = segments.join("/");
        raw.push('/');
        Self { raw, kind }
    }

    /// File path `<segments>/<name>.<kind extension>`
    ///
    /// Falls back to a directory path when `kind` has no extension.
    #[must_use]
    pub fn file(kind: MetadataKind, segments: &[&str], name: &str) -> Self {
        let Some(extension) = kind.extension() else {
            return Self::directory(kind, segments);
        };
        let raw = format!("{}/{name}.{extension}", segments.join("/"));
        Self { raw, kind }
    }

    /// Path as a string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Metadata kind this path was inferred for
    #[inline]
    #[must_use]
    pub fn kind(&self) -> MetadataKind {
        self.kind
    }

    /// Whether this path names a directory
    #[inline]
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.raw.ends_with('/')
    }

    /// Last non-empty segment (file name or directory name)
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.raw.trim_end_matches('/').rsplit('/').next()
    }

    /// Consume into the underlying string
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.raw
    }
}

impl Display for MetadataPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl AsRef<str> for MetadataPath {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl PartialEq<str> for MetadataPath {
    fn eq(&self, other: &str) -> bool {
        self.raw == other
    }
}

impl PartialEq<&str> for MetadataPath {
    fn eq(&self, other: &&str) -> bool {
        self.raw == *other
    }
}

impl Serialize for MetadataPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}
