//! Path inference
//!
//! Turns a record context and optional profile into the ordered list of
//! metadata paths worth searching for merged pull requests.
//!
//! For every source root, in order:
//! 1. `<root>/objects/<Object>/fields/` (always)
//! 2. `<root>/objects/<Object>/recordTypes/<RecordType>.recordType-meta.xml`
//!    when a record type is known
//! 3. `<root>/flexipages/<Object>_<RecordType>_<Profile>.flexipage-meta.xml`
//!    and `<root>/layouts/<Object>-<Profile>.layout-meta.xml` when a profile
//!    is known
//!
//! Without a record type the flexipage name drops that segment and becomes
//! `<Object>_<Profile>`.

use crate::context::{RecordContext, UserProfile};
use crate::path::{MetadataKind, MetadataPath};
use crate::roots::{SourceRoot, SourceRoots};

/// Inference errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InferenceError {
    /// Object name missing, or a name unusable as a path segment
    #[error("invalid record context: {0}")]
    InvalidContext(String),
}

/// Stateless path inference over a fixed list of source roots
#[derive(Debug, Clone, Default)]
pub struct PathInferenceEngine {
    roots: SourceRoots,
}

impl PathInferenceEngine {
    /// Create engine over the given roots
    #[inline]
    #[must_use]
    pub fn new(roots: SourceRoots) -> Self {
        Self { roots }
    }

    /// Configured roots
    #[inline]
    #[must_use]
    pub fn roots(&self) -> &SourceRoots {
        &self.roots
    }

    /// Infer candidate paths for a record
    ///
    /// # Errors
    /// `InferenceError::InvalidContext` when the object name is blank, or
    /// when the object name, record type or profile contains a path
    /// separator. Nothing else fails.
    pub fn infer(
        &self,
        context: &RecordContext,
        profile: Option<&UserProfile>,
    ) -> Result<Vec<MetadataPath>, InferenceError> {
        let object = validate_object_name(&context.object_name)?;
        let record_type = context
            .record_type()
            .map(|rt| validate_segment("record type", rt))
            .transpose()?;
        let profile = profile
            .filter(|p| !p.is_blank())
            .map(|p| validate_segment("profile", p.as_str()))
            .transpose()?;

        let mut paths = Vec::with_capacity(self.roots.len() * 4);
        for root in self.roots.iter() {
            push_root_paths(&mut paths, root, object, record_type, profile);
        }

        tracing::debug!(
            object,
            record_type,
            profile,
            count = paths.len(),
            "inferred metadata paths"
        );
        Ok(paths)
    }

    /// Infer from loose strings, treating empty strings as absent
    ///
    /// # Errors
    /// Same as [`PathInferenceEngine::infer`].
    pub fn infer_from_parts(
        &self,
        object_name: &str,
        record_type: Option<&str>,
        profile: Option<&str>,
    ) -> Result<Vec<MetadataPath>, InferenceError> {
        let mut context = RecordContext::new(object_name);
        context.record_type = record_type.map(str::to_string);
        let profile = profile.and_then(UserProfile::non_blank);
        self.infer(&context, profile.as_ref())
    }
}

/// Infer paths across the default source roots
///
/// # Errors
/// Same as [`PathInferenceEngine::infer`].
pub fn infer_paths(
    object_name: &str,
    record_type: Option<&str>,
    profile: Option<&str>,
) -> Result<Vec<MetadataPath>, InferenceError> {
    PathInferenceEngine::default().infer_from_parts(object_name, record_type, profile)
}

fn validate_object_name(name: &str) -> Result<&str, InferenceError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(InferenceError::InvalidContext(
            "object name is empty".to_string(),
        ));
    }
    validate_segment("object name", trimmed)
}

// Every name ends up inside a single path segment.
fn validate_segment<'a>(what: &str, name: &'a str) -> Result<&'a str, InferenceError> {
    if name.contains(['/', '\\']) {
        return Err(InferenceError::InvalidContext(format!(
            "{what} '{name}' contains a path separator"
        )));
    }
    Ok(name)
}

fn push_root_paths(
    paths: &mut Vec<MetadataPath>,
    root: &SourceRoot,
    object: &str,
    record_type: Option<&str>,
    profile: Option<&str>,
) {
    let root = root.as_str();

    paths.push(MetadataPath::directory(
        MetadataKind::ObjectFields,
        &[root, "objects", object, MetadataKind::ObjectFields.directory()],
    ));

    if let Some(record_type) = record_type {
        paths.push(MetadataPath::file(
            MetadataKind::RecordType,
            &[root, "objects", object, MetadataKind::RecordType.directory()],
            record_type,
        ));
    }

    if let Some(profile) = profile {
        let flexipage = match record_type {
            Some(record_type) => format!("{object}_{record_type}_{profile}"),
            None => format!("{object}_{profile}"),
        };
        paths.push(MetadataPath::file(
            MetadataKind::Flexipage,
            &[root, MetadataKind::Flexipage.directory()],
            &flexipage,
        ));
        paths.push(MetadataPath::file(
            MetadataKind::Layout,
            &[root, MetadataKind::Layout.directory()],
            &format!("{object}-{profile}"),
        ));
    }
}
