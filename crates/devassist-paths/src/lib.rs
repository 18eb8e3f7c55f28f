//! DevAssist Paths
//!
//! Deterministic inference of the metadata paths relevant to a Salesforce
//! record.
//!
//! # Core Concepts
//!
//! - [`RecordContext`]: object name and optional record type of a record
//! - [`UserProfile`]: opaque profile identifier of the current user
//! - [`SourceRoots`]: ordered packaging layers searched for metadata
//! - [`MetadataPath`]: repository-relative directory or file path
//! - [`PathInferenceEngine`]: produces the ordered path list
//!
//! # Example
//!
//! ```rust
//! use devassist_paths::infer_paths;
//!
//! let paths = infer_paths("Contact", Some("Support"), Some("Agent")).unwrap();
//! assert_eq!(paths.len(), 12);
//! assert_eq!(paths[0].as_str(), "force-app/main/default/objects/Contact/fields/");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod context;
mod infer;
mod path;
mod roots;

pub use context::{RecordContext, UserProfile};
pub use infer::{infer_paths, InferenceError, PathInferenceEngine};
pub use path::{MetadataKind, MetadataPath};
pub use roots::{RootsError, SourceRoot, SourceRoots, DEFAULT_SOURCE_ROOTS};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
