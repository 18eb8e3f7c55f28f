//! DevAssist Core
//!
//! Finds the merged pull requests that touched the metadata behind a
//! Salesforce record:
//! - Resolves the viewer's profile and the record's context
//! - Infers candidate metadata paths (see [`devassist_paths`])
//! - Looks up merged pull requests per path, concurrently
//! - Flattens results in path order with links to every changed file
//!
//! # Example
//!
//! ```rust,ignore
//! use devassist_core::{aggregate, HttpPrLookup, RepoLinkBuilder};
//! use devassist_paths::infer_paths;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let paths = infer_paths("Contact", Some("Support"), Some("Agent"))?;
//! let lookup = HttpPrLookup::new(
//!     "https://devassist.example.com/api/merged-prs".parse()?,
//!     std::time::Duration::from_secs(30),
//! )?;
//! let links = RepoLinkBuilder::new("https://github.com/acme/metadata/blob/main/");
//!
//! let result = aggregate(&paths, &lookup, &links).await;
//! for pr in &result {
//!     println!("#{} {}", pr.number(), pr.title());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod aggregator;
pub mod assistant;
pub mod config;
pub mod error;
pub mod http;
pub mod links;
pub mod lookup;
pub mod record_url;
pub mod resolver;
pub mod types;

// Re-exports for convenience
pub use aggregator::{aggregate, aggregate_bounded, PrAggregator};
pub use assistant::{AssistReport, DevAssist};
pub use config::DevAssistConfig;
pub use error::{ConfigError, ContextError, DevAssistError, LookupError};
pub use http::{HttpPrLookup, MAX_ERROR_BODY_BYTES};
pub use links::{LinkBuilder, RepoLinkBuilder};
pub use lookup::{lookup_fn, FnLookup, PrLookup};
pub use record_url::record_id_from_url;
pub use resolver::{ContextResolver, ContextSource, ResolvedContext};
pub use types::{AggregationResult, AnnotatedPullRequest, FileLink, LookupFailure, PullRequest};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with DevAssist Core
    pub use crate::{
        aggregate, AggregationResult, AnnotatedPullRequest, ContextSource, DevAssist,
        DevAssistConfig, DevAssistError, LinkBuilder, PrAggregator, PrLookup, PullRequest,
        RepoLinkBuilder,
    };
    pub use devassist_paths::{infer_paths, MetadataPath, RecordContext, UserProfile};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
