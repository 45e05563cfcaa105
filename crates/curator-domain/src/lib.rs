//! Curator Domain Layer
//!
//! Core value types and collaborator traits shared by every Curator crate.
//! Nothing in here performs I/O; infrastructure lives in other crates.
//!
//! ## Key Concepts
//!
//! - **Article**: A knowledge-base document under analysis
//! - **Category lexicon**: Positive and negative practice phrases for one topic
//! - **Deprecated feature**: A technology flagged as obsolete, with a date and reason
//! - **Severity / Urgency**: Priority bands attached to analysis findings
//!
//! ## Architecture
//!
//! - Pure data and trait definitions only
//! - `ArticleStore` and `LlmProvider` describe the external collaborators
//! - The scoring engine (`curator-engine`) depends on this crate and nothing else

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod article;
pub mod lexicon;
pub mod severity;
pub mod traits;

// Re-exports for convenience
pub use article::{Article, ArticleId, ArticleRef, NewArticle, SECONDS_PER_DAY};
pub use lexicon::{CategoryLexicon, DeprecatedFeature};
pub use severity::{PriorityTier, Severity, Urgency};
pub use traits::{ArticleStore, LlmProvider};
