//! Curator Engine
//!
//! Pure scoring core of Curator: relevance decay, deprecated-feature
//! detection and pairwise conflict scoring over a set of knowledge-base
//! articles, aggregated into a single health report.
//!
//! # Overview
//!
//! - **Keyword lexicon**: Per-topic positive/negative phrase tables and the
//!   deprecated-feature list
//! - **Relevance scoring**: Linear age decay, a deprecated-mention penalty and
//!   a major-version adjustment
//! - **Conflict scoring**: Opposing stances within a topic, banded into
//!   severities
//! - **Report aggregation**: Sorted findings, summary counts and a
//!   knowledge-base health score
//!
//! Every operation is synchronous and deterministic for a fixed `now`.
//! The engine does no I/O and keeps no state between calls.
//!
//! # Usage
//!
//! ```
//! use curator_domain::{Article, ArticleId};
//! use curator_engine::{Engine, Severity};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let now = 1_700_000_000;
//! let article = |id: &str, content: &str| Article {
//!     id: ArticleId::new(id),
//!     title: format!("Article {}", id),
//!     content: content.to_string(),
//!     author: None,
//!     version: None,
//!     created_at: now,
//!     updated_at: None,
//! };
//!
//! let engine = Engine::default();
//! let report = engine.generate_report(
//!     &[
//!         article("1", "Use bcrypt, argon2, scrypt and secure hashing"),
//!         article("2", "md5 or sha1 or a plain text password is fine"),
//!     ],
//!     now,
//! )?;
//!
//! assert_eq!(report.conflicts.len(), 1);
//! assert_eq!(report.conflicts[0].conflict_category, "password_hashing");
//! assert_eq!(report.conflicts[0].severity, Severity::Medium);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod conflict;
pub mod error;
pub mod lexicon;
pub mod relevance;
pub mod report;

pub use config::EngineConfig;
pub use conflict::{ConflictRecord, ConflictScorer, CRITICAL_RECOMMENDATION, WARNING_RECOMMENDATION};
pub use error::EngineError;
pub use lexicon::KeywordLexicon;
pub use relevance::{parse_major_version, DeprecatedItem, RelevanceRecord, RelevanceScorer};
pub use report::{
    articles_from_value, generate_report, health_score, DeprecatedArticle, Engine, Recommendations,
    Report, Summary, NOT_ENOUGH_ARTICLES,
};

// Domain types that appear in reports
pub use curator_domain::{PriorityTier, Severity, Urgency};
