//! Curator Analyzer
//!
//! Per-article content checks that sit beside the scoring engine.
//!
//! # Overview
//!
//! - **Heuristic scan**: Version and date mentions plus a fixed set of
//!   security-issue rules, fully deterministic
//! - **LLM review**: Free-text article review through any `LlmProvider`,
//!   with best-effort parsing of the JSON the model is asked for
//!
//! # Architecture
//!
//! ```text
//! Article → scan_content → ContentScan
//! Article → ReviewPromptBuilder → LlmProvider → parse_review → ReviewOutcome
//! ```
//!
//! # Example Usage
//!
//! ```
//! use curator_analyzer::scan_content;
//!
//! let scan = scan_content("As of March 3, 2021 (v2.4) we hash with md5.");
//! assert_eq!(scan.version_info.latest_version.as_deref(), Some("v2.4"));
//! assert_eq!(scan.version_info.release_date.as_deref(), Some("March 3, 2021"));
//! assert_eq!(scan.issues_found, vec!["Advises using MD5 for password hashing"]);
//! ```

#![warn(missing_docs)]

mod error;
mod parser;
mod prompt;
mod review;
mod scan;

pub use error::AnalyzerError;
pub use parser::{parse_review, ReviewAnalysis, ReviewIssue};
pub use prompt::ReviewPromptBuilder;
pub use review::{BatchReviewEntry, ReviewOutcome, Reviewer};
pub use scan::{scan_batch, scan_content, BatchScan, ContentScan, ScanInput, ScannedArticle, VersionInfo};
