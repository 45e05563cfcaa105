//! Error types for engine operations

use thiserror::Error;

/// Errors that can occur while configuring or running an analysis pass
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Input articles are malformed (not a list, missing fields used in scoring)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Lexicon, deprecated-feature table or thresholds are empty or malformed
    #[error("Configuration error: {0}")]
    Configuration(String),
}
