//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Engine error
    #[error("Engine error: {0}")]
    Engine(#[from] curator_engine::EngineError),

    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] curator_store::StoreError),

    /// Review failed
    #[error("Review failed: {0}")]
    Analyzer(#[from] curator_analyzer::AnalyzerError),

    /// LLM provider could not be set up
    #[error("LLM error: {0}")]
    Llm(#[from] curator_llm::LlmError),

    /// Blocking task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A file could not be turned into an article
    #[error("Cannot parse {path}: {reason}")]
    Parse {
        /// File that failed
        path: String,
        /// What was wrong with it
        reason: String,
    },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unknown article
    #[error("Article not found: {0}")]
    NotFound(String),
}
