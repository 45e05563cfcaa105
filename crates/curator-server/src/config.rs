//! Configuration file parsing for the server.
//!
//! Loads bind address, database location, engine thresholds and optional
//! LLM settings from a TOML file.

use curator_engine::EngineConfig;
use curator_llm::OllamaConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    pub bind_port: u16,

    /// SQLite database file (":memory:" for a throwaway store)
    pub database_path: String,

    /// Largest article set a single analysis request may cover
    #[serde(default = "default_max_articles")]
    pub max_articles: usize,

    /// Scoring thresholds
    #[serde(default)]
    pub engine: EngineConfig,

    /// Optional TOML lexicon replacing the built-in tables
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,

    /// LLM review settings; reviews are disabled when absent
    #[serde(default)]
    pub ollama: Option<OllamaConfig>,
}

/// Default request cap: 500 articles
fn default_max_articles() -> usize {
    500
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that TOML typing cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_path.trim().is_empty() {
            return Err(ConfigError::Invalid("database_path is empty".to_string()));
        }
        if self.max_articles < 2 {
            return Err(ConfigError::Invalid(
                "max_articles must allow at least 2 articles".to_string(),
            ));
        }
        self.engine
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        ServerConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8080,
            database_path: ":memory:".to_string(),
            max_articles: default_max_articles(),
            engine: EngineConfig::default(),
            lexicon_path: None,
            ollama: None,
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default_test_config();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.max_articles, 500);
        assert!(config.ollama.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            bind_address = "0.0.0.0"
            bind_port = 9000
            database_path = "curator.db"

            [engine]
            significance_threshold = 0.5
            decay_window_days = 730.0
            deprecated_penalty = 0.5

            [ollama]
            model = "mistral"
        "#;

        let config = ServerConfig::from_toml(toml).unwrap();
        assert_eq!(config.bind_port, 9000);
        assert_eq!(config.max_articles, 500);
        assert_eq!(config.engine, EngineConfig::lenient());
        let ollama = config.ollama.unwrap();
        assert_eq!(ollama.model, "mistral");
        assert_eq!(ollama.endpoint, "http://localhost:11434");
    }

    #[test]
    fn test_invalid_engine_section() {
        let toml = r#"
            bind_address = "0.0.0.0"
            bind_port = 9000
            database_path = "curator.db"

            [engine]
            significance_threshold = 2.0
            decay_window_days = 365.0
            deprecated_penalty = 0.3
        "#;

        assert!(matches!(
            ServerConfig::from_toml(toml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_field() {
        let result = ServerConfig::from_toml("bind_address = \"0.0.0.0\"");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }
}
