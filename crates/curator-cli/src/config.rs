//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use curator_engine::{EngineConfig, KeywordLexicon};
use curator_llm::OllamaConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database; defaults to `~/.curator/curator.db`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<String>,

    /// Custom keyword lexicon TOML; the built-in tables are used otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lexicon_path: Option<PathBuf>,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Scoring thresholds
    #[serde(default)]
    pub engine: EngineConfig,

    /// LLM used by `review`
    #[serde(default)]
    pub ollama: OllamaConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Markdown document
    Markdown,
}

impl Config {
    /// Directory holding the configuration and the default database.
    pub fn dir() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".curator"))
    }

    /// Get the configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::dir()?.join("config.toml"))
    }

    /// Load configuration from the default location or use defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from a file, falling back to defaults when it is absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.engine.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Save configuration to a file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Database to open.
    pub fn database_path(&self) -> Result<String> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => {
                let dir = Self::dir()?;
                fs::create_dir_all(&dir)?;
                Ok(dir.join("curator.db").to_string_lossy().into_owned())
            }
        }
    }

    /// Keyword lexicon to score with.
    pub fn lexicon(&self) -> Result<KeywordLexicon> {
        match &self.lexicon_path {
            Some(path) => {
                let contents = fs::read_to_string(path)?;
                Ok(KeywordLexicon::from_toml(&contents)?)
            }
            None => Ok(KeywordLexicon::builtin()),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.database_path.is_none());
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = Config::from_toml(
            r#"
            database_path = "/tmp/kb.db"

            [settings]
            format = "markdown"

            [ollama]
            model = "mistral"
            "#,
        )
        .unwrap();

        assert_eq!(config.database_path.as_deref(), Some("/tmp/kb.db"));
        assert_eq!(config.settings.format, OutputFormat::Markdown);
        assert!(config.settings.color);
        assert_eq!(config.ollama.model, "mistral");
        assert_eq!(config.ollama.endpoint, curator_llm::ollama::DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_invalid_engine_section_rejected() {
        let result = Config::from_toml(
            "[engine]\nsignificance_threshold = 2.0\ndecay_window_days = 365.0\ndeprecated_penalty = 0.3\n",
        );
        assert!(matches!(result, Err(CliError::Engine(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.database_path = Some("kb.db".to_string());
        config.settings.color = false;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.database_path.as_deref(), Some("kb.db"));
        assert!(!loaded.settings.color);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(config.lexicon_path.is_none());
    }

    #[test]
    fn test_builtin_lexicon_by_default() {
        let lexicon = Config::default().lexicon().unwrap();
        assert!(lexicon.lookup("password_hashing").is_some());
    }
}
