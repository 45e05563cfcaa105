//! Curator Server
//!
//! HTTP front end for the knowledge-base curation engine.
//! Serves stored articles, conflict reports, heuristic scans and LLM reviews.

#![warn(missing_docs)]

pub mod config;
pub mod cors;
pub mod handlers;

use config::ServerConfig;
use curator_analyzer::Reviewer;
use curator_engine::{Engine, EngineError, KeywordLexicon};
use curator_llm::{LlmError, OllamaProvider};
use curator_store::{SqliteStore, StoreError};
use handlers::{create_router, AppState, SharedProvider};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tracing::info;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Engine rejected the lexicon or thresholds
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Database could not be opened
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// LLM provider could not be set up
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Build the shared state described by a configuration
pub fn build_state(config: &ServerConfig) -> Result<AppState, ServerError> {
    let lexicon = match &config.lexicon_path {
        Some(path) => {
            let contents = std::fs::read_to_string(path).map_err(config::ConfigError::FileRead)?;
            KeywordLexicon::from_toml(&contents)?
        }
        None => KeywordLexicon::builtin(),
    };
    let engine = Engine::new(lexicon, config.engine.clone())?;

    let store = SqliteStore::new(&config.database_path)?;

    let reviewer = match &config.ollama {
        Some(ollama) => {
            let provider: SharedProvider = Arc::new(OllamaProvider::from_config(ollama)?);
            info!(model = %ollama.model, endpoint = %ollama.endpoint, "LLM reviews enabled");
            Some(Arc::new(Reviewer::new(provider)))
        }
        None => None,
    };

    Ok(AppState {
        store: Arc::new(Mutex::new(store)),
        engine: Arc::new(engine),
        reviewer,
        max_articles: config.max_articles,
    })
}

/// Start the HTTP server
///
/// Opens the store, builds the engine and serves until the process exits.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    info!("Starting Curator server");
    info!("Bind address: {}", config.bind_addr());
    info!("Database: {}", config.database_path);
    info!("Max articles per request: {}", config.max_articles);

    let state = build_state(&config)?;
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_state_from_test_config() {
        let state = build_state(&ServerConfig::default_test_config()).unwrap();
        assert!(state.reviewer.is_none());
        assert_eq!(state.max_articles, 500);
    }

    #[test]
    fn test_missing_lexicon_file() {
        let mut config = ServerConfig::default_test_config();
        config.lexicon_path = Some("/nonexistent/lexicon.toml".into());
        assert!(matches!(build_state(&config), Err(ServerError::Config(_))));
    }
}
