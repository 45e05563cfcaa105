//! Review command implementation.

use crate::cli::ReviewArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use curator_analyzer::Reviewer;
use curator_domain::traits::ArticleStore;
use curator_domain::ArticleId;
use curator_llm::OllamaProvider;
use curator_store::SqliteStore;
use tracing::info;

/// Execute the review command.
///
/// The provider blocks on its own runtime, so the review runs on a
/// blocking thread.
pub async fn execute_review(
    args: ReviewArgs,
    config: &Config,
    store: &mut SqliteStore,
    formatter: &Formatter,
) -> Result<()> {
    let id = ArticleId::new(args.id);
    let article = store
        .get_article(&id)?
        .ok_or_else(|| CliError::NotFound(id.to_string()))?;

    let mut ollama = config.ollama.clone();
    if let Some(model) = args.model {
        ollama.model = model;
    }
    let reviewer = Reviewer::new(OllamaProvider::from_config(&ollama)?);

    println!(
        "{}",
        formatter.info(&format!("Reviewing '{}' with {}", article.title, ollama.model))
    );
    let outcome = tokio::task::spawn_blocking(move || reviewer.review(&article)).await??;

    if !args.no_save {
        store.save_analysis(&id, &serde_json::to_string(&outcome)?)?;
        info!(article_id = %id, "Review saved");
    }

    println!("{}", formatter.format_review(&outcome)?);
    Ok(())
}
