//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{Article, ArticleId, NewArticle};

/// Trait for storing and retrieving articles
///
/// Implemented by the infrastructure layer (curator-store)
pub trait ArticleStore {
    /// Error type for store operations
    type Error;

    /// All articles, most recently touched first
    fn list_articles(&self) -> Result<Vec<Article>, Self::Error>;

    /// Get an article by ID
    fn get_article(&self, id: &ArticleId) -> Result<Option<Article>, Self::Error>;

    /// Persist a new article, returning the stored record
    fn save_article(&mut self, article: NewArticle) -> Result<Article, Self::Error>;

    /// Record the result of an analysis run for an article
    fn save_analysis(&mut self, article_id: &ArticleId, analysis_json: &str) -> Result<(), Self::Error>;
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (curator-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate text completion
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate with structured output (if supported)
    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error>;
}

/// Shared providers forward to the provider they wrap
impl<P: LlmProvider + ?Sized> LlmProvider for std::sync::Arc<P> {
    type Error = P::Error;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        (**self).generate(prompt)
    }

    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error> {
        (**self).generate_structured(prompt, schema)
    }
}
