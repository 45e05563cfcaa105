//! LLM-backed article review

use crate::error::AnalyzerError;
use crate::parser::{parse_review, ReviewAnalysis};
use crate::prompt::ReviewPromptBuilder;
use curator_domain::traits::LlmProvider;
use curator_domain::{Article, ArticleRef};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::{debug, info, warn};

/// Article bodies longer than this are truncated in the prompt
const DEFAULT_MAX_CONTENT_CHARS: usize = 12_000;

/// What the model said about one article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    /// Model output verbatim
    pub raw_analysis: String,
    /// Structured form, when the output could be parsed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed: Option<ReviewAnalysis>,
}

/// Review result for one article of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReviewEntry {
    /// Article reviewed
    pub article: ArticleRef,
    /// Review, if the provider answered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<ReviewOutcome>,
    /// Provider failure, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Reviews articles through an LLM provider
pub struct Reviewer<P> {
    provider: P,
    max_content_chars: usize,
}

impl<P> Reviewer<P>
where
    P: LlmProvider,
    P::Error: Display,
{
    /// Create a reviewer over a provider
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
        }
    }

    /// Limit how much of each article is sent to the model
    pub fn with_max_content_chars(mut self, max: usize) -> Self {
        self.max_content_chars = max;
        self
    }

    /// Provider in use
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Review a stored article
    pub fn review(&self, article: &Article) -> Result<ReviewOutcome, AnalyzerError> {
        if article.content.trim().is_empty() {
            return Err(AnalyzerError::EmptyContent);
        }
        let prompt = ReviewPromptBuilder::for_article(article)
            .with_max_content_chars(self.max_content_chars)
            .build();
        debug!(article_id = %article.id, "Reviewing article");
        self.run(&prompt)
    }

    /// Review free-standing content
    pub fn review_content(&self, content: &str) -> Result<ReviewOutcome, AnalyzerError> {
        if content.trim().is_empty() {
            return Err(AnalyzerError::EmptyContent);
        }
        let prompt = ReviewPromptBuilder::for_content(content)
            .with_max_content_chars(self.max_content_chars)
            .build();
        self.run(&prompt)
    }

    /// Review every article, recording failures instead of stopping
    pub fn review_batch(&self, articles: &[Article]) -> Vec<BatchReviewEntry> {
        let entries: Vec<BatchReviewEntry> = articles
            .iter()
            .map(|article| match self.review(article) {
                Ok(outcome) => BatchReviewEntry {
                    article: article.to_ref(),
                    analysis: Some(outcome),
                    error: None,
                },
                Err(e) => {
                    warn!(article_id = %article.id, error = %e, "Article review failed");
                    BatchReviewEntry {
                        article: article.to_ref(),
                        analysis: None,
                        error: Some(e.to_string()),
                    }
                }
            })
            .collect();

        let failed = entries.iter().filter(|e| e.error.is_some()).count();
        info!(total = entries.len(), failed, "Batch review complete");
        entries
    }

    fn run(&self, prompt: &str) -> Result<ReviewOutcome, AnalyzerError> {
        let raw_analysis = self
            .provider
            .generate(prompt)
            .map_err(|e| AnalyzerError::Llm(e.to_string()))?;

        let parsed = match parse_review(&raw_analysis) {
            Ok(review) => Some(review),
            Err(e) => {
                warn!(error = %e, "Review output was not structured, keeping raw text");
                None
            }
        };

        Ok(ReviewOutcome { raw_analysis, parsed })
    }
}
