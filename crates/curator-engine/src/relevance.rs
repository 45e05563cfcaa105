//! Relevance scoring: how current an article still is

use crate::{EngineConfig, KeywordLexicon};
use curator_domain::{Article, ArticleRef, PriorityTier};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

static VERSION_PATTERN: OnceLock<Regex> = OnceLock::new();

fn version_pattern() -> &'static Regex {
    VERSION_PATTERN.get_or_init(|| Regex::new(r"(\d+)\.(\d+)").expect("valid version regex"))
}

/// Major component of the first `major.minor` found in a version label
///
/// # Examples
///
/// ```
/// use curator_engine::parse_major_version;
///
/// assert_eq!(parse_major_version("1.2"), Some(1));
/// assert_eq!(parse_major_version("v3.0.1"), Some(3));
/// assert_eq!(parse_major_version("latest"), None);
/// assert_eq!(parse_major_version("7"), None);
/// ```
pub fn parse_major_version(version: &str) -> Option<u64> {
    version_pattern()
        .captures(version)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// A deprecated feature mentioned by an article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeprecatedItem {
    /// Matched feature token
    pub feature: String,
    /// Date the feature was deprecated
    pub deprecated_date: String,
    /// Why it is deprecated
    pub reason: String,
    /// The article's reference timestamp (updated_at or created_at)
    pub article_date: i64,
}

/// Relevance of one article within a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceRecord {
    /// Article the score belongs to
    #[serde(flatten)]
    pub article: ArticleRef,
    /// Score in [0, 1]
    pub relevance_score: f64,
    /// Last update time, if the article was ever updated
    pub last_updated: Option<i64>,
    /// Deprecated features the article mentions
    pub deprecated_items: Vec<DeprecatedItem>,
    /// Update priority band
    pub priority: PriorityTier,
    /// Recommendation text for the band
    pub recommendation: String,
}

/// Scores a single article from its age, deprecated mentions and version
pub struct RelevanceScorer<'a> {
    lexicon: &'a KeywordLexicon,
    config: &'a EngineConfig,
}

impl<'a> RelevanceScorer<'a> {
    /// Create a scorer over the given tables
    pub fn new(lexicon: &'a KeywordLexicon, config: &'a EngineConfig) -> Self {
        Self { lexicon, config }
    }

    /// Every deprecated feature whose token occurs in the article, in table order
    pub fn find_deprecated(&self, article: &Article) -> Vec<DeprecatedItem> {
        self.find_deprecated_lowered(article, &article.content.to_lowercase())
    }

    pub(crate) fn find_deprecated_lowered(&self, article: &Article, lowered: &str) -> Vec<DeprecatedItem> {
        self.lexicon
            .deprecated_features()
            .iter()
            .filter(|item| item.is_mentioned_in(lowered))
            .map(|item| DeprecatedItem {
                feature: item.feature.clone(),
                deprecated_date: item.deprecated_date.clone(),
                reason: item.reason.clone(),
                article_date: article.reference_timestamp(),
            })
            .collect()
    }

    /// Relevance score in [0, 1]
    ///
    /// Linear decay over the configured window, a single penalty for any
    /// deprecated mention, then a major-version adjustment.
    pub fn score(&self, article: &Article, now: i64) -> f64 {
        let lowered = article.content.to_lowercase();
        let has_deprecated = self
            .lexicon
            .deprecated_features()
            .iter()
            .any(|item| item.is_mentioned_in(&lowered));
        self.score_with(article, now, has_deprecated)
    }

    fn score_with(&self, article: &Article, now: i64, has_deprecated: bool) -> f64 {
        let age_days = article.age_days(now);
        let mut score = (1.0 - age_days / self.config.decay_window_days).clamp(0.0, 1.0);

        if has_deprecated {
            score *= self.config.deprecated_penalty;
        }

        if let Some(major) = article.version.as_deref().and_then(parse_major_version) {
            score *= self.config.version_multiplier(major);
        }

        score.clamp(0.0, 1.0)
    }

    /// Full relevance record for an article
    pub fn assess(&self, article: &Article, now: i64) -> RelevanceRecord {
        self.assess_lowered(article, &article.content.to_lowercase(), now)
    }

    pub(crate) fn assess_lowered(&self, article: &Article, lowered: &str, now: i64) -> RelevanceRecord {
        let deprecated_items = self.find_deprecated_lowered(article, lowered);
        let relevance_score = self.score_with(article, now, !deprecated_items.is_empty());
        let priority = PriorityTier::from_relevance(relevance_score);

        RelevanceRecord {
            article: article.to_ref(),
            relevance_score,
            last_updated: article.updated_at,
            deprecated_items,
            priority,
            recommendation: priority.recommendation().to_string(),
        }
    }
}
