//! Report aggregation: the full analysis pass over an article set

use crate::conflict::score_lowered;
use crate::relevance::{DeprecatedItem, RelevanceRecord, RelevanceScorer};
use crate::{ConflictRecord, EngineConfig, EngineError, KeywordLexicon};
use curator_domain::{Article, ArticleId, Severity, Urgency};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message returned when there is nothing to compare
pub const NOT_ENOUGH_ARTICLES: &str = "Need at least 2 articles to detect conflicts";

/// Relevance below which an article counts as needing review
const REVIEW_THRESHOLD: f64 = 0.6;

/// Headline counts of a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Articles analysed
    pub total_articles: usize,
    /// Significant conflicts reported
    pub conflicts_found: usize,
    /// Articles mentioning deprecated features
    pub deprecated_articles: usize,
    /// Articles with relevance below 0.3
    pub high_priority_updates: usize,
}

/// An article that mentions deprecated features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeprecatedArticle {
    /// Article identifier
    pub id: ArticleId,
    /// Article title
    pub title: String,
    /// Deprecated features found, in table order
    pub deprecated_features: Vec<DeprecatedItem>,
    /// Always high
    pub urgency: Urgency,
}

/// Aggregate workload and health metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    /// High-severity conflicts plus deprecated articles
    pub immediate_action: usize,
    /// Medium-severity conflicts plus articles below 0.6 relevance
    pub review_needed: usize,
    /// Knowledge-base health in [0, 100]
    pub total_kb_health_score: u8,
}

impl Default for Recommendations {
    fn default() -> Self {
        Self {
            immediate_action: 0,
            review_needed: 0,
            total_kb_health_score: 100,
        }
    }
}

/// Result of one analysis pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Headline counts
    pub summary: Summary,
    /// Significant conflicts, strongest first
    pub conflicts: Vec<ConflictRecord>,
    /// Articles mentioning deprecated features, in input order
    pub deprecated_articles: Vec<DeprecatedArticle>,
    /// Relevance of every article, least relevant first
    pub relevance_scores: Vec<RelevanceRecord>,
    /// Aggregate metrics
    pub recommendations: Recommendations,
    /// Explanation when the pass was skipped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Report {
    /// Report for an article set too small to compare
    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            summary: Summary::default(),
            conflicts: Vec::new(),
            deprecated_articles: Vec::new(),
            relevance_scores: Vec::new(),
            recommendations: Recommendations::default(),
            message: Some(message.into()),
        }
    }

    /// Whether the pass was skipped for lack of articles
    pub fn is_empty(&self) -> bool {
        self.message.is_some() && self.summary.total_articles == 0
    }
}

/// Knowledge-base health: share of articles free of findings, as a percentage
///
/// # Examples
///
/// ```
/// use curator_engine::health_score;
///
/// assert_eq!(health_score(0, 0, 4), 100);
/// assert_eq!(health_score(1, 0, 4), 75);
/// assert_eq!(health_score(9, 3, 4), 0);
/// ```
pub fn health_score(conflicts: usize, deprecated: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let raw = (1.0 - (conflicts + deprecated) as f64 / total as f64) * 100.0;
    raw.round().clamp(0.0, 100.0) as u8
}

/// Runs the full analysis pass: relevance, deprecation, pairwise conflicts
///
/// Holds only read-only tables; every call is a pure function of
/// `(articles, now)` and the engine can be shared across threads.
///
/// # Examples
///
/// ```
/// use curator_engine::Engine;
///
/// let engine = Engine::default();
/// let report = engine.generate_report(&[], 0).unwrap();
/// assert!(report.conflicts.is_empty());
/// assert_eq!(
///     report.message.as_deref(),
///     Some("Need at least 2 articles to detect conflicts")
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    lexicon: KeywordLexicon,
    config: EngineConfig,
}

impl Engine {
    /// Create an engine, validating the lexicon and thresholds
    pub fn new(lexicon: KeywordLexicon, config: EngineConfig) -> Result<Self, EngineError> {
        lexicon.validate()?;
        config.validate()?;
        Ok(Self { lexicon, config })
    }

    /// Lexicon in use
    pub fn lexicon(&self) -> &KeywordLexicon {
        &self.lexicon
    }

    /// Thresholds in use
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyse an article set at time `now` (Unix seconds)
    ///
    /// Fewer than two articles yields an empty report, not an error.
    /// Articles with a blank id are rejected as invalid input.
    pub fn generate_report(&self, articles: &[Article], now: i64) -> Result<Report, EngineError> {
        validate_articles(articles)?;

        if articles.len() < 2 {
            return Ok(Report::empty(NOT_ENOUGH_ARTICLES));
        }

        let lowered: Vec<String> = articles.iter().map(|a| a.content.to_lowercase()).collect();
        let relevance = RelevanceScorer::new(&self.lexicon, &self.config);

        let mut relevance_scores = Vec::with_capacity(articles.len());
        let mut deprecated_articles = Vec::new();
        for (article, content) in articles.iter().zip(&lowered) {
            let record = relevance.assess_lowered(article, content, now);
            if !record.deprecated_items.is_empty() {
                deprecated_articles.push(DeprecatedArticle {
                    id: article.id.clone(),
                    title: article.title.clone(),
                    deprecated_features: record.deprecated_items.clone(),
                    urgency: Urgency::High,
                });
            }
            relevance_scores.push(record);
        }

        let mut conflicts = Vec::new();
        for i in 0..articles.len() {
            for j in (i + 1)..articles.len() {
                for lex in self.lexicon.categories() {
                    let score = score_lowered(lex, &lowered[i], &lowered[j]);
                    if score > self.config.significance_threshold {
                        conflicts.push(ConflictRecord::new(
                            articles[i].to_ref(),
                            articles[j].to_ref(),
                            &lex.category,
                            score,
                        ));
                    }
                }
            }
        }

        // Both sorts are stable, so ties keep discovery order.
        conflicts.sort_by(|a, b| b.conflict_score.total_cmp(&a.conflict_score));
        relevance_scores.sort_by(|a, b| a.relevance_score.total_cmp(&b.relevance_score));

        let count_severity =
            |severity: Severity| conflicts.iter().filter(|c| c.severity == severity).count();
        let below =
            |threshold: f64| relevance_scores.iter().filter(|r| r.relevance_score < threshold).count();

        let summary = Summary {
            total_articles: articles.len(),
            conflicts_found: conflicts.len(),
            deprecated_articles: deprecated_articles.len(),
            high_priority_updates: below(0.3),
        };
        let recommendations = Recommendations {
            immediate_action: count_severity(Severity::High) + deprecated_articles.len(),
            review_needed: count_severity(Severity::Medium) + below(REVIEW_THRESHOLD),
            total_kb_health_score: health_score(
                conflicts.len(),
                deprecated_articles.len(),
                articles.len(),
            ),
        };

        Ok(Report {
            summary,
            conflicts,
            deprecated_articles,
            relevance_scores,
            recommendations,
            message: None,
        })
    }

    /// Analyse untyped JSON input
    ///
    /// The value must be an array of objects each carrying `id` (string or
    /// number), `content` (string) and `created_at` (integer seconds).
    /// `title`, `author`, `version` and `updated_at` are optional.
    pub fn generate_report_from_value(&self, value: &Value, now: i64) -> Result<Report, EngineError> {
        let articles = articles_from_value(value)?;
        self.generate_report(&articles, now)
    }
}

/// Analyse an article set with the built-in lexicon and default thresholds
pub fn generate_report(articles: &[Article], now: i64) -> Result<Report, EngineError> {
    Engine::default().generate_report(articles, now)
}

fn validate_articles(articles: &[Article]) -> Result<(), EngineError> {
    for (idx, article) in articles.iter().enumerate() {
        if article.id.is_blank() {
            return Err(EngineError::InvalidInput(format!("article {} has a blank id", idx)));
        }
    }
    Ok(())
}

/// Convert untyped JSON into articles, failing on the first malformed entry
pub fn articles_from_value(value: &Value) -> Result<Vec<Article>, EngineError> {
    let entries = value
        .as_array()
        .ok_or_else(|| EngineError::InvalidInput("articles must be a JSON array".to_string()))?;

    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| article_from_value(idx, entry))
        .collect()
}

fn article_from_value(idx: usize, entry: &Value) -> Result<Article, EngineError> {
    let obj = entry
        .as_object()
        .ok_or_else(|| EngineError::InvalidInput(format!("article {} is not an object", idx)))?;

    let id = match obj.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => {
            return Err(EngineError::InvalidInput(format!(
                "article {} is missing a string or numeric 'id'",
                idx
            )))
        }
    };

    let content = obj
        .get("content")
        .and_then(Value::as_str)
        .ok_or_else(|| EngineError::InvalidInput(format!("article {} is missing 'content'", idx)))?
        .to_string();

    let created_at = obj
        .get("created_at")
        .and_then(Value::as_i64)
        .ok_or_else(|| {
            EngineError::InvalidInput(format!("article {} is missing integer 'created_at'", idx))
        })?;

    let updated_at = match obj.get("updated_at") {
        None | Some(Value::Null) => None,
        Some(v) => Some(v.as_i64().ok_or_else(|| {
            EngineError::InvalidInput(format!("article {} has a non-integer 'updated_at'", idx))
        })?),
    };

    let optional_str = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);

    Ok(Article {
        id: ArticleId::new(id),
        title: optional_str("title").unwrap_or_else(|| "Untitled".to_string()),
        content,
        author: optional_str("author"),
        version: optional_str("version"),
        created_at,
        updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: i64 = 1_700_000_000;

    fn article(id: &str, content: &str) -> Article {
        Article {
            id: ArticleId::new(id),
            title: format!("Article {}", id),
            content: content.to_string(),
            author: None,
            version: None,
            created_at: NOW,
            updated_at: None,
        }
    }

    #[test]
    fn test_health_score_rounding() {
        assert_eq!(health_score(1, 0, 3), 67);
        assert_eq!(health_score(1, 1, 3), 33);
        assert_eq!(health_score(1, 0, 8), 88);
    }

    #[test]
    fn test_single_article_is_empty_report() {
        let report = generate_report(&[article("a", "md5")], NOW).unwrap();
        assert!(report.is_empty());
        assert!(report.relevance_scores.is_empty());
        assert!(report.deprecated_articles.is_empty());
        assert_eq!(report.summary, Summary::default());
    }

    #[test]
    fn test_blank_id_rejected() {
        let result = generate_report(&[article(" ", "x"), article("b", "y")], NOW);
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn test_from_value_requires_array() {
        let engine = Engine::default();
        let result = engine.generate_report_from_value(&json!({"articles": []}), NOW);
        assert!(matches!(result, Err(EngineError::InvalidInput(msg)) if msg.contains("array")));
    }

    #[test]
    fn test_from_value_missing_content() {
        let engine = Engine::default();
        let value = json!([
            {"id": 1, "title": "a", "content": "bcrypt", "created_at": NOW},
            {"id": 2, "title": "b", "created_at": NOW},
        ]);
        let result = engine.generate_report_from_value(&value, NOW);
        assert!(matches!(result, Err(EngineError::InvalidInput(msg)) if msg.contains("article 1")));
    }

    #[test]
    fn test_from_value_missing_content_even_for_single_article() {
        let engine = Engine::default();
        let value = json!([{"id": "x", "created_at": NOW}]);
        assert!(engine.generate_report_from_value(&value, NOW).is_err());
    }

    #[test]
    fn test_from_value_accepts_numeric_ids_and_null_updates() {
        let value = json!([
            {"id": 7, "content": "c", "created_at": 5, "updated_at": null, "version": "2.1"},
        ]);
        let articles = articles_from_value(&value).unwrap();
        assert_eq!(articles[0].id.as_str(), "7");
        assert_eq!(articles[0].title, "Untitled");
        assert_eq!(articles[0].updated_at, None);
        assert_eq!(articles[0].version.as_deref(), Some("2.1"));
    }

    #[test]
    fn test_conflicts_sorted_descending() {
        let strong_good = article("a", "bcrypt argon2 scrypt secure hashing; https tls ssl encrypted");
        let strong_bad = article("b", "md5, sha1, plain text password; http:// unencrypted plain http");
        let report = generate_report(&[strong_good, strong_bad], NOW).unwrap();

        let scores: Vec<f64> = report.conflicts.iter().map(|c| c.conflict_score).collect();
        let mut sorted = scores.clone();
        sorted.sort_by(|a, b| b.total_cmp(a));
        assert_eq!(scores, sorted);
        assert!(report.conflicts.len() >= 2);
    }

    #[test]
    fn test_relevance_sorted_ascending() {
        let mut old = article("old", "nothing");
        old.created_at = NOW - 200 * 86_400;
        let fresh = article("fresh", "nothing");
        let report = generate_report(&[fresh, old], NOW).unwrap();

        assert_eq!(report.relevance_scores[0].article.id.as_str(), "old");
        assert_eq!(report.relevance_scores[1].article.id.as_str(), "fresh");
    }
}
