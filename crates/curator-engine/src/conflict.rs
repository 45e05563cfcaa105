//! Conflict scoring between article pairs

use crate::KeywordLexicon;
use curator_domain::{Article, ArticleRef, CategoryLexicon, Severity};
use serde::{Deserialize, Serialize};

/// Recommendation attached to high-severity conflicts
pub const CRITICAL_RECOMMENDATION: &str =
    "CRITICAL: Articles provide contradictory advice - immediate resolution needed";

/// Recommendation attached to every other reported conflict
pub const WARNING_RECOMMENDATION: &str =
    "WARNING: Articles may conflict - review and align recommendations";

/// A significant contradiction between two articles in one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictRecord {
    /// Earlier article in input order
    pub article1: ArticleRef,
    /// Later article in input order
    pub article2: ArticleRef,
    /// Topic category the articles disagree on
    pub conflict_category: String,
    /// Score in [0, 1]
    pub conflict_score: f64,
    /// Severity band of the score
    pub severity: Severity,
    /// What a curator should do about it
    pub recommendation: String,
}

impl ConflictRecord {
    /// Build a record, deriving severity and recommendation from the score
    pub fn new(article1: ArticleRef, article2: ArticleRef, category: &str, score: f64) -> Self {
        let severity = Severity::from_score(score);
        let recommendation = if severity == Severity::High {
            CRITICAL_RECOMMENDATION
        } else {
            WARNING_RECOMMENDATION
        };

        Self {
            article1,
            article2,
            conflict_category: category.to_string(),
            conflict_score: score,
            severity,
            recommendation: recommendation.to_string(),
        }
    }
}

/// Compares two articles' stance within a topic category
pub struct ConflictScorer<'a> {
    lexicon: &'a KeywordLexicon,
}

impl<'a> ConflictScorer<'a> {
    /// Create a scorer over the given lexicon
    pub fn new(lexicon: &'a KeywordLexicon) -> Self {
        Self { lexicon }
    }

    /// Conflict score in [0, 1] for one category
    ///
    /// Unknown categories never conflict.
    ///
    /// # Examples
    ///
    /// ```
    /// use curator_domain::{Article, ArticleId};
    /// use curator_engine::{ConflictScorer, KeywordLexicon};
    ///
    /// let make = |id: &str, content: &str| Article {
    ///     id: ArticleId::new(id),
    ///     title: id.to_string(),
    ///     content: content.to_string(),
    ///     author: None,
    ///     version: None,
    ///     created_at: 0,
    ///     updated_at: None,
    /// };
    /// let lexicon = KeywordLexicon::builtin();
    /// let scorer = ConflictScorer::new(&lexicon);
    /// let a = make("a", "use bcrypt for password hashing");
    /// let b = make("b", "we use md5 for password hashing");
    /// assert!((scorer.score(&a, &b, "password_hashing") - 0.2).abs() < 1e-12);
    /// assert_eq!(scorer.score(&a, &b, "no_such_topic"), 0.0);
    /// ```
    pub fn score(&self, a: &Article, b: &Article, category: &str) -> f64 {
        match self.lexicon.lookup(category) {
            Some(lex) => score_lowered(lex, &a.content.to_lowercase(), &b.content.to_lowercase()),
            None => 0.0,
        }
    }
}

/// Score two already-lowercased bodies against one category's phrases
///
/// Only strictly opposite stances conflict; the distance between the signed
/// scores is scaled by 1/10 and clamped.
pub(crate) fn score_lowered(lex: &CategoryLexicon, a: &str, b: &str) -> f64 {
    let signed_a = lex.signed_score(a);
    let signed_b = lex.signed_score(b);

    let opposite = (signed_a > 0 && signed_b < 0) || (signed_a < 0 && signed_b > 0);
    if !opposite {
        return 0.0;
    }

    ((signed_a - signed_b).abs() as f64 / 10.0).clamp(0.0, 1.0)
}
