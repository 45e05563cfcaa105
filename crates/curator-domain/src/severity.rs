//! Priority bands attached to analysis findings

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a conflict between two articles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Minor disagreement
    Low,
    /// Noticeable disagreement worth a review
    Medium,
    /// Directly contradictory advice
    High,
}

impl Severity {
    /// Band a conflict score: > 0.7 high, > 0.5 medium, otherwise low
    ///
    /// # Examples
    ///
    /// ```
    /// use curator_domain::Severity;
    ///
    /// assert_eq!(Severity::from_score(0.71), Severity::High);
    /// assert_eq!(Severity::from_score(0.7), Severity::Medium);
    /// assert_eq!(Severity::from_score(0.5), Severity::Low);
    /// ```
    pub fn from_score(score: f64) -> Self {
        if score > 0.7 {
            Severity::High
        } else if score > 0.5 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    /// Uppercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency of acting on a deprecated-content finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Urgency {
    /// Act soon
    High,
}

impl Urgency {
    /// Uppercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::High => "HIGH",
        }
    }
}

/// Update priority derived from an article's relevance score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PriorityTier {
    /// Needs immediate review or rewrite (score < 0.3)
    High,
    /// Should be updated (0.3 <= score < 0.6)
    Medium,
    /// Appears current (score >= 0.6)
    Low,
}

impl PriorityTier {
    /// Band a relevance score
    pub fn from_relevance(score: f64) -> Self {
        if score < 0.3 {
            PriorityTier::High
        } else if score < 0.6 {
            PriorityTier::Medium
        } else {
            PriorityTier::Low
        }
    }

    /// Uppercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityTier::High => "HIGH",
            PriorityTier::Medium => "MEDIUM",
            PriorityTier::Low => "LOW",
        }
    }

    /// Recommendation text shown to curators
    pub fn recommendation(&self) -> &'static str {
        match self {
            PriorityTier::High => "HIGH PRIORITY: Needs immediate review/rewrite",
            PriorityTier::Medium => "MEDIUM PRIORITY: Should be updated",
            PriorityTier::Low => "LOW PRIORITY: Content appears current",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_bands() {
        assert_eq!(Severity::from_score(1.0), Severity::High);
        assert_eq!(Severity::from_score(0.6), Severity::Medium);
        assert_eq!(Severity::from_score(0.51), Severity::Medium);
        assert_eq!(Severity::from_score(0.31), Severity::Low);
    }

    #[test]
    fn test_priority_bands() {
        assert_eq!(PriorityTier::from_relevance(0.0), PriorityTier::High);
        assert_eq!(PriorityTier::from_relevance(0.3), PriorityTier::Medium);
        assert_eq!(PriorityTier::from_relevance(0.59), PriorityTier::Medium);
        assert_eq!(PriorityTier::from_relevance(0.6), PriorityTier::Low);
    }

    #[test]
    fn test_serialized_labels_are_uppercase() {
        assert_eq!(serde_json::to_string(&Severity::Medium).unwrap(), "\"MEDIUM\"");
        assert_eq!(serde_json::to_string(&Urgency::High).unwrap(), "\"HIGH\"");
    }
}
