//! Parse LLM output into a structured review

use crate::error::AnalyzerError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// One problem the model found
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewIssue {
    /// accuracy, relevance, clarity or conflict
    #[serde(rename = "type", default)]
    pub kind: String,
    /// low, medium or high
    #[serde(default)]
    pub severity: String,
    /// What is wrong
    #[serde(default)]
    pub description: String,
    /// How to fix it
    #[serde(default)]
    pub suggestion: String,
}

/// Structured review as requested in the prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewAnalysis {
    /// Overall quality in [0, 1]
    pub score: f64,
    /// Problems found
    #[serde(default)]
    pub issues: Vec<ReviewIssue>,
    /// Brief summary
    #[serde(default)]
    pub summary: String,
    /// Proposed rewrite or edits
    #[serde(default)]
    pub suggested_updates: String,
}

/// Parse an LLM response into a review
///
/// Tolerates markdown code fences and prose around the JSON object.
/// Scores reported on a 0-100 scale are rescaled to [0, 1].
pub fn parse_review(response: &str) -> Result<ReviewAnalysis, AnalyzerError> {
    let json_str = extract_json(response)?;
    let json: Value = serde_json::from_str(json_str)?;

    if !json.is_object() {
        return Err(AnalyzerError::InvalidFormat("Expected JSON object".to_string()));
    }

    let mut analysis: ReviewAnalysis = serde_json::from_value(json)?;

    if !analysis.score.is_finite() || analysis.score < 0.0 {
        return Err(AnalyzerError::InvalidFormat(format!(
            "score {} out of range",
            analysis.score
        )));
    }
    if analysis.score > 1.0 {
        if analysis.score <= 100.0 {
            warn!(score = analysis.score, "Review score looks percentage-based, rescaling");
            analysis.score /= 100.0;
        } else {
            return Err(AnalyzerError::InvalidFormat(format!(
                "score {} out of range",
                analysis.score
            )));
        }
    }

    Ok(analysis)
}

/// Extract the JSON object from a response, handling markdown code blocks
fn extract_json(response: &str) -> Result<&str, AnalyzerError> {
    let trimmed = response.trim();

    let body = if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(AnalyzerError::InvalidFormat("Empty code block".to_string()));
        }
        // Skip the opening fence line, stop at the closing one
        let start = trimmed.find('\n').map(|i| i + 1).unwrap_or(trimmed.len());
        let inner = &trimmed[start..];
        match inner.rfind("```") {
            Some(end) => &inner[..end],
            None => inner,
        }
    } else {
        trimmed
    };

    let open = body.find('{');
    let close = body.rfind('}');
    match (open, close) {
        (Some(open), Some(close)) if open < close => Ok(&body[open..=close]),
        _ => Err(AnalyzerError::InvalidFormat("No JSON object in response".to_string())),
    }
}
