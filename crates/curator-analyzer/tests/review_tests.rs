//! Integration tests for the Reviewer

use curator_analyzer::{scan_batch, AnalyzerError, ReviewPromptBuilder, Reviewer, ScanInput};
use curator_domain::{Article, ArticleId};
use curator_llm::MockProvider;

fn article(id: &str, content: &str) -> Article {
    Article {
        id: ArticleId::new(id),
        title: format!("Article {}", id),
        content: content.to_string(),
        author: Some("docs-team".to_string()),
        version: Some("2.1".to_string()),
        created_at: 1_700_000_000,
        updated_at: None,
    }
}

#[test]
fn test_structured_review() {
    let llm = MockProvider::new(
        r#"```json
{"score": 0.35, "issues": [{"type": "relevance", "severity": "high",
  "description": "md5 is broken", "suggestion": "use argon2"}],
 "summary": "Outdated", "suggested_updates": "Switch to argon2"}
```"#,
    );
    let reviewer = Reviewer::new(llm);

    let outcome = reviewer.review(&article("1", "Hash with md5")).unwrap();
    let parsed = outcome.parsed.unwrap();
    assert_eq!(parsed.score, 0.35);
    assert_eq!(parsed.issues[0].suggestion, "use argon2");
    assert!(outcome.raw_analysis.starts_with("```json"));

    let prompts = reviewer.provider().prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("- Author: docs-team"));
    assert!(prompts[0].contains("Hash with md5"));
}

#[test]
fn test_unstructured_review_keeps_raw_text() {
    let reviewer = Reviewer::new(MockProvider::new("Looks fine, nothing to change."));
    let outcome = reviewer.review_content("Use bcrypt").unwrap();
    assert_eq!(outcome.raw_analysis, "Looks fine, nothing to change.");
    assert!(outcome.parsed.is_none());
}

#[test]
fn test_empty_content_not_sent() {
    let reviewer = Reviewer::new(MockProvider::default());
    let result = reviewer.review_content("   ");
    assert!(matches!(result, Err(AnalyzerError::EmptyContent)));
    assert_eq!(reviewer.provider().call_count(), 0);
}

#[test]
fn test_batch_records_failures() {
    let failing = article("2", "this one fails");
    let failing_prompt = ReviewPromptBuilder::for_article(&failing)
        .with_max_content_chars(500)
        .build();

    let mut llm = MockProvider::new(r#"{"score": 0.9}"#);
    llm.add_error(failing_prompt);
    let reviewer = Reviewer::new(llm).with_max_content_chars(500);

    let entries = reviewer.review_batch(&[article("1", "fine"), failing, article("3", "also fine")]);

    assert_eq!(entries.len(), 3);
    assert!(entries[0].analysis.is_some());
    assert!(entries[1].analysis.is_none());
    assert!(entries[1].error.as_deref().unwrap_or("").contains("Mock error"));
    assert_eq!(entries[2].article.id.as_str(), "3");
    assert_eq!(reviewer.provider().call_count(), 3);
}

#[test]
fn test_scan_batch_from_articles() {
    let articles = vec![
        article("1", "Call http://legacy.example and hash with md5"),
        article("2", "All traffic uses TLS"),
    ];
    let inputs: Vec<ScanInput> = articles.iter().map(ScanInput::from).collect();
    let batch = scan_batch(&inputs);

    assert_eq!(batch.total_articles, 2);
    assert_eq!(batch.articles_with_issues, 1);
    assert_eq!(batch.analyses[0].analysis.issues_found.len(), 2);
    assert_eq!(batch.analyses[0].title, "Article 1");
}
