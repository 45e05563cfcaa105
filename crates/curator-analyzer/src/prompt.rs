//! LLM prompt engineering for article review

use curator_domain::Article;

/// Builds prompts asking the LLM to review one article
pub struct ReviewPromptBuilder<'a> {
    title: &'a str,
    author: Option<&'a str>,
    version: Option<&'a str>,
    content: &'a str,
    max_content_chars: Option<usize>,
}

impl<'a> ReviewPromptBuilder<'a> {
    /// Prompt for a stored article, metadata included
    pub fn for_article(article: &'a Article) -> Self {
        Self {
            title: &article.title,
            author: article.author.as_deref(),
            version: article.version.as_deref(),
            content: &article.content,
            max_content_chars: None,
        }
    }

    /// Prompt for free-standing content with no metadata
    pub fn for_content(content: &'a str) -> Self {
        Self {
            title: "Untitled",
            author: None,
            version: None,
            content,
            max_content_chars: None,
        }
    }

    /// Truncate the article body to at most `max` characters
    pub fn with_max_content_chars(mut self, max: usize) -> Self {
        self.max_content_chars = Some(max);
        self
    }

    /// Build the complete review prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(REVIEW_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str("Article Metadata:\n");
        prompt.push_str(&format!("- Title: {}\n", self.title));
        if let Some(author) = self.author {
            prompt.push_str(&format!("- Author: {}\n", author));
        }
        if let Some(version) = self.version {
            prompt.push_str(&format!("- Version: {}\n", version));
        }
        prompt.push('\n');

        prompt.push_str("Article Content:\n");
        prompt.push_str("---\n");
        prompt.push_str(self.content_excerpt());
        prompt.push_str("\n---\n\n");

        prompt.push_str(OUTPUT_FORMAT_REMINDER);
        prompt
    }

    fn content_excerpt(&self) -> &str {
        match self.max_content_chars {
            Some(max) => match self.content.char_indices().nth(max) {
                Some((idx, _)) => &self.content[..idx],
                None => self.content,
            },
            None => self.content,
        }
    }
}

const REVIEW_INSTRUCTIONS: &str = r#"You are reviewing a technical knowledge-base article.
The article below may be outdated or conflict with others.
If the information is wrong, outdated, or unclear, suggest an improved version
and explain why the original content should be updated.

Analyze the following aspects:
1. Content accuracy
2. Technical relevance
3. Clarity and readability
4. Potential conflicts with current best practice
5. Suggested updates"#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (JSON object only, no additional text):
{
  "score": 0.0-1.0,
  "issues": [
    {
      "type": "accuracy | relevance | clarity | conflict",
      "severity": "low | medium | high",
      "description": "what is wrong",
      "suggestion": "how to fix it"
    }
  ],
  "summary": "brief summary of findings",
  "suggested_updates": "proposed content updates"
}

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;
