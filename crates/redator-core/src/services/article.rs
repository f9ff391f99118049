//! Article generation from a keyword.

use std::sync::Arc;
use std::time::Instant;

use crate::content::decode_entities;
use crate::error::DomainError;
use crate::ports::{CompletionRequest, TextGenerationClient};

const SYSTEM_PROMPT: &str = "You are an expert SEO content writer. Generate articles in Brazilian \
Portuguese with proper HTML structure, following Google's SEO guidelines. Include proper heading \
hierarchy, structured data, and semantic HTML markup.";

const ARTICLE_PROMPT: &str = "Write an article in Brazilian Portuguese (português do Brasil) following this exact HTML structure:

1. Start with an engaging introduction paragraph
2. Use proper heading hierarchy (H2, H3) for sections
3. Include structured data markup
4. Format the content following this template:

<h1>[Main Title]</h1>
<p>[Introduction paragraph with engaging hook and overview]</p>

<h2>[First Main Section]</h2>
<p>[Content with relevant information]</p>

<h3>[Subsection if needed]</h3>
<p>[Detailed explanation]</p>

<h2>[Second Main Section]</h2>
<p>[More content with facts and data]</p>

<h2>[Third Main Section]</h2>
<p>[Additional content]</p>

<h2>Conclusão</h2>
<p>[Concluding paragraph with key takeaways]</p>

Requirements:
- Write in clear, engaging Brazilian Portuguese
- Use proper HTML tags for structure
- Include relevant internal links using <a> tags
- Optimize headings for SEO
- Maintain E-E-A-T principles throughout
- Keep paragraphs concise and well-structured
- Use proper heading hierarchy (H1 -> H2 -> H3)

Topic/Keyword: ";

pub const ARTICLE_TEMPERATURE: f32 = 0.7;
pub const ARTICLE_MAX_TOKENS: u32 = 2000;

/// Generates SEO articles in Brazilian Portuguese from a keyword or title.
#[derive(Clone)]
pub struct ArticleGenerator {
    client: Arc<dyn TextGenerationClient>,
}

impl ArticleGenerator {
    pub fn new(client: Arc<dyn TextGenerationClient>) -> Self {
        Self { client }
    }

    /// Build the completion request for a keyword.
    pub fn request_for(keyword: &str) -> CompletionRequest {
        CompletionRequest {
            system: SYSTEM_PROMPT.to_string(),
            prompt: format!("{ARTICLE_PROMPT}{keyword}"),
            temperature: ARTICLE_TEMPERATURE,
            max_tokens: ARTICLE_MAX_TOKENS,
        }
    }

    /// Generate an article body for `keyword`.
    ///
    /// The returned HTML has its markup entities decoded but is otherwise
    /// untouched; heading structure is requested, not verified. Run it
    /// through [`crate::content::sanitize`] before display or storage.
    pub async fn generate_article(&self, keyword: &str) -> Result<String, DomainError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(DomainError::InvalidInput(
                "keyword or title must not be empty".to_string(),
            ));
        }

        let start = Instant::now();
        let raw = self
            .client
            .complete(Self::request_for(keyword))
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Article generation failed");
                DomainError::from(e)
            })?;

        tracing::info!(
            keyword_chars = keyword.chars().count(),
            output_chars = raw.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Article generated"
        );

        Ok(decode_entities(&raw))
    }
}
