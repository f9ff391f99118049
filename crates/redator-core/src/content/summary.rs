use std::sync::OnceLock;

use regex::Regex;

use super::decode_entities;

/// Maximum length, in characters, of a post summary and meta description.
pub const SUMMARY_LENGTH: usize = 160;

static TAG: OnceLock<Regex> = OnceLock::new();
static WHITESPACE: OnceLock<Regex> = OnceLock::new();

/// Visible text of an HTML fragment, whitespace collapsed.
pub fn plain_text(html: &str) -> String {
    let tag = TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));
    let whitespace = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

    let text = decode_entities(&tag.replace_all(html, " "));
    whitespace.replace_all(&text, " ").trim().to_string()
}

/// First [`SUMMARY_LENGTH`] characters of the fragment's visible text.
pub fn summarize(html: &str) -> String {
    plain_text(html).chars().take(SUMMARY_LENGTH).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markup() {
        assert_eq!(
            plain_text("<h1>Receitas</h1><p>Pratos <strong>veganos</strong> &amp; baratos</p>"),
            "Receitas Pratos veganos & baratos"
        );
    }

    #[test]
    fn truncates_on_character_boundaries() {
        let html = format!("<p>{}</p>", "ç".repeat(400));
        let summary = summarize(&html);
        assert_eq!(summary.chars().count(), SUMMARY_LENGTH);
        assert!(summary.chars().all(|c| c == 'ç'));
    }

    #[test]
    fn short_content_is_kept_whole() {
        assert_eq!(summarize("<p>curto</p>"), "curto");
    }
}
