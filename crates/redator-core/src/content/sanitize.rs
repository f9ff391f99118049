//! Cleanup and allow-list sanitization of generated HTML.
//!
//! Generated articles arrive with artifacts that do not belong in a post:
//! markdown fences around the markup, trailing notes addressed to the
//! requester, tags that were escaped into visible text, stray backticks.
//! [`sanitize`] strips those, then re-serializes the fragment through an
//! allow-list so only structural markup survives. It runs before preview,
//! before storage, and again at public render time.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::OnceLock;

use ammonia::Builder;
use regex::Regex;
use serde::Serialize;

/// HTML that has been through [`sanitize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SafeHtml(String);

impl SafeHtml {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for SafeHtml {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SafeHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<SafeHtml> for String {
    fn from(html: SafeHtml) -> Self {
        html.0
    }
}

/// Upper bound on cleanup passes; ordinary input settles after two.
const MAX_PASSES: usize = 4;

static ARTIFACT_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
static WHITESPACE: OnceLock<Regex> = OnceLock::new();
static CLEANER: OnceLock<Builder<'static>> = OnceLock::new();

fn artifact_patterns() -> &'static [Regex] {
    ARTIFACT_PATTERNS.get_or_init(|| {
        [
            // Markdown fence delimiters, with or without a language tag
            r"```[A-Za-z0-9_-]*",
            // Notes the model appends after the article body
            r"(?s)Note: This HTML structure.*?principles\.",
            r"(?s)If you need to reference.*?endLine: \d+`?\s*$",
            // Tags escaped into visible text
            r"(?s)&lt;/?[A-Za-z][^&]*?&gt;",
            r"`",
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("valid artifact pattern"))
        .collect()
    })
}

fn whitespace() -> &'static Regex {
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace pattern"))
}

fn cleaner() -> &'static Builder<'static> {
    CLEANER.get_or_init(|| {
        let mut builder = Builder::empty();
        builder
            .tags(HashSet::from([
                "p",
                "h1",
                "h2",
                "h3",
                "h4",
                "a",
                "strong",
                "em",
                "b",
                "i",
                "u",
                "s",
                "ul",
                "ol",
                "li",
                "blockquote",
                "br",
                "hr",
                "code",
                "pre",
                "img",
            ]))
            .clean_content_tags(HashSet::from(["script", "style"]))
            .tag_attributes(HashMap::from([
                ("a", HashSet::from(["href", "title"])),
                ("img", HashSet::from(["src", "alt", "title"])),
            ]))
            .url_schemes(HashSet::from(["http", "https", "mailto"]))
            .link_rel(Some("noopener noreferrer"));
        builder
    })
}

/// Remove generator artifacts and collapse whitespace.
fn strip_artifacts(raw: &str) -> String {
    let stripped = artifact_patterns()
        .iter()
        .fold(raw.to_string(), |text, pattern| {
            pattern.replace_all(&text, "").into_owned()
        });

    whitespace().replace_all(&stripped, " ").trim().to_string()
}

/// Turn untrusted generated text into allow-listed HTML.
///
/// Scripts, styles, event handlers, and any element or attribute outside the
/// allow-list are dropped. Malformed markup never fails: the HTML5 parser
/// recovers and whatever cannot be read as markup is emitted as escaped text.
/// The function is idempotent.
pub fn sanitize(raw: &str) -> SafeHtml {
    let mut html = clean_once(raw);

    // Character references such as `&#60;b&#62;` only become strippable
    // artifacts after the cleaner decodes and re-escapes them, so repeat
    // until a pass changes nothing.
    for _ in 1..MAX_PASSES {
        let next = clean_once(&html);
        if next == html {
            break;
        }
        html = next;
    }

    SafeHtml(html)
}

fn clean_once(text: &str) -> String {
    cleaner().clean(&strip_artifacts(text)).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scripts_and_handlers() {
        let out = sanitize(r#"<p onclick="x()">Hi<script>bad()</script></p>"#);
        assert!(out.as_str().contains("<p>Hi</p>"));
        assert!(!out.as_str().contains("script"));
        assert!(!out.as_str().contains("onclick"));
        assert!(!out.as_str().contains("bad()"));
    }

    #[test]
    fn preserves_allow_listed_structure() {
        let input = "<h1>Título</h1><h2>Seção</h2><h3>Sub</h3>\
                     <p><strong>forte</strong> e <em>ênfase</em></p>\
                     <ul><li>um</li><li>dois</li></ul>";
        let out = sanitize(input);
        assert_eq!(out.as_str(), input);
    }

    #[test]
    fn links_keep_href_and_gain_rel() {
        let out = sanitize(r#"<a href="https://exemplo.com.br/receitas" onmouseover="x()">ver</a>"#);
        assert_eq!(
            out.as_str(),
            r#"<a href="https://exemplo.com.br/receitas" rel="noopener noreferrer">ver</a>"#
        );
    }

    #[test]
    fn drops_javascript_urls() {
        let out = sanitize(r#"<a href="javascript:alert(1)">x</a>"#);
        assert!(!out.as_str().contains("javascript"));
    }

    #[test]
    fn removes_markdown_fences() {
        let out = sanitize("```html\n<h1>Receitas</h1>\n<p>Texto</p>\n```");
        assert_eq!(out.as_str(), "<h1>Receitas</h1> <p>Texto</p>");
    }

    #[test]
    fn removes_trailing_meta_commentary() {
        let raw = "<p>Corpo</p>\n\nNote: This HTML structure follows SEO and E-E-A-T principles.";
        assert_eq!(sanitize(raw).as_str(), "<p>Corpo</p>");
    }

    #[test]
    fn removes_escaped_tags_and_backticks() {
        let out = sanitize("<p>Use `&lt;div&gt;` com cuidado</p>");
        assert_eq!(out.as_str(), "<p>Use com cuidado</p>");
    }

    #[test]
    fn removes_tags_escaped_as_character_references() {
        assert_eq!(sanitize("<p>use &#60;b&#62; aqui</p>").as_str(), "<p>use aqui</p>");
        assert_eq!(
            sanitize("<p>crase &#96;solta</p>").as_str(),
            "<p>crase solta</p>"
        );
    }

    #[test]
    fn collapses_whitespace() {
        let out = sanitize("<p>muito\n\n   espaço\t aqui</p>");
        assert_eq!(out.as_str(), "<p>muito espaço aqui</p>");
    }

    #[test]
    fn malformed_fragment_degrades_instead_of_failing() {
        let out = sanitize("<p>aberto <strong>sem fechar");
        assert_eq!(out.as_str(), "<p>aberto <strong>sem fechar</strong></p>");
    }

    #[test]
    fn is_idempotent() {
        let samples = [
            r#"<p onclick="x()">Hi<script>bad()</script></p>"#,
            "```html\n<h1>A & B</h1><p>x < y</p>```",
            r#"<a href="https://exemplo.com">link</a><img src="https://exemplo.com/a.png" alt="a">"#,
            "<div><span>sem tags permitidas</span></div>",
            "texto puro com \"aspas\" e 'apóstrofos'",
            "<p>use &#60;b&#62; aqui</p>",
            "<p>crase &#96;codigo&#96; solta</p>",
            "<p>&#x3C;div&#x3E; e &ltspan&gt; e &#38;lt;i&#38;gt;</p>",
        ];
        for sample in samples {
            let once = sanitize(sample);
            let twice = sanitize(once.as_str());
            assert_eq!(once, twice, "not idempotent for {sample:?}");
        }
    }
}
