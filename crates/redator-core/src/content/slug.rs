use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Derive a URL-safe slug from a human-readable title.
///
/// Lower-cases, folds accented letters to their base letter, drops anything
/// outside `[a-z0-9-]` and whitespace, then turns each whitespace run into a
/// single hyphen. Existing hyphens are kept as-is, so the function is
/// idempotent. Uniqueness is the caller's concern.
pub fn slugify(input: &str) -> String {
    let folded: String = input
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || c.is_whitespace())
        .collect();

    let mut slug = String::with_capacity(folded.len());
    let mut in_whitespace = false;
    for c in folded.trim().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            slug.push(c);
            in_whitespace = false;
        }
    }

    slug
}
