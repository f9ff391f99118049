/// Decode the HTML entities the text generator tends to emit for markup.
///
/// Only the five basic entities are handled; `&amp;` is decoded last so an
/// escaped entity such as `&amp;lt;` becomes `&lt;` rather than `<`.
pub fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_markup_entities() {
        assert_eq!(
            decode_entities("&lt;h1&gt;T&iacute;tulo&lt;/h1&gt;"),
            "<h1>T&iacute;tulo</h1>"
        );
        assert_eq!(
            decode_entities("&lt;a href=&quot;/x&quot; title=&#39;y&#39;&gt;"),
            "<a href=\"/x\" title='y'>"
        );
    }

    #[test]
    fn ampersand_decoded_last() {
        assert_eq!(decode_entities("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }
}
