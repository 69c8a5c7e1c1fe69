//! Minimal HTML escaping for user-supplied text.

/// Escapes `&`, `<`, `>`, `"` and `'` so the text is inert when rendered
/// as HTML.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(escape_html("hello world"), "hello world");
    }

    #[test]
    fn markup_is_escaped() {
        assert_eq!(
            escape_html(r#"<script>alert("x")</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt;"
        );
    }

    #[test]
    fn ampersand_is_escaped_once() {
        assert_eq!(escape_html("a & b's <i>"), "a &amp; b&#39;s &lt;i&gt;");
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
    }
}
