use cash_expr::to_display_string;
use serde_json::Value;

/// Escapes text for HTML element content and quoted attribute values.
/// `&` is replaced first so entities produced by later replacements stay intact.
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Converts a value to its display string (`null` is empty) and escapes it.
pub fn escape_html(value: &Value) -> String {
    escape_text(&to_display_string(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escapes_all_five_characters() {
        assert_eq!(
            escape_html(&json!(r#"<a href="x">Tom & 'Jerry'</a>"#)),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_existing_entities_are_escaped_once() {
        assert_eq!(escape_text("&lt;"), "&amp;lt;");
    }

    #[test]
    fn test_plain_text_is_unchanged() {
        assert_eq!(escape_text("Hello world 42"), "Hello world 42");
    }

    #[test]
    fn test_non_string_values() {
        assert_eq!(escape_html(&Value::Null), "");
        assert_eq!(escape_html(&json!(3)), "3");
        assert_eq!(escape_html(&json!(false)), "false");
        assert_eq!(escape_html(&json!(["<", ">"])), "&lt;,&gt;");
    }
}
