//! HTML escaping for diagnostic strings

/// Escape text for safe embedding in HTML markup.
///
/// Encodes `&`, `<`, `>`, `"` and `'`. The ampersand is handled first so
/// entity references produced here are never re-encoded within one call.
pub fn html_escape(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#x27;"),
            c => output.push(c),
        }
    }
    output
}

/// Escape markup in text that may already be escaped.
///
/// Entity references (`&lt;`, `&#60;`, `&#x3C;`) pass through unchanged;
/// every other `&` and every `<`, `>`, `"` and `'` is encoded. Output of
/// [`html_escape`] is returned as is.
pub fn ensure_escaped(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for (idx, c) in input.char_indices() {
        match c {
            '&' if starts_entity(&input[idx + 1..]) => output.push('&'),
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#x27;"),
            c => output.push(c),
        }
    }
    output
}

/// Whether `rest` (the text after an `&`) begins a character reference.
fn starts_entity(rest: &str) -> bool {
    let Some(end) = rest.bytes().take(32).position(|b| b == b';') else {
        return false;
    };
    let body = &rest[..end];

    match body.strip_prefix('#') {
        Some(num) => match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()),
            None => !num.is_empty() && num.chars().all(|c| c.is_ascii_digit()),
        },
        None => {
            body.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
                && body.chars().all(|c| c.is_ascii_alphanumeric())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_markup() {
        assert_eq!(
            html_escape("<a href=\"x\">Tom & 'Jerry'</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(html_escape("call_function torch.relu"), "call_function torch.relu");
    }

    #[test]
    fn test_empty() {
        assert_eq!(html_escape(""), "");
    }

    #[test]
    fn test_existing_entity_is_encoded_again() {
        assert_eq!(html_escape("&lt;"), "&amp;lt;");
    }

    #[test]
    fn test_ensure_escaped_keeps_escaped_text() {
        let escaped = html_escape("<a href=\"x\">Tom & 'Jerry'</a>");
        assert_eq!(ensure_escaped(&escaped), escaped);
        assert_eq!(ensure_escaped("&#60;&#x3C;&nbsp;"), "&#60;&#x3C;&nbsp;");
    }

    #[test]
    fn test_ensure_escaped_encodes_raw_markup() {
        assert_eq!(
            ensure_escaped("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"
        );
        assert_eq!(ensure_escaped("a && b &; &#;"), "a &amp;&amp; b &amp;; &amp;#;");
    }
}
