//! HTML helpers: escaping for rendered pages and extraction of advice items
//! from the recommendation markup echoed back by the report link.
//!
//! The markup arrives from a query string, so it is untrusted. Input is capped
//! at [`MAX_MARKUP_BYTES`] before any regex runs.

use regex::Regex;
use std::sync::OnceLock;

/// Largest markup accepted by [`extract_actions`]; the rest is dropped.
pub const MAX_MARKUP_BYTES: usize = 16 * 1024;

struct MarkupPatterns {
    list_item: Regex,
    tag: Regex,
}

static PATTERNS: OnceLock<MarkupPatterns> = OnceLock::new();

fn patterns() -> &'static MarkupPatterns {
    PATTERNS.get_or_init(|| MarkupPatterns {
        list_item: Regex::new(r"(?is)<li[^>]*>(.*?)</li>").expect("Valid regex"),
        tag: Regex::new(r"(?s)<[^>]*>").expect("Valid regex"),
    })
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> &str {
    if input.len() <= max_bytes {
        return input;
    }
    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    &input[..end]
}

/// Escape text for HTML element content and double-quoted attributes.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape_html(input: &str) -> String {
    input
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Remove tags and decode the entities [`escape_html`] produces.
#[must_use]
pub fn strip_tags(input: &str) -> String {
    let text = patterns().tag.replace_all(input, "");
    unescape_html(&text)
}

fn clean(fragment: &str) -> Option<String> {
    let text = strip_tags(fragment);
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!text.is_empty()).then_some(text)
}

/// Pull plain-text action lines out of recommendation markup.
///
/// Every `<li>` item becomes one action. Markup without list items is split
/// on line breaks instead, so plain text works too.
#[must_use]
pub fn extract_actions(markup: &str) -> Vec<String> {
    let markup = truncate_to_char_boundary(markup, MAX_MARKUP_BYTES);
    let p = patterns();

    let items: Vec<String> = p
        .list_item
        .captures_iter(markup)
        .filter_map(|c| c.get(1).and_then(|m| clean(m.as_str())))
        .collect();
    if !items.is_empty() {
        return items;
    }

    markup
        .replace("<br>", "\n")
        .replace("<br/>", "\n")
        .replace("<br />", "\n")
        .lines()
        .filter_map(clean)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_items_become_actions() {
        let markup = r#"<ul><li class="text-orange-500"><b>Nitrogen</b> is low &amp; needs urea</li>
            <li>pH is ideal</li><li>   </li></ul>"#;
        assert_eq!(
            extract_actions(markup),
            vec!["Nitrogen is low & needs urea", "pH is ideal"]
        );
    }

    #[test]
    fn test_plain_text_falls_back_to_lines() {
        let markup = "Add compost\n\n  Reduce lime <br> Water weekly";
        assert_eq!(
            extract_actions(markup),
            vec!["Add compost", "Reduce lime", "Water weekly"]
        );
    }

    #[test]
    fn test_empty_markup_has_no_actions() {
        assert!(extract_actions("").is_empty());
        assert!(extract_actions("<ul></ul>").is_empty());
    }

    #[test]
    fn test_escape_round_trips_through_strip() {
        let raw = r#"<script>alert("x")</script> & 'q'"#;
        let escaped = escape_html(raw);
        assert!(!escaped.contains('<'));
        assert_eq!(strip_tags(&escaped), raw);
    }

    #[test]
    fn test_oversized_markup_is_truncated() {
        let item = "<li>x</li>";
        let markup = item.repeat(MAX_MARKUP_BYTES / item.len() + 100);
        assert_eq!(extract_actions(&markup).len(), MAX_MARKUP_BYTES / item.len());
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let s = "é".repeat(10);
        assert_eq!(truncate_to_char_boundary(&s, 5), "éé");
    }
}
