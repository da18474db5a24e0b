//! Presentational markup for chat replies.
//!
//! Replies from the text-generation service are plain text with a few
//! markdown-ish markers. The text is HTML-escaped first, then links, bold
//! runs, list items and line breaks are converted.

use once_cell::sync::Lazy;
use regex::Regex;

const ANCHOR_ATTRS: &str = r#"target="_blank" rel="noopener noreferrer""#;

static MD_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\]]+)\]\((https?://[^)\s]+)\)").expect("static markdown link regex")
});
// A URL directly after a quote, `=`, `]` or `>` is already inside an anchor.
static BARE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(^|[^"'=\]>])(https?://[^\s<"]+)"#).expect("static url regex")
});
static BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*:?").expect("static bold regex"));
static NUMBERED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n(\d+)\. ").expect("static numbered list regex"));
static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\* ").expect("static bullet regex"));
static SUB_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]+\* ").expect("static sub-bullet regex"));

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Convert a bot reply into HTML suitable for direct rendering.
pub fn format_bot_response(text: &str) -> String {
    let html = escape_html(text);
    let html = MD_LINK.replace_all(&html, format!(r#"<a href="${{2}}" {ANCHOR_ATTRS}>${{1}}</a>"#));
    let html = BARE_URL.replace_all(
        &html,
        format!(r#"${{1}}<a href="${{2}}" {ANCHOR_ATTRS}>${{2}}</a>"#),
    );
    let html = BOLD.replace_all(&html, "<strong>${1}</strong>");
    let html = NUMBERED.replace_all(&html, "<br/><strong>${1}.</strong> ");
    let html = SUB_BULLET.replace_all(&html, "<br/>&nbsp;&nbsp;&nbsp;&bull; ");
    let html = BULLET.replace_all(&html, "<br/>&bull; ");
    html.replace('\n', "<br/>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_link_becomes_anchor() {
        let html = format_bot_response("Read [the book](https://doc.rust-lang.org/book) first");
        assert_eq!(
            html,
            r#"Read <a href="https://doc.rust-lang.org/book" target="_blank" rel="noopener noreferrer">the book</a> first"#
        );
    }

    #[test]
    fn bare_url_is_linkified_once() {
        let html = format_bot_response("see https://crates.io and [x](https://docs.rs)");
        assert_eq!(html.matches("<a ").count(), 2);
        assert!(html.contains(r#">https://crates.io</a>"#));
        assert!(html.starts_with("see <a href=\"https://crates.io\""));
    }

    #[test]
    fn url_at_start_of_text() {
        let html = format_bot_response("https://example.com");
        assert!(html.starts_with("<a href=\"https://example.com\""));
    }

    #[test]
    fn bold_and_lists() {
        let html = format_bot_response("**Steps:**\n1. Install\n2. Run\n* tip\n  * detail");
        assert_eq!(
            html,
            "<strong>Steps:</strong><br/><strong>1.</strong> Install<br/><strong>2.</strong> Run\
             <br/>&bull; tip<br/>&nbsp;&nbsp;&nbsp;&bull; detail"
        );
    }

    #[test]
    fn html_in_reply_is_escaped() {
        let html = format_bot_response("<script>alert(1)</script>");
        assert_eq!(html, "&lt;script&gt;alert(1)&lt;/script&gt;");
    }

    #[test]
    fn plain_newlines_become_breaks() {
        assert_eq!(format_bot_response("a\nb"), "a<br/>b");
    }
}
