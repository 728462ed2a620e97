//! Helper functions and utilities
//!
//! Text handling shared by the composer, the store and the directory services.

use chrono::{DateTime, Datelike, Utc};
use uuid::Uuid;

/// Label used for contributors without a usable name
pub const ANONYMOUS_CONTRIBUTOR: &str = "anonymous";

/// Ellipsis appended to truncated snippets
pub const ELLIPSIS: char = '…';

/// Generate a new request id
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Format a timestamp for display
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Label of the monthly edition for the given date, e.g. `Monthly newsletter · March 2026`
pub fn newsletter_label(date: DateTime<Utc>) -> String {
    format!("Monthly newsletter · {} {}", date.format("%B"), date.year())
}

/// Escape the five HTML-significant characters
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Trim `text` and cut it to `limit` characters, appending an ellipsis when cut.
///
/// Returns an empty string for blank input. Limits count characters, not bytes,
/// so multi-byte text is never split inside a code point.
pub fn make_snippet(text: &str, limit: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= limit {
        return trimmed.to_string();
    }

    let cut: String = trimmed.chars().take(limit).collect();
    let mut snippet = cut.trim_end().to_string();
    snippet.push(ELLIPSIS);
    snippet
}

/// Normalize a free-form name into an uppercase alphanumeric trigram
pub fn to_trigram(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(3)
        .collect::<String>()
        .to_uppercase()
}

/// Identity used to count distinct contributors: trimmed, lowercased,
/// falling back to the author id and then to the anonymous label.
pub fn contributor_identity(author: Option<&str>, author_id: Option<i64>) -> String {
    let name = author.map(str::trim).unwrap_or_default();
    if !name.is_empty() {
        return name.to_lowercase();
    }
    match author_id {
        Some(id) => format!("user#{}", id),
        None => ANONYMOUS_CONTRIBUTOR.to_string(),
    }
}

/// Return `Some(trimmed)` when the text holds anything but whitespace
pub fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x" & 'y')</script>"#),
            "&lt;script&gt;alert(&quot;x&quot; &amp; &#39;y&#39;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_make_snippet() {
        assert_eq!(make_snippet("   ", 10), "");
        assert_eq!(make_snippet("  short  ", 10), "short");
        assert_eq!(make_snippet("abcdefghij", 10), "abcdefghij");
        assert_eq!(make_snippet("abcde fghijk", 6), "abcde…");
        // multi-byte characters are counted, not bytes
        assert_eq!(make_snippet("ééééé", 3), "ééé…");
    }

    #[test]
    fn test_to_trigram() {
        assert_eq!(to_trigram("gjv"), "GJV");
        assert_eq!(to_trigram("  j-p.d  x"), "JPD");
        assert_eq!(to_trigram("--"), "");
    }

    #[test]
    fn test_contributor_identity() {
        assert_eq!(contributor_identity(Some("  Alice "), None), "alice");
        assert_eq!(contributor_identity(Some("   "), None), ANONYMOUS_CONTRIBUTOR);
        assert_eq!(contributor_identity(None, Some(7)), "user#7");
        assert_eq!(contributor_identity(None, None), ANONYMOUS_CONTRIBUTOR);
    }

    #[test]
    fn test_newsletter_label() {
        let date = Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap();
        assert_eq!(newsletter_label(date), "Monthly newsletter · March 2026");
    }
}
