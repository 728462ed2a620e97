//! Draft composer
//!
//! Turns the contributions of one edition into a starting-point newsletter
//! body. Output is deterministic: the same contributions and label always
//! produce the same bytes. Every piece of author text goes through
//! [`escape_html`] before landing in HTML output.

use crate::config::{ComposerConfig, DraftFormat};
use crate::models::Contribution;
use crate::utils::helpers::{escape_html, make_snippet};

const EMPTY_PLACEHOLDER: [&str; 2] = [
    "No contributions yet.",
    "Invite your teams to share this month's highlights in the Collect tab.",
];
const INTRO: &str = "Hello everyone, this edition gathers the month's highlights, based on the contributions sent in by the teams.";
const HIGHLIGHTS_HEADING: &str = "Highlights of the month";
const SUCCESS_HEADING: &str = "Success stories";
const FAIL_HEADING: &str = "Fail stories worth sharing";
const NO_DETAIL: &str = "No detailed contribution for this edition. Invite your teams to fill in the Collect form.";
const CLOSING_HEADING: &str = "Takeaways for the teams";
const CLOSING: &str = "Thank you to every team for the time spent documenting these items and for the quality of the feedback shared. Feel free to reply to this newsletter with additions or questions.";

/// One titled list of snippets
#[derive(Debug, Clone, PartialEq)]
pub struct DraftSection {
    pub heading: &'static str,
    pub items: Vec<String>,
}

/// Structured draft before rendering. Item text is raw (unescaped).
#[derive(Debug, Clone, PartialEq)]
pub enum DraftDocument {
    Placeholder,
    Edition {
        title: String,
        sections: Vec<DraftSection>,
    },
}

#[derive(Debug, Clone)]
pub struct DraftComposer {
    format: DraftFormat,
    highlight_limit: usize,
    story_limit: usize,
    fallback_title: String,
}

impl DraftComposer {
    pub fn new(config: &ComposerConfig) -> Self {
        Self {
            format: config.format,
            highlight_limit: config.highlight_limit,
            story_limit: config.story_limit,
            fallback_title: config.fallback_title.clone(),
        }
    }

    pub fn format(&self) -> DraftFormat {
        self.format
    }

    /// Build the structured draft for `contributions`, in input order
    pub fn build<'a, I>(&self, contributions: I, label: &str) -> DraftDocument
    where
        I: IntoIterator<Item = &'a Contribution>,
    {
        let contributions: Vec<&Contribution> = contributions.into_iter().collect();
        if contributions.is_empty() {
            return DraftDocument::Placeholder;
        }

        let snippets = |field: fn(&Contribution) -> &str, limit: usize| -> Vec<String> {
            contributions
                .iter()
                .map(|c| make_snippet(field(*c), limit))
                .filter(|s| !s.is_empty())
                .collect()
        };

        let sections = [
            (HIGHLIGHTS_HEADING, snippets(|c| c.text.as_str(), self.highlight_limit)),
            (SUCCESS_HEADING, snippets(|c| c.success_story.as_str(), self.story_limit)),
            (FAIL_HEADING, snippets(|c| c.fail_story.as_str(), self.story_limit)),
        ]
        .into_iter()
        .filter(|(_, items)| !items.is_empty())
        .map(|(heading, items)| DraftSection { heading, items })
        .collect();

        let title = match label.trim() {
            "" => self.fallback_title.clone(),
            trimmed => trimmed.to_string(),
        };

        DraftDocument::Edition { title, sections }
    }

    /// Render the draft in the configured format
    pub fn compose<'a, I>(&self, contributions: I, label: &str) -> String
    where
        I: IntoIterator<Item = &'a Contribution>,
    {
        let document = self.build(contributions, label);
        match self.format {
            DraftFormat::Html => render_html(&document),
            DraftFormat::PlainText => render_plain(&document),
        }
    }
}

fn render_html(document: &DraftDocument) -> String {
    let (title, sections) = match document {
        DraftDocument::Placeholder => {
            return EMPTY_PLACEHOLDER.iter().map(|line| format!("<p>{}</p>", line)).collect();
        }
        DraftDocument::Edition { title, sections } => (title, sections),
    };

    let mut parts = vec![
        format!("<h1>{}</h1>", escape_html(title)),
        format!("<p class=\"nl-intro\">{}</p>", INTRO),
    ];

    for section in sections {
        let items: String = section
            .items
            .iter()
            .map(|item| format!("<li>{}</li>", escape_html(item)))
            .collect();
        parts.push(format!("<h2>{}</h2>", section.heading));
        parts.push(format!("<ul>{}</ul>", items));
    }

    if sections.is_empty() {
        parts.push(format!("<p>{}</p>", NO_DETAIL));
    }

    parts.push(format!("<h2>{}</h2>", CLOSING_HEADING));
    parts.push(format!("<p>{}</p>", CLOSING));
    parts.concat()
}

fn render_plain(document: &DraftDocument) -> String {
    let (title, sections) = match document {
        DraftDocument::Placeholder => return EMPTY_PLACEHOLDER.join("\n"),
        DraftDocument::Edition { title, sections } => (title, sections),
    };

    let mut blocks = vec![title.clone(), INTRO.to_string()];

    for section in sections {
        let mut block = section.heading.to_string();
        for item in &section.items {
            block.push_str("\n- ");
            block.push_str(item);
        }
        blocks.push(block);
    }

    if sections.is_empty() {
        blocks.push(NO_DETAIL.to_string());
    }

    blocks.push(format!("{}\n{}", CLOSING_HEADING, CLOSING));
    blocks.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crate::config::Settings;
    use crate::models::ContributionStatus;

    fn composer(format: DraftFormat) -> DraftComposer {
        let mut config = Settings::default().composer;
        config.format = format;
        DraftComposer::new(&config)
    }

    fn contribution(text: &str, success: &str, fail: &str) -> Contribution {
        Contribution {
            id: 1,
            newsletter_id: None,
            newsletter_label: "Monthly newsletter · March 2026".to_string(),
            author: Some("GJV".to_string()),
            author_id: None,
            title: None,
            text: text.to_string(),
            success_story: success.to_string(),
            fail_story: fail.to_string(),
            group_id: None,
            status: ContributionStatus::Submitted,
            created_at: Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_empty_input_ignores_label() {
        let html = composer(DraftFormat::Html);
        let none: Vec<Contribution> = Vec::new();
        let a = html.compose(&none, "March");
        let b = html.compose(&none, "");
        assert_eq!(a, b);
        assert_eq!(a, "<p>No contributions yet.</p><p>Invite your teams to share this month's highlights in the Collect tab.</p>");
    }

    #[test]
    fn test_sections_follow_non_empty_fields() {
        let html = composer(DraftFormat::Html);
        let contributions = vec![contribution("Launched X", "", "Y broke")];
        let draft = html.compose(&contributions, "Monthly newsletter · March 2026");

        assert!(draft.starts_with("<h1>Monthly newsletter · March 2026</h1>"));
        assert!(draft.contains("<h2>Highlights of the month</h2><ul><li>Launched X</li></ul>"));
        assert!(draft.contains("<h2>Fail stories worth sharing</h2><ul><li>Y broke</li></ul>"));
        assert!(!draft.contains(SUCCESS_HEADING));
        assert!(!draft.contains(NO_DETAIL));
        assert!(draft.ends_with(&format!("<p>{}</p>", CLOSING)));
    }

    #[test]
    fn test_blank_fields_yield_explanatory_sentence() {
        let html = composer(DraftFormat::Html);
        let contributions = vec![contribution("  ", "", "\n")];
        let draft = html.compose(&contributions, "");

        assert!(draft.starts_with("<h1>Internal newsletter</h1>"));
        assert!(draft.contains(NO_DETAIL));
        assert!(!draft.contains("<ul>"));
    }

    #[test]
    fn test_author_text_is_escaped() {
        let html = composer(DraftFormat::Html);
        let contributions = vec![contribution("<script>alert('x')</script>", "a & b", "\"quoted\"")];
        let draft = html.compose(&contributions, "<b>Label</b>");

        assert!(!draft.contains("<script>"));
        assert!(!draft.contains("<b>"));
        assert!(draft.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(draft.contains("a &amp; b"));
        assert!(draft.contains("&quot;quoted&quot;"));
    }

    #[test]
    fn test_snippet_limits() {
        let html = composer(DraftFormat::Html);
        let long_text = "a".repeat(300);
        let long_story = "b".repeat(300);
        let contributions = vec![contribution(&long_text, &long_story, "")];
        let draft = html.compose(&contributions, "March");

        assert!(draft.contains(&format!("<li>{}…</li>", "a".repeat(260))));
        assert!(draft.contains(&format!("<li>{}…</li>", "b".repeat(220))));
    }

    #[test]
    fn test_compose_is_idempotent() {
        let html = composer(DraftFormat::Html);
        let contributions = vec![
            contribution("Launched X", "Cut latency", ""),
            contribution("Hired two people", "", "Migration slipped"),
        ];
        assert_eq!(html.compose(&contributions, "March"), html.compose(&contributions, "March"));
    }

    #[test]
    fn test_plain_text_format() {
        let plain = composer(DraftFormat::PlainText);
        let contributions = vec![contribution("Launched X", "", "Y broke")];
        let draft = plain.compose(&contributions, "March");

        assert!(draft.starts_with("March\n\n"));
        assert!(draft.contains("Highlights of the month\n- Launched X"));
        assert!(draft.contains("Fail stories worth sharing\n- Y broke"));
        assert!(!draft.contains('<'));

        let none: Vec<Contribution> = Vec::new();
        assert_eq!(plain.compose(&none, "March").lines().count(), 2);
    }
}
