//! Newsletter layout model
//!
//! `LayoutConfig` is the layout document the backend keeps per newsletter.
//! Depending on who wrote it last it carries editor blocks, AI draft sections,
//! an AI summary or a fallback note; every part is optional but typed.
//! `NewsletterLayout` is what the layout editor saves back.

use serde::{Deserialize, Serialize};

/// One editable block of the newsletter layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutBlock {
    pub id: String,
    pub heading: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
}

/// Block structure and lead text persisted by the layout editor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsletterLayout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead: Option<String>,
    pub blocks: Vec<LayoutBlock>,
}

/// Block as stored by the editor; older documents may omit any field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredBlock {
    pub id: Option<String>,
    pub heading: Option<String>,
    pub body: Option<String>,
    pub tone: Option<String>,
}

/// Item of an AI draft section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionItem {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author_id: Option<i64>,
    pub status: Option<String>,
}

/// Contributions of one type grouped by the AI draft
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSection {
    pub id: Option<String>,
    pub heading: Option<String>,
    pub title: Option<String>,
    pub items: Vec<SectionItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<StoredBlock>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<LayoutSection>>,
}

impl From<NewsletterLayout> for LayoutConfig {
    fn from(layout: NewsletterLayout) -> Self {
        let blocks = layout
            .blocks
            .into_iter()
            .map(|b| StoredBlock { id: Some(b.id), heading: Some(b.heading), body: Some(b.body), tone: b.tone })
            .collect();

        Self {
            lead: layout.lead,
            blocks: Some(blocks),
            ..Self::default()
        }
    }
}
