//! Newsletter model

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::utils::errors::{StudioError, Result};
use crate::utils::helpers::non_blank;
use super::layout::LayoutConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsletterStatus {
    Draft,
    Collecting,
    Review,
    Approved,
    Published,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Celebrate,
    Insightful,
    Support,
}

impl ReactionKind {
    pub const ALL: [ReactionKind; 4] = [
        ReactionKind::Like,
        ReactionKind::Celebrate,
        ReactionKind::Insightful,
        ReactionKind::Support,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub author: String,
    pub text: String,
    pub posted_at: DateTime<Utc>,
}

/// Reader engagement. Counts only grow and comments are only appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Engagement {
    reactions: BTreeMap<ReactionKind, u64>,
    comments: Vec<Comment>,
}

impl Default for Engagement {
    fn default() -> Self {
        Self {
            reactions: ReactionKind::ALL.iter().map(|kind| (*kind, 0)).collect(),
            comments: Vec::new(),
        }
    }
}

impl Engagement {
    pub fn reaction_count(&self, kind: ReactionKind) -> u64 {
        self.reactions.get(&kind).copied().unwrap_or(0)
    }

    pub fn react(&mut self, kind: ReactionKind) -> u64 {
        let count = self.reactions.entry(kind).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn add_comment(&mut self, author: &str, text: &str) -> Result<&Comment> {
        let text = non_blank(text)
            .ok_or_else(|| StudioError::InvalidInput("Comment text is empty".to_string()))?;
        let author = non_blank(author).unwrap_or_else(|| "Anonymous".to_string());

        self.comments.push(Comment { author, text, posted_at: Utc::now() });
        self.comments
            .last()
            .ok_or_else(|| StudioError::InvalidInput("Comment was not stored".to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Newsletter {
    pub id: i64,
    pub title: String,
    pub date: DateTime<Utc>,
    /// Resolved group name, or the organization label when `group_id` is `None`
    pub audience: String,
    pub group_id: Option<i64>,
    pub body: String,
    pub image_url: Option<String>,
    pub status: NewsletterStatus,
    pub period: Option<String>,
    pub layout: Option<LayoutConfig>,
    pub engagement: Engagement,
}

impl Newsletter {
    /// Summary attached by the backend AI draft, when one was produced
    pub fn ai_summary(&self) -> Option<&str> {
        self.layout.as_ref()?.ai_summary.as_deref()
    }

    /// Note left by the backend when the AI draft fell back to a deterministic layout
    pub fn draft_note(&self) -> Option<&str> {
        self.layout.as_ref()?.note.as_deref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNewsletterRequest {
    pub title: String,
    pub group_id: Option<i64>,
    pub period: Option<String>,
}
