//! Layout editor
//!
//! Derives the editable lead and blocks of a newsletter from its stored
//! layout document, and applies block edits before the layout is saved.
//!
//! The lead comes from the first non-empty of `lead`, `ai_summary` and
//! `note`. Blocks come from the stored editor blocks, else from the AI draft
//! sections, else from the approved contributions of the edition.

use serde::Serialize;
use uuid::Uuid;

use crate::models::{Contribution, ContributionStatus, LayoutBlock, LayoutConfig, Newsletter, NewsletterLayout};
use crate::utils::errors::{StudioError, Result};

/// Lead shown when the layout document has none
pub const DEFAULT_LEAD: &str = "Short intro: recall the purpose of the newsletter and thank the contributors.";

const NEW_BLOCK_HEADING: &str = "New block";
const NEW_BLOCK_BODY: &str = "Add your text here.";

/// Editable text field of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockField {
    Heading,
    Body,
}

fn filled(text: &Option<String>) -> Option<&str> {
    text.as_deref().filter(|t| !t.trim().is_empty())
}

/// Lead text of a layout document, if it has one
pub fn extract_lead(config: Option<&LayoutConfig>) -> Option<String> {
    let config = config?;
    filled(&config.lead)
        .or_else(|| filled(&config.ai_summary))
        .or_else(|| filled(&config.note))
        .map(str::to_string)
}

/// Approved contributions that belong to `newsletter`
pub fn approved_contributions<'a>(newsletter: &Newsletter, contributions: &'a [Contribution]) -> Vec<&'a Contribution> {
    contributions
        .iter()
        .filter(|c| c.status == ContributionStatus::Approved)
        .filter(|c| match c.newsletter_id {
            Some(id) => id == newsletter.id,
            None => newsletter.period.as_deref() == Some(c.newsletter_label.as_str()),
        })
        .collect()
}

fn contribution_kind(contribution: &Contribution) -> &'static str {
    let fields = [
        (!contribution.text.trim().is_empty(), "Update"),
        (!contribution.success_story.trim().is_empty(), "Success story"),
        (!contribution.fail_story.trim().is_empty(), "Fail story"),
    ];
    let mut present = fields.iter().filter(|(present, _)| *present);
    match (present.next(), present.next()) {
        (Some((_, kind)), None) => kind,
        _ => "Contribution",
    }
}

fn contribution_block(contribution: &Contribution) -> LayoutBlock {
    let kind = contribution_kind(contribution);
    let heading = match filled(&contribution.title) {
        Some(title) => format!("{} · {}", kind, title),
        None => kind.to_string(),
    };
    let body = [&contribution.text, &contribution.success_story, &contribution.fail_story]
        .iter()
        .map(|text| text.trim())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    LayoutBlock { id: contribution.id.to_string(), heading, body, tone: None }
}

/// Editable blocks of a layout document, falling back to `approved` contributions
pub fn extract_blocks(config: Option<&LayoutConfig>, approved: &[&Contribution]) -> Vec<LayoutBlock> {
    if let Some(blocks) = config.and_then(|c| c.blocks.as_ref()) {
        return blocks
            .iter()
            .enumerate()
            .map(|(index, block)| LayoutBlock {
                id: block.id.clone().unwrap_or_else(|| format!("block-{}", index)),
                heading: block.heading.clone().unwrap_or_else(|| format!("Block {}", index + 1)),
                body: block.body.clone().unwrap_or_default(),
                tone: block.tone.clone(),
            })
            .collect();
    }

    if let Some(sections) = config.and_then(|c| c.sections.as_ref()) {
        return sections
            .iter()
            .enumerate()
            .map(|(index, section)| {
                let body = section
                    .items
                    .iter()
                    .map(|item| {
                        let content = item.content.as_deref().unwrap_or_default();
                        match filled(&item.title) {
                            Some(title) => format!("{}: {}", title, content).trim().to_string(),
                            None => content.trim().to_string(),
                        }
                    })
                    .filter(|line| !line.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n");

                LayoutBlock {
                    id: section.id.clone().unwrap_or_else(|| format!("section-{}", index)),
                    heading: section
                        .heading
                        .clone()
                        .or_else(|| section.title.clone())
                        .unwrap_or_else(|| format!("Section {}", index + 1)),
                    body,
                    tone: None,
                }
            })
            .collect();
    }

    approved.iter().map(|c| contribution_block(c)).collect()
}

/// Layout of one newsletter being edited
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutEditor {
    pub newsletter_id: i64,
    pub lead: String,
    pub blocks: Vec<LayoutBlock>,
}

impl LayoutEditor {
    pub fn open(newsletter: &Newsletter, contributions: &[Contribution]) -> Self {
        let config = newsletter.layout.as_ref();
        let approved = approved_contributions(newsletter, contributions);

        Self {
            newsletter_id: newsletter.id,
            lead: extract_lead(config).unwrap_or_else(|| DEFAULT_LEAD.to_string()),
            blocks: extract_blocks(config, &approved),
        }
    }

    fn position(&self, block_id: &str) -> Result<usize> {
        self.blocks
            .iter()
            .position(|b| b.id == block_id)
            .ok_or_else(|| StudioError::LayoutBlockNotFound { block_id: block_id.to_string() })
    }

    pub fn set_lead(&mut self, lead: String) {
        self.lead = lead;
    }

    pub fn update_block(&mut self, block_id: &str, field: BlockField, value: String) -> Result<()> {
        let index = self.position(block_id)?;
        let block = &mut self.blocks[index];
        match field {
            BlockField::Heading => block.heading = value,
            BlockField::Body => block.body = value,
        }
        Ok(())
    }

    /// Move a block by `offset` positions. Moving past either end leaves the
    /// order unchanged and returns `false`.
    pub fn move_block(&mut self, block_id: &str, offset: isize) -> Result<bool> {
        let index = self.position(block_id)?;
        let target = match index.checked_add_signed(offset) {
            Some(target) if target < self.blocks.len() => target,
            _ => return Ok(false),
        };

        let block = self.blocks.remove(index);
        self.blocks.insert(target, block);
        Ok(true)
    }

    /// Append a placeholder block and return its id
    pub fn add_block(&mut self) -> String {
        let id = format!("block-{}", Uuid::new_v4().simple());
        self.blocks.push(LayoutBlock {
            id: id.clone(),
            heading: NEW_BLOCK_HEADING.to_string(),
            body: NEW_BLOCK_BODY.to_string(),
            tone: None,
        });
        id
    }

    pub fn delete_block(&mut self, block_id: &str) -> Result<LayoutBlock> {
        let index = self.position(block_id)?;
        Ok(self.blocks.remove(index))
    }

    /// Payload of the layout save
    pub fn to_layout(&self) -> NewsletterLayout {
        let lead = self.lead.trim();
        NewsletterLayout {
            lead: (!lead.is_empty()).then(|| lead.to_string()),
            blocks: self.blocks.clone(),
        }
    }
}
