//! Contribution model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::utils::errors::{StudioError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributionStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
}

impl ContributionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContributionStatus::Draft => "draft",
            ContributionStatus::Submitted => "submitted",
            ContributionStatus::Approved => "approved",
            ContributionStatus::Rejected => "rejected",
        }
    }

    /// Review transitions an admin may apply
    pub fn can_transition_to(&self, next: ContributionStatus) -> bool {
        use ContributionStatus::*;
        matches!(
            (self, next),
            (Draft, Submitted)
                | (Submitted, Approved)
                | (Submitted, Rejected)
                | (Approved, Rejected)
                | (Rejected, Approved)
        )
    }
}

impl std::fmt::Display for ContributionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a backend contribution item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributionKind {
    Success,
    Fail,
    Info,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub id: i64,
    pub newsletter_id: Option<i64>,
    pub newsletter_label: String,
    pub author: Option<String>,
    pub author_id: Option<i64>,
    pub title: Option<String>,
    /// Main monthly update
    pub text: String,
    pub success_story: String,
    pub fail_story: String,
    pub group_id: Option<i64>,
    pub status: ContributionStatus,
    pub created_at: DateTime<Utc>,
}

impl Contribution {
    /// Apply a review decision, enforcing the allowed transitions
    pub fn set_status(&mut self, next: ContributionStatus) -> Result<()> {
        if self.status == next {
            return Ok(());
        }
        if !self.status.can_transition_to(next) {
            return Err(StudioError::InvalidStateTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.success_story.trim().is_empty() && self.fail_story.trim().is_empty()
    }
}

/// Form payload of the collect panel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContribution {
    pub author: Option<String>,
    pub text: String,
    pub success_story: String,
    pub fail_story: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn contribution(status: ContributionStatus) -> Contribution {
        Contribution {
            id: 1,
            newsletter_id: None,
            newsletter_label: "Monthly newsletter · March 2026".to_string(),
            author: Some("GJV".to_string()),
            author_id: None,
            title: None,
            text: "Launched X".to_string(),
            success_story: String::new(),
            fail_story: String::new(),
            group_id: None,
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_review_transitions() {
        let mut c = contribution(ContributionStatus::Submitted);
        c.set_status(ContributionStatus::Approved).unwrap();
        c.set_status(ContributionStatus::Rejected).unwrap();
        assert_eq!(c.status, ContributionStatus::Rejected);

        assert_matches!(
            c.set_status(ContributionStatus::Draft),
            Err(StudioError::InvalidStateTransition { .. })
        );
    }

    #[test]
    fn test_draft_cannot_be_approved_directly() {
        let mut c = contribution(ContributionStatus::Draft);
        assert!(c.set_status(ContributionStatus::Approved).is_err());
        assert_eq!(c.status, ContributionStatus::Draft);
    }
}
