//! Backend wire payloads
//!
//! Field names follow the backend's snake_case convention. Required fields are
//! required here too: a payload of the wrong shape fails to decode instead of
//! producing half-filled records.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use crate::models::{
    Contribution, ContributionKind, ContributionStatus, Engagement, Group, GroupMembership, LayoutConfig, NewContribution,
    Newsletter, NewsletterStatus, Role, User,
};
use crate::utils::errors::{GatewayError, GatewayResult};

/// Decode a response body, naming the endpoint on failure
pub fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> GatewayResult<T> {
    serde_json::from_str(body).map_err(|e| GatewayError::Decode {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WireRole {
    User,
    Admin,
    SuperAdmin,
}

impl From<WireRole> for Role {
    fn from(role: WireRole) -> Self {
        match role {
            WireRole::User => Role::User,
            WireRole::Admin => Role::Admin,
            WireRole::SuperAdmin => Role::SuperAdmin,
        }
    }
}

impl From<Role> for WireRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => WireRole::User,
            Role::Admin => WireRole::Admin,
            Role::SuperAdmin => WireRole::SuperAdmin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WireNewsletterStatus {
    Draft,
    Collecting,
    Review,
    Approved,
    Published,
}

impl From<WireNewsletterStatus> for NewsletterStatus {
    fn from(status: WireNewsletterStatus) -> Self {
        match status {
            WireNewsletterStatus::Draft => NewsletterStatus::Draft,
            WireNewsletterStatus::Collecting => NewsletterStatus::Collecting,
            WireNewsletterStatus::Review => NewsletterStatus::Review,
            WireNewsletterStatus::Approved => NewsletterStatus::Approved,
            WireNewsletterStatus::Published => NewsletterStatus::Published,
        }
    }
}

impl From<NewsletterStatus> for WireNewsletterStatus {
    fn from(status: NewsletterStatus) -> Self {
        match status {
            NewsletterStatus::Draft => WireNewsletterStatus::Draft,
            NewsletterStatus::Collecting => WireNewsletterStatus::Collecting,
            NewsletterStatus::Review => WireNewsletterStatus::Review,
            NewsletterStatus::Approved => WireNewsletterStatus::Approved,
            NewsletterStatus::Published => WireNewsletterStatus::Published,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WireContributionStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
}

impl From<WireContributionStatus> for ContributionStatus {
    fn from(status: WireContributionStatus) -> Self {
        match status {
            WireContributionStatus::Draft => ContributionStatus::Draft,
            WireContributionStatus::Submitted => ContributionStatus::Submitted,
            WireContributionStatus::Approved => ContributionStatus::Approved,
            WireContributionStatus::Rejected => ContributionStatus::Rejected,
        }
    }
}

impl From<ContributionStatus> for WireContributionStatus {
    fn from(status: ContributionStatus) -> Self {
        match status {
            ContributionStatus::Draft => WireContributionStatus::Draft,
            ContributionStatus::Submitted => WireContributionStatus::Submitted,
            ContributionStatus::Approved => WireContributionStatus::Approved,
            ContributionStatus::Rejected => WireContributionStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WireContributionType {
    Success,
    Fail,
    Info,
    Other,
}

impl From<WireContributionType> for ContributionKind {
    fn from(kind: WireContributionType) -> Self {
        match kind {
            WireContributionType::Success => ContributionKind::Success,
            WireContributionType::Fail => ContributionKind::Fail,
            WireContributionType::Info => ContributionKind::Info,
            WireContributionType::Other => ContributionKind::Other,
        }
    }
}

// Auth

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub must_change_password: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordReset {
    pub new_password: String,
}

/// Error body returned by the backend; `detail` may be a string or any JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}

// Groups

#[derive(Debug, Clone, Deserialize)]
pub struct GroupRead {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<GroupRead> for Group {
    fn from(wire: GroupRead) -> Self {
        let mut group = Group::new(wire.id, wire.name);
        group.description = wire.description;
        group
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupMemberAdd {
    pub user_id: i64,
    pub role_in_group: String,
}

// Users

#[derive(Debug, Clone, Deserialize)]
pub struct MembershipRead {
    pub group: GroupRead,
    pub role_in_group: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRead {
    pub id: i64,
    pub email: String,
    pub trigram: String,
    pub name: String,
    pub global_role: WireRole,
    #[serde(default)]
    pub must_change_password: Option<bool>,
    #[serde(default)]
    pub memberships: Vec<MembershipRead>,
}

impl From<UserRead> for User {
    fn from(wire: UserRead) -> Self {
        User {
            id: wire.id,
            name: wire.name,
            email: Some(wire.email),
            trigram: Some(wire.trigram),
            role: wire.global_role.into(),
            memberships: wire
                .memberships
                .into_iter()
                .map(|m| GroupMembership { group_id: m.group.id, role_in_group: Some(m.role_in_group) })
                .collect(),
            must_change_password: wire.must_change_password.unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserCreate {
    pub email: String,
    pub trigram: String,
    pub name: String,
    pub global_role: WireRole,
    pub password: String,
}

// Newsletters

#[derive(Debug, Clone, Deserialize)]
pub struct NewsletterRead {
    pub id: i64,
    pub title: String,
    pub group_id: i64,
    #[serde(default)]
    pub period: Option<String>,
    pub status: WireNewsletterStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub layout_config: Option<LayoutConfig>,
    #[serde(default)]
    pub rendered_html: Option<String>,
}

impl NewsletterRead {
    /// Domain newsletter with its audience already resolved by the caller
    pub fn into_domain(self, audience: String) -> Newsletter {
        Newsletter {
            id: self.id,
            title: self.title,
            date: self.created_at,
            audience,
            group_id: Some(self.group_id),
            body: self.rendered_html.unwrap_or_default(),
            image_url: None,
            status: self.status.into(),
            period: self.period,
            layout: self.layout_config,
            engagement: Engagement::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsletterCreate {
    pub title: String,
    pub group_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WireNewsletterStatus>,
}

/// Query filters of the newsletter listing
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewsletterFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WireNewsletterStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsletterAdminCreate {
    pub user_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsletterAdminRead {
    pub id: i64,
    pub newsletter_id: i64,
    pub user_id: i64,
    pub user: UserRead,
}

// Contributions

#[derive(Debug, Clone, Deserialize)]
pub struct ContributionRead {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: WireContributionType,
    pub title: String,
    pub content: String,
    pub status: WireContributionStatus,
    pub user_id: i64,
    pub newsletter_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContributionRead {
    /// Domain contribution; the content lands in the field matching its type
    pub fn into_domain(self, newsletter_label: &str, group_id: Option<i64>, author: Option<String>) -> Contribution {
        let (mut text, mut success_story, mut fail_story) = (String::new(), String::new(), String::new());
        match ContributionKind::from(self.kind) {
            ContributionKind::Success => success_story = self.content,
            ContributionKind::Fail => fail_story = self.content,
            ContributionKind::Info | ContributionKind::Other => text = self.content,
        }

        Contribution {
            id: self.id,
            newsletter_id: Some(self.newsletter_id),
            newsletter_label: newsletter_label.to_string(),
            author,
            author_id: Some(self.user_id),
            title: Some(self.title),
            text,
            success_story,
            fail_story,
            group_id,
            status: self.status.into(),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributionCreate {
    #[serde(rename = "type")]
    pub kind: WireContributionType,
    pub title: String,
    pub content: String,
    pub status: WireContributionStatus,
}

impl ContributionCreate {
    /// One backend item per non-blank field of the collect form
    pub fn from_form(form: &NewContribution) -> Vec<ContributionCreate> {
        [
            (WireContributionType::Info, "Monthly update", form.text.as_str()),
            (WireContributionType::Success, "Success story", form.success_story.as_str()),
            (WireContributionType::Fail, "Fail story", form.fail_story.as_str()),
        ]
        .into_iter()
        .filter(|(_, _, content)| !content.trim().is_empty())
        .map(|(kind, title, content)| ContributionCreate {
            kind,
            title: title.to_string(),
            content: content.trim().to_string(),
            status: WireContributionStatus::Submitted,
        })
        .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ContributionStatusUpdate {
    pub status: WireContributionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn test_user_payload_maps_to_domain() {
        let body = json!({
            "id": 3,
            "email": "qlr@example.com",
            "trigram": "QLR",
            "name": "QLR",
            "global_role": "SUPER_ADMIN",
            "must_change_password": null,
            "memberships": [{ "group": { "id": 2, "name": "Tech" }, "role_in_group": "admin" }]
        })
        .to_string();

        let user: User = decode::<UserRead>("/auth/me", &body).unwrap().into();
        assert_eq!(user.role, Role::SuperAdmin);
        assert!(!user.must_change_password);
        assert!(user.is_group_admin(2));
    }

    #[test]
    fn test_missing_field_is_a_decode_error() {
        let body = json!({ "id": 1, "title": "March", "status": "DRAFT" }).to_string();
        let result = decode::<NewsletterRead>("/newsletters/1", &body);
        assert_matches!(result, Err(GatewayError::Decode { endpoint, .. }) if endpoint == "/newsletters/1");
    }

    #[test]
    fn test_mistyped_field_is_a_decode_error() {
        let body = json!({ "id": "7", "name": "Tech" }).to_string();
        assert_matches!(decode::<GroupRead>("/groups", &body), Err(GatewayError::Decode { .. }));
    }

    #[test]
    fn test_contribution_type_selects_field() {
        let body = json!({
            "id": 9, "type": "FAIL", "title": "Outage", "content": "Y broke",
            "status": "SUBMITTED", "user_id": 1, "newsletter_id": 4,
            "created_at": "2026-03-02T10:00:00Z", "updated_at": "2026-03-02T10:00:00Z"
        })
        .to_string();

        let contribution = decode::<ContributionRead>("/contributions", &body)
            .unwrap()
            .into_domain("March", Some(2), None);
        assert_eq!(contribution.fail_story, "Y broke");
        assert!(contribution.text.is_empty());
        assert_eq!(contribution.status, ContributionStatus::Submitted);
    }

    #[test]
    fn test_form_splits_into_items() {
        let form = NewContribution {
            author: None,
            text: "Launched X".to_string(),
            success_story: "  ".to_string(),
            fail_story: "Y broke".to_string(),
        };
        let items = ContributionCreate::from_form(&form);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].kind, WireContributionType::Fail);
        assert_eq!(serde_json::to_value(&items[0]).unwrap()["type"], "INFO");
    }

    #[test]
    fn test_error_detail() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail":[{"msg":"field required"}]}"#).unwrap();
        assert_eq!(body.message().unwrap(), r#"[{"msg":"field required"}]"#);
        let body: ErrorBody = serde_json::from_str(r#"{"detail":"Group not found"}"#).unwrap();
        assert_eq!(body.message().as_deref(), Some("Group not found"));
    }
}
