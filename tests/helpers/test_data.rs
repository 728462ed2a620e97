//! Test data helpers
//!
//! Backend payload builders and domain fixtures shared by the integration tests.

use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use newsletter_studio::config::Settings;
use newsletter_studio::models::{Contribution, ContributionStatus, Group, GroupMembership, NewContribution, Role, User};
use newsletter_studio::state::{Action, StudioStore};

pub const TEST_LABEL: &str = "Monthly newsletter · March 2026";
pub const TEST_TOKEN: &str = "test-token";

/// Wire role string for a domain role
pub fn wire_role(role: Role) -> &'static str {
    match role {
        Role::User => "USER",
        Role::Admin => "ADMIN",
        Role::SuperAdmin => "SUPER_ADMIN",
    }
}

pub fn user_json(id: i64, trigram: &str, role: Role, group_ids: &[i64]) -> Value {
    let memberships: Vec<Value> = group_ids
        .iter()
        .map(|id| json!({ "group": { "id": id, "name": format!("Group {}", id) }, "role_in_group": "contributor" }))
        .collect();

    json!({
        "id": id,
        "email": format!("{}@example.com", trigram.to_lowercase()),
        "trigram": trigram,
        "name": trigram,
        "global_role": wire_role(role),
        "must_change_password": false,
        "memberships": memberships
    })
}

pub fn group_json(id: i64, name: &str) -> Value {
    json!({ "id": id, "name": name, "description": null })
}

pub fn newsletter_json(id: i64, title: &str, group_id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "group_id": group_id,
        "period": TEST_LABEL,
        "status": status,
        "created_at": "2026-03-01T09:00:00Z",
        "updated_at": "2026-03-02T09:00:00Z",
        "layout_config": null,
        "rendered_html": "<p>Hello</p>"
    })
}

pub fn contribution_json(id: i64, kind: &str, content: &str, user_id: i64, newsletter_id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "type": kind,
        "title": "Item",
        "content": content,
        "status": status,
        "user_id": user_id,
        "newsletter_id": newsletter_id,
        "created_at": "2026-03-03T09:00:00Z",
        "updated_at": "2026-03-03T09:00:00Z"
    })
}

pub fn test_settings() -> Settings {
    Settings::default()
}

pub fn test_groups() -> Vec<Group> {
    vec![Group::new(1, "Product"), Group::new(2, "Tech"), Group::new(3, "Communication")]
}

pub fn test_user(id: i64, name: &str, role: Role, group_ids: &[i64]) -> User {
    User {
        id,
        name: name.to_string(),
        email: None,
        trigram: Some(name.to_string()),
        role,
        memberships: group_ids.iter().copied().map(GroupMembership::member).collect(),
        must_change_password: false,
    }
}

pub fn test_users() -> Vec<User> {
    vec![
        test_user(1, "GJV", Role::SuperAdmin, &[1]),
        test_user(2, "XPD", Role::Admin, &[3]),
        test_user(3, "QLR", Role::User, &[1, 2]),
        test_user(4, "MNO", Role::User, &[2]),
    ]
}

pub fn test_contribution(id: i64, author: &str, text: &str, group_id: Option<i64>) -> Contribution {
    Contribution {
        id,
        newsletter_id: None,
        newsletter_label: TEST_LABEL.to_string(),
        author: Some(author.to_string()),
        author_id: None,
        title: None,
        text: text.to_string(),
        success_story: String::new(),
        fail_story: String::new(),
        group_id,
        status: ContributionStatus::Submitted,
        created_at: Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap(),
    }
}

pub fn form(author: &str, text: &str, success: &str, fail: &str) -> NewContribution {
    NewContribution {
        author: Some(author.to_string()),
        text: text.to_string(),
        success_story: success.to_string(),
        fail_story: fail.to_string(),
    }
}

/// Local store with the test groups and users, acting as `role`
pub fn studio_store(role: Role) -> StudioStore {
    let mut store = StudioStore::local(&test_settings()).with_label(TEST_LABEL);
    store.dispatch(Action::GroupsLoaded(test_groups())).unwrap();
    store.dispatch(Action::UsersLoaded(test_users())).unwrap();
    store.dispatch(Action::ChangeRole(role)).unwrap();
    store
}
