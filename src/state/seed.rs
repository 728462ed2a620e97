//! Demo data for the offline studio

use chrono::{Duration, Utc};
use crate::config::Settings;
use crate::models::{Engagement, Group, GroupMembership, Newsletter, NewsletterStatus, Role, User};
use crate::models::user::GROUP_ADMIN_ROLE;
use crate::utils::errors::Result;
use super::actions::Action;
use super::store::StudioStore;

fn demo_user(id: i64, trigram: &str, role: Role, memberships: Vec<GroupMembership>) -> User {
    User {
        id,
        name: trigram.to_string(),
        email: Some(format!("{}@example.com", trigram.to_lowercase())),
        trigram: Some(trigram.to_string()),
        role,
        memberships,
        must_change_password: false,
    }
}

pub fn demo_groups() -> Vec<Group> {
    let mut product = Group::new(1, "Product");
    product.can_approve = true;
    product.admin_ids = vec![1];
    vec![product, Group::new(2, "Tech"), Group::new(3, "Communication")]
}

pub fn demo_users() -> Vec<User> {
    vec![
        demo_user(
            1,
            "GJV",
            Role::SuperAdmin,
            vec![GroupMembership { group_id: 1, role_in_group: Some(GROUP_ADMIN_ROLE.to_string()) }],
        ),
        demo_user(2, "XPD", Role::Admin, vec![GroupMembership::member(3)]),
        demo_user(3, "QLR", Role::User, vec![GroupMembership::member(1), GroupMembership::member(2)]),
    ]
}

pub fn demo_newsletters(settings: &Settings) -> Vec<Newsletter> {
    let now = Utc::now();
    vec![
        Newsletter {
            id: 2,
            title: "Tech corner · last month".to_string(),
            date: now - Duration::days(30),
            audience: "Tech".to_string(),
            group_id: Some(2),
            body: "<p>The platform migration is complete and build times are down by a third.</p>".to_string(),
            image_url: None,
            status: NewsletterStatus::Published,
            period: None,
            layout: None,
            engagement: Engagement::default(),
        },
        Newsletter {
            id: 1,
            title: "Welcome to the internal newsletter".to_string(),
            date: now - Duration::days(60),
            audience: settings.studio.organization_label.clone(),
            group_id: None,
            body: "<p>Each month, teams share their highlights, successes and lessons learned here.</p>".to_string(),
            image_url: None,
            status: NewsletterStatus::Published,
            period: None,
            layout: None,
            engagement: Engagement::default(),
        },
    ]
}

/// Local store preloaded with demo groups, users and newsletters
pub fn demo_store(settings: &Settings) -> Result<StudioStore> {
    let mut store = StudioStore::local(settings);
    store.dispatch(Action::GroupsLoaded(demo_groups()))?;
    store.dispatch(Action::UsersLoaded(demo_users()))?;
    store.dispatch(Action::NewslettersLoaded(demo_newsletters(settings)))?;
    Ok(store)
}
