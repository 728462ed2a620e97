//! User and group administration
//!
//! Operations of the super-admin panel over the user and group collections.
//! Deleting a group prunes it from every membership; newsletters and
//! contributions that still reference it are left untouched and resolve to
//! the unknown-group audience label.

use tracing::{debug, info};
use crate::models::{CreateUserRequest, Group, GroupMembership, User};
use crate::models::user::GROUP_ADMIN_ROLE;
use crate::utils::errors::{StudioError, Result};
use crate::utils::helpers::{non_blank, to_trigram};

fn ensure_groups_exist(groups: &[Group], group_ids: &[i64]) -> Result<()> {
    match group_ids.iter().find(|id| !groups.iter().any(|g| g.id == **id)) {
        Some(missing) => Err(StudioError::GroupNotFound { group_id: *missing }),
        None => Ok(()),
    }
}

fn dedup(ids: &[i64]) -> Vec<i64> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }
    unique
}

/// Append a new group with default capabilities
pub fn add_group(groups: &mut Vec<Group>, id: i64, name: &str) -> Result<Group> {
    let name = non_blank(name)
        .ok_or_else(|| StudioError::InvalidInput("Group name is empty".to_string()))?;

    if groups.iter().any(|g| g.name.eq_ignore_ascii_case(&name)) {
        return Err(StudioError::InvalidInput(format!("Group already exists: {}", name)));
    }

    let group = Group::new(id, name);
    groups.push(group.clone());
    info!(group_id = id, name = %group.name, "Group added");
    Ok(group)
}

/// Remove a group and prune it from every user's memberships
pub fn delete_group(groups: &mut Vec<Group>, users: &mut [User], group_id: i64) -> Result<Group> {
    let position = groups
        .iter()
        .position(|g| g.id == group_id)
        .ok_or(StudioError::GroupNotFound { group_id })?;
    let removed = groups.remove(position);

    let mut pruned = 0usize;
    for user in users.iter_mut() {
        let before = user.memberships.len();
        user.memberships.retain(|m| m.group_id != group_id);
        pruned += before - user.memberships.len();
    }

    info!(group_id = group_id, pruned_memberships = pruned, "Group deleted");
    Ok(removed)
}

/// Create a user whose display name is normalized to a trigram
pub fn add_user(users: &mut Vec<User>, groups: &[Group], id: i64, request: CreateUserRequest) -> Result<User> {
    let trigram = to_trigram(&request.name);
    if trigram.is_empty() {
        return Err(StudioError::InvalidInput(
            "User name must contain at least one letter or digit".to_string()
        ));
    }
    if users.iter().any(|u| u.name == trigram) {
        return Err(StudioError::InvalidInput(format!("Trigram already registered: {}", trigram)));
    }

    let group_ids = dedup(&request.group_ids);
    ensure_groups_exist(groups, &group_ids)?;

    let user = User {
        id,
        name: trigram.clone(),
        email: None,
        trigram: Some(trigram),
        role: request.role,
        memberships: group_ids.into_iter().map(GroupMembership::member).collect(),
        must_change_password: true,
    };
    users.push(user.clone());
    info!(user_id = id, name = %user.name, role = %user.role, "User added");
    Ok(user)
}

/// Replace a user's group memberships, keeping in-group roles of retained
/// groups. Groups the user leaves also lose them as an admin.
pub fn update_user_groups(users: &mut [User], groups: &mut [Group], user_id: i64, group_ids: &[i64]) -> Result<User> {
    let group_ids = dedup(group_ids);
    ensure_groups_exist(groups, &group_ids)?;

    let user = users
        .iter_mut()
        .find(|u| u.id == user_id)
        .ok_or(StudioError::UserNotFound { user_id })?;

    let memberships: Vec<GroupMembership> = group_ids
        .iter()
        .copied()
        .map(|group_id| {
            user.memberships
                .iter()
                .find(|m| m.group_id == group_id)
                .cloned()
                .unwrap_or_else(|| GroupMembership::member(group_id))
        })
        .collect();
    user.memberships = memberships;

    for group in groups.iter_mut().filter(|g| !group_ids.contains(&g.id)) {
        group.admin_ids.retain(|id| *id != user_id);
    }

    debug!(user_id = user_id, groups = ?user.group_ids(), "User groups updated");
    Ok(user.clone())
}

/// Set the admins of a group. Admins become members holding the admin role;
/// members dropped from the list keep their membership without it.
pub fn update_group_admins(groups: &mut [Group], users: &mut [User], group_id: i64, admin_ids: &[i64]) -> Result<Group> {
    let admin_ids = dedup(admin_ids);
    if let Some(missing) = admin_ids.iter().find(|id| !users.iter().any(|u| u.id == **id)) {
        return Err(StudioError::UserNotFound { user_id: *missing });
    }

    let group = groups
        .iter_mut()
        .find(|g| g.id == group_id)
        .ok_or(StudioError::GroupNotFound { group_id })?;
    group.admin_ids = admin_ids.clone();

    for user in users.iter_mut() {
        let is_admin = admin_ids.contains(&user.id);
        if let Some(membership) = user.memberships.iter_mut().find(|m| m.group_id == group_id) {
            if is_admin {
                membership.role_in_group = Some(GROUP_ADMIN_ROLE.to_string());
            } else if membership.is_admin() {
                membership.role_in_group = None;
            }
        } else if is_admin {
            user.memberships.push(GroupMembership {
                group_id,
                role_in_group: Some(GROUP_ADMIN_ROLE.to_string()),
            });
        }
    }

    info!(group_id = group_id, admins = ?admin_ids, "Group admins updated");
    Ok(group.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use crate::models::Role;

    fn user(id: i64, name: &str, group_ids: &[i64]) -> User {
        User {
            id,
            name: name.to_string(),
            email: None,
            trigram: Some(name.to_string()),
            role: Role::User,
            memberships: group_ids.iter().copied().map(GroupMembership::member).collect(),
            must_change_password: false,
        }
    }

    fn fixture() -> (Vec<Group>, Vec<User>) {
        let groups = vec![Group::new(1, "Product"), Group::new(2, "Tech"), Group::new(3, "Communication")];
        let users = vec![user(1, "GJV", &[1]), user(2, "XPD", &[3]), user(3, "QLR", &[1, 2])];
        (groups, users)
    }

    #[test]
    fn test_delete_group_prunes_memberships() {
        let (mut groups, mut users) = fixture();
        let removed = delete_group(&mut groups, &mut users, 1).unwrap();

        assert_eq!(removed.name, "Product");
        assert_eq!(groups.len(), 2);
        assert!(users.iter().all(|u| !u.belongs_to(1)));
        assert_eq!(users[2].group_ids(), vec![2]);
        assert_matches!(delete_group(&mut groups, &mut users, 1), Err(StudioError::GroupNotFound { group_id: 1 }));
    }

    #[test]
    fn test_add_group_validates_name() {
        let (mut groups, _) = fixture();
        assert_matches!(add_group(&mut groups, 4, "   "), Err(StudioError::InvalidInput(_)));
        assert_matches!(add_group(&mut groups, 4, "tech"), Err(StudioError::InvalidInput(_)));

        let group = add_group(&mut groups, 4, "  Sales ").unwrap();
        assert_eq!(group.name, "Sales");
        assert!(group.can_contribute);
        assert!(!group.can_approve);
    }

    #[test]
    fn test_add_user_normalizes_trigram() {
        let (groups, mut users) = fixture();
        let request = CreateUserRequest { name: "a.b-cd".to_string(), role: Role::Admin, group_ids: vec![2, 2] };
        let created = add_user(&mut users, &groups, 4, request).unwrap();

        assert_eq!(created.name, "ABC");
        assert_eq!(created.group_ids(), vec![2]);
        assert!(created.must_change_password);

        let request = CreateUserRequest { name: "abc".to_string(), role: Role::User, group_ids: vec![] };
        assert_matches!(add_user(&mut users, &groups, 5, request), Err(StudioError::InvalidInput(_)));

        let request = CreateUserRequest { name: "!!".to_string(), role: Role::User, group_ids: vec![] };
        assert_matches!(add_user(&mut users, &groups, 5, request), Err(StudioError::InvalidInput(_)));

        let request = CreateUserRequest { name: "zz".to_string(), role: Role::User, group_ids: vec![9] };
        assert_matches!(add_user(&mut users, &groups, 5, request), Err(StudioError::GroupNotFound { group_id: 9 }));
    }

    #[test]
    fn test_update_group_admins_adds_membership() {
        let (mut groups, mut users) = fixture();
        update_group_admins(&mut groups, &mut users, 2, &[1]).unwrap();

        assert_eq!(groups[1].admin_ids, vec![1]);
        assert!(users[0].is_group_admin(2));

        update_group_admins(&mut groups, &mut users, 2, &[]).unwrap();
        assert!(users[0].belongs_to(2));
        assert!(!users[0].is_group_admin(2));
    }

    #[test]
    fn test_update_user_groups_keeps_roles() {
        let (mut groups, mut users) = fixture();
        update_group_admins(&mut groups, &mut users, 1, &[3]).unwrap();

        let updated = update_user_groups(&mut users, &mut groups, 3, &[1, 3]).unwrap();
        assert_eq!(updated.group_ids(), vec![1, 3]);
        assert!(updated.is_group_admin(1));
        assert_eq!(groups[0].admin_ids, vec![3]);
        assert_matches!(
            update_user_groups(&mut users, &mut groups, 99, &[1]),
            Err(StudioError::UserNotFound { user_id: 99 })
        );
    }

    #[test]
    fn test_leaving_a_group_revokes_admin_rights() {
        let (mut groups, mut users) = fixture();
        update_group_admins(&mut groups, &mut users, 2, &[3, 1]).unwrap();

        let updated = update_user_groups(&mut users, &mut groups, 3, &[1]).unwrap();
        assert!(!updated.belongs_to(2));
        assert_eq!(groups[1].admin_ids, vec![1]);
        assert!(users[0].is_group_admin(2));
    }
}
