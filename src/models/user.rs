//! User model

use serde::{Deserialize, Serialize};

/// Global permission tier, independent of group membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
    #[serde(rename = "superadmin")]
    SuperAdmin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Admin, Role::SuperAdmin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::SuperAdmin => "superadmin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role a member holds inside one group
pub const GROUP_ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMembership {
    pub group_id: i64,
    pub role_in_group: Option<String>,
}

impl GroupMembership {
    pub fn member(group_id: i64) -> Self {
        Self { group_id, role_in_group: None }
    }

    pub fn is_admin(&self) -> bool {
        self.role_in_group
            .as_deref()
            .map(|role| role.eq_ignore_ascii_case(GROUP_ADMIN_ROLE))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub trigram: Option<String>,
    pub role: Role,
    pub memberships: Vec<GroupMembership>,
    pub must_change_password: bool,
}

impl User {
    /// Ids of every group the user belongs to, in membership order
    pub fn group_ids(&self) -> Vec<i64> {
        self.memberships.iter().map(|m| m.group_id).collect()
    }

    pub fn belongs_to(&self, group_id: i64) -> bool {
        self.memberships.iter().any(|m| m.group_id == group_id)
    }

    pub fn is_group_admin(&self, group_id: i64) -> bool {
        self.memberships.iter().any(|m| m.group_id == group_id && m.is_admin())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub role: Role,
    pub group_ids: Vec<i64>,
}
