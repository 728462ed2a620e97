//! Navigable sections and the role capability table

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::models::Role;
use crate::utils::errors::StudioError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Feed,
    Collect,
    Contributions,
    Generator,
    Admin,
}

/// Default landing tab, and the target of every forced redirect
pub const DEFAULT_TAB: Tab = Tab::Feed;

const EVERYONE: &[Role] = &[Role::User, Role::Admin, Role::SuperAdmin];
const ADMINS: &[Role] = &[Role::Admin, Role::SuperAdmin];
const SUPER_ADMINS: &[Role] = &[Role::SuperAdmin];

/// Tab → roles allowed to see it, in display order
const TAB_TABLE: [(Tab, &[Role]); 5] = [
    (Tab::Feed, EVERYONE),
    (Tab::Collect, EVERYONE),
    (Tab::Contributions, EVERYONE),
    (Tab::Generator, ADMINS),
    (Tab::Admin, SUPER_ADMINS),
];

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Feed, Tab::Collect, Tab::Contributions, Tab::Generator, Tab::Admin];

    pub fn id(&self) -> &'static str {
        match self {
            Tab::Feed => "feed",
            Tab::Collect => "collect",
            Tab::Contributions => "contributions",
            Tab::Generator => "generator",
            Tab::Admin => "admin",
        }
    }

    pub fn allowed_roles(&self) -> &'static [Role] {
        TAB_TABLE
            .iter()
            .find(|(tab, _)| tab == self)
            .map(|(_, roles)| *roles)
            .unwrap_or(&[])
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed_roles().contains(&role)
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Tab {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.id() == s.trim())
            .ok_or_else(|| StudioError::InvalidInput(format!("Unknown tab: {}", s)))
    }
}

/// Tabs visible to `role`, in display order
pub fn visible_tabs(role: Role) -> Vec<Tab> {
    TAB_TABLE
        .iter()
        .filter(|(_, roles)| roles.contains(&role))
        .map(|(tab, _)| *tab)
        .collect()
}

/// Tab a `role` actually lands on when asking for `requested`
pub fn resolve_tab(role: Role, requested: Tab) -> Tab {
    if requested.allows(role) {
        requested
    } else {
        DEFAULT_TAB
    }
}
