//! Group scope selection

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use crate::utils::errors::StudioError;

/// Token of the organization-wide scope
pub const ALL_SCOPE: &str = "all";

/// Group context restricting which records are visible and where new ones land
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    #[default]
    All,
    Group(i64),
}

impl Scope {
    /// Group id a record created under this scope carries
    pub fn group_id(&self) -> Option<i64> {
        match self {
            Scope::All => None,
            Scope::Group(id) => Some(*id),
        }
    }

    pub fn from_group_id(group_id: Option<i64>) -> Self {
        group_id.map(Scope::Group).unwrap_or(Scope::All)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::All => f.write_str(ALL_SCOPE),
            Scope::Group(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for Scope {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.eq_ignore_ascii_case(ALL_SCOPE) {
            return Ok(Scope::All);
        }
        token
            .parse::<i64>()
            .map(Scope::Group)
            .map_err(|_| StudioError::InvalidInput(format!("Invalid scope: {}", s)))
    }
}

impl Serialize for Scope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Scope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        token.parse().map_err(serde::de::Error::custom)
    }
}
