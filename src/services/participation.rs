//! Participation metric for the contributions dashboard

use std::collections::HashSet;
use serde::Serialize;
use crate::models::Contribution;
use crate::utils::helpers::contributor_identity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participation {
    pub contributor_count: usize,
    pub total_users: usize,
    /// Rounded percentage of users who contributed; 0 when there are no users
    pub rate: u32,
    pub remaining: usize,
}

/// Count distinct contributors among `contributions` against `total_users`
pub fn participation<'a, I>(contributions: I, total_users: usize) -> Participation
where
    I: IntoIterator<Item = &'a Contribution>,
{
    let contributors: HashSet<String> = contributions
        .into_iter()
        .map(|c| contributor_identity(c.author.as_deref(), c.author_id))
        .collect();
    let contributor_count = contributors.len();

    Participation {
        contributor_count,
        total_users,
        rate: percentage(contributor_count, total_users),
        remaining: total_users.saturating_sub(contributor_count),
    }
}

/// `round(part / total * 100)` in integer arithmetic, half rounding up
fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let part = part as u64;
    let total = total as u64;
    let rounded = (part * 200 + total) / (2 * total);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}
