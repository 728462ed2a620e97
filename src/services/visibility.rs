//! Scope-based visibility
//!
//! Pure functions selecting the newsletters and contributions a group scope
//! may see, and resolving the audience label of a group reference.

use crate::models::{Contribution, Group, Newsletter, Scope};

/// Records that may belong to one group; `None` means organization-wide
pub trait Scoped {
    fn scope_group_id(&self) -> Option<i64>;
}

impl Scoped for Newsletter {
    fn scope_group_id(&self) -> Option<i64> {
        self.group_id
    }
}

impl Scoped for Contribution {
    fn scope_group_id(&self) -> Option<i64> {
        self.group_id
    }
}

/// Whether a single record is visible under `scope`
pub fn is_visible<T: Scoped>(scope: Scope, record: &T) -> bool {
    match scope {
        Scope::All => true,
        Scope::Group(id) => record.scope_group_id() == Some(id),
    }
}

/// Records visible under `scope`, in input order
pub fn filter_visible<T: Scoped>(scope: Scope, records: &[T]) -> Vec<&T> {
    records.iter().filter(|record| is_visible(scope, *record)).collect()
}

/// Contributions feeding the draft of one edition: same label, visible under `scope`
pub fn edition_contributions<'a>(scope: Scope, label: &str, contributions: &'a [Contribution]) -> Vec<&'a Contribution> {
    contributions
        .iter()
        .filter(|c| c.newsletter_label == label && is_visible(scope, *c))
        .collect()
}

/// Display name of a record's audience.
///
/// Organization-wide records get `organization_label`; references to a group
/// that no longer exists get `unknown_label`.
pub fn audience_label(group_id: Option<i64>, groups: &[Group], organization_label: &str, unknown_label: &str) -> String {
    match group_id {
        None => organization_label.to_string(),
        Some(id) => groups
            .iter()
            .find(|g| g.id == id)
            .map(|g| g.name.clone())
            .unwrap_or_else(|| unknown_label.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Record {
        id: usize,
        group_id: Option<i64>,
    }

    impl Scoped for Record {
        fn scope_group_id(&self) -> Option<i64> {
            self.group_id
        }
    }

    fn records_strategy() -> impl Strategy<Value = Vec<Record>> {
        prop::collection::vec(prop::option::of(1i64..5), 0..40).prop_map(|ids| {
            ids.into_iter()
                .enumerate()
                .map(|(id, group_id)| Record { id, group_id })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn all_scope_returns_everything(records in records_strategy()) {
            let visible = filter_visible(Scope::All, &records);
            prop_assert_eq!(visible.len(), records.len());
            prop_assert!(visible.iter().zip(records.iter()).all(|(a, b)| *a == b));
        }

        #[test]
        fn group_scope_is_an_ordered_subset(records in records_strategy(), group in 1i64..5) {
            let visible = filter_visible(Scope::Group(group), &records);
            prop_assert!(visible.iter().all(|r| r.group_id == Some(group)));
            prop_assert!(visible.windows(2).all(|w| w[0].id < w[1].id));
            let expected = records.iter().filter(|r| r.group_id == Some(group)).count();
            prop_assert_eq!(visible.len(), expected);
        }

        #[test]
        fn organization_wide_records_only_under_all(records in records_strategy(), group in 1i64..5) {
            let visible = filter_visible(Scope::Group(group), &records);
            prop_assert!(visible.iter().all(|r| r.group_id.is_some()));
            let all = filter_visible(Scope::All, &records);
            prop_assert!(records.iter().filter(|r| r.group_id.is_none()).all(|r| all.contains(&r)));
        }
    }

    #[test]
    fn test_audience_label() {
        let groups = vec![Group::new(1, "Product")];
        assert_eq!(audience_label(None, &groups, "Whole organization", "Unknown group"), "Whole organization");
        assert_eq!(audience_label(Some(1), &groups, "Whole organization", "Unknown group"), "Product");
        assert_eq!(audience_label(Some(9), &groups, "Whole organization", "Unknown group"), "Unknown group");
    }
}
