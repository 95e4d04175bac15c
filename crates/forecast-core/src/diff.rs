//! Delta computation between the projected forecast and what already exists.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use uuid::Uuid;

use forecast_domain::{ForecastEntry, ForecastOccurrence};

/// Identity of one forecast: a master on a date. Orders by date first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ForecastKey {
    pub date: NaiveDate,
    pub master_id: Uuid,
}

impl ForecastKey {
    pub fn new(date: NaiveDate, master_id: Uuid) -> Self {
        Self { date, master_id }
    }

    pub fn of(occurrence: &ForecastOccurrence) -> Self {
        Self::new(occurrence.date, occurrence.master_id)
    }
}

/// An engine-owned entry paired with the key it decoded to, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingForecast {
    pub entry: ForecastEntry,
    pub key: Option<ForecastKey>,
}

/// The create/delete operations that converge the budget to the projection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Occurrences to materialize, ordered by (date, master).
    pub create: Vec<ForecastOccurrence>,
    /// Entries to remove, in listing order.
    pub delete: Vec<ForecastEntry>,
    /// Count of entries already matching a target key.
    pub unchanged: usize,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.delete.is_empty()
    }
}

/// Partitions `target` against `existing` into create, delete, and unchanged.
///
/// `existing` must be in listing order: when several entries share a key,
/// the first one is kept and the rest are deleted. Entries without a key,
/// or whose key is not targeted, are deleted.
pub fn reconcile(target: &[ForecastOccurrence], existing: &[ExistingForecast]) -> ReconcilePlan {
    let wanted: BTreeMap<ForecastKey, &ForecastOccurrence> = target
        .iter()
        .map(|occurrence| (ForecastKey::of(occurrence), occurrence))
        .collect();

    let mut matched: HashSet<&ForecastKey> = HashSet::new();
    let mut plan = ReconcilePlan::default();

    for item in existing {
        let kept = item
            .key
            .as_ref()
            .and_then(|key| wanted.get_key_value(key))
            .is_some_and(|(key, _)| matched.insert(key));
        if kept {
            plan.unchanged += 1;
        } else {
            plan.delete.push(item.entry.clone());
        }
    }

    plan.create = wanted
        .iter()
        .filter(|(key, _)| !matched.contains(key))
        .map(|(_, occurrence)| (*occurrence).clone())
        .collect();

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn occurrence(master_id: Uuid, day: u32) -> ForecastOccurrence {
        ForecastOccurrence {
            master_id,
            date: date(day),
            label: "TEMPFORCST Groceries".into(),
            amount: -5000,
            account_id: Uuid::nil(),
            payee_id: None,
            payee_name: None,
            category_id: None,
            flag_color: None,
        }
    }

    fn existing(key: Option<(Uuid, u32)>, day: u32) -> ExistingForecast {
        ExistingForecast {
            entry: ForecastEntry {
                id: Uuid::new_v4(),
                date: date(day),
                label: "TEMPFORCST Groceries".into(),
                amount: -5000,
                account_id: Uuid::nil(),
                category_id: None,
            },
            key: key.map(|(master, day)| ForecastKey::new(date(day), master)),
        }
    }

    #[test]
    fn empty_budget_creates_everything() {
        let master = Uuid::new_v4();
        let target = vec![occurrence(master, 8), occurrence(master, 1)];
        let plan = reconcile(&target, &[]);
        assert_eq!(plan.create.len(), 2);
        assert_eq!(plan.create[0].date, date(1));
        assert!(plan.delete.is_empty());
        assert_eq!(plan.unchanged, 0);
    }

    #[test]
    fn matching_entries_are_left_alone() {
        let master = Uuid::new_v4();
        let target = vec![occurrence(master, 1), occurrence(master, 8)];
        let current = vec![existing(Some((master, 1)), 1), existing(Some((master, 8)), 8)];
        let plan = reconcile(&target, &current);
        assert!(plan.is_empty());
        assert_eq!(plan.unchanged, 2);
    }

    #[test]
    fn rolled_out_and_orphaned_entries_are_deleted() {
        let master = Uuid::new_v4();
        let target = vec![occurrence(master, 15)];
        let stale = existing(Some((master, 1)), 1);
        let orphan = existing(None, 8);
        let plan = reconcile(&target, &[stale.clone(), orphan.clone()]);
        assert_eq!(plan.delete, vec![stale.entry, orphan.entry]);
        assert_eq!(plan.create, target);
    }

    #[test]
    fn duplicates_keep_the_first_listed_entry() {
        let master = Uuid::new_v4();
        let target = vec![occurrence(master, 1)];
        let first = existing(Some((master, 1)), 1);
        let second = existing(Some((master, 1)), 1);
        let third = existing(Some((master, 1)), 1);
        let plan = reconcile(&target, &[first, second.clone(), third.clone()]);
        assert_eq!(plan.unchanged, 1);
        assert_eq!(plan.delete, vec![second.entry, third.entry]);
        assert!(plan.create.is_empty());
    }
}
