//! Cleanup of forecast projections the service already entered into the register.

use chrono::NaiveDate;

use forecast_domain::RegisterTransaction;

use crate::identity::{contains_marker, starts_with_marker};

/// Register transactions dated before `today` that carry the forecast marker
/// in their memo or payee, in listing order.
pub fn stale_history(
    register: &[RegisterTransaction],
    today: NaiveDate,
) -> Vec<RegisterTransaction> {
    register
        .iter()
        .filter(|txn| !txn.deleted && txn.date < today)
        .filter(|txn| {
            txn.memo.as_deref().is_some_and(starts_with_marker)
                || txn.payee_name.as_deref().is_some_and(contains_marker)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn txn(day: u32, memo: Option<&str>, payee: Option<&str>) -> RegisterTransaction {
        RegisterTransaction {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            amount: -1000,
            memo: memo.map(str::to_string),
            payee_name: payee.map(str::to_string),
            deleted: false,
        }
    }

    #[test]
    fn keeps_only_past_marked_transactions() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let past_memo = txn(3, Some("TEMPFORCST Groceries"), Some("Market"));
        let past_payee = txn(4, None, Some("tempforcst"));
        let today_marked = txn(10, Some("TEMPFORCST Groceries"), None);
        let past_unmarked = txn(5, Some("Groceries"), Some("Market"));
        let mut deleted = txn(6, Some("TEMPFORCST Rent"), None);
        deleted.deleted = true;

        let stale = stale_history(
            &[past_memo.clone(), today_marked, past_unmarked, past_payee.clone(), deleted],
            today,
        );
        assert_eq!(stale, vec![past_memo, past_payee]);
    }
}
