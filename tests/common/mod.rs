#![allow(dead_code)]

use std::time::Duration;

use chrono::NaiveDate;
use uuid::Uuid;

use forecast_core::SyncOptions;
use forecast_domain::{RegisterTransaction, ScheduledTransaction};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn recurring(
    memo: &str,
    frequency: &str,
    anchor: NaiveDate,
    amount: i64,
) -> ScheduledTransaction {
    ScheduledTransaction {
        id: Uuid::new_v4(),
        date_first: anchor,
        date_next: anchor,
        frequency: frequency.into(),
        amount,
        memo: Some(memo.into()),
        flag_color: None,
        account_id: Uuid::from_u128(10),
        payee_id: Some(Uuid::from_u128(20)),
        payee_name: Some("Landlord".into()),
        category_id: Some(Uuid::from_u128(30)),
        transfer_account_id: None,
        is_split: false,
        deleted: false,
    }
}

pub fn register(memo: &str, on: NaiveDate) -> RegisterTransaction {
    RegisterTransaction {
        id: Uuid::new_v4(),
        date: on,
        amount: -1000,
        memo: Some(memo.into()),
        payee_name: None,
        deleted: false,
    }
}

pub fn fast_options(horizon_days: u32) -> SyncOptions {
    SyncOptions {
        horizon_days,
        pacer_delay: Duration::ZERO,
        ..SyncOptions::default()
    }
}
