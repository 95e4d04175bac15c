//! Domain models for scheduled transactions, masters, and forecast entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::frequency::{Frequency, FrequencyError};

/// A scheduled transaction as listed by the budgeting service.
///
/// Recurring ones are masters; one-time ones (`never`) may be forecast
/// entries produced by a previous run, or unrelated user entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTransaction {
    pub id: Uuid,
    pub date_first: NaiveDate,
    pub date_next: NaiveDate,
    /// Raw frequency tag; parsed lazily so one unknown tag cannot fail a listing.
    pub frequency: String,
    /// Signed amount in milliunits.
    pub amount: i64,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub flag_color: Option<String>,
    pub account_id: Uuid,
    #[serde(default)]
    pub payee_id: Option<Uuid>,
    #[serde(default)]
    pub payee_name: Option<String>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub transfer_account_id: Option<Uuid>,
    #[serde(default)]
    pub is_split: bool,
    #[serde(default)]
    pub deleted: bool,
}

impl ScheduledTransaction {
    pub fn parsed_frequency(&self) -> Result<Frequency, FrequencyError> {
        self.frequency.parse()
    }

    pub fn is_one_time(&self) -> bool {
        self.frequency == Frequency::Never.as_str()
    }

    pub fn memo_text(&self) -> &str {
        self.memo.as_deref().unwrap_or("")
    }
}

/// A validated recurring template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterTransaction {
    pub id: Uuid,
    pub anchor: NaiveDate,
    pub next_due: NaiveDate,
    pub frequency: Frequency,
    pub amount: i64,
    pub memo: String,
    pub account_id: Uuid,
    pub payee_id: Option<Uuid>,
    pub payee_name: Option<String>,
    pub category_id: Option<Uuid>,
    pub flag_color: Option<String>,
}

impl MasterTransaction {
    /// Builds a master from a listing entry whose frequency was already parsed.
    pub fn from_scheduled(source: &ScheduledTransaction, frequency: Frequency) -> Self {
        Self {
            id: source.id,
            anchor: source.date_first,
            next_due: source.date_next,
            frequency,
            amount: source.amount,
            memo: source.memo_text().to_string(),
            account_id: source.account_id,
            payee_id: source.payee_id,
            payee_name: source.payee_name.clone(),
            category_id: source.category_id,
            flag_color: source.flag_color.clone(),
        }
    }
}

/// A computed projection of one master on one date. Lives only during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastOccurrence {
    pub master_id: Uuid,
    pub date: NaiveDate,
    pub label: String,
    pub amount: i64,
    pub account_id: Uuid,
    pub payee_id: Option<Uuid>,
    pub payee_name: Option<String>,
    pub category_id: Option<Uuid>,
    pub flag_color: Option<String>,
}

impl ForecastOccurrence {
    /// Payload that materializes this occurrence as a one-time entry.
    pub fn to_new_entry(&self) -> NewScheduledTransaction {
        NewScheduledTransaction {
            account_id: self.account_id,
            date: self.date,
            amount: self.amount,
            payee_id: self.payee_id,
            payee_name: self.payee_name.clone(),
            category_id: self.category_id,
            memo: self.label.clone(),
            flag_color: self.flag_color.clone(),
            frequency: Frequency::Never,
        }
    }
}

/// An engine-owned one-time scheduled transaction read back from the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub label: String,
    pub amount: i64,
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
}

impl ForecastEntry {
    pub fn from_scheduled(source: &ScheduledTransaction) -> Self {
        Self {
            id: source.id,
            date: source.date_next,
            label: source.memo_text().to_string(),
            amount: source.amount,
            account_id: source.account_id,
            category_id: source.category_id,
        }
    }
}

/// Create payload for a one-time scheduled transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewScheduledTransaction {
    pub account_id: Uuid,
    pub date: NaiveDate,
    pub amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payee_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payee_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    pub memo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag_color: Option<String>,
    pub frequency: Frequency,
}

/// An entered (non-scheduled) transaction from the register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterTransaction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub amount: i64,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub payee_name: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}
