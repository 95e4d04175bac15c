//! JSON envelopes exchanged with the YNAB API and their mapping to domain types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use forecast_domain::{NewScheduledTransaction, RegisterTransaction, ScheduledTransaction};

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct ScheduledList {
    pub scheduled_transactions: Vec<ScheduledDto>,
}

#[derive(Debug, Deserialize)]
pub struct ScheduledSingle {
    pub scheduled_transaction: ScheduledDto,
}

#[derive(Debug, Deserialize)]
pub struct TransactionList {
    pub transactions: Vec<TransactionDto>,
}

#[derive(Debug, Serialize)]
pub struct CreateScheduledRequest<'a> {
    pub scheduled_transaction: &'a NewScheduledTransaction,
}

#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ErrorDetail {
    pub fn message(&self) -> String {
        match (self.name.as_deref(), self.detail.as_deref()) {
            (Some(name), Some(detail)) => format!("{name}: {detail}"),
            (Some(name), None) => name.to_string(),
            (None, Some(detail)) => detail.to_string(),
            (None, None) => self.id.clone().unwrap_or_else(|| "unknown error".into()),
        }
    }
}

/// Extracts a readable message from an error body, falling back to the raw text.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message(),
        Err(_) if body.trim().is_empty() => "empty response body".into(),
        Err(_) => body.trim().to_string(),
    }
}

#[derive(Debug, Deserialize)]
pub struct ScheduledDto {
    pub id: Uuid,
    pub date_first: NaiveDate,
    pub date_next: NaiveDate,
    pub frequency: String,
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
    pub deleted: bool,
    #[serde(default)]
    pub subtransactions: Vec<serde_json::Value>,
}

impl From<ScheduledDto> for ScheduledTransaction {
    fn from(dto: ScheduledDto) -> Self {
        ScheduledTransaction {
            id: dto.id,
            date_first: dto.date_first,
            date_next: dto.date_next,
            frequency: dto.frequency,
            amount: dto.amount,
            memo: dto.memo,
            flag_color: dto.flag_color,
            account_id: dto.account_id,
            payee_id: dto.payee_id,
            payee_name: dto.payee_name,
            category_id: dto.category_id,
            transfer_account_id: dto.transfer_account_id,
            is_split: !dto.subtransactions.is_empty(),
            deleted: dto.deleted,
        }
    }
}

/// Register transaction. Ids are kept as text since the service also lists
/// entries whose id is not a plain UUID.
#[derive(Debug, Deserialize)]
pub struct TransactionDto {
    pub id: String,
    pub date: NaiveDate,
    pub amount: i64,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub payee_name: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

impl TransactionDto {
    /// `None` when the id is not a UUID; such entries cannot be deleted by id.
    pub fn into_domain(self) -> Option<RegisterTransaction> {
        let id = Uuid::parse_str(&self.id).ok()?;
        Some(RegisterTransaction {
            id,
            date: self.date,
            amount: self.amount,
            memo: self.memo,
            payee_name: self.payee_name,
            deleted: self.deleted,
        })
    }
}
