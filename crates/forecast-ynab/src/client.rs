use std::{fmt, time::Duration};

use chrono::NaiveDate;
use reqwest::{blocking::Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use forecast_core::{BudgetReader, BudgetWriter, CoreError};
use forecast_domain::{NewScheduledTransaction, RegisterTransaction, ScheduledTransaction};

use crate::wire::{
    error_message, CreateScheduledRequest, Envelope, ScheduledList, ScheduledSingle,
    TransactionDto, TransactionList,
};

const USER_AGENT: &str = concat!("forecast-sync/", env!("CARGO_PKG_VERSION"));

const LIST_SCHEDULED: &str = "list scheduled transactions";
const LIST_TRANSACTIONS: &str = "list transactions";
const CREATE_SCHEDULED: &str = "create scheduled transaction";
const DELETE_SCHEDULED: &str = "delete scheduled transaction";
const DELETE_TRANSACTION: &str = "delete transaction";

/// Budget access over the YNAB REST API for a single budget.
#[derive(Clone)]
pub struct YnabClient {
    http: reqwest::blocking::Client,
    base_url: String,
    budget_id: String,
    token: String,
}

impl YnabClient {
    pub fn new(
        base_url: impl Into<String>,
        budget_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let base_url = base_url.into();
        let budget_id = budget_id.into();
        if base_url.trim().is_empty() {
            return Err(CoreError::InvalidConfig("api base url must not be empty".into()));
        }
        if budget_id.trim().is_empty() {
            return Err(CoreError::InvalidConfig("budget id must not be empty".into()));
        }

        let http = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .timeout(Duration::from_secs(60))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| CoreError::transport("build http client", err.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            budget_id,
            token: token.into(),
        })
    }

    /// Absolute URL of `path` under the configured budget.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/budgets/{}/{}",
            self.base_url,
            self.budget_id,
            path.trim_start_matches('/')
        )
    }

    fn get<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        url: String,
        query: &[(&str, String)],
    ) -> Result<T, CoreError> {
        debug!(operation, %url, "GET");
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .map_err(|err| CoreError::transport(operation, err.to_string()))?;
        decode(operation, check(operation, response)?)
    }

    fn delete(&self, operation: &'static str, url: String) -> Result<(), CoreError> {
        debug!(operation, %url, "DELETE");
        let response = self
            .http
            .delete(url)
            .bearer_auth(&self.token)
            .send()
            .map_err(|err| CoreError::transport(operation, err.to_string()))?;
        check(operation, response).map(|_| ())
    }
}

impl fmt::Debug for YnabClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YnabClient")
            .field("base_url", &self.base_url)
            .field("budget_id", &self.budget_id)
            .finish_non_exhaustive()
    }
}

impl BudgetReader for YnabClient {
    fn scheduled_transactions(&self) -> Result<Vec<ScheduledTransaction>, CoreError> {
        let envelope: Envelope<ScheduledList> =
            self.get(LIST_SCHEDULED, self.endpoint("scheduled_transactions"), &[])?;
        Ok(envelope
            .data
            .scheduled_transactions
            .into_iter()
            .map(ScheduledTransaction::from)
            .filter(|t| !t.deleted)
            .collect())
    }

    fn register_transactions(
        &self,
        since: NaiveDate,
    ) -> Result<Vec<RegisterTransaction>, CoreError> {
        let query = [("since_date", since.format("%Y-%m-%d").to_string())];
        let envelope: Envelope<TransactionList> =
            self.get(LIST_TRANSACTIONS, self.endpoint("transactions"), &query)?;
        let mut register = Vec::with_capacity(envelope.data.transactions.len());
        for dto in envelope.data.transactions {
            let raw_id = dto.id.clone();
            match dto.into_domain() {
                Some(transaction) if !transaction.deleted => register.push(transaction),
                Some(_) => {}
                None => debug!(id = %raw_id, "skipping transaction without a uuid id"),
            }
        }
        Ok(register)
    }
}

impl BudgetWriter for YnabClient {
    fn create_scheduled_transaction(
        &self,
        transaction: &NewScheduledTransaction,
    ) -> Result<Uuid, CoreError> {
        let url = self.endpoint("scheduled_transactions");
        debug!(operation = CREATE_SCHEDULED, %url, date = %transaction.date, "POST");
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(&CreateScheduledRequest {
                scheduled_transaction: transaction,
            })
            .send()
            .map_err(|err| CoreError::transport(CREATE_SCHEDULED, err.to_string()))?;
        let envelope: Envelope<ScheduledSingle> =
            decode(CREATE_SCHEDULED, check(CREATE_SCHEDULED, response)?)?;
        Ok(envelope.data.scheduled_transaction.id)
    }

    fn delete_scheduled_transaction(&self, id: Uuid) -> Result<(), CoreError> {
        self.delete(
            DELETE_SCHEDULED,
            self.endpoint(&format!("scheduled_transactions/{id}")),
        )
    }

    fn delete_register_transaction(&self, id: Uuid) -> Result<(), CoreError> {
        self.delete(DELETE_TRANSACTION, self.endpoint(&format!("transactions/{id}")))
    }
}

fn check(operation: &'static str, response: Response) -> Result<Response, CoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    let err = classify(operation, status, &body);
    warn!(operation, status = status.as_u16(), error = %err, "request rejected");
    Err(err)
}

/// Maps a non-success response to the matching error.
pub fn classify(operation: &'static str, status: StatusCode, body: &str) -> CoreError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return CoreError::RateLimited { operation };
    }
    CoreError::Transport {
        operation,
        status: Some(status.as_u16()),
        message: error_message(body),
    }
}

fn decode<T: DeserializeOwned>(
    operation: &'static str,
    response: Response,
) -> Result<T, CoreError> {
    response
        .json()
        .map_err(|err| CoreError::transport(operation, format!("malformed response: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> YnabClient {
        YnabClient::new("https://api.example.test/v1/", "budget-1", "token").unwrap()
    }

    #[test]
    fn endpoint_joins_base_budget_and_path() {
        let client = client();
        assert_eq!(
            client.endpoint("scheduled_transactions"),
            "https://api.example.test/v1/budgets/budget-1/scheduled_transactions"
        );
        assert_eq!(
            client.endpoint("/transactions"),
            "https://api.example.test/v1/budgets/budget-1/transactions"
        );
    }

    #[test]
    fn empty_budget_id_is_rejected() {
        let err = YnabClient::new("https://api.example.test/v1", " ", "token").unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));
    }

    #[test]
    fn too_many_requests_is_rate_limited() {
        let err = classify(CREATE_SCHEDULED, StatusCode::TOO_MANY_REQUESTS, "");
        assert!(matches!(
            err,
            CoreError::RateLimited { operation } if operation == CREATE_SCHEDULED
        ));
        assert!(err.is_transient());
    }

    #[test]
    fn other_failures_keep_status_and_detail() {
        let body = r#"{"error":{"id":"401","name":"unauthorized","detail":"Unauthorized"}}"#;
        let err = classify(LIST_SCHEDULED, StatusCode::UNAUTHORIZED, body);
        match err {
            CoreError::Transport {
                operation,
                status,
                message,
            } => {
                assert_eq!(operation, LIST_SCHEDULED);
                assert_eq!(status, Some(401));
                assert_eq!(message, "unauthorized: Unauthorized");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
