//! Collaborator seams for the budgeting service.

use chrono::NaiveDate;
use uuid::Uuid;

use forecast_domain::{NewScheduledTransaction, RegisterTransaction, ScheduledTransaction};

use crate::CoreError;

/// Read side of the budgeting service. Any error here is fatal for the run.
pub trait BudgetReader {
    /// Lists every scheduled transaction, masters and one-time entries alike.
    fn scheduled_transactions(&self) -> Result<Vec<ScheduledTransaction>, CoreError>;

    /// Lists entered register transactions dated on or after `since`.
    fn register_transactions(&self, since: NaiveDate)
        -> Result<Vec<RegisterTransaction>, CoreError>;
}

/// Write side of the budgeting service. Errors are per item and non-fatal.
pub trait BudgetWriter {
    /// Creates a one-time scheduled transaction and returns its new identifier.
    fn create_scheduled_transaction(
        &self,
        transaction: &NewScheduledTransaction,
    ) -> Result<Uuid, CoreError>;

    fn delete_scheduled_transaction(&self, id: Uuid) -> Result<(), CoreError>;

    fn delete_register_transaction(&self, id: Uuid) -> Result<(), CoreError>;
}
