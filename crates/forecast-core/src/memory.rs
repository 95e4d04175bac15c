//! In-memory budget with failure injection, for tests.

use std::{cell::RefCell, collections::HashSet};

use chrono::NaiveDate;
use uuid::Uuid;

use forecast_domain::{
    Frequency, NewScheduledTransaction, RegisterTransaction, ScheduledTransaction,
};

use crate::{
    budget::{BudgetReader, BudgetWriter},
    CoreError,
};

/// One write accepted by [`InMemoryBudget`], in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteRecord {
    Created { id: Uuid, date: NaiveDate, memo: String },
    DeletedScheduled(Uuid),
    DeletedRegister(Uuid),
}

#[derive(Debug, Default)]
struct State {
    scheduled: Vec<ScheduledTransaction>,
    register: Vec<RegisterTransaction>,
    writes: Vec<WriteRecord>,
    fail_reads: bool,
    rate_limit_writes: bool,
    failing_create_dates: HashSet<NaiveDate>,
}

/// Budget kept entirely in memory. Listing order is insertion order.
#[derive(Debug, Default)]
pub struct InMemoryBudget {
    state: RefCell<State>,
}

impl InMemoryBudget {
    pub fn new(scheduled: Vec<ScheduledTransaction>, register: Vec<RegisterTransaction>) -> Self {
        Self {
            state: RefCell::new(State {
                scheduled,
                register,
                ..State::default()
            }),
        }
    }

    pub fn scheduled(&self) -> Vec<ScheduledTransaction> {
        self.state.borrow().scheduled.clone()
    }

    pub fn register(&self) -> Vec<RegisterTransaction> {
        self.state.borrow().register.clone()
    }

    pub fn writes(&self) -> Vec<WriteRecord> {
        self.state.borrow().writes.clone()
    }

    pub fn clear_writes(&self) {
        self.state.borrow_mut().writes.clear();
    }

    /// Replaces the scheduled transaction with the same id.
    pub fn update_scheduled(&self, transaction: ScheduledTransaction) {
        let mut state = self.state.borrow_mut();
        if let Some(slot) = state.scheduled.iter_mut().find(|t| t.id == transaction.id) {
            *slot = transaction;
        }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.state.borrow_mut().fail_reads = fail;
    }

    pub fn set_rate_limit_writes(&self, limited: bool) {
        self.state.borrow_mut().rate_limit_writes = limited;
    }

    /// Makes creates dated `date` fail with a transport error.
    pub fn fail_creates_on(&self, date: NaiveDate) {
        self.state.borrow_mut().failing_create_dates.insert(date);
    }

    pub fn clear_failures(&self) {
        let mut state = self.state.borrow_mut();
        state.fail_reads = false;
        state.rate_limit_writes = false;
        state.failing_create_dates.clear();
    }

    fn check_read(&self, operation: &'static str) -> Result<(), CoreError> {
        if self.state.borrow().fail_reads {
            return Err(CoreError::transport(operation, "budget unavailable"));
        }
        Ok(())
    }

    fn check_write(&self, operation: &'static str) -> Result<(), CoreError> {
        if self.state.borrow().rate_limit_writes {
            return Err(CoreError::RateLimited { operation });
        }
        Ok(())
    }
}

impl BudgetReader for InMemoryBudget {
    fn scheduled_transactions(&self) -> Result<Vec<ScheduledTransaction>, CoreError> {
        self.check_read("list scheduled transactions")?;
        Ok(self
            .state
            .borrow()
            .scheduled
            .iter()
            .filter(|t| !t.deleted)
            .cloned()
            .collect())
    }

    fn register_transactions(
        &self,
        since: NaiveDate,
    ) -> Result<Vec<RegisterTransaction>, CoreError> {
        self.check_read("list transactions")?;
        Ok(self
            .state
            .borrow()
            .register
            .iter()
            .filter(|t| !t.deleted && t.date >= since)
            .cloned()
            .collect())
    }
}

impl BudgetWriter for InMemoryBudget {
    fn create_scheduled_transaction(
        &self,
        transaction: &NewScheduledTransaction,
    ) -> Result<Uuid, CoreError> {
        const OPERATION: &str = "create scheduled transaction";
        self.check_write(OPERATION)?;
        let mut state = self.state.borrow_mut();
        if state.failing_create_dates.contains(&transaction.date) {
            return Err(CoreError::Transport {
                operation: OPERATION,
                status: Some(500),
                message: "internal server error".into(),
            });
        }
        let id = Uuid::new_v4();
        state.scheduled.push(ScheduledTransaction {
            id,
            date_first: transaction.date,
            date_next: transaction.date,
            frequency: Frequency::Never.as_str().to_string(),
            amount: transaction.amount,
            memo: Some(transaction.memo.clone()),
            flag_color: transaction.flag_color.clone(),
            account_id: transaction.account_id,
            payee_id: transaction.payee_id,
            payee_name: transaction.payee_name.clone(),
            category_id: transaction.category_id,
            transfer_account_id: None,
            is_split: false,
            deleted: false,
        });
        state.writes.push(WriteRecord::Created {
            id,
            date: transaction.date,
            memo: transaction.memo.clone(),
        });
        Ok(id)
    }

    fn delete_scheduled_transaction(&self, id: Uuid) -> Result<(), CoreError> {
        const OPERATION: &str = "delete scheduled transaction";
        self.check_write(OPERATION)?;
        let mut state = self.state.borrow_mut();
        let before = state.scheduled.len();
        state.scheduled.retain(|t| t.id != id);
        if state.scheduled.len() == before {
            return Err(CoreError::Transport {
                operation: OPERATION,
                status: Some(404),
                message: format!("scheduled transaction {id} not found"),
            });
        }
        state.writes.push(WriteRecord::DeletedScheduled(id));
        Ok(())
    }

    fn delete_register_transaction(&self, id: Uuid) -> Result<(), CoreError> {
        const OPERATION: &str = "delete transaction";
        self.check_write(OPERATION)?;
        let mut state = self.state.borrow_mut();
        let before = state.register.len();
        state.register.retain(|t| t.id != id);
        if state.register.len() == before {
            return Err(CoreError::Transport {
                operation: OPERATION,
                status: Some(404),
                message: format!("transaction {id} not found"),
            });
        }
        state.writes.push(WriteRecord::DeletedRegister(id));
        Ok(())
    }
}
