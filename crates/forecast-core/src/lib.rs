//! forecast-core
//!
//! Reconciliation logic that projects recurring masters into one-time
//! forecast entries. Depends on forecast-domain. No HTTP, no terminal I/O;
//! the budgeting service is reached only through [`budget`] traits.

pub mod budget;
pub mod diff;
pub mod error;
pub mod history;
pub mod identity;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod pacer;
pub mod sync_service;
pub mod time;

pub use budget::{BudgetReader, BudgetWriter};
pub use diff::{reconcile, ExistingForecast, ForecastKey, ReconcilePlan};
pub use error::CoreError;
pub use history::stale_history;
pub use identity::{IdentityResolver, FORECAST_MARKER};
#[cfg(any(test, feature = "test-util"))]
pub use memory::{InMemoryBudget, WriteRecord};
pub use pacer::{RatePacer, Sleeper, ThreadSleeper};
pub use sync_service::{
    RunPhase, SkipCounts, SyncOptions, SyncReport, SyncService, WriteFailure, WriteOperation,
};
pub use time::{Clock, FixedClock, SystemClock};
