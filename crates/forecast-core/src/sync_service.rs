//! One reconciliation run: fetch, project, diff, then report or apply.

use std::{fmt, time::Duration};

use chrono::{Days, NaiveDate};
use uuid::Uuid;

use forecast_domain::{
    occurrences, ForecastEntry, ForecastOccurrence, HorizonWindow, MasterTransaction,
    RegisterTransaction, ScheduledTransaction,
};

use crate::{
    budget::{BudgetReader, BudgetWriter},
    diff::{reconcile, ExistingForecast, ReconcilePlan},
    history::stale_history,
    identity::{encode_label, is_engine_owned, strip_marker, IdentityResolver},
    pacer::{default_delay, RatePacer, Sleeper, ThreadSleeper},
    time::Clock,
    CoreError,
};

pub const DEFAULT_HORIZON_DAYS: u32 = 28;
pub const DEFAULT_HISTORY_LOOKBACK_DAYS: u32 = 30;

/// Tuning for a single run.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOptions {
    pub horizon_days: u32,
    pub dry_run: bool,
    pub pacer_delay: Duration,
    /// Delete past register transactions that still carry the forecast marker.
    pub prune_history: bool,
    pub history_lookback_days: u32,
    /// Leave out each master's own next date, which the service already shows.
    pub skip_next_due: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            dry_run: false,
            pacer_delay: default_delay(),
            prune_history: true,
            history_lookback_days: DEFAULT_HISTORY_LOOKBACK_DAYS,
            skip_next_due: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Fetching,
    Computing,
    Diffing,
    DryRunReport,
    Applying,
    Done,
}

/// Masters that contributed no occurrences, by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipCounts {
    pub split: usize,
    pub empty_memo: usize,
    pub unknown_frequency: usize,
}

impl SkipCounts {
    pub fn total(&self) -> usize {
        self.split + self.empty_memo + self.unknown_frequency
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOperation {
    Create,
    Delete,
    DeleteHistory,
}

impl fmt::Display for WriteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WriteOperation::Create => "create forecast",
            WriteOperation::Delete => "delete forecast",
            WriteOperation::DeleteHistory => "delete history",
        };
        f.write_str(label)
    }
}

/// A single write abandoned for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFailure {
    pub operation: WriteOperation,
    pub id: Option<Uuid>,
    pub date: NaiveDate,
    pub label: String,
    pub message: String,
    pub rate_limited: bool,
}

/// Outcome of a run. In dry-run mode the counts are the planned operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub window: HorizonWindow,
    pub dry_run: bool,
    pub created: usize,
    pub deleted: usize,
    pub history_deleted: usize,
    pub skipped: SkipCounts,
    pub plan: ReconcilePlan,
    pub history: Vec<RegisterTransaction>,
    pub failures: Vec<WriteFailure>,
}

impl SyncReport {
    pub fn skipped_masters(&self) -> usize {
        self.skipped.total()
    }
}

struct Snapshot {
    scheduled: Vec<ScheduledTransaction>,
    register: Vec<RegisterTransaction>,
}

struct Projection {
    targets: Vec<ForecastOccurrence>,
    resolver: IdentityResolver,
    skipped: SkipCounts,
}

/// Drives one reconciliation run against a budget.
pub struct SyncService<'a, B, S = ThreadSleeper> {
    budget: &'a B,
    clock: &'a dyn Clock,
    options: SyncOptions,
    pacer: RatePacer<S>,
    phase: RunPhase,
}

impl<'a, B> SyncService<'a, B, ThreadSleeper>
where
    B: BudgetReader + BudgetWriter,
{
    pub fn new(budget: &'a B, clock: &'a dyn Clock, options: SyncOptions) -> Self {
        let pacer = RatePacer::new(options.pacer_delay);
        Self::with_pacer(budget, clock, options, pacer)
    }
}

impl<'a, B, S> SyncService<'a, B, S>
where
    B: BudgetReader + BudgetWriter,
    S: Sleeper,
{
    pub fn with_pacer(
        budget: &'a B,
        clock: &'a dyn Clock,
        options: SyncOptions,
        pacer: RatePacer<S>,
    ) -> Self {
        Self {
            budget,
            clock,
            options,
            pacer,
            phase: RunPhase::Idle,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn pacer(&self) -> &RatePacer<S> {
        &self.pacer
    }

    /// Executes the run. Read failures abort before any write is issued;
    /// write failures are recorded in the report and the run continues.
    pub fn run(&mut self) -> Result<SyncReport, CoreError> {
        let today = self.clock.today();
        let window = HorizonWindow::forward_from(today, self.options.horizon_days)
            .map_err(|err| CoreError::InvalidConfig(err.to_string()))?;

        self.enter(RunPhase::Fetching);
        let snapshot = self.fetch(today)?;

        self.enter(RunPhase::Computing);
        let projection = self.project(&snapshot.scheduled, window);

        self.enter(RunPhase::Diffing);
        let Projection {
            targets,
            mut resolver,
            skipped,
        } = projection;
        let existing = owned_entries(&snapshot.scheduled, &mut resolver);
        let plan = reconcile(&targets, &existing);
        let history = if self.options.prune_history {
            stale_history(&snapshot.register, today)
        } else {
            Vec::new()
        };
        tracing::debug!(
            targets = targets.len(),
            existing = existing.len(),
            create = plan.create.len(),
            delete = plan.delete.len(),
            unchanged = plan.unchanged,
            "reconciliation plan computed"
        );

        let mut report = SyncReport {
            window,
            dry_run: self.options.dry_run,
            created: 0,
            deleted: 0,
            history_deleted: 0,
            skipped,
            plan,
            history,
            failures: Vec::new(),
        };

        if self.options.dry_run {
            self.enter(RunPhase::DryRunReport);
            describe_plan(&report);
            report.created = report.plan.create.len();
            report.deleted = report.plan.delete.len();
            report.history_deleted = report.history.len();
        } else {
            self.enter(RunPhase::Applying);
            self.apply(&mut report);
        }

        self.enter(RunPhase::Done);
        tracing::info!(
            dry_run = report.dry_run,
            created = report.created,
            deleted = report.deleted,
            history_deleted = report.history_deleted,
            skipped_masters = report.skipped_masters(),
            failures = report.failures.len(),
            "forecast sync finished"
        );
        Ok(report)
    }

    fn enter(&mut self, phase: RunPhase) {
        tracing::debug!(from = ?self.phase, to = ?phase, "sync phase");
        self.phase = phase;
    }

    fn fetch(&self, today: NaiveDate) -> Result<Snapshot, CoreError> {
        let since = if self.options.prune_history {
            Some(history_start(today, self.options.history_lookback_days)?)
        } else {
            None
        };
        let scheduled = self.budget.scheduled_transactions()?;
        let register = match since {
            Some(since) => self.budget.register_transactions(since)?,
            None => Vec::new(),
        };
        tracing::info!(
            scheduled = scheduled.len(),
            register = register.len(),
            "fetched budget state"
        );
        Ok(Snapshot {
            scheduled,
            register,
        })
    }

    fn project(&self, scheduled: &[ScheduledTransaction], window: HorizonWindow) -> Projection {
        let mut targets = Vec::new();
        let mut resolver = IdentityResolver::new();
        let mut skipped = SkipCounts::default();

        for source in scheduled {
            if source.deleted || source.is_one_time() {
                continue;
            }
            if source.is_split {
                tracing::debug!(id = %source.id, "skipping split master");
                skipped.split += 1;
                continue;
            }
            if strip_marker(source.memo_text()).is_empty() {
                tracing::debug!(id = %source.id, "skipping master without memo");
                skipped.empty_memo += 1;
                continue;
            }
            let frequency = match source.parsed_frequency() {
                Ok(frequency) => frequency,
                Err(err) => {
                    tracing::warn!(id = %source.id, error = %err, "skipping master");
                    skipped.unknown_frequency += 1;
                    continue;
                }
            };

            let master = MasterTransaction::from_scheduled(source, frequency);
            let mut dates = occurrences(master.frequency, master.anchor, window);
            if self.options.skip_next_due {
                dates.retain(|date| *date != master.next_due);
            }
            let label = encode_label(&master.memo);
            targets.extend(dates.iter().map(|date| ForecastOccurrence {
                master_id: master.id,
                date: *date,
                label: label.clone(),
                amount: master.amount,
                account_id: master.account_id,
                payee_id: master.payee_id,
                payee_name: master.payee_name.clone(),
                category_id: master.category_id,
                flag_color: master.flag_color.clone(),
            }));
            resolver.register(&master, dates);
        }

        Projection {
            targets,
            resolver,
            skipped,
        }
    }

    fn apply(&mut self, report: &mut SyncReport) {
        let budget = self.budget;

        for entry in &report.plan.delete {
            match self
                .pacer
                .pace(|| budget.delete_scheduled_transaction(entry.id))
            {
                Ok(()) => {
                    tracing::info!(
                        id = %entry.id,
                        date = %entry.date,
                        label = %entry.label,
                        "deleted forecast"
                    );
                    report.deleted += 1;
                }
                Err(err) => report.failures.push(failure(
                    WriteOperation::Delete,
                    Some(entry.id),
                    entry.date,
                    &entry.label,
                    &err,
                )),
            }
        }

        for txn in &report.history {
            match self.pacer.pace(|| budget.delete_register_transaction(txn.id)) {
                Ok(()) => {
                    tracing::info!(
                        id = %txn.id,
                        date = %txn.date,
                        "deleted past forecast transaction"
                    );
                    report.history_deleted += 1;
                }
                Err(err) => report.failures.push(failure(
                    WriteOperation::DeleteHistory,
                    Some(txn.id),
                    txn.date,
                    txn.memo.as_deref().unwrap_or_default(),
                    &err,
                )),
            }
        }

        for occurrence in &report.plan.create {
            let payload = occurrence.to_new_entry();
            match self
                .pacer
                .pace(|| budget.create_scheduled_transaction(&payload))
            {
                Ok(id) => {
                    tracing::info!(
                        %id,
                        date = %occurrence.date,
                        label = %occurrence.label,
                        "created forecast"
                    );
                    report.created += 1;
                }
                Err(err) => report.failures.push(failure(
                    WriteOperation::Create,
                    None,
                    occurrence.date,
                    &occurrence.label,
                    &err,
                )),
            }
        }
    }
}

fn history_start(today: NaiveDate, lookback_days: u32) -> Result<NaiveDate, CoreError> {
    today
        .checked_sub_days(Days::new(u64::from(lookback_days)))
        .ok_or_else(|| {
            CoreError::InvalidConfig(format!(
                "history lookback of {lookback_days} days is out of range"
            ))
        })
}

/// Engine-owned entries in listing order, each decoded against the projection.
fn owned_entries(
    scheduled: &[ScheduledTransaction],
    resolver: &mut IdentityResolver,
) -> Vec<ExistingForecast> {
    scheduled
        .iter()
        .filter(|txn| is_engine_owned(txn))
        .map(|txn| {
            let entry = ForecastEntry::from_scheduled(txn);
            let key = resolver.resolve(&entry);
            ExistingForecast { entry, key }
        })
        .collect()
}

fn describe_plan(report: &SyncReport) {
    for entry in &report.plan.delete {
        tracing::info!(
            id = %entry.id,
            date = %entry.date,
            label = %entry.label,
            "[dry-run] would delete forecast"
        );
    }
    for txn in &report.history {
        tracing::info!(
            id = %txn.id,
            date = %txn.date,
            "[dry-run] would delete past forecast transaction"
        );
    }
    for occurrence in &report.plan.create {
        tracing::info!(
            date = %occurrence.date,
            label = %occurrence.label,
            amount = occurrence.amount,
            "[dry-run] would create forecast"
        );
    }
}

fn failure(
    operation: WriteOperation,
    id: Option<Uuid>,
    date: NaiveDate,
    label: &str,
    err: &CoreError,
) -> WriteFailure {
    let rate_limited = matches!(err, CoreError::RateLimited { .. });
    tracing::warn!(%operation, ?id, %date, error = %err, "write failed; left for next run");
    WriteFailure {
        operation,
        id,
        date,
        label: label.to_string(),
        message: err.to_string(),
        rate_limited,
    }
}
