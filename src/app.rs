//! Wiring between configuration, the budget adapter, and the sync engine.

use std::time::Duration;

use forecast_config::{Config, ConfigError, ConfigManager, Credentials};
use forecast_core::{
    BudgetReader, BudgetWriter, Clock, SyncOptions, SyncReport, SyncService, SystemClock,
};
use forecast_ynab::YnabClient;

use crate::errors::AppError;

/// Values given on the command line. They win over environment and file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub budget_id: Option<String>,
    pub horizon_days: Option<u32>,
    pub dry_run: bool,
    pub pacer_delay_seconds: Option<f64>,
}

impl Overrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(budget_id) = &self.budget_id {
            config.budget_id = Some(budget_id.clone());
        }
        if let Some(days) = self.horizon_days {
            config.horizon_days = days;
        }
        if self.dry_run {
            config.dry_run = true;
        }
        if let Some(seconds) = self.pacer_delay_seconds {
            config.pacer_delay_seconds = seconds;
        }
    }
}

/// Loads the stored config and layers environment then CLI values on top.
pub fn resolve_config<F>(
    manager: &ConfigManager,
    overrides: &Overrides,
    env: F,
) -> Result<Config, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = manager.load()?;
    config.apply_env(env)?;
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

pub fn sync_options(config: &Config) -> Result<SyncOptions, AppError> {
    let pacer_delay =
        Duration::try_from_secs_f64(config.pacer_delay_seconds).map_err(|err| {
            ConfigError::Invalid {
                field: "pacer_delay_seconds",
                reason: err.to_string(),
            }
        })?;
    Ok(SyncOptions {
        horizon_days: config.horizon_days,
        dry_run: config.dry_run,
        pacer_delay,
        prune_history: config.prune_history,
        history_lookback_days: config.history_lookback_days,
        skip_next_due: config.skip_next_due,
    })
}

/// Runs one sync against any budget implementation.
pub fn run_sync<B>(
    budget: &B,
    clock: &dyn Clock,
    options: SyncOptions,
) -> Result<SyncReport, AppError>
where
    B: BudgetReader + BudgetWriter,
{
    let mut service = SyncService::new(budget, clock, options);
    Ok(service.run()?)
}

/// Runs one sync against the configured YNAB budget.
pub fn run(config: &Config, credentials: &Credentials) -> Result<SyncReport, AppError> {
    let budget_id = config.require_budget_id()?;
    let options = sync_options(config)?;
    let client = YnabClient::new(&config.api_base_url, budget_id, credentials.token())?;
    tracing::info!(
        budget_id,
        horizon_days = options.horizon_days,
        dry_run = options.dry_run,
        "starting forecast sync"
    );
    run_sync(&client, &SystemClock, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_take_precedence_over_environment() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manager = ConfigManager::new(dir.path().join("config.json"));
        manager
            .save(&Config {
                horizon_days: 10,
                ..Config::default()
            })
            .expect("save");

        let env = |key: &str| match key {
            "FORECAST_HORIZON_DAYS" => Some("14".to_string()),
            "BUDGET_ID" => Some("from-env".to_string()),
            _ => None,
        };
        let overrides = Overrides {
            horizon_days: Some(21),
            dry_run: true,
            ..Overrides::default()
        };

        let config = resolve_config(&manager, &overrides, env).expect("resolve");

        assert_eq!(config.horizon_days, 21);
        assert_eq!(config.budget_id.as_deref(), Some("from-env"));
        assert!(config.dry_run);
    }

    #[test]
    fn invalid_override_fails_validation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manager = ConfigManager::new(dir.path().join("config.json"));
        let overrides = Overrides {
            horizon_days: Some(0),
            ..Overrides::default()
        };

        let err = resolve_config(&manager, &overrides, |_: &str| None).unwrap_err();

        assert!(matches!(err, AppError::Config(ConfigError::Invalid { .. })));
    }

    #[test]
    fn options_mirror_config() {
        let config = Config {
            pacer_delay_seconds: 0.25,
            skip_next_due: true,
            ..Config::default()
        };

        let options = sync_options(&config).expect("options");

        assert_eq!(options.pacer_delay, Duration::from_millis(250));
        assert_eq!(options.horizon_days, 28);
        assert!(options.skip_next_due);
        assert!(options.prune_history);
    }

    #[test]
    fn live_run_requires_budget_id() {
        let credentials = Credentials::new("token").expect("credentials");
        let err = run(&Config::default(), &credentials).unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::MissingCredential(_))));
    }
}
