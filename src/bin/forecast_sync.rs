//! forecast_sync - keeps one-time forecast entries in step with recurring
//! scheduled transactions.

use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;

use forecast_config::{ConfigManager, Credentials};
use forecast_sync::{
    app::{self, Overrides},
    cli::output,
};

/// Project recurring scheduled transactions into one-time forecast entries.
#[derive(Parser, Debug)]
#[command(name = "forecast_sync")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the JSON config file [default: <config dir>/forecast_sync/config.json]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report planned creates and deletes without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Days ahead of today to keep forecast entries for
    #[arg(long)]
    horizon_days: Option<u32>,

    /// Minimum seconds between write requests
    #[arg(long)]
    pacer_delay_seconds: Option<f64>,

    /// Budget to synchronize
    #[arg(long)]
    budget_id: Option<String>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> ExitCode {
    forecast_sync::init();
    let cli = Cli::parse();
    match execute(cli) {
        Ok(code) => code,
        Err(err) => {
            output::error(format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli) -> Result<ExitCode> {
    let manager = ConfigManager::new(cli.config.unwrap_or_else(ConfigManager::default_path));
    let overrides = Overrides {
        budget_id: cli.budget_id,
        horizon_days: cli.horizon_days,
        dry_run: cli.dry_run,
        pacer_delay_seconds: cli.pacer_delay_seconds,
    };
    let config = app::resolve_config(&manager, &overrides, |key| std::env::var(key).ok())
        .with_context(|| format!("loading config from {}", manager.config_path().display()))?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(ExitCode::SUCCESS);
    }

    let credentials = Credentials::from_env(|key| std::env::var(key).ok())
        .context("reading API credentials")?;
    let report = app::run(&config, &credentials).context("forecast sync failed")?;
    output::print_report(&report);

    if report.failures.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        output::info("Failed writes are retried on the next run.");
        Ok(ExitCode::from(2))
    }
}
