use assert_cmd::Command;
use predicates::str::contains;
use tempfile::tempdir;

fn command() -> Command {
    let mut cmd = Command::cargo_bin("forecast_sync").unwrap();
    cmd.env_remove("YNAB_TOKEN")
        .env_remove("BUDGET_ID")
        .env_remove("FORECAST_HORIZON_DAYS")
        .env_remove("FORECAST_DRY_RUN")
        .env_remove("FORECAST_PACER_DELAY_SECONDS");
    cmd
}

#[test]
fn help_lists_flags() {
    command()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--dry-run"))
        .stdout(contains("--horizon-days"));
}

#[test]
fn print_config_layers_env_and_flags_over_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "horizon_days": 10, "budget_id": "from-file" }"#).unwrap();

    command()
        .arg("--config")
        .arg(&path)
        .args(["--print-config", "--horizon-days", "45"])
        .env("BUDGET_ID", "from-env")
        .env("FORECAST_HORIZON_DAYS", "20")
        .assert()
        .success()
        .stdout(contains("\"horizon_days\": 45"))
        .stdout(contains("\"budget_id\": \"from-env\""));
}

#[test]
fn missing_token_fails_before_any_request() {
    let dir = tempdir().unwrap();

    command()
        .arg("--config")
        .arg(dir.path().join("config.json"))
        .args(["--budget-id", "budget-1", "--dry-run"])
        .assert()
        .failure()
        .stderr(contains("YNAB_TOKEN"));
}

#[test]
fn invalid_horizon_is_rejected() {
    let dir = tempdir().unwrap();

    command()
        .arg("--config")
        .arg(dir.path().join("config.json"))
        .args(["--print-config", "--horizon-days", "0"])
        .assert()
        .failure()
        .stderr(contains("horizon_days"));
}
