use forecast_config::{Config, ConfigError, ConfigManager};
use tempfile::tempdir;

#[test]
fn default_config_matches_documented_values() {
    let cfg = Config::default();

    assert_eq!(cfg.horizon_days, 28);
    assert_eq!(cfg.pacer_delay_seconds, 20.0);
    assert!(!cfg.dry_run);
    assert!(cfg.prune_history);
    assert_eq!(cfg.history_lookback_days, 30);
    assert!(!cfg.skip_next_due);
    assert!(cfg.budget_id.is_none());
    assert!(cfg.api_base_url.starts_with("https://"));
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("absent.json"));

    let loaded = manager.load().expect("load defaults");

    assert_eq!(loaded, Config::default());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let cfg = Config {
        budget_id: Some("budget-42".into()),
        horizon_days: 60,
        dry_run: true,
        pacer_delay_seconds: 1.5,
        ..Config::default()
    };

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert!(manager.config_path().ends_with("forecast_sync/config.json"));
    let leftovers: Vec<_> = std::fs::read_dir(manager.config_path().parent().unwrap())
        .expect("read dir")
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn partial_file_fills_missing_fields_with_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "horizon_days": 7 }"#).expect("write");

    let loaded = ConfigManager::new(path).load().expect("load");

    assert_eq!(loaded.horizon_days, 7);
    assert_eq!(loaded.pacer_delay_seconds, 20.0);
    assert!(loaded.prune_history);
}

#[test]
fn malformed_file_reports_serde_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").expect("write");

    let err = ConfigManager::new(path).load().unwrap_err();

    assert!(matches!(err, ConfigError::Serde(_)));
}
