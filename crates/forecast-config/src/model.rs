use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

pub const ENV_TOKEN: &str = "YNAB_TOKEN";
pub const ENV_BUDGET_ID: &str = "BUDGET_ID";
pub const ENV_HORIZON_DAYS: &str = "FORECAST_HORIZON_DAYS";
pub const ENV_DRY_RUN: &str = "FORECAST_DRY_RUN";
pub const ENV_PACER_DELAY: &str = "FORECAST_PACER_DELAY_SECONDS";

/// The service rejects scheduled dates more than five years out.
pub const MAX_HORIZON_DAYS: u32 = 1825;
pub const MAX_HISTORY_LOOKBACK_DAYS: u32 = 3650;

/// Stores the options that shape a forecast sync run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_id: Option<String>,
    pub api_base_url: String,
    /// Length of the forecast window in days, counted from today.
    pub horizon_days: u32,
    pub dry_run: bool,
    /// Minimum spacing between writes, in seconds.
    pub pacer_delay_seconds: f64,
    pub prune_history: bool,
    pub history_lookback_days: u32,
    pub skip_next_due: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            budget_id: None,
            api_base_url: Self::default_api_base_url(),
            horizon_days: 28,
            dry_run: false,
            pacer_delay_seconds: 20.0,
            prune_history: true,
            history_lookback_days: 30,
            skip_next_due: false,
        }
    }
}

impl Config {
    pub fn default_api_base_url() -> String {
        "https://api.ynab.com/v1".into()
    }

    /// Applies environment overrides through `lookup`, usually `std::env::var`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(budget_id) = lookup(ENV_BUDGET_ID).filter(|v| !v.trim().is_empty()) {
            self.budget_id = Some(budget_id.trim().to_string());
        }
        if let Some(raw) = lookup(ENV_HORIZON_DAYS) {
            self.horizon_days = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                field: ENV_HORIZON_DAYS,
                reason: format!("`{raw}` is not a whole number of days"),
            })?;
        }
        if let Some(raw) = lookup(ENV_DRY_RUN) {
            self.dry_run = parse_flag(&raw).ok_or_else(|| ConfigError::Invalid {
                field: ENV_DRY_RUN,
                reason: format!("`{raw}` is not a boolean"),
            })?;
        }
        if let Some(raw) = lookup(ENV_PACER_DELAY) {
            self.pacer_delay_seconds = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                field: ENV_PACER_DELAY,
                reason: format!("`{raw}` is not a number of seconds"),
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon_days == 0 || self.horizon_days > MAX_HORIZON_DAYS {
            return Err(ConfigError::Invalid {
                field: "horizon_days",
                reason: format!("must be between 1 and {MAX_HORIZON_DAYS}"),
            });
        }
        if self.history_lookback_days > MAX_HISTORY_LOOKBACK_DAYS {
            return Err(ConfigError::Invalid {
                field: "history_lookback_days",
                reason: format!("must be at most {MAX_HISTORY_LOOKBACK_DAYS}"),
            });
        }
        if !self.pacer_delay_seconds.is_finite() || self.pacer_delay_seconds < 0.0 {
            return Err(ConfigError::Invalid {
                field: "pacer_delay_seconds",
                reason: "must be a non-negative number".into(),
            });
        }
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "api_base_url",
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// The budget to sync. Required for any run that talks to the service.
    pub fn require_budget_id(&self) -> Result<&str, ConfigError> {
        self.budget_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or(ConfigError::MissingCredential(ENV_BUDGET_ID))
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Access token for the budgeting service. Read from the environment only.
#[derive(Clone)]
pub struct Credentials {
    token: String,
}

impl Credentials {
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::MissingCredential(ENV_TOKEN));
        }
        Ok(Self { token })
    }

    pub fn from_env<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(ENV_TOKEN).ok_or(ConfigError::MissingCredential(ENV_TOKEN))?;
        Self::new(token)
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                (ENV_BUDGET_ID, " budget-1 "),
                (ENV_HORIZON_DAYS, "14"),
                (ENV_DRY_RUN, "yes"),
                (ENV_PACER_DELAY, "2.5"),
            ]))
            .unwrap();
        assert_eq!(config.budget_id.as_deref(), Some("budget-1"));
        assert_eq!(config.horizon_days, 14);
        assert!(config.dry_run);
        assert_eq!(config.pacer_delay_seconds, 2.5);
    }

    #[test]
    fn malformed_env_value_is_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_env(env(&[(ENV_HORIZON_DAYS, "four weeks")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: ENV_HORIZON_DAYS, .. }));
    }

    #[test]
    fn validate_bounds_horizon_and_delay() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());
        config.horizon_days = 0;
        assert!(config.validate().is_err());
        config.horizon_days = 28;
        config.pacer_delay_seconds = f64::NAN;
        assert!(config.validate().is_err());
        config.pacer_delay_seconds = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_caps_horizon_at_service_limit() {
        let mut config = Config {
            horizon_days: MAX_HORIZON_DAYS,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
        config.horizon_days = MAX_HORIZON_DAYS + 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "horizon_days", .. })
        ));
    }

    #[test]
    fn validate_bounds_history_lookback() {
        let mut config = Config {
            history_lookback_days: MAX_HISTORY_LOOKBACK_DAYS,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
        config.history_lookback_days = u32::MAX;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "history_lookback_days", .. })
        ));
    }

    #[test]
    fn credentials_require_a_token_and_redact_it() {
        assert!(matches!(
            Credentials::from_env(env(&[])),
            Err(ConfigError::MissingCredential(ENV_TOKEN))
        ));
        let creds = Credentials::from_env(env(&[(ENV_TOKEN, "secret-token")])).unwrap();
        assert_eq!(creds.token(), "secret-token");
        assert!(!format!("{creds:?}").contains("secret-token"));
    }

    #[test]
    fn missing_budget_id_is_reported() {
        let config = Config::default();
        assert!(matches!(
            config.require_budget_id(),
            Err(ConfigError::MissingCredential(ENV_BUDGET_ID))
        ));
    }
}
