use thiserror::Error;

use forecast_domain::FrequencyError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{operation} failed{}: {message}", status_suffix(.status))]
    Transport {
        operation: &'static str,
        status: Option<u16>,
        message: String,
    },
    #[error("{operation} rejected by rate limit")]
    RateLimited { operation: &'static str },
    #[error(transparent)]
    UnknownFrequency(#[from] FrequencyError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|code| format!(" (HTTP {code})"))
        .unwrap_or_default()
}

impl CoreError {
    pub fn transport(operation: &'static str, message: impl Into<String>) -> Self {
        CoreError::Transport {
            operation,
            status: None,
            message: message.into(),
        }
    }

    /// Write failures of these kinds are abandoned for the run and retried by the next one.
    pub fn is_transient(&self) -> bool {
        matches!(self, CoreError::Transport { .. } | CoreError::RateLimited { .. })
    }
}
