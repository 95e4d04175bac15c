use thiserror::Error;

use forecast_config::ConfigError;
use forecast_core::CoreError;

/// Top-level failure of a sync invocation.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl AppError {
    /// Whether retrying the same invocation later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Core(err) if err.is_transient())
    }
}
