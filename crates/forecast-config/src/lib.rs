//! forecast-config
//!
//! Run configuration for the forecast sync: the `Config` model, its JSON
//! persistence, environment overrides, and credentials.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{Config, Credentials};
