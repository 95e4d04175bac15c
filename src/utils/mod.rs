use std::sync::Once;

static TRACING_INIT: Once = Once::new();

pub const DEFAULT_DIRECTIVES: &str = "forecast_sync=info,forecast_core=info,forecast_ynab=warn";

/// Initializes the global tracing subscriber. `RUST_LOG` replaces the
/// default directives when set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
