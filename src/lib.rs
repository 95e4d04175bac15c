#![doc(test(attr(deny(warnings))))]

//! Forecast Sync projects recurring scheduled transactions into one-time
//! forecast entries inside a rolling horizon, so the budgeting service's
//! running balance reflects every upcoming instance.

pub mod app;
pub mod cli;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("forecast sync tracing initialized");
    });
}
