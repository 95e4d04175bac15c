//! forecast-ynab
//!
//! Blocking REST adapter that implements the forecast-core budget traits
//! against the YNAB API.

pub mod client;
pub mod wire;

pub use client::YnabClient;
