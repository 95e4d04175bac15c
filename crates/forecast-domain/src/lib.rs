//! forecast-domain
//!
//! Pure domain models for scheduled transactions and their recurrence rules.
//! No I/O, no HTTP, no configuration. Only data types and date arithmetic.

pub mod common;
pub mod frequency;
pub mod recurrence;
pub mod transaction;

pub use common::*;
pub use frequency::*;
pub use recurrence::*;
pub use transaction::*;
