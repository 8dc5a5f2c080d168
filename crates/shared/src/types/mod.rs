//! Common types used across the application.

pub mod date;
pub mod id;
pub mod money;

pub use date::{DateRange, DateRangeError, parse_report_date};
pub use id::*;
pub use money::{CurrencyCode, round_money, within_tolerance};
