//! Accounting periods and report date normalization.

pub mod normalizer;
pub mod period;

pub use normalizer::{NormalizerError, PeriodNormalizer, RangeResolution};
pub use period::{AccountingPeriod, OPENING_BALANCES_PERIOD, PeriodStatus};
