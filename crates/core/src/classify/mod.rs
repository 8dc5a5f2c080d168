//! Account classification.
//!
//! This module decides where each account is presented:
//! - Balance sheet buckets from explicit tags or keyword heuristics
//! - Profit and loss sections from account code ranges
//! - Owner movements and cash flow counterparts from keywords
//! - Opposite-side presentation of negative bucket balances

pub mod bucket;
pub mod keywords;
pub mod movements;
pub mod pnl;
pub mod reclassify;
pub mod report;

pub use bucket::{BalanceSheetBucket, BucketSide, ClassificationTag};
pub use keywords::{AccountClassifier, Classification, ClassificationSource};
pub use movements::{
    CashFlowCounterpart, EquityMovementKind, cash_flow_counterpart, equity_movement_kind,
};
pub use pnl::{PnlSection, classify_pnl_section};
pub use reclassify::{
    BucketTotals, RECLASSIFICATION_RULES, Reclassification, reclassify_negative_balances,
};
pub use report::{ClassificationReport, ClassificationReportEntry};
