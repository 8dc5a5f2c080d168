//! Double-entry ledger model.
//!
//! This module implements the read side of the ledger:
//! - Chart of accounts types
//! - Journal entries and posted lines
//! - Normal-balance calculations
//! - Aggregation of posted lines per account

pub mod account;
pub mod aggregate;
pub mod balance;
pub mod posting;

pub use account::{Account, AccountType, TAX_CONTROL_PREFIX};
pub use aggregate::{AccountFilter, AggregateQuery, LedgerAggregator, PostingWindow};
pub use balance::{AccountBalance, AccountTotals, NormalBalance};
pub use posting::{
    EntryStatus, JournalEntry, JournalLine, PostingLine, TAX_ADJUSTMENT_REFERENCE,
    TAX_PAYMENT_REFERENCE,
};
