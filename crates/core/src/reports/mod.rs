//! Financial statement generation.
//!
//! This module provides pure business logic for the five primary statements:
//! - Trial Balance
//! - Profit and Loss
//! - Balance Sheet
//! - Statement of Changes in Equity
//! - Cash Flow Statement (indirect method)

pub mod balance_sheet;
pub mod cash_flow;
pub mod equity;
pub mod error;
pub mod profit_loss;
pub mod service;
pub mod trial_balance;
pub mod types;

#[cfg(test)]
mod tests;

pub use balance_sheet::{BalanceSheetReport, BalanceSheetSection, EquitySection, PPE_NET_KEY};
pub use cash_flow::{CashFlowInputs, CashFlowReport, CashFlowSection};
pub use equity::{ChangesInEquityReport, EquityComponent, EquityComponentBalance, EquityMovement};
pub use error::ReportingError;
pub use profit_loss::{PnlLine, PnlSectionReport, ProfitAndLossReport};
pub use service::ReportService;
pub use trial_balance::{TrialBalanceReport, TrialBalanceRow, TrialBalanceTotals};
pub use types::{StatementKind, StatementLine};
