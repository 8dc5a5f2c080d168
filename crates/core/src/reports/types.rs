//! Report data types shared by all statements.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The five primary statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    /// Trial balance.
    TrialBalance,
    /// Profit and loss.
    ProfitAndLoss,
    /// Balance sheet.
    BalanceSheet,
    /// Statement of changes in equity.
    ChangesInEquity,
    /// Cash flow statement.
    CashFlow,
}

impl StatementKind {
    /// Short code used in references and errors (`TB`, `PL`, `BS`, `SOCE`, `CF`).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::TrialBalance => "TB",
            Self::ProfitAndLoss => "PL",
            Self::BalanceSheet => "BS",
            Self::ChangesInEquity => "SOCE",
            Self::CashFlow => "CF",
        }
    }

    /// Report type identifier.
    #[must_use]
    pub const fn report_type(self) -> &'static str {
        match self {
            Self::TrialBalance => "trial_balance",
            Self::ProfitAndLoss => "profit_and_loss",
            Self::BalanceSheet => "balance_sheet",
            Self::ChangesInEquity => "changes_in_equity",
            Self::CashFlow => "cash_flow",
        }
    }
}

impl std::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A labelled amount on a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    /// Stable machine key (e.g. `trade_receivables`).
    pub key: String,
    /// Presentation label.
    pub label: String,
    /// Amount, rounded to cents.
    pub amount: Decimal,
}

impl StatementLine {
    /// Creates a line.
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            amount,
        }
    }
}
