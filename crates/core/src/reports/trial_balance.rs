//! Trial balance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tieout_shared::types::{AccountId, DateRange, round_money};

use super::service::ReportService;
use crate::ledger::{AccountBalance, AccountType};

/// One account on the trial balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Total debits in the range.
    pub debit: Decimal,
    /// Total credits in the range.
    pub credit: Decimal,
    /// Balance on the account's normal side.
    pub balance: Decimal,
}

/// Trial balance totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceTotals {
    /// Total debit.
    pub total_debit: Decimal,
    /// Total credit.
    pub total_credit: Decimal,
    /// Whether debits equal credits.
    pub is_balanced: bool,
}

/// Trial balance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// Dates whose postings are included.
    pub range: DateRange,
    /// Accounts with activity, ordered by code.
    pub rows: Vec<TrialBalanceRow>,
    /// Totals.
    pub totals: TrialBalanceTotals,
}

impl TrialBalanceReport {
    /// An empty, balanced trial balance.
    #[must_use]
    pub const fn empty(range: DateRange) -> Self {
        Self {
            range,
            rows: Vec::new(),
            totals: TrialBalanceTotals {
                total_debit: Decimal::ZERO,
                total_credit: Decimal::ZERO,
                is_balanced: true,
            },
        }
    }
}

impl ReportService {
    /// Generates a trial balance from per-account totals.
    ///
    /// Accounts without postings are left out.
    #[must_use]
    pub fn generate_trial_balance(range: DateRange, balances: &[AccountBalance]) -> TrialBalanceReport {
        let mut report = TrialBalanceReport::empty(range);

        for balance in balances.iter().filter(|b| !b.is_zero()) {
            report.totals.total_debit = round_money(report.totals.total_debit + balance.total_debit);
            report.totals.total_credit =
                round_money(report.totals.total_credit + balance.total_credit);
            report.rows.push(TrialBalanceRow {
                account_id: balance.account.id,
                code: balance.account.code.clone(),
                name: balance.account.name.clone(),
                account_type: balance.account_type(),
                debit: balance.total_debit,
                credit: balance.total_credit,
                balance: balance.natural(),
            });
        }

        report.rows.sort_by(|a, b| a.code.cmp(&b.code));
        report.totals.is_balanced = report.totals.total_debit == report.totals.total_credit;
        report
    }
}
