//! Statement of changes in equity.
//!
//! The total column reconciles opening to closing equity:
//! `closing = opening + profit + contributions - dividends + other movements`,
//! where other movements is the balancing figure.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tieout_shared::types::{DateRange, round_money};

use super::balance_sheet::BalanceSheetReport;
use super::profit_loss::ProfitAndLossReport;
use super::service::ReportService;
use crate::classify::{AccountClassifier, EquityMovementKind, equity_movement_kind};
use crate::ledger::AccountBalance;

/// A column of the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquityComponent {
    /// Share capital and premium.
    ShareCapital,
    /// Other reserves.
    OtherReserves,
    /// Retained earnings.
    RetainedEarnings,
}

/// Opening and closing amounts of one equity component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityComponentBalance {
    /// Component.
    pub component: EquityComponent,
    /// Balance the day before the range.
    pub opening: Decimal,
    /// Balance at the end of the range.
    pub closing: Decimal,
}

/// Movement of total equity over the range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityMovement {
    /// Total equity the day before the range.
    pub opening: Decimal,
    /// Profit or loss for the range.
    pub profit_or_loss: Decimal,
    /// Capital paid in by owners.
    pub owner_contributions: Decimal,
    /// Dividends and drawings (positive amount, deducted).
    pub dividends: Decimal,
    /// Balancing figure.
    pub other_movements: Decimal,
    /// Total equity at the end of the range.
    pub closing: Decimal,
}

/// Statement of changes in equity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangesInEquityReport {
    /// Period covered.
    pub range: DateRange,
    /// Opening and closing per component.
    pub components: Vec<EquityComponentBalance>,
    /// Total column.
    pub total: EquityMovement,
}

impl ChangesInEquityReport {
    /// An all-zero statement.
    #[must_use]
    pub fn empty(range: DateRange) -> Self {
        let components = [
            EquityComponent::ShareCapital,
            EquityComponent::OtherReserves,
            EquityComponent::RetainedEarnings,
        ]
        .into_iter()
        .map(|component| EquityComponentBalance {
            component,
            opening: Decimal::ZERO,
            closing: Decimal::ZERO,
        })
        .collect();

        Self {
            range,
            components,
            total: EquityMovement::default(),
        }
    }
}

impl ReportService {
    /// Generates the statement of changes in equity.
    ///
    /// `opening` is the balance sheet the day before the range, `closing` the
    /// one at its end. `equity_balances` are equity account totals over the
    /// range, read for owner contributions and dividends.
    #[must_use]
    pub fn generate_changes_in_equity(
        range: DateRange,
        opening: &BalanceSheetReport,
        closing: &BalanceSheetReport,
        profit_and_loss: &ProfitAndLossReport,
        equity_balances: &[AccountBalance],
    ) -> ChangesInEquityReport {
        let mut owner_contributions = Decimal::ZERO;
        let mut dividends = Decimal::ZERO;

        for balance in equity_balances {
            let bucket = AccountClassifier::classify(&balance.account).bucket;
            match equity_movement_kind(&balance.account, bucket) {
                Some(EquityMovementKind::OwnerContribution) => {
                    owner_contributions = round_money(owner_contributions + balance.natural());
                }
                Some(EquityMovementKind::Dividend) => {
                    dividends = round_money(dividends + balance.net_debit());
                }
                None => {}
            }
        }

        let opening_total = opening.total_equity;
        let closing_total = closing.total_equity;
        let profit_or_loss = profit_and_loss.profit_or_loss;
        let other_movements = round_money(
            closing_total - opening_total - profit_or_loss - owner_contributions + dividends,
        );

        let component = |component, open: Decimal, close: Decimal| EquityComponentBalance {
            component,
            opening: open,
            closing: close,
        };

        ChangesInEquityReport {
            range,
            components: vec![
                component(
                    EquityComponent::ShareCapital,
                    opening.equity.share_capital,
                    closing.equity.share_capital,
                ),
                component(
                    EquityComponent::OtherReserves,
                    opening.equity.other_reserves,
                    closing.equity.other_reserves,
                ),
                component(
                    EquityComponent::RetainedEarnings,
                    opening.equity.retained_earnings,
                    closing.equity.retained_earnings,
                ),
            ],
            total: EquityMovement {
                opening: opening_total,
                profit_or_loss,
                owner_contributions,
                dividends,
                other_movements,
                closing: closing_total,
            },
        }
    }
}
