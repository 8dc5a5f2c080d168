//! Keyword readers for equity movements and cash flow counterparts.

use serde::{Deserialize, Serialize};

use super::bucket::BalanceSheetBucket;
use super::keywords::Haystack;
use crate::ledger::{Account, AccountType};

const DIVIDEND: &[&str] = &[
    "dividend",
    "dividends",
    "distribution",
    "distributions",
    "drawings",
];

/// Owner transactions read from equity accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquityMovementKind {
    /// Capital paid in by owners.
    OwnerContribution,
    /// Dividends or drawings paid to owners.
    Dividend,
}

/// Reads an equity account's movements as owner contributions or dividends.
///
/// `bucket` is the account's balance sheet bucket; share capital accounts
/// count as contributions.
#[must_use]
pub fn equity_movement_kind(
    account: &Account,
    bucket: Option<BalanceSheetBucket>,
) -> Option<EquityMovementKind> {
    if account.account_type != AccountType::Equity {
        return None;
    }
    let h = Haystack::of(account);
    if h.any(DIVIDEND) {
        return Some(EquityMovementKind::Dividend);
    }
    if bucket == Some(BalanceSheetBucket::ShareCapital)
        || h.any(&["capital contribution", "capital contributions", "capital introduced"])
    {
        return Some(EquityMovementKind::OwnerContribution);
    }
    None
}

/// Counterpart categories used to place cash movements in investing or
/// financing activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CashFlowCounterpart {
    /// Property, plant and equipment (cost or accumulated depreciation).
    PropertyPlantEquipment,
    /// Borrowings.
    Borrowings,
    /// Dividends.
    Dividends,
}

/// The counterpart category of a non-cash line in a cash entry.
#[must_use]
pub fn cash_flow_counterpart(
    account: &Account,
    bucket: Option<BalanceSheetBucket>,
) -> Option<CashFlowCounterpart> {
    if matches!(account.account_type, AccountType::Equity | AccountType::Liability)
        && Haystack::of(account).any(DIVIDEND)
    {
        return Some(CashFlowCounterpart::Dividends);
    }
    match bucket? {
        BalanceSheetBucket::PpeCost | BalanceSheetBucket::AccumulatedDepreciation => {
            Some(CashFlowCounterpart::PropertyPlantEquipment)
        }
        BalanceSheetBucket::Borrowings | BalanceSheetBucket::ShortTermBorrowings => {
            Some(CashFlowCounterpart::Borrowings)
        }
        _ => None,
    }
}
