//! Balance sheet presentation buckets.

use serde::{Deserialize, Serialize};

use crate::ledger::AccountType;

/// Which side of the balance sheet a bucket sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BucketSide {
    /// Assets.
    Asset,
    /// Liabilities.
    Liability,
    /// Equity.
    Equity,
}

impl BucketSide {
    /// The account type whose accounts may be placed on this side.
    #[must_use]
    pub const fn account_type(self) -> AccountType {
        match self {
            Self::Asset => AccountType::Asset,
            Self::Liability => AccountType::Liability,
            Self::Equity => AccountType::Equity,
        }
    }
}

/// A balance sheet line an account rolls into.
///
/// Also used as the explicit per-account classification tag
/// ([`ClassificationTag`]), which takes precedence over keyword matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceSheetBucket {
    /// Cash and cash equivalents.
    Cash,
    /// Trade receivables.
    TradeReceivables,
    /// Other receivables.
    OtherReceivables,
    /// VAT recoverable.
    VatReceivable,
    /// Prepayments.
    Prepayments,
    /// Inventories.
    Inventory,
    /// Property, plant and equipment at cost.
    PpeCost,
    /// Accumulated depreciation on property, plant and equipment.
    AccumulatedDepreciation,
    /// Intangible assets.
    IntangibleAssets,
    /// Bank overdrafts.
    BankOverdraft,
    /// Trade payables.
    TradePayables,
    /// VAT payable.
    VatPayable,
    /// Current income tax payable.
    IncomeTaxPayable,
    /// Accruals.
    Accruals,
    /// Deferred income.
    DeferredIncome,
    /// Borrowings due within a year.
    ShortTermBorrowings,
    /// Borrowings due after more than a year.
    Borrowings,
    /// Other current liabilities.
    OtherCurrentLiabilities,
    /// Other non-current liabilities.
    OtherNonCurrentLiabilities,
    /// Share capital and premium.
    ShareCapital,
    /// Other reserves.
    OtherReserves,
}

/// Explicit per-account classification.
pub type ClassificationTag = BalanceSheetBucket;

impl BalanceSheetBucket {
    /// Every bucket in presentation order.
    pub const ALL: [Self; 21] = [
        Self::Cash,
        Self::TradeReceivables,
        Self::OtherReceivables,
        Self::VatReceivable,
        Self::Prepayments,
        Self::Inventory,
        Self::PpeCost,
        Self::AccumulatedDepreciation,
        Self::IntangibleAssets,
        Self::BankOverdraft,
        Self::TradePayables,
        Self::VatPayable,
        Self::IncomeTaxPayable,
        Self::Accruals,
        Self::DeferredIncome,
        Self::ShortTermBorrowings,
        Self::Borrowings,
        Self::OtherCurrentLiabilities,
        Self::OtherNonCurrentLiabilities,
        Self::ShareCapital,
        Self::OtherReserves,
    ];

    /// Side of the balance sheet.
    #[must_use]
    pub const fn side(self) -> BucketSide {
        match self {
            Self::Cash
            | Self::TradeReceivables
            | Self::OtherReceivables
            | Self::VatReceivable
            | Self::Prepayments
            | Self::Inventory
            | Self::PpeCost
            | Self::AccumulatedDepreciation
            | Self::IntangibleAssets => BucketSide::Asset,
            Self::BankOverdraft
            | Self::TradePayables
            | Self::VatPayable
            | Self::IncomeTaxPayable
            | Self::Accruals
            | Self::DeferredIncome
            | Self::ShortTermBorrowings
            | Self::Borrowings
            | Self::OtherCurrentLiabilities
            | Self::OtherNonCurrentLiabilities => BucketSide::Liability,
            Self::ShareCapital | Self::OtherReserves => BucketSide::Equity,
        }
    }

    /// Returns true for current assets and current liabilities.
    #[must_use]
    pub const fn is_current(self) -> bool {
        !matches!(
            self,
            Self::PpeCost
                | Self::AccumulatedDepreciation
                | Self::IntangibleAssets
                | Self::Borrowings
                | Self::OtherNonCurrentLiabilities
                | Self::ShareCapital
                | Self::OtherReserves
        )
    }

    /// Returns true if an account of `account_type` may carry this tag.
    #[must_use]
    pub fn accepts(self, account_type: AccountType) -> bool {
        self.side().account_type() == account_type
    }

    /// Stable snake-case key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::TradeReceivables => "trade_receivables",
            Self::OtherReceivables => "other_receivables",
            Self::VatReceivable => "vat_receivable",
            Self::Prepayments => "prepayments",
            Self::Inventory => "inventory",
            Self::PpeCost => "ppe_cost",
            Self::AccumulatedDepreciation => "accumulated_depreciation",
            Self::IntangibleAssets => "intangible_assets",
            Self::BankOverdraft => "bank_overdraft",
            Self::TradePayables => "trade_payables",
            Self::VatPayable => "vat_payable",
            Self::IncomeTaxPayable => "income_tax_payable",
            Self::Accruals => "accruals",
            Self::DeferredIncome => "deferred_income",
            Self::ShortTermBorrowings => "short_term_borrowings",
            Self::Borrowings => "borrowings",
            Self::OtherCurrentLiabilities => "other_current_liabilities",
            Self::OtherNonCurrentLiabilities => "other_non_current_liabilities",
            Self::ShareCapital => "share_capital",
            Self::OtherReserves => "other_reserves",
        }
    }

    /// Presentation label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cash => "Cash and cash equivalents",
            Self::TradeReceivables => "Trade receivables",
            Self::OtherReceivables => "Other receivables",
            Self::VatReceivable => "VAT recoverable",
            Self::Prepayments => "Prepayments",
            Self::Inventory => "Inventories",
            Self::PpeCost => "Property, plant and equipment (cost)",
            Self::AccumulatedDepreciation => "Accumulated depreciation",
            Self::IntangibleAssets => "Intangible assets",
            Self::BankOverdraft => "Bank overdrafts",
            Self::TradePayables => "Trade payables",
            Self::VatPayable => "VAT payable",
            Self::IncomeTaxPayable => "Current income tax payable",
            Self::Accruals => "Accruals",
            Self::DeferredIncome => "Deferred income",
            Self::ShortTermBorrowings => "Short-term borrowings",
            Self::Borrowings => "Borrowings",
            Self::OtherCurrentLiabilities => "Other current liabilities",
            Self::OtherNonCurrentLiabilities => "Other non-current liabilities",
            Self::ShareCapital => "Share capital",
            Self::OtherReserves => "Other reserves",
        }
    }
}

impl std::fmt::Display for BalanceSheetBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for BalanceSheetBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|bucket| bucket.key() == key)
            .ok_or_else(|| format!("Unknown classification tag: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_keys_round_trip() {
        for bucket in BalanceSheetBucket::ALL {
            assert_eq!(BalanceSheetBucket::from_str(bucket.key()), Ok(bucket));
        }
        assert!(BalanceSheetBucket::from_str("goodwill_on_the_moon").is_err());
    }

    #[test]
    fn test_tag_must_match_account_side() {
        assert!(BalanceSheetBucket::Cash.accepts(AccountType::Asset));
        assert!(!BalanceSheetBucket::Cash.accepts(AccountType::Liability));
        assert!(BalanceSheetBucket::BankOverdraft.accepts(AccountType::Liability));
        assert!(!BalanceSheetBucket::ShareCapital.accepts(AccountType::Income));
    }

    #[test]
    fn test_current_split() {
        assert!(BalanceSheetBucket::TradeReceivables.is_current());
        assert!(BalanceSheetBucket::ShortTermBorrowings.is_current());
        assert!(!BalanceSheetBucket::Borrowings.is_current());
        assert!(!BalanceSheetBucket::PpeCost.is_current());
    }
}
