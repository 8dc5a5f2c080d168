//! Account balance calculations.
//!
//! Debit-normal accounts (asset, expense) carry `debit - credit`;
//! credit-normal accounts (liability, equity, income) carry `credit - debit`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tieout_shared::types::{AccountId, round_money};

use super::account::{Account, AccountType};

/// Side on which an account normally carries its balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalBalance {
    /// Debit-normal accounts (Asset, Expense).
    Debit,
    /// Credit-normal accounts (Liability, Equity, Income).
    Credit,
}

impl NormalBalance {
    /// Signed balance on the normal side.
    #[must_use]
    pub fn natural(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// Raw debit and credit sums for one account, as returned by a ledger source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTotals {
    /// The account ID.
    pub account_id: AccountId,
    /// Sum of debit amounts.
    pub debit: Decimal,
    /// Sum of credit amounts.
    pub credit: Decimal,
}

impl AccountTotals {
    /// Zero totals for an account with no postings.
    #[must_use]
    pub const fn zero(account_id: AccountId) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: Decimal::ZERO,
        }
    }
}

/// Account balance over a posting window, joined with its chart entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account.
    pub account: Account,
    /// Total debit amount.
    pub total_debit: Decimal,
    /// Total credit amount.
    pub total_credit: Decimal,
}

impl AccountBalance {
    /// Creates a balance, rounding both sums to cents.
    #[must_use]
    pub fn new(account: Account, total_debit: Decimal, total_credit: Decimal) -> Self {
        Self {
            account,
            total_debit: round_money(total_debit),
            total_credit: round_money(total_credit),
        }
    }

    /// Account type shortcut.
    #[must_use]
    pub const fn account_type(&self) -> AccountType {
        self.account.account_type
    }

    /// `debit - credit`.
    #[must_use]
    pub fn net_debit(&self) -> Decimal {
        self.total_debit - self.total_credit
    }

    /// Balance on the account's normal side.
    #[must_use]
    pub fn natural(&self) -> Decimal {
        self.account
            .normal_balance()
            .natural(self.total_debit, self.total_credit)
    }

    /// Returns true if nothing was posted.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.total_debit.is_zero() && self.total_credit.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use tieout_shared::types::TenantId;

    fn account(account_type: AccountType) -> Account {
        Account {
            id: AccountId::new(),
            tenant_id: TenantId::new(),
            code: "1000".to_string(),
            name: "Test".to_string(),
            account_type,
            classification: None,
            tax_tag: None,
        }
    }

    #[test]
    fn test_natural_balance_by_side() {
        let asset = AccountBalance::new(account(AccountType::Asset), dec!(150), dec!(50));
        assert_eq!(asset.natural(), dec!(100));
        assert_eq!(asset.net_debit(), dec!(100));

        let liability = AccountBalance::new(account(AccountType::Liability), dec!(150), dec!(50));
        assert_eq!(liability.natural(), dec!(-100));
        assert_eq!(liability.net_debit(), dec!(100));
    }

    #[test]
    fn test_new_rounds_to_cents() {
        let balance = AccountBalance::new(account(AccountType::Expense), dec!(10.005), dec!(0.004));
        assert_eq!(balance.total_debit, dec!(10.01));
        assert_eq!(balance.total_credit, dec!(0.00));
        assert!(!balance.is_zero());
    }

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// **Property: Normal sides are mirror images**
        ///
        /// *For any* debit and credit totals, the debit-normal and credit-normal
        /// balances SHALL sum to zero.
        #[test]
        fn prop_normal_sides_mirror(debit in amount_strategy(), credit in amount_strategy()) {
            let debit_side = NormalBalance::Debit.natural(debit, credit);
            let credit_side = NormalBalance::Credit.natural(debit, credit);
            prop_assert_eq!(debit_side + credit_side, Decimal::ZERO);
        }
    }
}
