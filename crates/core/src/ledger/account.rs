//! Chart of accounts types.

use serde::{Deserialize, Serialize};
use tieout_shared::types::{AccountId, TenantId};

use super::balance::NormalBalance;
use crate::classify::ClassificationTag;

/// Prefix of the tax tag that marks an income-tax control account.
pub const TAX_CONTROL_PREFIX: &str = "TAX:";

/// The five account types of the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    /// Resources owned (debit-normal).
    Asset,
    /// Obligations owed (credit-normal).
    Liability,
    /// Owners' residual interest (credit-normal).
    Equity,
    /// Revenue and other income (credit-normal).
    Income,
    /// Costs and losses (debit-normal).
    Expense,
}

impl AccountType {
    /// All account types in chart order.
    pub const ALL: [Self; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Income,
        Self::Expense,
    ];

    /// Side on which the account type normally carries its balance.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Income => NormalBalance::Credit,
        }
    }

    /// Returns true for asset, liability and equity accounts.
    #[must_use]
    pub const fn is_balance_sheet(self) -> bool {
        matches!(self, Self::Asset | Self::Liability | Self::Equity)
    }

    /// Returns true for income and expense accounts.
    #[must_use]
    pub const fn is_profit_and_loss(self) -> bool {
        matches!(self, Self::Income | Self::Expense)
    }

    /// Upper-case storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "ASSET",
            Self::Liability => "LIABILITY",
            Self::Equity => "EQUITY",
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASSET" => Ok(Self::Asset),
            "LIABILITY" => Ok(Self::Liability),
            "EQUITY" => Ok(Self::Equity),
            "INCOME" | "REVENUE" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            _ => Err(format!("Unknown account type: {s}")),
        }
    }
}

/// An account in a tenant's chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account ID.
    pub id: AccountId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Account code (usually numeric, e.g. `4000`).
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Explicit balance sheet classification. Takes precedence over keywords.
    pub classification: Option<ClassificationTag>,
    /// Tax tag, e.g. `TAX:INCOME` for an income-tax control account.
    pub tax_tag: Option<String>,
}

impl Account {
    /// Normal balance side of this account.
    #[must_use]
    pub const fn normal_balance(&self) -> NormalBalance {
        self.account_type.normal_balance()
    }

    /// Returns true if the account is tagged as an income-tax control account.
    #[must_use]
    pub fn is_tax_control(&self) -> bool {
        self.tax_tag
            .as_deref()
            .is_some_and(|tag| tag.starts_with(TAX_CONTROL_PREFIX))
    }
}
