//! Profit and loss sections by account code range.
//!
//! | Type    | Code range  | Section            |
//! |---------|-------------|--------------------|
//! | INCOME  | 4000-4999   | Revenue            |
//! | INCOME  | other       | Other income       |
//! | EXPENSE | 5000-5999   | Cost of sales      |
//! | EXPENSE | 6000-6999   | Operating expenses |
//! | EXPENSE | 7000-7899   | Other expenses     |
//! | EXPENSE | 7900-7999   | Income tax expense |
//! | EXPENSE | other       | Operating expenses |

use serde::{Deserialize, Serialize};

use crate::ledger::AccountType;

/// A section of the profit and loss statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PnlSection {
    /// Revenue.
    Revenue,
    /// Cost of sales.
    CostOfSales,
    /// Operating expenses.
    OperatingExpenses,
    /// Other income.
    OtherIncome,
    /// Other expenses.
    OtherExpenses,
    /// Income tax expense.
    TaxExpense,
}

impl PnlSection {
    /// Returns true for the credit-normal sections.
    #[must_use]
    pub const fn is_income(self) -> bool {
        matches!(self, Self::Revenue | Self::OtherIncome)
    }

    /// Presentation label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Revenue => "Revenue",
            Self::CostOfSales => "Cost of sales",
            Self::OperatingExpenses => "Operating expenses",
            Self::OtherIncome => "Other income",
            Self::OtherExpenses => "Other expenses",
            Self::TaxExpense => "Income tax expense",
        }
    }
}

/// Leading digits of an account code as a number.
fn code_number(code: &str) -> Option<u32> {
    let digits: String = code.trim().chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Section for an income or expense account; `None` for balance sheet types.
#[must_use]
pub fn classify_pnl_section(code: &str, account_type: AccountType) -> Option<PnlSection> {
    let number = code_number(code);
    match account_type {
        AccountType::Income => Some(match number {
            Some(4000..=4999) => PnlSection::Revenue,
            _ => PnlSection::OtherIncome,
        }),
        AccountType::Expense => Some(match number {
            Some(5000..=5999) => PnlSection::CostOfSales,
            Some(7000..=7899) => PnlSection::OtherExpenses,
            Some(7900..=7999) => PnlSection::TaxExpense,
            _ => PnlSection::OperatingExpenses,
        }),
        AccountType::Asset | AccountType::Liability | AccountType::Equity => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("4000", AccountType::Income, Some(PnlSection::Revenue))]
    #[case("4999", AccountType::Income, Some(PnlSection::Revenue))]
    #[case("8100", AccountType::Income, Some(PnlSection::OtherIncome))]
    #[case("INT-INC", AccountType::Income, Some(PnlSection::OtherIncome))]
    #[case("5000", AccountType::Expense, Some(PnlSection::CostOfSales))]
    #[case("6100", AccountType::Expense, Some(PnlSection::OperatingExpenses))]
    #[case("7000", AccountType::Expense, Some(PnlSection::OtherExpenses))]
    #[case("7899", AccountType::Expense, Some(PnlSection::OtherExpenses))]
    #[case("7900", AccountType::Expense, Some(PnlSection::TaxExpense))]
    #[case("7999", AccountType::Expense, Some(PnlSection::TaxExpense))]
    #[case("9000", AccountType::Expense, Some(PnlSection::OperatingExpenses))]
    #[case("MISC", AccountType::Expense, Some(PnlSection::OperatingExpenses))]
    #[case("6100-01", AccountType::Expense, Some(PnlSection::OperatingExpenses))]
    #[case("1000", AccountType::Asset, None)]
    fn test_pnl_sections(
        #[case] code: &str,
        #[case] account_type: AccountType,
        #[case] expected: Option<PnlSection>,
    ) {
        assert_eq!(classify_pnl_section(code, account_type), expected);
    }
}
