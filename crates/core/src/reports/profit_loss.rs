//! Profit and loss statement.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tieout_shared::types::{AccountId, DateRange, round_money};

use super::service::ReportService;
use crate::classify::{PnlSection, classify_pnl_section, keywords::Haystack};
use crate::ledger::AccountBalance;

/// One account on the profit and loss statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PnlLine {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name, used as the line label.
    pub name: String,
    /// Amount on the section's normal side.
    pub amount: Decimal,
}

/// A section of the profit and loss statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PnlSectionReport {
    /// Which section.
    pub section: PnlSection,
    /// Accounts in this section, ordered by code.
    pub lines: Vec<PnlLine>,
    /// Section total.
    pub total: Decimal,
}

impl PnlSectionReport {
    /// An empty section.
    #[must_use]
    pub const fn empty(section: PnlSection) -> Self {
        Self {
            section,
            lines: Vec::new(),
            total: Decimal::ZERO,
        }
    }

    fn push(&mut self, line: PnlLine) {
        self.total = round_money(self.total + line.amount);
        self.lines.push(line);
    }
}

/// Profit and loss report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitAndLossReport {
    /// Period covered.
    pub range: DateRange,
    /// Revenue.
    pub revenue: PnlSectionReport,
    /// Cost of sales.
    pub cost_of_sales: PnlSectionReport,
    /// Revenue less cost of sales.
    pub gross_profit: Decimal,
    /// Operating expenses.
    pub operating_expenses: PnlSectionReport,
    /// Gross profit less operating expenses.
    pub operating_profit: Decimal,
    /// Other income.
    pub other_income: PnlSectionReport,
    /// Other expenses.
    pub other_expenses: PnlSectionReport,
    /// Profit before income tax.
    pub profit_before_tax: Decimal,
    /// Income tax expense.
    pub tax_expense: PnlSectionReport,
    /// Revenue plus other income.
    pub total_income: Decimal,
    /// All expense sections including tax.
    pub total_expenses: Decimal,
    /// Total income less total expenses.
    pub profit_or_loss: Decimal,
}

impl ProfitAndLossReport {
    /// An all-zero statement.
    #[must_use]
    pub const fn empty(range: DateRange) -> Self {
        Self {
            range,
            revenue: PnlSectionReport::empty(PnlSection::Revenue),
            cost_of_sales: PnlSectionReport::empty(PnlSection::CostOfSales),
            gross_profit: Decimal::ZERO,
            operating_expenses: PnlSectionReport::empty(PnlSection::OperatingExpenses),
            operating_profit: Decimal::ZERO,
            other_income: PnlSectionReport::empty(PnlSection::OtherIncome),
            other_expenses: PnlSectionReport::empty(PnlSection::OtherExpenses),
            profit_before_tax: Decimal::ZERO,
            tax_expense: PnlSectionReport::empty(PnlSection::TaxExpense),
            total_income: Decimal::ZERO,
            total_expenses: Decimal::ZERO,
            profit_or_loss: Decimal::ZERO,
        }
    }

    /// All sections in presentation order.
    #[must_use]
    pub const fn sections(&self) -> [&PnlSectionReport; 6] {
        [
            &self.revenue,
            &self.cost_of_sales,
            &self.operating_expenses,
            &self.other_income,
            &self.other_expenses,
            &self.tax_expense,
        ]
    }

    fn section_mut(&mut self, section: PnlSection) -> &mut PnlSectionReport {
        match section {
            PnlSection::Revenue => &mut self.revenue,
            PnlSection::CostOfSales => &mut self.cost_of_sales,
            PnlSection::OperatingExpenses => &mut self.operating_expenses,
            PnlSection::OtherIncome => &mut self.other_income,
            PnlSection::OtherExpenses => &mut self.other_expenses,
            PnlSection::TaxExpense => &mut self.tax_expense,
        }
    }

    /// Sum of expense lines (outside the tax section) whose name contains any
    /// of the given words.
    #[must_use]
    pub fn expense_lines_named(&self, words: &[&str]) -> Decimal {
        [&self.cost_of_sales, &self.operating_expenses, &self.other_expenses]
            .into_iter()
            .flat_map(|s| &s.lines)
            .filter(|line| Haystack::new("", &line.name).any(words))
            .fold(Decimal::ZERO, |acc, line| round_money(acc + line.amount))
    }

    /// Sum of income lines whose name contains any of the given words.
    #[must_use]
    pub fn income_lines_named(&self, words: &[&str]) -> Decimal {
        [&self.revenue, &self.other_income]
            .into_iter()
            .flat_map(|s| &s.lines)
            .filter(|line| Haystack::new("", &line.name).any(words))
            .fold(Decimal::ZERO, |acc, line| round_money(acc + line.amount))
    }
}

impl ReportService {
    /// Generates a profit and loss statement from income and expense totals.
    ///
    /// Balance sheet accounts in `balances` are ignored, as are accounts
    /// without postings.
    #[must_use]
    pub fn generate_profit_and_loss(range: DateRange, balances: &[AccountBalance]) -> ProfitAndLossReport {
        let mut report = ProfitAndLossReport::empty(range);

        let mut sorted: Vec<&AccountBalance> = balances.iter().filter(|b| !b.is_zero()).collect();
        sorted.sort_by(|a, b| a.account.code.cmp(&b.account.code));

        for balance in sorted {
            let Some(section) = classify_pnl_section(&balance.account.code, balance.account_type())
            else {
                continue;
            };
            report.section_mut(section).push(PnlLine {
                account_id: balance.account.id,
                code: balance.account.code.clone(),
                name: balance.account.name.clone(),
                amount: balance.natural(),
            });
        }

        report.gross_profit = round_money(report.revenue.total - report.cost_of_sales.total);
        report.operating_profit = round_money(report.gross_profit - report.operating_expenses.total);
        report.total_income = round_money(report.revenue.total + report.other_income.total);
        report.total_expenses = round_money(
            report.cost_of_sales.total
                + report.operating_expenses.total
                + report.other_expenses.total
                + report.tax_expense.total,
        );
        report.profit_or_loss = round_money(report.total_income - report.total_expenses);
        report.profit_before_tax = round_money(report.profit_or_loss + report.tax_expense.total);
        report
    }
}
