//! Cash flow statement (indirect method).
//!
//! Operating activities start from profit before tax, add back non-cash
//! charges and interest, adjust for working capital and deduct tax paid.
//! Investing and financing lines come from scanning the entries that move
//! cash: an entry whose non-cash lines point at exactly one recognised
//! counterpart category (PPE, borrowings, dividends) is placed by that
//! category. Whatever is left is reported as unclassified, so the statement
//! always reconciles to the balance sheet cash movement.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tieout_shared::types::{AccountId, DateRange, JournalEntryId, round_money};

use super::balance_sheet::BalanceSheetReport;
use super::profit_loss::ProfitAndLossReport;
use super::service::ReportService;
use super::types::StatementLine;
use crate::classify::{AccountClassifier, BalanceSheetBucket, CashFlowCounterpart, cash_flow_counterpart};
use crate::ledger::{Account, PostingLine};

/// Words marking depreciation and amortisation expense lines.
pub const DEPRECIATION_WORDS: &[&str] = &[
    "depreciation",
    "amortisation",
    "amortization",
];

/// Words marking impairment expense lines.
pub const IMPAIRMENT_WORDS: &[&str] = &["impairment", "impairments", "write down", "write off"];

/// Words marking interest lines.
pub const INTEREST_WORDS: &[&str] = &["interest"];

/// Key of the PPE purchases line in investing activities.
pub const PPE_PURCHASES_KEY: &str = "purchase_of_ppe";

/// A section of the cash flow statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowSection {
    /// Lines in presentation order.
    pub lines: Vec<StatementLine>,
    /// Section total.
    pub total: Decimal,
}

impl CashFlowSection {
    fn push(&mut self, key: &str, label: &str, amount: Decimal) {
        self.total = round_money(self.total + amount);
        self.lines.push(StatementLine::new(key, label, amount));
    }

    fn push_nonzero(&mut self, key: &str, label: &str, amount: Decimal) {
        if !amount.is_zero() {
            self.push(key, label, amount);
        }
    }

    /// Amount of the line with `key`, zero if absent.
    #[must_use]
    pub fn line(&self, key: &str) -> Decimal {
        self.lines
            .iter()
            .filter(|l| l.key == key)
            .fold(Decimal::ZERO, |acc, l| round_money(acc + l.amount))
    }
}

/// Cash flow statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowReport {
    /// Period covered.
    pub range: DateRange,
    /// Operating activities.
    pub operating: CashFlowSection,
    /// Investing activities.
    pub investing: CashFlowSection,
    /// Financing activities.
    pub financing: CashFlowSection,
    /// Cash movements not explained by the three sections.
    pub unclassified: Decimal,
    /// Net change in cash and cash equivalents.
    pub net_change_in_cash: Decimal,
    /// Net cash the day before the range.
    pub opening_cash: Decimal,
    /// Net cash at the end of the range.
    pub closing_cash: Decimal,
}

impl CashFlowReport {
    /// An all-zero statement.
    #[must_use]
    pub fn empty(range: DateRange) -> Self {
        Self {
            range,
            operating: CashFlowSection::default(),
            investing: CashFlowSection::default(),
            financing: CashFlowSection::default(),
            unclassified: Decimal::ZERO,
            net_change_in_cash: Decimal::ZERO,
            opening_cash: Decimal::ZERO,
            closing_cash: Decimal::ZERO,
        }
    }

    /// Cash spent on property, plant and equipment, as a positive amount.
    #[must_use]
    pub fn ppe_purchases(&self) -> Decimal {
        -self.investing.line(PPE_PURCHASES_KEY)
    }
}

/// Everything the cash flow statement is derived from.
#[derive(Debug, Clone, Copy)]
pub struct CashFlowInputs<'a> {
    /// Period covered.
    pub range: DateRange,
    /// Profit and loss for the range.
    pub profit_and_loss: &'a ProfitAndLossReport,
    /// Balance sheet the day before the range.
    pub opening: &'a BalanceSheetReport,
    /// Balance sheet at the end of the range.
    pub closing: &'a BalanceSheetReport,
    /// The tenant's chart of accounts.
    pub chart: &'a [Account],
    /// Every line of every posted entry in the range that touches cash.
    pub cash_entry_lines: &'a [PostingLine],
}

impl ReportService {
    /// Accounts presented as cash or bank overdraft.
    #[must_use]
    pub fn cash_account_ids(chart: &[Account]) -> Vec<AccountId> {
        chart
            .iter()
            .filter(|a| {
                matches!(
                    AccountClassifier::classify(a).bucket,
                    Some(BalanceSheetBucket::Cash | BalanceSheetBucket::BankOverdraft)
                )
            })
            .map(|a| a.id)
            .collect()
    }

    /// Generates the cash flow statement.
    #[must_use]
    pub fn generate_cash_flow(inputs: CashFlowInputs<'_>) -> CashFlowReport {
        let mut report = CashFlowReport::empty(inputs.range);
        report.operating = Self::operating_activities(&inputs);

        let interest_expense = inputs.profit_and_loss.expense_lines_named(INTEREST_WORDS);
        let interest_income = inputs.profit_and_loss.income_lines_named(INTEREST_WORDS);

        let classified = Self::classify_cash_entries(inputs.chart, inputs.cash_entry_lines);
        let amount = |counterpart, inflow| {
            classified
                .get(&(counterpart, inflow))
                .copied()
                .unwrap_or_default()
        };

        report.investing.push_nonzero(
            PPE_PURCHASES_KEY,
            "Purchase of property, plant and equipment",
            amount(CashFlowCounterpart::PropertyPlantEquipment, false),
        );
        report.investing.push_nonzero(
            "proceeds_from_ppe_disposals",
            "Proceeds from disposal of property, plant and equipment",
            amount(CashFlowCounterpart::PropertyPlantEquipment, true),
        );
        report
            .investing
            .push_nonzero("interest_received", "Interest received", interest_income);

        report.financing.push_nonzero(
            "proceeds_from_borrowings",
            "Proceeds from borrowings",
            amount(CashFlowCounterpart::Borrowings, true),
        );
        report.financing.push_nonzero(
            "repayment_of_borrowings",
            "Repayment of borrowings",
            amount(CashFlowCounterpart::Borrowings, false),
        );
        report.financing.push_nonzero(
            "dividends_paid",
            "Dividends paid",
            round_money(
                amount(CashFlowCounterpart::Dividends, false)
                    + amount(CashFlowCounterpart::Dividends, true),
            ),
        );
        report
            .financing
            .push_nonzero("interest_paid", "Interest paid", -interest_expense);

        report.opening_cash = inputs.opening.net_cash();
        report.closing_cash = inputs.closing.net_cash();
        report.net_change_in_cash = round_money(report.closing_cash - report.opening_cash);
        report.unclassified = round_money(
            report.net_change_in_cash
                - report.operating.total
                - report.investing.total
                - report.financing.total,
        );
        report
    }

    fn operating_activities(inputs: &CashFlowInputs<'_>) -> CashFlowSection {
        use BalanceSheetBucket as B;

        let pnl = inputs.profit_and_loss;
        let change = |bucket| {
            round_money(
                inputs.closing.unadjusted_bucket(bucket) - inputs.opening.unadjusted_bucket(bucket),
            )
        };

        let mut section = CashFlowSection::default();
        section.push("profit_before_tax", "Profit before tax", pnl.profit_before_tax);
        section.push_nonzero(
            "depreciation_and_amortisation",
            "Depreciation and amortisation",
            pnl.expense_lines_named(DEPRECIATION_WORDS),
        );
        section.push_nonzero(
            "impairment_losses",
            "Impairment losses",
            pnl.expense_lines_named(IMPAIRMENT_WORDS),
        );
        section.push_nonzero(
            "interest_expense",
            "Interest expense",
            pnl.expense_lines_named(INTEREST_WORDS),
        );
        section.push_nonzero(
            "interest_income",
            "Interest income",
            -pnl.income_lines_named(INTEREST_WORDS),
        );

        section.push_nonzero(
            "change_in_trade_receivables",
            "(Increase)/decrease in trade receivables",
            -change(B::TradeReceivables),
        );
        section.push_nonzero(
            "change_in_inventories",
            "(Increase)/decrease in inventories",
            -change(B::Inventory),
        );
        section.push_nonzero(
            "change_in_prepayments",
            "(Increase)/decrease in prepayments",
            -change(B::Prepayments),
        );
        section.push_nonzero(
            "change_in_trade_payables",
            "Increase/(decrease) in trade payables",
            change(B::TradePayables),
        );
        section.push_nonzero(
            "change_in_accruals",
            "Increase/(decrease) in accruals",
            change(B::Accruals),
        );
        section.push_nonzero(
            "change_in_deferred_income",
            "Increase/(decrease) in deferred income",
            change(B::DeferredIncome),
        );
        section.push_nonzero(
            "income_taxes_paid",
            "Income taxes paid",
            round_money(change(B::IncomeTaxPayable) - pnl.tax_expense.total),
        );
        section
    }

    /// Sums cash effects of entries with exactly one recognised counterpart
    /// category, keyed by category and direction (`true` for inflows).
    ///
    /// An entry contributes the smaller of its cash effect and the movement
    /// on its recognised counterpart lines, so cash settling other lines of
    /// the same entry (recoverable VAT, a trade payable) stays unclassified.
    fn classify_cash_entries(
        chart: &[Account],
        lines: &[PostingLine],
    ) -> BTreeMap<(CashFlowCounterpart, bool), Decimal> {
        let accounts: HashMap<AccountId, &Account> = chart.iter().map(|a| (a.id, a)).collect();
        let cash: HashSet<AccountId> = Self::cash_account_ids(chart).into_iter().collect();

        let mut entries: BTreeMap<JournalEntryId, Vec<&PostingLine>> = BTreeMap::new();
        for line in lines {
            entries.entry(line.entry_id).or_default().push(line);
        }

        let mut totals = BTreeMap::new();
        for entry_lines in entries.values() {
            let cash_effect = entry_lines
                .iter()
                .filter(|l| cash.contains(&l.account_id))
                .fold(Decimal::ZERO, |acc, l| acc + l.net_debit());
            if cash_effect.is_zero() {
                continue;
            }

            let mut categories = BTreeSet::new();
            let mut counterpart_effect = Decimal::ZERO;
            for line in entry_lines.iter().filter(|l| !cash.contains(&l.account_id)) {
                let category = accounts.get(&line.account_id).and_then(|account| {
                    cash_flow_counterpart(account, AccountClassifier::classify(account).bucket)
                });
                if let Some(category) = category {
                    categories.insert(category);
                    counterpart_effect -= line.net_debit();
                }
            }
            if counterpart_effect.is_sign_positive() != cash_effect.is_sign_positive()
                || counterpart_effect.is_zero()
            {
                continue;
            }
            let amount = if cash_effect.abs() <= counterpart_effect.abs() {
                cash_effect
            } else {
                counterpart_effect
            };

            let mut iter = categories.into_iter();
            if let (Some(category), None) = (iter.next(), iter.next()) {
                let slot = totals
                    .entry((category, amount > Decimal::ZERO))
                    .or_insert(Decimal::ZERO);
                *slot = round_money(*slot + amount);
            }
        }
        totals
    }
}
