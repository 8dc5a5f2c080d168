//! Property-based and example tests for the statement computations.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tieout_shared::types::{AccountId, DateRange, JournalEntryId, JournalLineId, TenantId};

use super::cash_flow::CashFlowInputs;
use super::service::ReportService;
use crate::classify::{BalanceSheetBucket, PnlSection};
use crate::ledger::{Account, AccountBalance, AccountType, PostingLine};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn march() -> DateRange {
    DateRange::new(d(2024, 3, 1), d(2024, 3, 31)).unwrap()
}

fn account(code: &str, name: &str, account_type: AccountType) -> Account {
    Account {
        id: AccountId::new(),
        tenant_id: TenantId::new(),
        code: code.to_string(),
        name: name.to_string(),
        account_type,
        classification: None,
        tax_tag: None,
    }
}

fn balance(account: &Account, debit: Decimal, credit: Decimal) -> AccountBalance {
    AccountBalance::new(account.clone(), debit, credit)
}

fn line(entry: JournalEntryId, account: &Account, debit: Decimal, credit: Decimal) -> PostingLine {
    PostingLine {
        line_id: JournalLineId::new(),
        entry_id: entry,
        account_id: account.id,
        entry_date: d(2024, 3, 15),
        reference: None,
        debit,
        credit,
    }
}

// ============================================================================
// Trial balance
// ============================================================================

#[test]
fn test_trial_balance_skips_inactive_accounts_and_sorts() {
    let cash = account("1000", "Cash at bank", AccountType::Asset);
    let sales = account("4000", "Sales", AccountType::Income);
    let idle = account("6500", "Travel", AccountType::Expense);

    let report = ReportService::generate_trial_balance(
        march(),
        &[
            balance(&sales, dec!(0), dec!(500.00)),
            balance(&idle, dec!(0), dec!(0)),
            balance(&cash, dec!(500.00), dec!(0)),
        ],
    );

    let codes: Vec<&str> = report.rows.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, vec!["1000", "4000"]);
    assert_eq!(report.rows[1].balance, dec!(500.00));
    assert!(report.totals.is_balanced);
    assert_eq!(report.totals.total_debit, dec!(500.00));
}

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property 1: Trial balance debits equal credits**
    ///
    /// *For any* set of balanced entries, the trial balance SHALL report
    /// equal total debits and credits.
    #[test]
    fn prop_trial_balance_balances(amounts in prop::collection::vec(amount_strategy(), 1..20)) {
        let accounts: Vec<Account> = (0..amounts.len() + 1)
            .map(|i| account(&format!("{}", 1000 + i), &format!("Account {i}"), AccountType::Asset))
            .collect();

        // Entry i debits account i and credits the last account.
        let mut balances: Vec<AccountBalance> = amounts
            .iter()
            .zip(&accounts)
            .map(|(amount, acct)| balance(acct, *amount, Decimal::ZERO))
            .collect();
        let total: Decimal = amounts.iter().copied().sum();
        balances.push(balance(&accounts[amounts.len()], Decimal::ZERO, total));

        let report = ReportService::generate_trial_balance(march(), &balances);
        prop_assert!(report.totals.is_balanced);
        prop_assert_eq!(report.totals.total_debit, total);
    }

    /// **Property 2: Balance sheet always balances**
    ///
    /// *For any* balance sheet balances, total assets SHALL equal total
    /// liabilities plus total equity.
    #[test]
    fn prop_balance_sheet_balances(
        cash in -1_000_000i64..1_000_000i64,
        receivables in -1_000_000i64..1_000_000i64,
        payables in -1_000_000i64..1_000_000i64,
        capital in 0i64..1_000_000i64,
        drawings in 0i64..1_000_000i64,
    ) {
        let accounts = [
            (account("1000", "Cash at bank", AccountType::Asset), cash),
            (account("1100", "Accounts receivable", AccountType::Asset), receivables),
            (account("2000", "Accounts payable", AccountType::Liability), payables),
            (account("3000", "Share capital", AccountType::Equity), -capital),
            (account("3900", "Drawings", AccountType::Equity), drawings),
        ];
        let balances: Vec<AccountBalance> = accounts
            .iter()
            .map(|(acct, net)| {
                let net = Decimal::new(*net, 2);
                if net >= Decimal::ZERO {
                    balance(acct, net, Decimal::ZERO)
                } else {
                    balance(acct, Decimal::ZERO, -net)
                }
            })
            .collect();

        let report = ReportService::generate_balance_sheet(d(2024, 3, 31), &balances);
        prop_assert!(report.is_balanced);
        prop_assert_eq!(report.total_assets, report.total_liabilities + report.total_equity);
        prop_assert_eq!(report.total_assets, report.liabilities_and_equity);
    }

    /// **Property 3: Rounding is deterministic**
    ///
    /// *For any* sub-cent amounts, generating the same statement twice SHALL
    /// give identical results, and every total SHALL have at most two
    /// decimal places.
    #[test]
    fn prop_profit_and_loss_rounding_is_stable(
        raw in prop::collection::vec(1i64..100_000_000i64, 1..10),
    ) {
        let balances: Vec<AccountBalance> = raw
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let acct = account(&format!("{}", 6000 + i), &format!("Expense {i}"), AccountType::Expense);
                balance(&acct, Decimal::new(*n, 4), Decimal::ZERO)
            })
            .collect();

        let first = ReportService::generate_profit_and_loss(march(), &balances);
        let second = ReportService::generate_profit_and_loss(march(), &balances);
        prop_assert_eq!(&first, &second);
        prop_assert!(first.operating_expenses.total.scale() <= 2);
        prop_assert!(first.profit_or_loss.scale() <= 2);
    }
}

// ============================================================================
// Profit and loss
// ============================================================================

#[test]
fn test_profit_and_loss_sections_by_code_range() {
    let balances = vec![
        balance(&account("4000", "Sales", AccountType::Income), dec!(0), dec!(10000.00)),
        balance(&account("8100", "Interest received", AccountType::Income), dec!(0), dec!(50.00)),
        balance(&account("5000", "Purchases", AccountType::Expense), dec!(4000.00), dec!(0)),
        balance(&account("6100", "Rent", AccountType::Expense), dec!(1500.00), dec!(0)),
        balance(&account("6200", "Depreciation", AccountType::Expense), dec!(300.00), dec!(0)),
        balance(&account("7000", "Loan interest", AccountType::Expense), dec!(100.00), dec!(0)),
        balance(&account("7900", "Income tax expense", AccountType::Expense), dec!(1000.00), dec!(0)),
        balance(&account("1000", "Cash at bank", AccountType::Asset), dec!(999.00), dec!(0)),
    ];

    let report = ReportService::generate_profit_and_loss(march(), &balances);

    assert_eq!(report.revenue.total, dec!(10000.00));
    assert_eq!(report.other_income.total, dec!(50.00));
    assert_eq!(report.cost_of_sales.total, dec!(4000.00));
    assert_eq!(report.operating_expenses.total, dec!(1800.00));
    assert_eq!(report.other_expenses.total, dec!(100.00));
    assert_eq!(report.tax_expense.total, dec!(1000.00));
    assert_eq!(report.tax_expense.section, PnlSection::TaxExpense);

    assert_eq!(report.gross_profit, dec!(6000.00));
    assert_eq!(report.operating_profit, dec!(4200.00));
    assert_eq!(report.profit_before_tax, dec!(4150.00));
    assert_eq!(report.profit_or_loss, dec!(3150.00));
    assert_eq!(report.profit_or_loss, report.total_income - report.total_expenses);

    assert_eq!(report.expense_lines_named(&["depreciation"]), dec!(300.00));
    assert_eq!(report.income_lines_named(&["interest"]), dec!(50.00));
}

// ============================================================================
// Balance sheet
// ============================================================================

#[test]
fn test_customer_in_credit_presented_as_liability() {
    let receivables = account("1100", "Accounts receivable", AccountType::Asset);
    let cash = account("1000", "Cash at bank", AccountType::Asset);
    let capital = account("3000", "Share capital", AccountType::Equity);

    let report = ReportService::generate_balance_sheet(
        d(2024, 3, 31),
        &[
            balance(&receivables, dec!(0), dec!(250.00)),
            balance(&cash, dec!(1250.00), dec!(0)),
            balance(&capital, dec!(0), dec!(1000.00)),
        ],
    );

    assert_eq!(report.bucket(BalanceSheetBucket::TradeReceivables), dec!(0));
    let liability = report
        .liabilities
        .lines()
        .find(|l| l.key == "other_current_liabilities")
        .unwrap();
    assert_eq!(liability.amount, dec!(250.00));
    assert!(report.is_balanced);
    assert_eq!(report.total_assets, dec!(1250.00));
    assert_eq!(report.equity.retained_earnings, dec!(0));
}

#[test]
fn test_retained_earnings_absorbs_profit_and_unmatched_equity() {
    let cash = account("1000", "Cash at bank", AccountType::Asset);
    let sales = account("4000", "Sales", AccountType::Income);
    let capital = account("3000", "Share capital", AccountType::Equity);
    let drawings = account("3900", "Drawings", AccountType::Equity);

    let report = ReportService::generate_balance_sheet(
        d(2024, 3, 31),
        &[
            balance(&cash, dec!(1700.00), dec!(0)),
            balance(&sales, dec!(0), dec!(800.00)),
            balance(&capital, dec!(0), dec!(1000.00)),
            balance(&drawings, dec!(100.00), dec!(0)),
        ],
    );

    assert_eq!(report.equity.share_capital, dec!(1000.00));
    assert_eq!(report.equity.retained_earnings, dec!(700.00));
    assert_eq!(report.total_equity, dec!(1700.00));
}

#[test]
fn test_ppe_presented_net_of_depreciation() {
    let cost = account("1500", "Plant and machinery", AccountType::Asset);
    let acc_dep = account("1510", "Accumulated depreciation", AccountType::Asset);

    let report = ReportService::generate_balance_sheet(
        d(2024, 3, 31),
        &[
            balance(&cost, dec!(12000.00), dec!(0)),
            balance(&acc_dep, dec!(0), dec!(2000.00)),
        ],
    );

    assert_eq!(report.ppe_carrying_amount(), dec!(10000.00));
    assert_eq!(report.assets.non_current_total, dec!(10000.00));
    assert!(report.reclassifications.is_empty());
}

#[test]
fn test_empty_balance_sheet_is_zero_and_balanced() {
    let report = super::BalanceSheetReport::empty(d(2024, 3, 31));
    assert!(report.is_balanced);
    assert_eq!(report.total_assets, Decimal::ZERO);
    assert_eq!(report.equity.lines.len(), 3);
}

// ============================================================================
// Changes in equity
// ============================================================================

#[test]
fn test_changes_in_equity_reconciles() {
    let cash = account("1000", "Cash at bank", AccountType::Asset);
    let capital = account("3000", "Share capital", AccountType::Equity);
    let dividends = account("3800", "Dividends paid", AccountType::Equity);
    let sales = account("4000", "Sales", AccountType::Income);

    let opening = ReportService::generate_balance_sheet(
        d(2024, 2, 29),
        &[balance(&cash, dec!(1000.00), dec!(0)), balance(&capital, dec!(0), dec!(1000.00))],
    );
    let closing = ReportService::generate_balance_sheet(
        d(2024, 3, 31),
        &[
            balance(&cash, dec!(2300.00), dec!(0)),
            balance(&capital, dec!(0), dec!(1500.00)),
            balance(&dividends, dec!(200.00), dec!(0)),
            balance(&sales, dec!(0), dec!(1000.00)),
        ],
    );
    let pnl = ReportService::generate_profit_and_loss(
        march(),
        &[balance(&sales, dec!(0), dec!(1000.00))],
    );

    let report = ReportService::generate_changes_in_equity(
        march(),
        &opening,
        &closing,
        &pnl,
        &[balance(&capital, dec!(0), dec!(500.00)), balance(&dividends, dec!(200.00), dec!(0))],
    );

    let total = report.total;
    assert_eq!(total.opening, dec!(1000.00));
    assert_eq!(total.profit_or_loss, dec!(1000.00));
    assert_eq!(total.owner_contributions, dec!(500.00));
    assert_eq!(total.dividends, dec!(200.00));
    assert_eq!(total.other_movements, dec!(0));
    assert_eq!(total.closing, dec!(2300.00));
    assert_eq!(
        total.closing,
        total.opening + total.profit_or_loss + total.owner_contributions - total.dividends
            + total.other_movements
    );
}

// ============================================================================
// Cash flow
// ============================================================================

#[test]
fn test_cash_flow_classifies_ppe_purchase_and_reconciles() {
    let cash = account("1000", "Cash at bank", AccountType::Asset);
    let ppe = account("1500", "Plant and machinery", AccountType::Asset);
    let loan = account("2500", "Bank loan", AccountType::Liability);
    let sales = account("4000", "Sales", AccountType::Income);
    let fees = account("6100", "Consulting fees", AccountType::Expense);
    let chart = vec![cash.clone(), ppe.clone(), loan.clone(), sales.clone(), fees.clone()];

    // Opening: 5000 cash funded by the loan.
    let opening = ReportService::generate_balance_sheet(
        d(2024, 2, 29),
        &[balance(&cash, dec!(5000.00), dec!(0)), balance(&loan, dec!(0), dec!(5000.00))],
    );

    // March: buy plant 1200 for cash, sell 800, pay 300 fees, borrow 1000 more,
    // and one mixed entry paying both loan and plant (left unclassified).
    let buy = JournalEntryId::new();
    let sell = JournalEntryId::new();
    let fee = JournalEntryId::new();
    let borrow = JournalEntryId::new();
    let mixed = JournalEntryId::new();
    let lines = vec![
        line(buy, &ppe, dec!(1200.00), dec!(0)),
        line(buy, &cash, dec!(0), dec!(1200.00)),
        line(sell, &cash, dec!(800.00), dec!(0)),
        line(sell, &sales, dec!(0), dec!(800.00)),
        line(fee, &fees, dec!(300.00), dec!(0)),
        line(fee, &cash, dec!(0), dec!(300.00)),
        line(borrow, &cash, dec!(1000.00), dec!(0)),
        line(borrow, &loan, dec!(0), dec!(1000.00)),
        line(mixed, &loan, dec!(100.00), dec!(0)),
        line(mixed, &ppe, dec!(50.00), dec!(0)),
        line(mixed, &cash, dec!(0), dec!(150.00)),
    ];

    let closing = ReportService::generate_balance_sheet(
        d(2024, 3, 31),
        &[
            balance(&cash, dec!(6800.00), dec!(1650.00)),
            balance(&ppe, dec!(1250.00), dec!(0)),
            balance(&loan, dec!(100.00), dec!(6000.00)),
            balance(&sales, dec!(0), dec!(800.00)),
            balance(&fees, dec!(300.00), dec!(0)),
        ],
    );
    let pnl = ReportService::generate_profit_and_loss(
        march(),
        &[balance(&sales, dec!(0), dec!(800.00)), balance(&fees, dec!(300.00), dec!(0))],
    );

    let report = ReportService::generate_cash_flow(CashFlowInputs {
        range: march(),
        profit_and_loss: &pnl,
        opening: &opening,
        closing: &closing,
        chart: &chart,
        cash_entry_lines: &lines,
    });

    assert_eq!(report.operating.total, dec!(500.00));
    assert_eq!(report.ppe_purchases(), dec!(1200.00));
    assert_eq!(report.investing.total, dec!(-1200.00));
    assert_eq!(report.financing.total, dec!(1000.00));
    assert_eq!(report.unclassified, dec!(-150.00));
    assert_eq!(report.opening_cash, dec!(5000.00));
    assert_eq!(report.closing_cash, dec!(5150.00));
    assert_eq!(report.closing_cash, closing.net_cash());
    assert_eq!(
        report.net_change_in_cash,
        report.operating.total + report.investing.total + report.financing.total + report.unclassified
    );
}

#[test]
fn test_cash_flow_ppe_purchase_counts_only_the_asset_cost() {
    let cash = account("1000", "Cash at bank", AccountType::Asset);
    let vat = account("1200", "VAT receivable", AccountType::Asset);
    let ppe = account("1500", "Plant and machinery", AccountType::Asset);
    let payables = account("2000", "Trade payables", AccountType::Liability);
    let chart = vec![cash.clone(), vat.clone(), ppe.clone(), payables.clone()];

    // Plant bought gross of recoverable VAT, then more plant part paid on credit.
    let gross = JournalEntryId::new();
    let part_paid = JournalEntryId::new();
    let lines = vec![
        line(gross, &ppe, dec!(1000.00), dec!(0)),
        line(gross, &vat, dec!(200.00), dec!(0)),
        line(gross, &cash, dec!(0), dec!(1200.00)),
        line(part_paid, &ppe, dec!(1000.00), dec!(0)),
        line(part_paid, &cash, dec!(0), dec!(600.00)),
        line(part_paid, &payables, dec!(0), dec!(400.00)),
    ];

    let opening = ReportService::generate_balance_sheet(
        d(2024, 2, 29),
        &[balance(&cash, dec!(5000.00), dec!(0)), balance(&payables, dec!(0), dec!(5000.00))],
    );
    let closing = ReportService::generate_balance_sheet(
        d(2024, 3, 31),
        &[
            balance(&cash, dec!(5000.00), dec!(1800.00)),
            balance(&vat, dec!(200.00), dec!(0)),
            balance(&ppe, dec!(2000.00), dec!(0)),
            balance(&payables, dec!(0), dec!(5400.00)),
        ],
    );
    let pnl = ReportService::generate_profit_and_loss(march(), &[]);

    let report = ReportService::generate_cash_flow(CashFlowInputs {
        range: march(),
        profit_and_loss: &pnl,
        opening: &opening,
        closing: &closing,
        chart: &chart,
        cash_entry_lines: &lines,
    });

    assert_eq!(report.ppe_purchases(), dec!(1600.00));
    assert_eq!(report.investing.total, dec!(-1600.00));
    assert_eq!(report.net_change_in_cash, dec!(-1800.00));
    assert_eq!(
        report.net_change_in_cash,
        report.operating.total + report.investing.total + report.financing.total + report.unclassified
    );
}

#[test]
fn test_cash_flow_working_capital_and_tax() {
    let receivables = account("1100", "Accounts receivable", AccountType::Asset);
    let tax_payable = account("2200", "Income tax payable", AccountType::Liability);
    let sales = account("4000", "Sales", AccountType::Income);
    let tax = account("7900", "Income tax expense", AccountType::Expense);

    let opening = ReportService::generate_balance_sheet(d(2024, 2, 29), &[]);
    let closing = ReportService::generate_balance_sheet(
        d(2024, 3, 31),
        &[
            balance(&receivables, dec!(1000.00), dec!(0)),
            balance(&tax_payable, dec!(0), dec!(250.00)),
            balance(&sales, dec!(0), dec!(1000.00)),
            balance(&tax, dec!(250.00), dec!(0)),
        ],
    );
    let pnl = ReportService::generate_profit_and_loss(
        march(),
        &[balance(&sales, dec!(0), dec!(1000.00)), balance(&tax, dec!(250.00), dec!(0))],
    );

    let report = ReportService::generate_cash_flow(CashFlowInputs {
        range: march(),
        profit_and_loss: &pnl,
        opening: &opening,
        closing: &closing,
        chart: &[receivables, tax_payable, sales, tax],
        cash_entry_lines: &[],
    });

    assert_eq!(report.operating.line("profit_before_tax"), dec!(1000.00));
    assert_eq!(report.operating.line("change_in_trade_receivables"), dec!(-1000.00));
    assert_eq!(report.operating.line("income_taxes_paid"), dec!(0));
    assert_eq!(report.operating.total, dec!(0));
    assert_eq!(report.net_change_in_cash, dec!(0));
    assert_eq!(report.unclassified, dec!(0));
}
