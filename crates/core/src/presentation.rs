//! Display rows for export adapters.
//!
//! Renderers (CSV, spreadsheet, PDF) live outside this crate. They consume
//! the flat, ordered rows produced here so every format lays a statement out
//! the same way.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::notes::IfrsNote;
use crate::reports::{
    BalanceSheetReport, CashFlowReport, CashFlowSection, ChangesInEquityReport, PnlSectionReport,
    ProfitAndLossReport, StatementLine, TrialBalanceReport,
};

/// One row of a rendered statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRow {
    /// Text in the first column.
    pub label: String,
    /// Amount, `None` for headings.
    pub amount: Option<Decimal>,
    /// Indentation level, 0 for headings.
    pub depth: u8,
    /// Totals and headings are emphasised.
    pub emphasis: bool,
}

impl DisplayRow {
    fn heading(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            amount: None,
            depth: 0,
            emphasis: true,
        }
    }

    fn line(label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            label: label.into(),
            amount: Some(amount),
            depth: 1,
            emphasis: false,
        }
    }

    fn total(label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            label: label.into(),
            amount: Some(amount),
            depth: 0,
            emphasis: true,
        }
    }
}

/// Anything that can be laid out as display rows.
pub trait Presentable {
    /// Rows in presentation order.
    fn display_rows(&self) -> Vec<DisplayRow>;
}

fn statement_lines<'a>(rows: &mut Vec<DisplayRow>, lines: impl Iterator<Item = &'a StatementLine>) {
    rows.extend(lines.map(|l| DisplayRow::line(l.label.clone(), l.amount)));
}

impl Presentable for TrialBalanceReport {
    fn display_rows(&self) -> Vec<DisplayRow> {
        let mut rows: Vec<DisplayRow> = self
            .rows
            .iter()
            .map(|r| DisplayRow::line(format!("{} {}", r.code, r.name), r.balance))
            .collect();
        rows.push(DisplayRow::total("Total debits", self.totals.total_debit));
        rows.push(DisplayRow::total("Total credits", self.totals.total_credit));
        rows
    }
}

fn pnl_section(rows: &mut Vec<DisplayRow>, section: &PnlSectionReport) {
    if section.lines.is_empty() {
        return;
    }
    rows.push(DisplayRow::heading(section.section.label()));
    rows.extend(
        section
            .lines
            .iter()
            .map(|l| DisplayRow::line(format!("{} {}", l.code, l.name), l.amount)),
    );
}

impl Presentable for ProfitAndLossReport {
    fn display_rows(&self) -> Vec<DisplayRow> {
        let mut rows = Vec::new();
        pnl_section(&mut rows, &self.revenue);
        pnl_section(&mut rows, &self.cost_of_sales);
        rows.push(DisplayRow::total("Gross profit", self.gross_profit));
        pnl_section(&mut rows, &self.operating_expenses);
        rows.push(DisplayRow::total("Operating profit", self.operating_profit));
        pnl_section(&mut rows, &self.other_income);
        pnl_section(&mut rows, &self.other_expenses);
        rows.push(DisplayRow::total("Profit before tax", self.profit_before_tax));
        pnl_section(&mut rows, &self.tax_expense);
        rows.push(DisplayRow::total("Profit for the period", self.profit_or_loss));
        rows
    }
}

impl Presentable for BalanceSheetReport {
    fn display_rows(&self) -> Vec<DisplayRow> {
        let mut rows = vec![DisplayRow::heading("Non-current assets")];
        statement_lines(&mut rows, self.assets.non_current.iter());
        rows.push(DisplayRow::heading("Current assets"));
        statement_lines(&mut rows, self.assets.current.iter());
        rows.push(DisplayRow::total("Total assets", self.total_assets));

        rows.push(DisplayRow::heading("Current liabilities"));
        statement_lines(&mut rows, self.liabilities.current.iter());
        rows.push(DisplayRow::heading("Non-current liabilities"));
        statement_lines(&mut rows, self.liabilities.non_current.iter());
        rows.push(DisplayRow::total("Total liabilities", self.total_liabilities));

        rows.push(DisplayRow::heading("Equity"));
        statement_lines(&mut rows, self.equity.lines.iter());
        rows.push(DisplayRow::total("Total equity", self.total_equity));
        rows.push(DisplayRow::total(
            "Total liabilities and equity",
            self.liabilities_and_equity,
        ));
        rows
    }
}

impl Presentable for ChangesInEquityReport {
    fn display_rows(&self) -> Vec<DisplayRow> {
        let t = &self.total;
        vec![
            DisplayRow::total(format!("Balance at {}", self.range.from), t.opening),
            DisplayRow::line("Profit for the period", t.profit_or_loss),
            DisplayRow::line("Shares issued and capital contributed", t.owner_contributions),
            DisplayRow::line("Dividends", -t.dividends),
            DisplayRow::line("Other movements", t.other_movements),
            DisplayRow::total(format!("Balance at {}", self.range.to), t.closing),
        ]
    }
}

fn cash_flow_section(rows: &mut Vec<DisplayRow>, heading: &str, total: &str, section: &CashFlowSection) {
    rows.push(DisplayRow::heading(heading));
    statement_lines(rows, section.lines.iter());
    rows.push(DisplayRow::total(total, section.total));
}

impl Presentable for CashFlowReport {
    fn display_rows(&self) -> Vec<DisplayRow> {
        let mut rows = Vec::new();
        cash_flow_section(
            &mut rows,
            "Cash flows from operating activities",
            "Net cash from operating activities",
            &self.operating,
        );
        cash_flow_section(
            &mut rows,
            "Cash flows from investing activities",
            "Net cash used in investing activities",
            &self.investing,
        );
        cash_flow_section(
            &mut rows,
            "Cash flows from financing activities",
            "Net cash from financing activities",
            &self.financing,
        );
        rows.push(DisplayRow::total("Unclassified cash movements", self.unclassified));
        rows.push(DisplayRow::total("Net change in cash", self.net_change_in_cash));
        rows.push(DisplayRow::line("Cash at beginning of period", self.opening_cash));
        rows.push(DisplayRow::total("Cash at end of period", self.closing_cash));
        rows
    }
}

impl Presentable for IfrsNote {
    fn display_rows(&self) -> Vec<DisplayRow> {
        let mut rows = vec![DisplayRow::heading(format!("{}. {}", self.code, self.title))];
        for table in &self.tables {
            rows.push(DisplayRow::heading(table.title.clone()));
            for row in &table.rows {
                // Multi-column tables present their last column, the running total.
                let amount = row.values.last().copied().unwrap_or_default();
                rows.push(DisplayRow::line(row.label.clone(), amount));
            }
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tieout_shared::types::DateRange;

    #[test]
    fn test_balance_sheet_rows_end_with_totals() {
        let bs = BalanceSheetReport::empty(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        let rows = bs.display_rows();
        let last = rows.last().unwrap();
        assert_eq!(last.label, "Total liabilities and equity");
        assert_eq!(last.amount, Some(Decimal::ZERO));
        assert!(rows.iter().any(|r| r.label == "Total assets"));
    }

    #[test]
    fn test_cash_flow_always_shows_unclassified() {
        let range = DateRange::parse("2024-03-01", "2024-03-31").unwrap();
        let unclassified = |cf: &CashFlowReport| {
            cf.display_rows()
                .into_iter()
                .find(|r| r.label == "Unclassified cash movements")
                .and_then(|r| r.amount)
        };

        let mut cf = CashFlowReport::empty(range);
        assert_eq!(unclassified(&cf), Some(Decimal::ZERO));

        cf.unclassified = dec!(12.50);
        assert_eq!(unclassified(&cf), Some(dec!(12.50)));
    }

    #[test]
    fn test_headings_have_no_amount() {
        let range = DateRange::parse("2024-03-01", "2024-03-31").unwrap();
        let rows = ProfitAndLossReport::empty(range).display_rows();
        assert!(rows.iter().all(|r| r.amount.is_some() || r.emphasis));
        assert_eq!(rows.last().unwrap().label, "Profit for the period");
    }
}
