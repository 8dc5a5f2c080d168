//! Note assembly and tie-out.
//!
//! Each builder checks its figures against the statements first and only
//! then assembles the note, so a note is never produced with a figure that
//! disagrees with the statements.

use rust_decimal::Decimal;
use tieout_shared::types::DateRange;

use super::ageing::AgeingSchedule;
use super::income_tax::IncomeTaxMovement;
use super::ppe::PpeSchedule;
use super::tieout::{ReconciliationFailure, TieOutChecker};
use super::types::{IfrsNote, NoteCode, NoteRow, NoteTable};
use crate::classify::BalanceSheetBucket;
use crate::reports::{BalanceSheetReport, CashFlowReport, ProfitAndLossReport, StatementKind};
use crate::tenant::ReportingIdentity;

/// Words marking depreciation lines on the profit and loss statement.
const DEPRECIATION: &[&str] = &["depreciation"];

/// Shared parameters of a note request.
#[derive(Debug, Clone, Copy)]
pub struct NoteContext<'a> {
    /// Validated tenant identity.
    pub identity: &'a ReportingIdentity,
    /// Period covered.
    pub range: DateRange,
    /// Largest accepted tie-out difference.
    pub tolerance: Decimal,
}

impl NoteContext<'_> {
    fn note(
        &self,
        code: NoteCode,
        narrative: &str,
        tables: Vec<NoteTable>,
        checker: TieOutChecker,
    ) -> IfrsNote {
        let (references, tie_outs) = checker.finish();
        IfrsNote {
            code,
            title: code.title().to_string(),
            entity_name: self.identity.legal_name.clone(),
            currency: self.identity.currency.clone(),
            range: self.range,
            narrative: narrative.to_string(),
            tables,
            references,
            tie_outs,
        }
    }
}

/// Builds disclosure notes from computed schedules and statements.
pub struct NoteService;

impl NoteService {
    /// Note C: property, plant and equipment.
    ///
    /// # Errors
    ///
    /// Fails if additions disagree with PPE purchases on the cash flow,
    /// the charge with depreciation on the profit and loss, or the carrying
    /// amount with the balance sheet.
    pub fn ppe_note(
        ctx: &NoteContext<'_>,
        schedule: &PpeSchedule,
        profit_and_loss: &ProfitAndLossReport,
        cash_flow: &CashFlowReport,
        balance_sheet: &BalanceSheetReport,
    ) -> Result<IfrsNote, ReconciliationFailure> {
        let mut checker = TieOutChecker::new(NoteCode::PropertyPlantEquipment, ctx.tolerance);
        checker.check(
            StatementKind::CashFlow,
            "Purchase of property, plant and equipment",
            schedule.additions,
            cash_flow.ppe_purchases(),
        )?;
        checker.check(
            StatementKind::ProfitAndLoss,
            "Depreciation",
            schedule.charge,
            profit_and_loss.expense_lines_named(DEPRECIATION),
        )?;
        checker.check(
            StatementKind::BalanceSheet,
            "Property, plant and equipment",
            schedule.closing_carrying_amount(),
            balance_sheet.ppe_carrying_amount(),
        )?;

        let table = NoteTable {
            title: "Movement in property, plant and equipment".to_string(),
            columns: vec![
                "Cost".to_string(),
                "Accumulated depreciation".to_string(),
                "Carrying amount".to_string(),
            ],
            rows: vec![
                NoteRow {
                    label: format!("At {}", ctx.range.from),
                    values: vec![
                        schedule.opening_cost,
                        schedule.opening_depreciation,
                        schedule.opening_carrying_amount(),
                    ],
                },
                NoteRow {
                    label: "Additions".to_string(),
                    values: vec![schedule.additions, Decimal::ZERO, schedule.additions],
                },
                NoteRow {
                    label: "Disposals".to_string(),
                    values: vec![
                        -schedule.disposals,
                        -schedule.depreciation_on_disposals,
                        schedule.depreciation_on_disposals - schedule.disposals,
                    ],
                },
                NoteRow {
                    label: "Depreciation charge".to_string(),
                    values: vec![Decimal::ZERO, schedule.charge, -schedule.charge],
                },
                NoteRow {
                    label: format!("At {}", ctx.range.to),
                    values: vec![
                        schedule.closing_cost,
                        schedule.closing_depreciation,
                        schedule.closing_carrying_amount(),
                    ],
                },
            ],
        };

        Ok(ctx.note(
            NoteCode::PropertyPlantEquipment,
            "Property, plant and equipment is stated at cost less accumulated depreciation. \
             Depreciation is charged from the month of acquisition over each asset's useful life.",
            vec![table],
            checker,
        ))
    }

    /// Note D: income tax.
    ///
    /// # Errors
    ///
    /// Fails if the total charge disagrees with income tax expense on the
    /// profit and loss, or the closing liability with the balance sheet.
    pub fn income_tax_note(
        ctx: &NoteContext<'_>,
        movement: &IncomeTaxMovement,
        profit_and_loss: &ProfitAndLossReport,
        balance_sheet: &BalanceSheetReport,
    ) -> Result<IfrsNote, ReconciliationFailure> {
        let mut checker = TieOutChecker::new(NoteCode::IncomeTax, ctx.tolerance);
        checker.check(
            StatementKind::ProfitAndLoss,
            "Income tax expense",
            movement.total_charge,
            profit_and_loss.tax_expense.total,
        )?;
        checker.check(
            StatementKind::BalanceSheet,
            "Current income tax payable",
            movement.closing_balance,
            balance_sheet.bucket(BalanceSheetBucket::IncomeTaxPayable),
        )?;

        let charge = NoteTable::single_column(
            "Income tax expense",
            "Amount",
            &[
                ("Current tax on profits for the period", movement.current_charge),
                ("Adjustments in respect of prior periods", movement.prior_period_adjustments),
                ("Total income tax expense", movement.total_charge),
            ],
        );
        let liability = NoteTable::single_column(
            "Current income tax payable",
            "Amount",
            &[
                ("Opening balance", movement.opening_balance),
                ("Charge for the period", movement.total_charge),
                ("Tax paid", -movement.payments),
                ("Closing balance", movement.closing_balance),
            ],
        );

        Ok(ctx.note(
            NoteCode::IncomeTax,
            "The tax charge comprises current tax on taxable profit for the period and \
             adjustments to tax payable in respect of previous periods.",
            vec![charge, liability],
            checker,
        ))
    }

    /// Notes E and F: receivables or payables ageing. Any code other than
    /// E is treated as payables.
    ///
    /// # Errors
    ///
    /// Fails if the ageing total disagrees with the balance sheet line.
    pub fn ageing_note(
        ctx: &NoteContext<'_>,
        code: NoteCode,
        schedule: &AgeingSchedule,
        balance_sheet: &BalanceSheetReport,
    ) -> Result<IfrsNote, ReconciliationFailure> {
        let (bucket, narrative) = if code == NoteCode::TradeReceivables {
            (
                BalanceSheetBucket::TradeReceivables,
                "Trade receivables are amounts due from customers for goods sold or services \
                 performed in the ordinary course of business.",
            )
        } else {
            (
                BalanceSheetBucket::TradePayables,
                "Trade payables are obligations to pay for goods or services acquired in the \
                 ordinary course of business from suppliers.",
            )
        };

        let mut checker = TieOutChecker::new(code, ctx.tolerance);
        checker.check(
            StatementKind::BalanceSheet,
            bucket.label(),
            schedule.total,
            balance_sheet.bucket(bucket),
        )?;

        let mut rows: Vec<(&str, Decimal)> = schedule
            .bands
            .iter()
            .map(|(band, amount)| (band.label(), *amount))
            .collect();
        rows.push(("Total", schedule.total));
        let table = NoteTable::single_column(
            &format!("Ageing at {}", schedule.as_of),
            "Amount",
            &rows,
        );

        Ok(ctx.note(code, narrative, vec![table], checker))
    }
}
