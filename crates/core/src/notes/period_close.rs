//! Period-close notes persisted per accounting period.
//!
//! Unlike the IFRS notes these are working papers: they are regenerated on
//! demand and stored with a version so reviewers can see what changed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tieout_shared::types::{AccountingPeriodId, DisclosureNoteId, FixedAssetId, TenantId, round_money};

use super::ppe::PpeSchedule;
use super::service::NoteService;
use crate::reports::ProfitAndLossReport;
use crate::subledger::{DepreciationCharge, FixedAsset};

/// Kind of period-close note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodCloseNoteType {
    /// Cost and depreciation roll-forward.
    PpeMovement,
    /// Depreciation charged per asset.
    Depreciation,
    /// Reconciliation of the tax charge to the statutory rate.
    TaxReconciliation,
}

impl PeriodCloseNoteType {
    /// Every note type, in generation order.
    pub const ALL: [Self; 3] = [Self::PpeMovement, Self::Depreciation, Self::TaxReconciliation];

    /// Storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PpeMovement => "PPE_MOVEMENT",
            Self::Depreciation => "DEPRECIATION",
            Self::TaxReconciliation => "TAX_RECONCILIATION",
        }
    }
}

impl std::str::FromStr for PeriodCloseNoteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown note type: {s}"))
    }
}

/// One labelled amount in a period-close note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteLine {
    /// Position in the note, starting at 1.
    pub line_no: i32,
    /// Label.
    pub label: String,
    /// Amount.
    pub amount: Decimal,
}

/// A stored period-close note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisclosureNote {
    /// Note ID.
    pub id: DisclosureNoteId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Period the note belongs to.
    pub period_id: AccountingPeriodId,
    /// Kind of note.
    pub note_type: PeriodCloseNoteType,
    /// Incremented on every regeneration; 1 for the first.
    pub version: i32,
    /// When the content was generated.
    pub generated_at: DateTime<Utc>,
    /// Content.
    pub lines: Vec<NoteLine>,
}

impl DisclosureNote {
    /// A freshly generated note, not yet stored.
    #[must_use]
    pub fn generated(
        tenant_id: TenantId,
        period_id: AccountingPeriodId,
        note_type: PeriodCloseNoteType,
        lines: Vec<NoteLine>,
    ) -> Self {
        Self {
            id: DisclosureNoteId::new(),
            tenant_id,
            period_id,
            note_type,
            version: 1,
            generated_at: Utc::now(),
            lines,
        }
    }
}

fn numbered(lines: Vec<(String, Decimal)>) -> Vec<NoteLine> {
    lines
        .into_iter()
        .zip(1..)
        .map(|((label, amount), line_no)| NoteLine {
            line_no,
            label,
            amount,
        })
        .collect()
}

impl NoteService {
    /// PPE movement lines.
    #[must_use]
    pub fn ppe_movement_lines(schedule: &PpeSchedule) -> Vec<NoteLine> {
        numbered(vec![
            ("Cost at start of period".to_string(), schedule.opening_cost),
            ("Additions".to_string(), schedule.additions),
            ("Disposals".to_string(), -schedule.disposals),
            ("Cost at end of period".to_string(), schedule.closing_cost),
            (
                "Accumulated depreciation at start of period".to_string(),
                schedule.opening_depreciation,
            ),
            ("Charge for the period".to_string(), schedule.charge),
            (
                "Eliminated on disposals".to_string(),
                -schedule.depreciation_on_disposals,
            ),
            (
                "Accumulated depreciation at end of period".to_string(),
                schedule.closing_depreciation,
            ),
            (
                "Carrying amount at end of period".to_string(),
                schedule.closing_carrying_amount(),
            ),
        ])
    }

    /// Depreciation charged per asset within the period, with a total line.
    ///
    /// `charges` must already be limited to the period.
    #[must_use]
    pub fn depreciation_lines(assets: &[FixedAsset], charges: &[DepreciationCharge]) -> Vec<NoteLine> {
        let mut per_asset: Vec<(FixedAssetId, String, Decimal)> = Vec::new();
        for charge in charges {
            if let Some(slot) = per_asset.iter_mut().find(|(id, _, _)| *id == charge.asset_id) {
                slot.2 = round_money(slot.2 + charge.amount);
                continue;
            }
            let name = assets
                .iter()
                .find(|a| a.id == charge.asset_id)
                .map_or_else(|| format!("Asset {}", charge.asset_id), |a| a.name.clone());
            per_asset.push((charge.asset_id, name, round_money(charge.amount)));
        }
        per_asset.sort_by(|a, b| a.1.cmp(&b.1));

        let total = per_asset
            .iter()
            .fold(Decimal::ZERO, |acc, (_, _, amount)| round_money(acc + amount));
        let mut lines: Vec<(String, Decimal)> = per_asset
            .into_iter()
            .map(|(_, name, amount)| (name, amount))
            .collect();
        lines.push(("Total depreciation charge".to_string(), total));
        numbered(lines)
    }

    /// Reconciliation of the tax charge to profit before tax at `statutory_rate`.
    #[must_use]
    pub fn tax_reconciliation_lines(
        profit_and_loss: &ProfitAndLossReport,
        statutory_rate: Decimal,
    ) -> Vec<NoteLine> {
        let profit_before_tax = profit_and_loss.profit_before_tax;
        let tax_expense = profit_and_loss.tax_expense.total;
        let expected = round_money(profit_before_tax * statutory_rate);
        let other_differences = round_money(tax_expense - expected);
        let effective_rate = if profit_before_tax.is_zero() {
            Decimal::ZERO
        } else {
            round_money(tax_expense / profit_before_tax * Decimal::ONE_HUNDRED)
        };

        numbered(vec![
            ("Profit before tax".to_string(), profit_before_tax),
            (
                format!(
                    "Tax at the statutory rate of {}%",
                    (statutory_rate * Decimal::ONE_HUNDRED).normalize()
                ),
                expected,
            ),
            ("Other differences".to_string(), other_differences),
            ("Income tax expense".to_string(), tax_expense),
            ("Effective tax rate (%)".to_string(), effective_rate),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::str::FromStr;
    use tieout_shared::types::DateRange;

    #[test]
    fn test_note_type_storage_names() {
        for note_type in PeriodCloseNoteType::ALL {
            assert_eq!(PeriodCloseNoteType::from_str(note_type.as_str()), Ok(note_type));
        }
    }

    #[test]
    fn test_tax_reconciliation() {
        let range = DateRange::parse("2024-03-01", "2024-03-31").unwrap();
        let mut pnl = ProfitAndLossReport::empty(range);
        pnl.profit_before_tax = dec!(4000.00);
        pnl.tax_expense.total = dec!(1100.00);

        let lines = NoteService::tax_reconciliation_lines(&pnl, dec!(0.25));

        assert_eq!(lines[1].label, "Tax at the statutory rate of 25%");
        assert_eq!(lines[1].amount, dec!(1000.00));
        assert_eq!(lines[2].amount, dec!(100.00));
        assert_eq!(lines[4].amount, dec!(27.50));
        assert_eq!(lines.iter().map(|l| l.line_no).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_depreciation_lines_group_by_asset() {
        let van = FixedAsset {
            id: FixedAssetId::new(),
            tenant_id: TenantId::new(),
            name: "Delivery van".to_string(),
            cost: dec!(30000),
            acquisition_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            disposal_date: None,
        };
        let date = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let charges = vec![
            DepreciationCharge { asset_id: van.id, charge_date: date, amount: dec!(250) },
            DepreciationCharge { asset_id: van.id, charge_date: date, amount: dec!(250) },
        ];

        let lines = NoteService::depreciation_lines(&[van], &charges);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].label, "Delivery van");
        assert_eq!(lines[0].amount, dec!(500));
        assert_eq!(lines[1].amount, dec!(500));
    }
}
