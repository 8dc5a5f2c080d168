//! Dashboard data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tieout_shared::types::{DateRange, TenantId};

use crate::reports::ProfitAndLossReport;

/// Headline figures for one tenant at one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    /// Tenant.
    pub tenant_id: TenantId,
    /// Date the figures are taken at.
    pub as_of: NaiveDate,
    /// Presentation currency, when configured.
    pub currency: Option<String>,
    /// Fiscal year to date.
    pub year_to_date: PnlSummary,
    /// Month to date.
    pub month_to_date: PnlSummary,
    /// Cash position.
    pub cash_position: CashPosition,
    /// Trade receivables on the balance sheet.
    pub receivables: Decimal,
    /// Trade payables on the balance sheet.
    pub payables: Decimal,
}

/// Profit and loss headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PnlSummary {
    /// Dates actually reported, after cutover clipping.
    pub range: DateRange,
    /// Revenue.
    pub revenue: Decimal,
    /// Total income.
    pub total_income: Decimal,
    /// Total expenses.
    pub total_expenses: Decimal,
    /// Profit or loss.
    pub profit_or_loss: Decimal,
}

impl From<&ProfitAndLossReport> for PnlSummary {
    fn from(report: &ProfitAndLossReport) -> Self {
        Self {
            range: report.range,
            revenue: report.revenue.total,
            total_income: report.total_income,
            total_expenses: report.total_expenses,
            profit_or_loss: report.profit_or_loss,
        }
    }
}

/// Cash position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashPosition {
    /// Cash less bank overdrafts.
    pub net_cash: Decimal,
    /// Cash and cash equivalents.
    pub cash: Decimal,
    /// Bank overdrafts.
    pub overdraft: Decimal,
}
