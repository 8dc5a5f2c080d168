//! Accounting period types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tieout_shared::types::{AccountingPeriodId, DateRange, TenantId};

/// Name of the period that holds balances migrated from a previous system.
pub const OPENING_BALANCES_PERIOD: &str = "Opening Balances";

/// Status of an accounting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodStatus {
    /// Period is open for posting.
    Open,
    /// Period is closed to regular users but adjustable by accountants.
    SoftClosed,
    /// Period is closed.
    Closed,
}

impl PeriodStatus {
    /// Storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::SoftClosed => "SOFT_CLOSED",
            Self::Closed => "CLOSED",
        }
    }
}

impl std::str::FromStr for PeriodStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(Self::Open),
            "SOFT_CLOSED" => Ok(Self::SoftClosed),
            "CLOSED" => Ok(Self::Closed),
            other => Err(format!("Unknown period status: {other}")),
        }
    }
}

/// A tenant's accounting period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountingPeriod {
    /// Unique identifier.
    pub id: AccountingPeriodId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Period name (e.g., "March 2024").
    pub name: String,
    /// Start date of the period.
    pub start_date: NaiveDate,
    /// End date of the period.
    pub end_date: NaiveDate,
    /// Current status.
    pub status: PeriodStatus,
}

impl AccountingPeriod {
    /// Returns true if the given date falls within this period.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns true if the period is closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status == PeriodStatus::Closed
    }

    /// Returns true for the closed period holding migrated opening balances.
    #[must_use]
    pub fn is_closed_opening_balances(&self) -> bool {
        self.is_closed() && self.name.trim().eq_ignore_ascii_case(OPENING_BALANCES_PERIOD)
    }

    /// The period's dates as a range.
    #[must_use]
    pub const fn range(&self) -> DateRange {
        DateRange {
            from: self.start_date,
            to: self.end_date,
        }
    }
}
