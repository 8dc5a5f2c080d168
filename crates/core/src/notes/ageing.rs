//! Open-item ageing (notes E and F).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tieout_shared::types::round_money;

use crate::subledger::OpenItem;

/// Days-past-due band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeingBand {
    /// Not yet due.
    Current,
    /// 1 to 30 days past due.
    Days1To30,
    /// 31 to 60 days past due.
    Days31To60,
    /// 61 to 90 days past due.
    Days61To90,
    /// More than 90 days past due.
    Over90,
}

impl AgeingBand {
    /// Every band in presentation order.
    pub const ALL: [Self; 5] = [
        Self::Current,
        Self::Days1To30,
        Self::Days31To60,
        Self::Days61To90,
        Self::Over90,
    ];

    /// Band for a number of days past due.
    #[must_use]
    pub const fn for_days_past_due(days: i64) -> Self {
        match days {
            i64::MIN..=0 => Self::Current,
            1..=30 => Self::Days1To30,
            31..=60 => Self::Days31To60,
            61..=90 => Self::Days61To90,
            _ => Self::Over90,
        }
    }

    /// Presentation label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Current => "Not yet due",
            Self::Days1To30 => "1-30 days past due",
            Self::Days31To60 => "31-60 days past due",
            Self::Days61To90 => "61-90 days past due",
            Self::Over90 => "More than 90 days past due",
        }
    }
}

/// Outstanding items bucketed by age.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeingSchedule {
    /// Date the ageing is measured at.
    pub as_of: NaiveDate,
    /// Amount per band, in [`AgeingBand::ALL`] order.
    pub bands: Vec<(AgeingBand, Decimal)>,
    /// Number of open items.
    pub item_count: usize,
    /// Total outstanding.
    pub total: Decimal,
}

impl AgeingSchedule {
    /// Buckets `items` by days past due at `as_of`.
    #[must_use]
    pub fn compute(as_of: NaiveDate, items: &[OpenItem]) -> Self {
        let mut bands: Vec<(AgeingBand, Decimal)> =
            AgeingBand::ALL.iter().map(|b| (*b, Decimal::ZERO)).collect();
        let mut total = Decimal::ZERO;

        for item in items {
            let band = AgeingBand::for_days_past_due((as_of - item.due_date).num_days());
            if let Some(slot) = bands.iter_mut().find(|(b, _)| *b == band) {
                slot.1 = round_money(slot.1 + item.outstanding);
            }
            total = round_money(total + item.outstanding);
        }

        Self {
            as_of,
            bands,
            item_count: items.len(),
            total,
        }
    }
}
