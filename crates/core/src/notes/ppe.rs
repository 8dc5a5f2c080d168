//! Property, plant and equipment movement schedule (note C).

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tieout_shared::types::{DateRange, FixedAssetId, round_money};

use crate::subledger::{DepreciationCharge, FixedAsset};

/// Cost and depreciation roll-forward of the fixed asset register.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PpeSchedule {
    /// Cost of assets held the day before the range.
    pub opening_cost: Decimal,
    /// Cost of assets acquired in the range.
    pub additions: Decimal,
    /// Cost of assets disposed of in the range.
    pub disposals: Decimal,
    /// Cost of assets held at the end of the range.
    pub closing_cost: Decimal,
    /// Accumulated depreciation the day before the range.
    pub opening_depreciation: Decimal,
    /// Depreciation charged in the range.
    pub charge: Decimal,
    /// Accumulated depreciation removed on disposals.
    pub depreciation_on_disposals: Decimal,
    /// Accumulated depreciation at the end of the range.
    pub closing_depreciation: Decimal,
}

impl PpeSchedule {
    /// Rolls the register forward over `range`.
    ///
    /// `charges` must hold every depreciation charge dated up to the end of
    /// the range. Charges for assets missing from the register are treated
    /// as belonging to assets still held.
    #[must_use]
    pub fn compute(range: DateRange, assets: &[FixedAsset], charges: &[DepreciationCharge]) -> Self {
        let by_id: HashMap<FixedAssetId, &FixedAsset> = assets.iter().map(|a| (a.id, a)).collect();
        let disposed_before = |asset: &FixedAsset| asset.disposal_date.is_some_and(|d| d < range.from);
        let disposed_within = |asset: &FixedAsset| asset.disposal_date.is_some_and(|d| range.contains(d));

        let mut schedule = Self::default();
        let add = |acc: &mut Decimal, amount: Decimal| *acc = round_money(*acc + amount);

        for asset in assets {
            if asset.acquisition_date > range.to {
                continue;
            }
            if asset.acquisition_date < range.from && !disposed_before(asset) {
                add(&mut schedule.opening_cost, asset.cost);
            }
            if range.contains(asset.acquisition_date) {
                add(&mut schedule.additions, asset.cost);
            }
            if disposed_within(asset) {
                add(&mut schedule.disposals, asset.cost);
            }
        }

        for charge in charges.iter().filter(|c| c.charge_date <= range.to) {
            let asset = by_id.get(&charge.asset_id).copied();
            let before = charge.charge_date < range.from;
            if before && !asset.is_some_and(|a| disposed_before(a)) {
                add(&mut schedule.opening_depreciation, charge.amount);
            }
            if !before {
                add(&mut schedule.charge, charge.amount);
            }
            if asset.is_some_and(|a| disposed_within(a)) {
                add(&mut schedule.depreciation_on_disposals, charge.amount);
            }
        }

        schedule.closing_cost =
            round_money(schedule.opening_cost + schedule.additions - schedule.disposals);
        schedule.closing_depreciation = round_money(
            schedule.opening_depreciation + schedule.charge - schedule.depreciation_on_disposals,
        );
        schedule
    }

    /// Carrying amount the day before the range.
    #[must_use]
    pub fn opening_carrying_amount(&self) -> Decimal {
        round_money(self.opening_cost - self.opening_depreciation)
    }

    /// Carrying amount at the end of the range.
    #[must_use]
    pub fn closing_carrying_amount(&self) -> Decimal {
        round_money(self.closing_cost - self.closing_depreciation)
    }
}
