//! Balance sheet.
//!
//! Accounts are summed into presentation buckets, negative buckets are moved
//! to the opposite side, and retained earnings is the balancing figure:
//! `retained earnings = assets - liabilities - share capital - other reserves`.
//! The statement therefore always balances; `is_balanced` is kept for
//! consumers that check it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tieout_shared::types::round_money;

use super::service::ReportService;
use super::types::StatementLine;
use crate::classify::{
    AccountClassifier, BalanceSheetBucket, BucketSide, BucketTotals, Reclassification,
    reclassify_negative_balances,
};
use crate::ledger::{AccountBalance, AccountType};

/// Key of the combined property, plant and equipment line.
pub const PPE_NET_KEY: &str = "property_plant_equipment";

/// Key of the retained earnings line.
pub const RETAINED_EARNINGS_KEY: &str = "retained_earnings";

/// Assets or liabilities, split into current and non-current.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetSection {
    /// Current lines in presentation order.
    pub current: Vec<StatementLine>,
    /// Non-current lines in presentation order.
    pub non_current: Vec<StatementLine>,
    /// Total of current lines.
    pub current_total: Decimal,
    /// Total of non-current lines.
    pub non_current_total: Decimal,
    /// Section total.
    pub total: Decimal,
}

impl BalanceSheetSection {
    fn push(&mut self, line: StatementLine, current: bool) {
        if current {
            self.current_total = round_money(self.current_total + line.amount);
            self.current.push(line);
        } else {
            self.non_current_total = round_money(self.non_current_total + line.amount);
            self.non_current.push(line);
        }
        self.total = round_money(self.current_total + self.non_current_total);
    }

    /// All lines, current first.
    pub fn lines(&self) -> impl Iterator<Item = &StatementLine> {
        self.current.iter().chain(&self.non_current)
    }
}

/// Equity section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquitySection {
    /// Share capital, other reserves and retained earnings.
    pub lines: Vec<StatementLine>,
    /// Share capital and premium.
    pub share_capital: Decimal,
    /// Other reserves.
    pub other_reserves: Decimal,
    /// Retained earnings (balancing figure).
    pub retained_earnings: Decimal,
    /// Section total.
    pub total: Decimal,
}

/// Balance sheet report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// As of date.
    pub as_of: NaiveDate,
    /// Assets section.
    pub assets: BalanceSheetSection,
    /// Liabilities section.
    pub liabilities: BalanceSheetSection,
    /// Equity section.
    pub equity: EquitySection,
    /// Total assets.
    pub total_assets: Decimal,
    /// Total liabilities.
    pub total_liabilities: Decimal,
    /// Total equity.
    pub total_equity: Decimal,
    /// Liabilities plus equity.
    pub liabilities_and_equity: Decimal,
    /// Whether assets equal liabilities plus equity.
    pub is_balanced: bool,
    /// Bucket totals as presented, after reclassification.
    pub buckets: BucketTotals,
    /// Bucket totals before negative balances were moved.
    pub unadjusted_buckets: BucketTotals,
    /// Moves made to present negative balances.
    pub reclassifications: Vec<Reclassification>,
}

impl BalanceSheetReport {
    /// An all-zero balance sheet.
    #[must_use]
    pub fn empty(as_of: NaiveDate) -> Self {
        ReportService::generate_balance_sheet(as_of, &[])
    }

    /// Presented amount of a bucket.
    #[must_use]
    pub fn bucket(&self, bucket: BalanceSheetBucket) -> Decimal {
        self.buckets.get(&bucket).copied().unwrap_or_default()
    }

    /// Amount of a bucket before reclassification.
    #[must_use]
    pub fn unadjusted_bucket(&self, bucket: BalanceSheetBucket) -> Decimal {
        self.unadjusted_buckets
            .get(&bucket)
            .copied()
            .unwrap_or_default()
    }

    /// Property, plant and equipment at carrying amount.
    #[must_use]
    pub fn ppe_carrying_amount(&self) -> Decimal {
        round_money(
            self.bucket(BalanceSheetBucket::PpeCost)
                + self.bucket(BalanceSheetBucket::AccumulatedDepreciation),
        )
    }

    /// Cash less bank overdrafts.
    #[must_use]
    pub fn net_cash(&self) -> Decimal {
        round_money(
            self.bucket(BalanceSheetBucket::Cash) - self.bucket(BalanceSheetBucket::BankOverdraft),
        )
    }
}

impl ReportService {
    /// Generates a balance sheet from cumulative balances up to `as_of`.
    ///
    /// Income and expense accounts in `balances` are ignored; their
    /// cumulative effect reaches equity through retained earnings.
    #[must_use]
    pub fn generate_balance_sheet(as_of: NaiveDate, balances: &[AccountBalance]) -> BalanceSheetReport {
        let unadjusted = Self::bucket_totals(balances);
        let (buckets, reclassifications) = reclassify_negative_balances(&unadjusted);

        let mut assets = BalanceSheetSection::default();
        let mut liabilities = BalanceSheetSection::default();

        for bucket in BalanceSheetBucket::ALL {
            let amount = buckets.get(&bucket).copied().unwrap_or_default();
            match (bucket.side(), bucket) {
                (BucketSide::Asset, BalanceSheetBucket::PpeCost) => {
                    let net = round_money(
                        amount
                            + buckets
                                .get(&BalanceSheetBucket::AccumulatedDepreciation)
                                .copied()
                                .unwrap_or_default(),
                    );
                    assets.push(
                        StatementLine::new(PPE_NET_KEY, "Property, plant and equipment", net),
                        false,
                    );
                }
                (BucketSide::Asset, BalanceSheetBucket::AccumulatedDepreciation) => {}
                (BucketSide::Asset, _) => assets.push(
                    StatementLine::new(bucket.key(), bucket.label(), amount),
                    bucket.is_current(),
                ),
                (BucketSide::Liability, _) => liabilities.push(
                    StatementLine::new(bucket.key(), bucket.label(), amount),
                    bucket.is_current(),
                ),
                (BucketSide::Equity, _) => {}
            }
        }

        let share_capital = buckets
            .get(&BalanceSheetBucket::ShareCapital)
            .copied()
            .unwrap_or_default();
        let other_reserves = buckets
            .get(&BalanceSheetBucket::OtherReserves)
            .copied()
            .unwrap_or_default();
        let retained_earnings =
            round_money(assets.total - liabilities.total - share_capital - other_reserves);
        let equity_total = round_money(share_capital + other_reserves + retained_earnings);

        let equity = EquitySection {
            lines: vec![
                StatementLine::new(
                    BalanceSheetBucket::ShareCapital.key(),
                    BalanceSheetBucket::ShareCapital.label(),
                    share_capital,
                ),
                StatementLine::new(
                    BalanceSheetBucket::OtherReserves.key(),
                    BalanceSheetBucket::OtherReserves.label(),
                    other_reserves,
                ),
                StatementLine::new(RETAINED_EARNINGS_KEY, "Retained earnings", retained_earnings),
            ],
            share_capital,
            other_reserves,
            retained_earnings,
            total: equity_total,
        };

        let total_assets = assets.total;
        let total_liabilities = liabilities.total;
        let liabilities_and_equity = round_money(total_liabilities + equity_total);

        BalanceSheetReport {
            as_of,
            assets,
            liabilities,
            equity,
            total_assets,
            total_liabilities,
            total_equity: equity_total,
            liabilities_and_equity,
            is_balanced: total_assets == liabilities_and_equity,
            buckets,
            unadjusted_buckets: unadjusted,
            reclassifications,
        }
    }

    /// Sums balance sheet accounts into buckets in presentation sign.
    fn bucket_totals(balances: &[AccountBalance]) -> BucketTotals {
        let mut totals = BucketTotals::new();
        for balance in balances {
            if !balance.account_type().is_balance_sheet() {
                continue;
            }
            let Some(bucket) = AccountClassifier::classify(&balance.account).bucket else {
                continue;
            };
            let amount = match balance.account_type() {
                AccountType::Asset => balance.net_debit(),
                _ => -balance.net_debit(),
            };
            let slot = totals.entry(bucket).or_default();
            *slot = round_money(*slot + amount);
        }
        totals
    }
}
