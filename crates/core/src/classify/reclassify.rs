//! Presentation of negative bucket balances on the opposite side.
//!
//! After accounts are summed into buckets, a debit-side bucket that ended up
//! in credit (or vice versa) is moved to its counterpart: customers in
//! credit become a liability, an overdrawn bank becomes an overdraft.
//! Rules are evaluated against a snapshot of the totals taken before any
//! move, so an amount moved by one rule is never moved again by another.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tieout_shared::types::round_money;

use super::bucket::BalanceSheetBucket;

/// Bucket totals in presentation sign (positive on the bucket's normal side).
pub type BucketTotals = BTreeMap<BalanceSheetBucket, Decimal>;

/// Source bucket and the bucket its negative balance is presented in.
pub const RECLASSIFICATION_RULES: [(BalanceSheetBucket, BalanceSheetBucket); 7] = [
    (BalanceSheetBucket::Cash, BalanceSheetBucket::BankOverdraft),
    (
        BalanceSheetBucket::TradeReceivables,
        BalanceSheetBucket::OtherCurrentLiabilities,
    ),
    (
        BalanceSheetBucket::OtherReceivables,
        BalanceSheetBucket::OtherCurrentLiabilities,
    ),
    (
        BalanceSheetBucket::Prepayments,
        BalanceSheetBucket::OtherCurrentLiabilities,
    ),
    (BalanceSheetBucket::VatReceivable, BalanceSheetBucket::VatPayable),
    (BalanceSheetBucket::VatPayable, BalanceSheetBucket::VatReceivable),
    (
        BalanceSheetBucket::TradePayables,
        BalanceSheetBucket::OtherReceivables,
    ),
];

/// A single move made by [`reclassify_negative_balances`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reclassification {
    /// Bucket the negative balance was removed from.
    pub from: BalanceSheetBucket,
    /// Bucket it is presented in.
    pub to: BalanceSheetBucket,
    /// Positive amount moved.
    pub amount: Decimal,
}

/// Moves negative balances to their counterpart buckets.
///
/// The source bucket is reduced to zero and the absolute amount is added to
/// the target. Because every rule crosses sides (asset to liability or back),
/// net assets are unchanged.
#[must_use]
pub fn reclassify_negative_balances(totals: &BucketTotals) -> (BucketTotals, Vec<Reclassification>) {
    let snapshot = totals.clone();
    let mut result = totals.clone();
    let mut moves = Vec::new();

    for (from, to) in RECLASSIFICATION_RULES {
        let balance = snapshot.get(&from).copied().unwrap_or_default();
        if balance >= Decimal::ZERO {
            continue;
        }
        let amount = -balance;

        let source = result.entry(from).or_default();
        *source = round_money(*source + amount);
        let target = result.entry(to).or_default();
        *target = round_money(*target + amount);

        moves.push(Reclassification { from, to, amount });
    }

    (result, moves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::bucket::BucketSide;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use BalanceSheetBucket as B;

    fn net_assets(totals: &BucketTotals) -> Decimal {
        totals
            .iter()
            .map(|(bucket, amount)| match bucket.side() {
                BucketSide::Asset => *amount,
                BucketSide::Liability => -*amount,
                BucketSide::Equity => Decimal::ZERO,
            })
            .sum()
    }

    #[test]
    fn test_customer_in_credit_becomes_liability() {
        let totals = BucketTotals::from([(B::TradeReceivables, dec!(-250.00)), (B::Cash, dec!(1000.00))]);
        let (result, moves) = reclassify_negative_balances(&totals);

        assert_eq!(result[&B::TradeReceivables], dec!(0.00));
        assert_eq!(result[&B::OtherCurrentLiabilities], dec!(250.00));
        assert_eq!(result[&B::Cash], dec!(1000.00));
        assert_eq!(
            moves,
            vec![Reclassification {
                from: B::TradeReceivables,
                to: B::OtherCurrentLiabilities,
                amount: dec!(250.00),
            }]
        );
    }

    #[test]
    fn test_overdrawn_bank_becomes_overdraft() {
        let totals = BucketTotals::from([(B::Cash, dec!(-40.00)), (B::BankOverdraft, dec!(10.00))]);
        let (result, _) = reclassify_negative_balances(&totals);
        assert_eq!(result[&B::Cash], dec!(0.00));
        assert_eq!(result[&B::BankOverdraft], dec!(50.00));
    }

    #[test]
    fn test_moves_do_not_chain() {
        // Supplier debit balance lands in other receivables. Other receivables
        // is checked against the snapshot, so it is not moved on.
        let totals = BucketTotals::from([(B::TradePayables, dec!(-30.00)), (B::OtherReceivables, dec!(-10.00))]);
        let (result, moves) = reclassify_negative_balances(&totals);

        assert_eq!(moves.len(), 2);
        assert_eq!(result[&B::OtherReceivables], dec!(30.00));
        assert_eq!(result[&B::OtherCurrentLiabilities], dec!(10.00));
        assert_eq!(result[&B::TradePayables], dec!(0.00));
    }

    #[test]
    fn test_positive_balances_untouched() {
        let totals = BucketTotals::from([(B::VatReceivable, dec!(5.00)), (B::VatPayable, dec!(7.00))]);
        let (result, moves) = reclassify_negative_balances(&totals);
        assert_eq!(result, totals);
        assert!(moves.is_empty());
    }

    fn bucket_strategy() -> impl Strategy<Value = BalanceSheetBucket> {
        prop::sample::select(BalanceSheetBucket::ALL.to_vec())
    }

    fn totals_strategy() -> impl Strategy<Value = BucketTotals> {
        prop::collection::btree_map(
            bucket_strategy(),
            (-1_000_000i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2)),
            0..12,
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// **Property: Reclassification preserves net assets**
        ///
        /// *For any* bucket totals, net assets after reclassification SHALL
        /// equal net assets before.
        #[test]
        fn prop_reclassification_preserves_net_assets(totals in totals_strategy()) {
            let (result, _) = reclassify_negative_balances(&totals);
            prop_assert_eq!(net_assets(&result), net_assets(&totals));
        }

        /// **Property: Reclassified sources are never negative**
        ///
        /// *For any* bucket totals, no bucket with a reclassification rule
        /// SHALL remain negative unless it received an amount from another rule.
        #[test]
        fn prop_rule_sources_cleared(totals in totals_strategy()) {
            let (result, moves) = reclassify_negative_balances(&totals);
            for m in &moves {
                prop_assert!(result[&m.from] >= Decimal::ZERO);
                prop_assert!(m.amount > Decimal::ZERO);
            }
        }
    }
}
