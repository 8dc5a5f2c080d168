//! Income tax control account movement (note D).
//!
//! Lines on `TAX:*` control accounts are split by their entry reference:
//! `TAX_PAYMENT:` entries are payments, `TAX_ADJ:` entries are prior-period
//! adjustments, everything else is the current charge.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tieout_shared::types::{DateRange, round_money};

use crate::ledger::{PostingLine, TAX_ADJUSTMENT_REFERENCE, TAX_PAYMENT_REFERENCE};

/// Movement on the income tax control accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxMovement {
    /// Liability the day before the range.
    pub opening_balance: Decimal,
    /// Charge for the current period.
    pub current_charge: Decimal,
    /// Adjustments in respect of prior periods.
    pub prior_period_adjustments: Decimal,
    /// Current charge plus adjustments.
    pub total_charge: Decimal,
    /// Tax paid.
    pub payments: Decimal,
    /// Liability at the end of the range.
    pub closing_balance: Decimal,
}

impl IncomeTaxMovement {
    /// Rolls the control accounts forward over `range`.
    ///
    /// `lines` are the control account lines dated up to the end of the range.
    #[must_use]
    pub fn compute(range: DateRange, lines: &[PostingLine]) -> Self {
        let mut movement = Self::default();
        let add = |acc: &mut Decimal, amount: Decimal| *acc = round_money(*acc + amount);

        for line in lines.iter().filter(|l| l.entry_date <= range.to) {
            let credit_net = line.credit - line.debit;
            if line.entry_date < range.from {
                add(&mut movement.opening_balance, credit_net);
            } else if line.has_reference_prefix(TAX_PAYMENT_REFERENCE) {
                add(&mut movement.payments, -credit_net);
            } else if line.has_reference_prefix(TAX_ADJUSTMENT_REFERENCE) {
                add(&mut movement.prior_period_adjustments, credit_net);
            } else {
                add(&mut movement.current_charge, credit_net);
            }
        }

        movement.total_charge =
            round_money(movement.current_charge + movement.prior_period_adjustments);
        movement.closing_balance =
            round_money(movement.opening_balance + movement.total_charge - movement.payments);
        movement
    }
}
