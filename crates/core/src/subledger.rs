//! Fixed asset register and open-item sub-ledgers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tieout_shared::types::{FixedAssetId, TenantId};

/// An item in the fixed asset register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedAsset {
    /// Asset ID.
    pub id: FixedAssetId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Description.
    pub name: String,
    /// Capitalised cost.
    pub cost: Decimal,
    /// Date the asset was acquired.
    pub acquisition_date: NaiveDate,
    /// Date the asset was disposed of, if any.
    pub disposal_date: Option<NaiveDate>,
}

impl FixedAsset {
    /// Returns true if the asset was held at the end of `date`.
    #[must_use]
    pub fn is_held_on(&self, date: NaiveDate) -> bool {
        self.acquisition_date <= date && self.disposal_date.is_none_or(|d| d > date)
    }
}

/// A depreciation charge booked by a depreciation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationCharge {
    /// Asset depreciated.
    pub asset_id: FixedAssetId,
    /// Date of the charge.
    pub charge_date: NaiveDate,
    /// Amount charged.
    pub amount: Decimal,
}

/// Which open-item ledger an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OpenItemKind {
    /// Customer invoice (accounts receivable).
    Receivable,
    /// Supplier bill (accounts payable).
    Payable,
}

/// An unsettled invoice or bill as of a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenItem {
    /// Ledger the item belongs to.
    pub kind: OpenItemKind,
    /// Customer or supplier name.
    pub counterparty: String,
    /// Invoice or bill number.
    pub document_ref: String,
    /// Document date.
    pub document_date: NaiveDate,
    /// Payment due date.
    pub due_date: NaiveDate,
    /// Amount still outstanding.
    pub outstanding: Decimal,
}
