//! Journal entries and their posted lines.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tieout_shared::types::{AccountId, JournalEntryId, JournalLineId, TenantId};

/// Reference prefix marking a tax payment entry.
pub const TAX_PAYMENT_REFERENCE: &str = "TAX_PAYMENT:";

/// Reference prefix marking a prior-period tax adjustment entry.
pub const TAX_ADJUSTMENT_REFERENCE: &str = "TAX_ADJ:";

/// Lifecycle status of a journal entry. Only posted entries are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryStatus {
    /// Being drafted.
    Draft,
    /// Posted to the ledger (immutable).
    Posted,
    /// Voided.
    Void,
}

/// A journal entry with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Entry ID.
    pub id: JournalEntryId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Lifecycle status.
    pub status: EntryStatus,
    /// Structured reference, e.g. `TAX_PAYMENT:2024-Q1`.
    pub reference: Option<String>,
    /// Free-text description.
    pub description: String,
    /// The entry's lines.
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    /// Returns true if debits equal credits.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        let debits: Decimal = self.lines.iter().map(|l| l.debit).sum();
        let credits: Decimal = self.lines.iter().map(|l| l.credit).sum();
        debits == credits
    }
}

/// One side of a journal entry against a single account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Line ID.
    pub id: JournalLineId,
    /// Account posted to.
    pub account_id: AccountId,
    /// Debit amount (non-negative).
    pub debit: Decimal,
    /// Credit amount (non-negative).
    pub credit: Decimal,
}

/// A posted line flattened with its parent entry's date and reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingLine {
    /// Line ID.
    pub line_id: JournalLineId,
    /// Parent entry.
    pub entry_id: JournalEntryId,
    /// Account posted to.
    pub account_id: AccountId,
    /// Accounting date of the parent entry.
    pub entry_date: NaiveDate,
    /// Structured reference of the parent entry.
    pub reference: Option<String>,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

impl PostingLine {
    /// Flattens every line of a posted entry. Unposted entries yield nothing.
    pub fn from_entry(entry: &JournalEntry) -> impl Iterator<Item = Self> + '_ {
        entry
            .lines
            .iter()
            .filter(move |_| entry.status == EntryStatus::Posted)
            .map(move |line| Self {
                line_id: line.id,
                entry_id: entry.id,
                account_id: line.account_id,
                entry_date: entry.entry_date,
                reference: entry.reference.clone(),
                debit: line.debit,
                credit: line.credit,
            })
    }

    /// Returns true if the parent reference starts with `prefix`.
    #[must_use]
    pub fn has_reference_prefix(&self, prefix: &str) -> bool {
        self.reference
            .as_deref()
            .is_some_and(|r| r.starts_with(prefix))
    }

    /// `debit - credit`.
    #[must_use]
    pub fn net_debit(&self) -> Decimal {
        self.debit - self.credit
    }
}
