//! Collaborator interfaces the engine reads from and writes to.
//!
//! The engine never talks to a database directly. Production wires these
//! traits to the `tieout-db` repositories; tests use [`memory::InMemoryStore`].
//! Every method is tenant-scoped and must never return rows of another tenant.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use tieout_shared::types::{AccountId, AccountingPeriodId, DateRange, TenantId};

use crate::fiscal::AccountingPeriod;
use crate::ledger::{Account, AccountTotals, AggregateQuery, PostingLine, PostingWindow};
use crate::notes::DisclosureNote;
use crate::subledger::{DepreciationCharge, FixedAsset, OpenItem, OpenItemKind};
use crate::tenant::TenantProfile;

/// Failure reported by a collaborator.
///
/// Any of these aborts the statement being computed; partial data is never
/// reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The store could not be reached or the query failed.
    #[error("Data store unavailable: {0}")]
    Unavailable(String),

    /// The store answered with data that cannot be right.
    #[error("Inconsistent data from store: {0}")]
    Inconsistent(String),
}

/// Posted journal lines.
#[async_trait]
pub trait LedgerSource: Send + Sync {
    /// Sums debits and credits of `POSTED` lines per requested account.
    ///
    /// Accounts without postings in the window may be omitted.
    async fn sum_postings(&self, query: &AggregateQuery) -> Result<Vec<AccountTotals>, SourceError>;

    /// Every line of every `POSTED` entry dated in `range` that has at least
    /// one line on one of `accounts`.
    async fn entries_touching(
        &self,
        tenant_id: TenantId,
        accounts: &[AccountId],
        range: DateRange,
    ) -> Result<Vec<PostingLine>, SourceError>;

    /// `POSTED` lines on `accounts` dated inside `window`.
    async fn lines_on(
        &self,
        tenant_id: TenantId,
        accounts: &[AccountId],
        window: PostingWindow,
    ) -> Result<Vec<PostingLine>, SourceError>;
}

/// Accounting periods.
#[async_trait]
pub trait PeriodCatalog: Send + Sync {
    /// Periods of the tenant, optionally only those overlapping `overlapping`.
    async fn list_periods(
        &self,
        tenant_id: TenantId,
        overlapping: Option<DateRange>,
    ) -> Result<Vec<AccountingPeriod>, SourceError>;

    /// A single period by ID.
    async fn find_period(
        &self,
        tenant_id: TenantId,
        period_id: AccountingPeriodId,
    ) -> Result<Option<AccountingPeriod>, SourceError>;
}

/// The chart of accounts.
#[async_trait]
pub trait ChartOfAccounts: Send + Sync {
    /// All accounts of the tenant.
    async fn list_accounts(&self, tenant_id: TenantId) -> Result<Vec<Account>, SourceError>;
}

/// Tenant settings.
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// The tenant's reporting profile, `None` if the tenant does not exist.
    async fn tenant_profile(&self, tenant_id: TenantId)
    -> Result<Option<TenantProfile>, SourceError>;
}

/// Fixed asset register and open-item ledgers.
#[async_trait]
pub trait SubledgerSource: Send + Sync {
    /// The whole fixed asset register, including disposed assets.
    async fn fixed_assets(&self, tenant_id: TenantId) -> Result<Vec<FixedAsset>, SourceError>;

    /// Depreciation charges dated inside `window`.
    async fn depreciation_charges(
        &self,
        tenant_id: TenantId,
        window: PostingWindow,
    ) -> Result<Vec<DepreciationCharge>, SourceError>;

    /// Items of `kind` outstanding at the end of `as_of`.
    async fn open_items(
        &self,
        tenant_id: TenantId,
        kind: OpenItemKind,
        as_of: NaiveDate,
    ) -> Result<Vec<OpenItem>, SourceError>;
}

/// Persisted period-close notes.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Inserts the note, or replaces the note of the same type for the same
    /// period. Returns the stored note with its ID and version.
    async fn upsert_note(&self, note: DisclosureNote) -> Result<DisclosureNote, SourceError>;

    /// Stores every note of one period in a single write.
    ///
    /// Each note replaces the stored note of the same type, as with
    /// [`NoteStore::upsert_note`]. Either all of them are stored or none is.
    async fn replace_period_notes(
        &self,
        notes: Vec<DisclosureNote>,
    ) -> Result<Vec<DisclosureNote>, SourceError>;

    /// Notes stored for a period.
    async fn list_notes(
        &self,
        tenant_id: TenantId,
        period_id: AccountingPeriodId,
    ) -> Result<Vec<DisclosureNote>, SourceError>;
}

/// Tenant and period shared by a batch of notes, `None` for an empty batch.
///
/// # Errors
///
/// `SourceError::Inconsistent` if the notes belong to more than one period.
pub fn note_batch_scope(
    notes: &[DisclosureNote],
) -> Result<Option<(TenantId, AccountingPeriodId)>, SourceError> {
    let Some(first) = notes.first() else {
        return Ok(None);
    };
    let scope = (first.tenant_id, first.period_id);
    if let Some(stray) = notes.iter().find(|n| (n.tenant_id, n.period_id) != scope) {
        return Err(SourceError::Inconsistent(format!(
            "note batch for period {} contains a note for period {}",
            scope.1, stray.period_id
        )));
    }
    Ok(Some(scope))
}

/// The full set of collaborators the engine needs.
#[derive(Clone)]
pub struct DataSources {
    /// Posted journal lines.
    pub ledger: Arc<dyn LedgerSource>,
    /// Accounting periods.
    pub periods: Arc<dyn PeriodCatalog>,
    /// Chart of accounts.
    pub accounts: Arc<dyn ChartOfAccounts>,
    /// Tenant settings.
    pub tenants: Arc<dyn TenantDirectory>,
    /// Asset register and open items.
    pub subledgers: Arc<dyn SubledgerSource>,
    /// Period-close note storage.
    pub notes: Arc<dyn NoteStore>,
}

impl DataSources {
    /// Uses one store for every collaborator.
    #[must_use]
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: LedgerSource
            + PeriodCatalog
            + ChartOfAccounts
            + TenantDirectory
            + SubledgerSource
            + NoteStore
            + 'static,
    {
        Self {
            ledger: store.clone(),
            periods: store.clone(),
            accounts: store.clone(),
            tenants: store.clone(),
            subledgers: store.clone(),
            notes: store,
        }
    }
}

impl std::fmt::Debug for DataSources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSources").finish_non_exhaustive()
    }
}
