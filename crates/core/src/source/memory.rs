//! In-memory collaborator implementation.
//!
//! Backs unit tests and the seeder's dry-run mode. All state sits behind one
//! `RwLock`; reads clone out, so no lock is held across an `.await`.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tieout_shared::types::{AccountId, AccountingPeriodId, DateRange, TenantId, round_money};

use super::{
    ChartOfAccounts, LedgerSource, NoteStore, PeriodCatalog, SourceError, SubledgerSource,
    TenantDirectory, note_batch_scope,
};
use crate::fiscal::AccountingPeriod;
use crate::ledger::{Account, AccountTotals, AggregateQuery, JournalEntry, PostingLine, PostingWindow};
use crate::notes::DisclosureNote;
use crate::subledger::{DepreciationCharge, FixedAsset, OpenItem, OpenItemKind};
use crate::tenant::TenantProfile;

#[derive(Debug, Clone)]
struct StoredOpenItem {
    tenant_id: TenantId,
    item: OpenItem,
    settled_on: Option<NaiveDate>,
}

#[derive(Debug, Default)]
struct State {
    tenants: HashMap<TenantId, TenantProfile>,
    accounts: Vec<Account>,
    periods: Vec<AccountingPeriod>,
    entries: Vec<JournalEntry>,
    assets: Vec<FixedAsset>,
    charges: Vec<(TenantId, DepreciationCharge)>,
    open_items: Vec<StoredOpenItem>,
    notes: Vec<DisclosureNote>,
    unavailable: bool,
}

/// A complete tenant data set held in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, State> {
        self.state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, State>, SourceError> {
        let state = self
            .state
            .read()
            .map_err(|_| SourceError::Unavailable("in-memory store poisoned".to_string()))?;
        if state.unavailable {
            return Err(SourceError::Unavailable("store marked unavailable".to_string()));
        }
        Ok(state)
    }

    /// Registers or replaces a tenant profile.
    pub fn add_tenant(&self, profile: TenantProfile) {
        self.write().tenants.insert(profile.tenant_id, profile);
    }

    /// Adds an account to the chart.
    pub fn add_account(&self, account: Account) {
        self.write().accounts.push(account);
    }

    /// Adds an accounting period.
    pub fn add_period(&self, period: AccountingPeriod) {
        self.write().periods.push(period);
    }

    /// Records a journal entry. Only `POSTED` entries are ever read back.
    pub fn post_entry(&self, entry: JournalEntry) {
        self.write().entries.push(entry);
    }

    /// Adds an asset to the register.
    pub fn add_fixed_asset(&self, asset: FixedAsset) {
        self.write().assets.push(asset);
    }

    /// Records a depreciation run line.
    pub fn add_depreciation_charge(&self, tenant_id: TenantId, charge: DepreciationCharge) {
        self.write().charges.push((tenant_id, charge));
    }

    /// Adds an open item; `settled_on` removes it from ageings on and after
    /// that date.
    pub fn add_open_item(&self, tenant_id: TenantId, item: OpenItem, settled_on: Option<NaiveDate>) {
        self.write().open_items.push(StoredOpenItem {
            tenant_id,
            item,
            settled_on,
        });
    }

    /// Makes every read fail with `SourceError::Unavailable` until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.write().unavailable = unavailable;
    }

    fn posted_lines(state: &State, tenant_id: TenantId) -> impl Iterator<Item = PostingLine> + '_ {
        state
            .entries
            .iter()
            .filter(move |e| e.tenant_id == tenant_id)
            .flat_map(PostingLine::from_entry)
    }
}

#[async_trait]
impl LedgerSource for InMemoryStore {
    async fn sum_postings(&self, query: &AggregateQuery) -> Result<Vec<AccountTotals>, SourceError> {
        let state = self.read()?;
        let mut totals: HashMap<AccountId, AccountTotals> = HashMap::new();
        for line in Self::posted_lines(&state, query.tenant_id) {
            if !query.account_ids.contains(&line.account_id) || !query.window.contains(line.entry_date) {
                continue;
            }
            let slot = totals
                .entry(line.account_id)
                .or_insert_with(|| AccountTotals::zero(line.account_id));
            slot.debit += line.debit;
            slot.credit += line.credit;
        }
        Ok(totals.into_values().collect())
    }

    async fn entries_touching(
        &self,
        tenant_id: TenantId,
        accounts: &[AccountId],
        range: DateRange,
    ) -> Result<Vec<PostingLine>, SourceError> {
        let state = self.read()?;
        Ok(state
            .entries
            .iter()
            .filter(|e| e.tenant_id == tenant_id && range.contains(e.entry_date))
            .filter(|e| e.lines.iter().any(|l| accounts.contains(&l.account_id)))
            .flat_map(PostingLine::from_entry)
            .collect())
    }

    async fn lines_on(
        &self,
        tenant_id: TenantId,
        accounts: &[AccountId],
        window: PostingWindow,
    ) -> Result<Vec<PostingLine>, SourceError> {
        let state = self.read()?;
        Ok(Self::posted_lines(&state, tenant_id)
            .filter(|l| accounts.contains(&l.account_id) && window.contains(l.entry_date))
            .collect())
    }
}

#[async_trait]
impl PeriodCatalog for InMemoryStore {
    async fn list_periods(
        &self,
        tenant_id: TenantId,
        overlapping: Option<DateRange>,
    ) -> Result<Vec<AccountingPeriod>, SourceError> {
        let state = self.read()?;
        let mut periods: Vec<AccountingPeriod> = state
            .periods
            .iter()
            .filter(|p| p.tenant_id == tenant_id)
            .filter(|p| overlapping.is_none_or(|range| range.overlaps(&p.range())))
            .cloned()
            .collect();
        periods.sort_by_key(|p| (p.start_date, p.end_date));
        Ok(periods)
    }

    async fn find_period(
        &self,
        tenant_id: TenantId,
        period_id: AccountingPeriodId,
    ) -> Result<Option<AccountingPeriod>, SourceError> {
        let state = self.read()?;
        Ok(state
            .periods
            .iter()
            .find(|p| p.tenant_id == tenant_id && p.id == period_id)
            .cloned())
    }
}

#[async_trait]
impl ChartOfAccounts for InMemoryStore {
    async fn list_accounts(&self, tenant_id: TenantId) -> Result<Vec<Account>, SourceError> {
        let state = self.read()?;
        Ok(state
            .accounts
            .iter()
            .filter(|a| a.tenant_id == tenant_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TenantDirectory for InMemoryStore {
    async fn tenant_profile(
        &self,
        tenant_id: TenantId,
    ) -> Result<Option<TenantProfile>, SourceError> {
        Ok(self.read()?.tenants.get(&tenant_id).cloned())
    }
}

#[async_trait]
impl SubledgerSource for InMemoryStore {
    async fn fixed_assets(&self, tenant_id: TenantId) -> Result<Vec<FixedAsset>, SourceError> {
        let state = self.read()?;
        Ok(state
            .assets
            .iter()
            .filter(|a| a.tenant_id == tenant_id)
            .cloned()
            .collect())
    }

    async fn depreciation_charges(
        &self,
        tenant_id: TenantId,
        window: PostingWindow,
    ) -> Result<Vec<DepreciationCharge>, SourceError> {
        let state = self.read()?;
        Ok(state
            .charges
            .iter()
            .filter(|(tenant, c)| *tenant == tenant_id && window.contains(c.charge_date))
            .map(|(_, c)| c.clone())
            .collect())
    }

    async fn open_items(
        &self,
        tenant_id: TenantId,
        kind: OpenItemKind,
        as_of: NaiveDate,
    ) -> Result<Vec<OpenItem>, SourceError> {
        let state = self.read()?;
        Ok(state
            .open_items
            .iter()
            .filter(|s| s.tenant_id == tenant_id && s.item.kind == kind)
            .filter(|s| s.item.document_date <= as_of)
            .filter(|s| s.settled_on.is_none_or(|d| d > as_of))
            .map(|s| OpenItem {
                outstanding: round_money(s.item.outstanding),
                ..s.item.clone()
            })
            .filter(|item| item.outstanding != Decimal::ZERO)
            .collect())
    }
}

fn store_note(state: &mut State, mut note: DisclosureNote) -> DisclosureNote {
    if let Some(existing) = state.notes.iter_mut().find(|n| {
        n.tenant_id == note.tenant_id && n.period_id == note.period_id && n.note_type == note.note_type
    }) {
        note.id = existing.id;
        note.version = existing.version + 1;
        *existing = note.clone();
    } else {
        note.version = 1;
        state.notes.push(note.clone());
    }
    note
}

#[async_trait]
impl NoteStore for InMemoryStore {
    async fn upsert_note(&self, note: DisclosureNote) -> Result<DisclosureNote, SourceError> {
        self.read()?;
        Ok(store_note(&mut self.write(), note))
    }

    async fn replace_period_notes(
        &self,
        notes: Vec<DisclosureNote>,
    ) -> Result<Vec<DisclosureNote>, SourceError> {
        self.read()?;
        note_batch_scope(&notes)?;
        let mut state = self.write();
        Ok(notes.into_iter().map(|note| store_note(&mut state, note)).collect())
    }

    async fn list_notes(
        &self,
        tenant_id: TenantId,
        period_id: AccountingPeriodId,
    ) -> Result<Vec<DisclosureNote>, SourceError> {
        let state = self.read()?;
        let mut notes: Vec<DisclosureNote> = state
            .notes
            .iter()
            .filter(|n| n.tenant_id == tenant_id && n.period_id == period_id)
            .cloned()
            .collect();
        notes.sort_by_key(|n| n.note_type.as_str());
        Ok(notes)
    }
}
