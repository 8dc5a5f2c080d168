//! Ledger repository: sums and lists posted journal lines.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
};
use tieout_core::ledger::{AccountTotals, AggregateQuery, PostingLine, PostingWindow};
use tieout_core::source::{LedgerSource, SourceError};
use tieout_shared::types::{AccountId, DateRange, JournalEntryId, JournalLineId, TenantId};
use uuid::Uuid;

use super::RepositoryError;
use crate::entities::{journal_entries, journal_lines, sea_orm_active_enums::EntryStatus};
use crate::rls::RlsExt;

#[derive(Debug, FromQueryResult)]
struct PostingRow {
    id: Uuid,
    entry_id: Uuid,
    account_id: Uuid,
    debit: Decimal,
    credit: Decimal,
    entry_date: NaiveDate,
    reference: Option<String>,
}

impl From<PostingRow> for PostingLine {
    fn from(row: PostingRow) -> Self {
        Self {
            line_id: JournalLineId::from_uuid(row.id),
            entry_id: JournalEntryId::from_uuid(row.entry_id),
            account_id: AccountId::from_uuid(row.account_id),
            entry_date: row.entry_date,
            reference: row.reference,
            debit: row.debit,
            credit: row.credit,
        }
    }
}

fn uuids(ids: &[AccountId]) -> Vec<Uuid> {
    ids.iter().map(|id| id.into_inner()).collect()
}

/// Lines of posted entries of one tenant, joined with their entry.
fn posted_lines(tenant_id: TenantId) -> Select<journal_lines::Entity> {
    journal_lines::Entity::find()
        .join(
            JoinType::InnerJoin,
            journal_lines::Relation::JournalEntries.def(),
        )
        .filter(journal_lines::Column::TenantId.eq(tenant_id.into_inner()))
        .filter(journal_entries::Column::Status.eq(EntryStatus::Posted))
}

fn within(select: Select<journal_lines::Entity>, window: PostingWindow) -> Select<journal_lines::Entity> {
    let select = select.filter(journal_entries::Column::EntryDate.lte(window.to));
    match window.from {
        Some(from) => select.filter(journal_entries::Column::EntryDate.gte(from)),
        None => select,
    }
}

/// Reads the general ledger.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Sums posted debits and credits per account inside the query window.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn query_totals(&self, query: &AggregateQuery) -> Result<Vec<AccountTotals>, RepositoryError> {
        if query.account_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rls = self.db.with_rls(query.tenant_id).await?;
        let rows: Vec<(Uuid, Option<Decimal>, Option<Decimal>)> =
            within(posted_lines(query.tenant_id), query.window)
                .select_only()
                .column(journal_lines::Column::AccountId)
                .column_as(
                    Expr::col((journal_lines::Entity, journal_lines::Column::Debit)).sum(),
                    "total_debit",
                )
                .column_as(
                    Expr::col((journal_lines::Entity, journal_lines::Column::Credit)).sum(),
                    "total_credit",
                )
                .filter(journal_lines::Column::AccountId.is_in(uuids(&query.account_ids)))
                .group_by(journal_lines::Column::AccountId)
                .into_tuple()
                .all(rls.transaction())
                .await?;
        rls.commit().await?;

        Ok(rows
            .into_iter()
            .map(|(account_id, debit, credit)| AccountTotals {
                account_id: AccountId::from_uuid(account_id),
                debit: debit.unwrap_or_default(),
                credit: credit.unwrap_or_default(),
            })
            .collect())
    }

    /// Every line of each posted entry in `range` that touches `accounts`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn query_entries_touching(
        &self,
        tenant_id: TenantId,
        accounts: &[AccountId],
        range: DateRange,
    ) -> Result<Vec<PostingLine>, RepositoryError> {
        if accounts.is_empty() {
            return Ok(Vec::new());
        }

        let rls = self.db.with_rls(tenant_id).await?;
        let txn = rls.transaction();

        let entry_ids: Vec<Uuid> = within(posted_lines(tenant_id), PostingWindow::range(range))
            .select_only()
            .column(journal_lines::Column::EntryId)
            .filter(journal_lines::Column::AccountId.is_in(uuids(accounts)))
            .distinct()
            .into_tuple()
            .all(txn)
            .await?;

        let lines = if entry_ids.is_empty() {
            Vec::new()
        } else {
            Self::fetch_lines(
                txn,
                posted_lines(tenant_id).filter(journal_lines::Column::EntryId.is_in(entry_ids)),
            )
            .await?
        };
        rls.commit().await?;

        Ok(lines)
    }

    /// Posted lines on `accounts` dated inside `window`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn query_lines_on(
        &self,
        tenant_id: TenantId,
        accounts: &[AccountId],
        window: PostingWindow,
    ) -> Result<Vec<PostingLine>, RepositoryError> {
        if accounts.is_empty() {
            return Ok(Vec::new());
        }

        let rls = self.db.with_rls(tenant_id).await?;
        let lines = Self::fetch_lines(
            rls.transaction(),
            within(posted_lines(tenant_id), window)
                .filter(journal_lines::Column::AccountId.is_in(uuids(accounts))),
        )
        .await?;
        rls.commit().await?;

        Ok(lines)
    }

    async fn fetch_lines<C: ConnectionTrait>(
        conn: &C,
        select: Select<journal_lines::Entity>,
    ) -> Result<Vec<PostingLine>, RepositoryError> {
        let rows = select
            .column_as(journal_entries::Column::EntryDate, "entry_date")
            .column_as(journal_entries::Column::Reference, "reference")
            .order_by_asc(journal_entries::Column::EntryDate)
            .order_by_asc(journal_lines::Column::EntryId)
            .order_by_asc(journal_lines::Column::Id)
            .into_model::<PostingRow>()
            .all(conn)
            .await?;

        Ok(rows.into_iter().map(PostingLine::from).collect())
    }
}

#[async_trait]
impl LedgerSource for LedgerRepository {
    async fn sum_postings(&self, query: &AggregateQuery) -> Result<Vec<AccountTotals>, SourceError> {
        Ok(self.query_totals(query).await?)
    }

    async fn entries_touching(
        &self,
        tenant_id: TenantId,
        accounts: &[AccountId],
        range: DateRange,
    ) -> Result<Vec<PostingLine>, SourceError> {
        Ok(self.query_entries_touching(tenant_id, accounts, range).await?)
    }

    async fn lines_on(
        &self,
        tenant_id: TenantId,
        accounts: &[AccountId],
        window: PostingWindow,
    ) -> Result<Vec<PostingLine>, SourceError> {
        Ok(self.query_lines_on(tenant_id, accounts, window).await?)
    }
}
