//! Fixed asset register and open-item repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tieout_core::ledger::PostingWindow;
use tieout_core::source::{SourceError, SubledgerSource};
use tieout_core::subledger::{DepreciationCharge, FixedAsset, OpenItem, OpenItemKind};
use tieout_shared::types::{FixedAssetId, TenantId, round_money};

use super::RepositoryError;
use crate::entities::{
    depreciation_charges, fixed_assets, open_items, sea_orm_active_enums::OpenItemKind as StoredKind,
};
use crate::rls::RlsExt;

/// Reads the fixed asset register, depreciation runs and open items.
#[derive(Debug, Clone)]
pub struct SubledgerRepository {
    db: DatabaseConnection,
}

impl SubledgerRepository {
    /// Creates a new subledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Every asset of the tenant, disposed ones included.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_assets(&self, tenant_id: TenantId) -> Result<Vec<FixedAsset>, RepositoryError> {
        let rls = self.db.with_rls(tenant_id).await?;
        let rows = fixed_assets::Entity::find()
            .filter(fixed_assets::Column::TenantId.eq(tenant_id.into_inner()))
            .order_by_asc(fixed_assets::Column::AcquisitionDate)
            .all(rls.transaction())
            .await?;
        rls.commit().await?;

        Ok(rows
            .into_iter()
            .map(|row| FixedAsset {
                id: FixedAssetId::from_uuid(row.id),
                tenant_id: TenantId::from_uuid(row.tenant_id),
                name: row.name,
                cost: row.cost,
                acquisition_date: row.acquisition_date,
                disposal_date: row.disposal_date,
            })
            .collect())
    }

    /// Depreciation charged inside `window`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_charges(
        &self,
        tenant_id: TenantId,
        window: PostingWindow,
    ) -> Result<Vec<DepreciationCharge>, RepositoryError> {
        let rls = self.db.with_rls(tenant_id).await?;

        let mut query = depreciation_charges::Entity::find()
            .filter(depreciation_charges::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(depreciation_charges::Column::ChargeDate.lte(window.to));
        if let Some(from) = window.from {
            query = query.filter(depreciation_charges::Column::ChargeDate.gte(from));
        }

        let rows = query
            .order_by_asc(depreciation_charges::Column::ChargeDate)
            .all(rls.transaction())
            .await?;
        rls.commit().await?;

        Ok(rows
            .into_iter()
            .map(|row| DepreciationCharge {
                asset_id: FixedAssetId::from_uuid(row.asset_id),
                charge_date: row.charge_date,
                amount: row.amount,
            })
            .collect())
    }

    /// Items of `kind` issued on or before `as_of` and not settled by then.
    ///
    /// Amounts are rounded to cents; items that round to zero are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_open_items(
        &self,
        tenant_id: TenantId,
        kind: OpenItemKind,
        as_of: NaiveDate,
    ) -> Result<Vec<OpenItem>, RepositoryError> {
        let rls = self.db.with_rls(tenant_id).await?;
        let rows = open_items::Entity::find()
            .filter(open_items::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(open_items::Column::Kind.eq(StoredKind::from(kind)))
            .filter(open_items::Column::DocumentDate.lte(as_of))
            .filter(
                Condition::any()
                    .add(open_items::Column::SettledOn.is_null())
                    .add(open_items::Column::SettledOn.gt(as_of)),
            )
            .order_by_asc(open_items::Column::DueDate)
            .all(rls.transaction())
            .await?;
        rls.commit().await?;

        Ok(rows
            .into_iter()
            .map(|row| OpenItem {
                kind: row.kind.into(),
                counterparty: row.counterparty,
                document_ref: row.document_ref,
                document_date: row.document_date,
                due_date: row.due_date,
                outstanding: round_money(row.amount),
            })
            .filter(|item| item.outstanding != Decimal::ZERO)
            .collect())
    }
}

#[async_trait]
impl SubledgerSource for SubledgerRepository {
    async fn fixed_assets(&self, tenant_id: TenantId) -> Result<Vec<FixedAsset>, SourceError> {
        Ok(self.list_assets(tenant_id).await?)
    }

    async fn depreciation_charges(
        &self,
        tenant_id: TenantId,
        window: PostingWindow,
    ) -> Result<Vec<DepreciationCharge>, SourceError> {
        Ok(self.list_charges(tenant_id, window).await?)
    }

    async fn open_items(
        &self,
        tenant_id: TenantId,
        kind: OpenItemKind,
        as_of: NaiveDate,
    ) -> Result<Vec<OpenItem>, SourceError> {
        Ok(self.list_open_items(tenant_id, kind, as_of).await?)
    }
}
