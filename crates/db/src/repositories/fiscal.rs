//! Accounting period repository.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tieout_core::fiscal::AccountingPeriod;
use tieout_core::source::{PeriodCatalog, SourceError};
use tieout_shared::types::{AccountingPeriodId, DateRange, TenantId};

use super::RepositoryError;
use crate::entities::accounting_periods;
use crate::rls::RlsExt;

impl From<accounting_periods::Model> for AccountingPeriod {
    fn from(model: accounting_periods::Model) -> Self {
        Self {
            id: AccountingPeriodId::from_uuid(model.id),
            tenant_id: TenantId::from_uuid(model.tenant_id),
            name: model.name,
            start_date: model.start_date,
            end_date: model.end_date,
            status: model.status.into(),
        }
    }
}

/// Reads accounting periods.
#[derive(Debug, Clone)]
pub struct PeriodRepository {
    db: DatabaseConnection,
}

impl PeriodRepository {
    /// Creates a new period repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a tenant's periods ordered by start date, optionally only those
    /// overlapping `overlapping`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        tenant_id: TenantId,
        overlapping: Option<DateRange>,
    ) -> Result<Vec<AccountingPeriod>, RepositoryError> {
        let rls = self.db.with_rls(tenant_id).await?;

        let mut query = accounting_periods::Entity::find()
            .filter(accounting_periods::Column::TenantId.eq(tenant_id.into_inner()));
        if let Some(range) = overlapping {
            query = query
                .filter(accounting_periods::Column::StartDate.lte(range.to))
                .filter(accounting_periods::Column::EndDate.gte(range.from));
        }

        let periods = query
            .order_by_asc(accounting_periods::Column::StartDate)
            .order_by_asc(accounting_periods::Column::EndDate)
            .all(rls.transaction())
            .await?;
        rls.commit().await?;

        Ok(periods.into_iter().map(AccountingPeriod::from).collect())
    }

    /// Finds a period by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        tenant_id: TenantId,
        period_id: AccountingPeriodId,
    ) -> Result<Option<AccountingPeriod>, RepositoryError> {
        let rls = self.db.with_rls(tenant_id).await?;
        let period = accounting_periods::Entity::find_by_id(period_id.into_inner())
            .filter(accounting_periods::Column::TenantId.eq(tenant_id.into_inner()))
            .one(rls.transaction())
            .await?;
        rls.commit().await?;

        Ok(period.map(AccountingPeriod::from))
    }
}

#[async_trait]
impl PeriodCatalog for PeriodRepository {
    async fn list_periods(
        &self,
        tenant_id: TenantId,
        overlapping: Option<DateRange>,
    ) -> Result<Vec<AccountingPeriod>, SourceError> {
        Ok(self.list(tenant_id, overlapping).await?)
    }

    async fn find_period(
        &self,
        tenant_id: TenantId,
        period_id: AccountingPeriodId,
    ) -> Result<Option<AccountingPeriod>, SourceError> {
        Ok(self.find_by_id(tenant_id, period_id).await?)
    }
}
