//! Chart of accounts repository.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tieout_core::classify::ClassificationTag;
use tieout_core::ledger::Account;
use tieout_core::source::{ChartOfAccounts, SourceError};
use tieout_shared::types::{AccountId, TenantId};

use super::RepositoryError;
use crate::entities::accounts;
use crate::rls::RlsExt;

/// Maps a stored account, rejecting classification tags the engine does not know.
fn to_account(model: accounts::Model) -> Result<Account, RepositoryError> {
    let classification = model
        .classification
        .as_deref()
        .map(str::parse::<ClassificationTag>)
        .transpose()
        .map_err(|reason| RepositoryError::corrupt("accounts", format!("{}: {reason}", model.code)))?;

    Ok(Account {
        id: AccountId::from_uuid(model.id),
        tenant_id: TenantId::from_uuid(model.tenant_id),
        code: model.code,
        name: model.name,
        account_type: model.account_type.into(),
        classification,
        tax_tag: model.tax_tag,
    })
}

/// Reads the chart of accounts.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a tenant's accounts ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row carries an unknown
    /// classification tag.
    pub async fn list(&self, tenant_id: TenantId) -> Result<Vec<Account>, RepositoryError> {
        let rls = self.db.with_rls(tenant_id).await?;
        let rows = accounts::Entity::find()
            .filter(accounts::Column::TenantId.eq(tenant_id.into_inner()))
            .order_by_asc(accounts::Column::Code)
            .all(rls.transaction())
            .await?;
        rls.commit().await?;

        rows.into_iter().map(to_account).collect()
    }
}

#[async_trait]
impl ChartOfAccounts for AccountRepository {
    async fn list_accounts(&self, tenant_id: TenantId) -> Result<Vec<Account>, SourceError> {
        Ok(self.list(tenant_id).await?)
    }
}
