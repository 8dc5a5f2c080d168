//! Row-Level Security (RLS) context management.
//!
//! Every tenant-owned table carries a policy comparing `tenant_id` with the
//! `app.current_tenant_id` setting, so a query run outside a tenant context
//! sees no rows at all.
//!
//! # Usage
//!
//! ```ignore
//! use tieout_db::rls::RlsExt;
//!
//! let rls = db.with_rls(tenant_id).await?;
//! let accounts = accounts::Entity::find().all(rls.transaction()).await?;
//! rls.commit().await?;
//! ```

use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};
use tieout_shared::types::TenantId;

/// Builds the statement that scopes a transaction to one tenant.
///
/// The ID is a formatted UUID, so it cannot carry quotes.
fn set_tenant_sql(tenant_id: TenantId) -> String {
    format!("SET LOCAL app.current_tenant_id = '{tenant_id}'")
}

/// A transaction with the tenant context set.
///
/// `SET LOCAL` scopes the setting to the transaction, so a pooled connection
/// never leaks one tenant's context into the next request.
pub struct RlsConnection {
    txn: DatabaseTransaction,
}

impl RlsConnection {
    /// Begins a transaction and sets `app.current_tenant_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or the RLS
    /// context cannot be set.
    pub async fn new(db: &DatabaseConnection, tenant_id: TenantId) -> Result<Self, DbErr> {
        let txn = db.begin().await?;
        txn.execute_unprepared(&set_tenant_sql(tenant_id)).await?;
        Ok(Self { txn })
    }

    /// The underlying transaction. Every query through it is subject to the
    /// tenant policies.
    #[must_use]
    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.txn
    }

    /// Commits the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    pub async fn commit(self) -> Result<(), DbErr> {
        self.txn.commit().await
    }

    /// Rolls back the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback fails.
    pub async fn rollback(self) -> Result<(), DbErr> {
        self.txn.rollback().await
    }
}

/// Extension trait for `DatabaseConnection` to create tenant-scoped transactions.
#[async_trait::async_trait]
pub trait RlsExt {
    /// Begins a transaction scoped to `tenant_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the RLS connection cannot be created.
    async fn with_rls(&self, tenant_id: TenantId) -> Result<RlsConnection, DbErr>;
}

#[async_trait::async_trait]
impl RlsExt for DatabaseConnection {
    async fn with_rls(&self, tenant_id: TenantId) -> Result<RlsConnection, DbErr> {
        RlsConnection::new(self, tenant_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rls_sql_format() {
        let tenant_id: TenantId = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
        assert_eq!(
            set_tenant_sql(tenant_id),
            "SET LOCAL app.current_tenant_id = '550e8400-e29b-41d4-a716-446655440000'"
        );
    }
}
