//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repositories implementing the `tieout-core` collaborator traits
//! - Database migrations with tenant row-level security

pub mod entities;
pub mod migration;
pub mod repositories;
pub mod rls;

pub use repositories::{
    AccountRepository, LedgerRepository, NoteRepository, PeriodRepository, RepositoryError,
    SubledgerRepository, TenantRepository,
};

use std::sync::Arc;
use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tieout_core::source::DataSources;
use tieout_shared::config::DatabaseConfig;

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a pooled connection using the configured pool bounds.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    Database::connect(options).await
}

/// Wires every collaborator the reporting engine needs to one connection pool.
#[must_use]
pub fn data_sources(db: &DatabaseConnection) -> DataSources {
    DataSources {
        ledger: Arc::new(LedgerRepository::new(db.clone())),
        periods: Arc::new(PeriodRepository::new(db.clone())),
        accounts: Arc::new(AccountRepository::new(db.clone())),
        tenants: Arc::new(TenantRepository::new(db.clone())),
        subledgers: Arc::new(SubledgerRepository::new(db.clone())),
        notes: Arc::new(NoteRepository::new(db.clone())),
    }
}
