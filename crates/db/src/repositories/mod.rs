//! Repository abstractions for data access.
//!
//! Each repository implements one of the collaborator traits from
//! `tieout_core::source`. Every read runs in a tenant-scoped transaction
//! (see [`crate::rls`]) and also filters on `tenant_id` explicitly.

pub mod account;
pub mod fiscal;
pub mod ledger;
pub mod note;
pub mod subledger;
pub mod tenant;

pub use account::AccountRepository;
pub use fiscal::PeriodRepository;
pub use ledger::LedgerRepository;
pub use note::NoteRepository;
pub use subledger::SubledgerRepository;
pub use tenant::TenantRepository;

use sea_orm::DbErr;
use tieout_core::source::SourceError;

/// Error types for repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// A stored row cannot be mapped to a domain value.
    #[error("Corrupt row in {table}: {reason}")]
    Corrupt {
        /// Table the row came from.
        table: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl RepositoryError {
    pub(crate) fn corrupt(table: &'static str, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            table,
            reason: reason.into(),
        }
    }
}

impl From<RepositoryError> for SourceError {
    fn from(err: RepositoryError) -> Self {
        match &err {
            RepositoryError::Database(db) => Self::Unavailable(db.to_string()),
            RepositoryError::Corrupt { .. } => Self::Inconsistent(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_errors_map_to_unavailable() {
        let err: SourceError =
            RepositoryError::Database(DbErr::Custom("connection refused".to_string())).into();
        assert!(matches!(err, SourceError::Unavailable(msg) if msg.contains("connection refused")));
    }

    #[test]
    fn test_corrupt_rows_map_to_inconsistent() {
        let err: SourceError = RepositoryError::corrupt("accounts", "unknown tag 'x'").into();
        assert_eq!(
            err,
            SourceError::Inconsistent("Corrupt row in accounts: unknown tag 'x'".to_string())
        );
    }
}
