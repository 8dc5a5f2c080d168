//! Report error types.

use chrono::NaiveDate;
use thiserror::Error;
use tieout_shared::AppError;
use tieout_shared::types::{AccountingPeriodId, DateRange, DateRangeError, TenantId};

use crate::fiscal::NormalizerError;
use crate::notes::ReconciliationFailure;
use crate::source::SourceError;

/// Errors that can occur while producing statements and notes.
///
/// No variant carries a partial result: a failed request never yields a
/// half-computed report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportingError {
    /// Malformed request parameters.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Tenant does not exist.
    #[error("Tenant not found: {0}")]
    TenantNotFound(TenantId),

    /// Accounting period does not exist for the tenant.
    #[error("Accounting period not found: {0}")]
    PeriodNotFound(AccountingPeriodId),

    /// Accounting periods do not tile the requested range.
    #[error("Accounting periods do not cover {range}: first uncovered date {first_uncovered}")]
    PeriodCoverageGap {
        /// Range that was checked.
        range: DateRange,
        /// Earliest day with no period.
        first_uncovered: NaiveDate,
    },

    /// Point-in-time request before the cutover date.
    #[error("As-of date {as_of} is before the cutover date {cutover}")]
    CutoverViolation {
        /// Requested date.
        as_of: NaiveDate,
        /// Cutover date.
        cutover: NaiveDate,
    },

    /// A note does not tie out to its statement.
    #[error("{0}")]
    Reconciliation(Box<ReconciliationFailure>),

    /// Tenant configuration or account tagging needed for the request is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A collaborator failed.
    #[error("Data store error: {0}")]
    DataStore(#[from] SourceError),

    /// Engine bug.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<NormalizerError> for ReportingError {
    fn from(err: NormalizerError) -> Self {
        match err {
            NormalizerError::CoverageGap {
                range,
                first_uncovered,
            } => Self::PeriodCoverageGap {
                range,
                first_uncovered,
            },
            NormalizerError::CutoverViolation { as_of, cutover } => {
                Self::CutoverViolation { as_of, cutover }
            }
        }
    }
}

impl From<DateRangeError> for ReportingError {
    fn from(err: DateRangeError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ReconciliationFailure> for ReportingError {
    fn from(failure: ReconciliationFailure) -> Self {
        Self::Reconciliation(Box::new(failure))
    }
}

impl From<ReportingError> for AppError {
    fn from(err: ReportingError) -> Self {
        let message = err.to_string();
        match err {
            ReportingError::Validation(_) => Self::Validation(message),
            ReportingError::TenantNotFound(_) | ReportingError::PeriodNotFound(_) => {
                Self::NotFound(message)
            }
            ReportingError::PeriodCoverageGap { .. } => Self::PeriodCoverageGap(message),
            ReportingError::CutoverViolation { .. } => Self::CutoverViolation(message),
            ReportingError::Reconciliation(_) => Self::Reconciliation(message),
            ReportingError::Configuration(_) => Self::Configuration(message),
            ReportingError::DataStore(_) => Self::Database(message),
            ReportingError::Internal(_) => Self::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::NoteCode;
    use crate::reports::StatementKind;
    use rust_decimal_macros::dec;

    #[test]
    fn test_app_error_categories() {
        let gap = ReportingError::PeriodCoverageGap {
            range: DateRange::parse("2024-01-01", "2024-03-31").unwrap(),
            first_uncovered: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        };
        let app: AppError = gap.into();
        assert_eq!(app.error_code(), "PERIOD_COVERAGE_GAP");
        assert!(app.to_string().contains("2024-02-01"));

        let store: AppError = ReportingError::from(SourceError::Unavailable("down".into())).into();
        assert_eq!(store.error_code(), "DATABASE_ERROR");

        let missing: AppError = ReportingError::TenantNotFound(TenantId::new()).into();
        assert_eq!(missing.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_reconciliation_message_names_note_and_statement() {
        let failure = ReconciliationFailure::new(
            NoteCode::PropertyPlantEquipment,
            StatementKind::CashFlow,
            "additions",
            dec!(1200.00),
            dec!(0.00),
        );
        let err = ReportingError::from(failure);
        let message = err.to_string();
        assert!(message.contains("Note C"), "{message}");
        assert!(message.contains("CF"), "{message}");

        let app: AppError = err.into();
        assert_eq!(app.error_code(), "RECONCILIATION_ERROR");
    }
}
