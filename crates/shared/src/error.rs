//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error categories.
///
/// Engine-specific errors are converted into these categories at the crate
/// boundary so that consumers (export adapters, audit, dashboards) can branch
/// on a stable code without depending on the engine's internals.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Accounting periods do not tile the requested range.
    #[error("Period coverage gap: {0}")]
    PeriodCoverageGap(String),

    /// As-of query before the locked cutover date.
    #[error("Cutover violation: {0}")]
    CutoverViolation(String),

    /// A disclosure note does not tie out to its statement.
    #[error("Reconciliation failed: {0}")]
    Reconciliation(String),

    /// Tenant configuration or account tagging is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the error code for consumers.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::PeriodCoverageGap(_) => "PERIOD_COVERAGE_GAP",
            Self::CutoverViolation(_) => "CUTOVER_VIOLATION",
            Self::Reconciliation(_) => "RECONCILIATION_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if the failure was caused by the caller's input or the
    /// tenant's data, as opposed to infrastructure.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::Database(_) | Self::Internal(_))
    }
}
