//! Report generation service.
//!
//! `ReportService` holds the pure statement computations. Each statement's
//! `generate_*` function lives next to its types; none of them performs I/O.

/// Service for generating financial statements from aggregated balances.
pub struct ReportService;
