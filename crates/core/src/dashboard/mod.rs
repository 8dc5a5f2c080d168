//! Dashboard KPIs.
//!
//! Year-to-date and month-to-date profit, cash position and trade balances,
//! read from the engine's statements.

pub mod service;
pub mod types;

pub use service::DashboardService;
pub use types::{CashPosition, DashboardMetrics, PnlSummary};
