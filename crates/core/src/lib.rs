//! Core reporting logic for Tieout.
//!
//! This crate turns a double-entry ledger into IFRS-shaped statements and
//! proves that the disclosure notes tie out to them. It has no web or
//! database dependencies: every read goes through the collaborator traits in
//! [`source`], implemented by `tieout-db` in production.
//!
//! # Modules
//!
//! - `ledger` - Accounts, postings and per-account aggregation
//! - `fiscal` - Accounting periods, coverage and the cutover date
//! - `classify` - Balance sheet buckets, P&L sections and reclassification
//! - `reports` - Trial balance, P&L, balance sheet, SOCE and cash flow
//! - `notes` - IFRS notes C to F and persisted period-close notes
//! - `engine` - Orchestration, caching and audit emission
//! - `dashboard` - Headline KPIs
//! - `presentation` - Display rows for export adapters

pub mod audit;
pub mod cache;
pub mod classify;
pub mod dashboard;
pub mod engine;
pub mod fiscal;
pub mod ledger;
pub mod notes;
pub mod presentation;
pub mod reports;
pub mod source;
pub mod subledger;
pub mod tenant;

pub use engine::{EngineSettings, ReportingEngine};
pub use reports::ReportingError;
