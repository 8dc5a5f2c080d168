//! Shared types, errors, and configuration for Tieout.
//!
//! This crate provides common types used across all other crates:
//! - Money rounding and tie-out tolerance helpers
//! - Typed IDs for type-safe entity references
//! - Report date parsing and inclusive date ranges
//! - Application-wide error types
//! - Configuration management and tracing setup

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
