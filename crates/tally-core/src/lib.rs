//! Tally Core Library
//!
//! Shared functionality for the Tally finance tracker:
//! - Database access and migrations (SQLCipher via r2d2)
//! - Record store abstraction consumed by the behavior engine
//! - Aggregation for dashboard, reports and analytics
//! - Behavior engine: discipline streak, regret scores, monthly letters
//! - Behavior thresholds loaded from TOML

pub mod aggregate;
pub mod behavior;
pub mod calendar;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod store;

pub use behavior::BehaviorEngine;
pub use calendar::Month;
pub use config::BehaviorConfig;
pub use db::{AuditEntry, Database, TransactionFilter};
pub use error::{Error, Result};
pub use store::RecordStore;
