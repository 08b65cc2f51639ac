//! Transaction filter builder for constructing dynamic SQL queries
//!
//! Every query is scoped to a single user; the remaining conditions are
//! optional and combined with AND.

use chrono::{DateTime, Utc};

use super::format_timestamp;
use crate::models::TransactionType;

/// Builder for constructing transaction query filters
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Inclusive lower bound on the transaction timestamp
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the transaction timestamp
    pub to: Option<DateTime<Utc>>,
    pub kind: Option<TransactionType>,
    /// Only transactions carrying a regret verdict
    pub evaluated_only: bool,
    /// Only expenses still waiting for a regret verdict
    pub unevaluated_only: bool,
}

/// Result of building a filter - contains SQL components and parameters
pub struct FilterResult {
    /// WHERE clause including "WHERE" keyword
    pub where_clause: String,
    /// Parameters for the query (boxed for rusqlite compatibility)
    pub params: Vec<Box<dyn rusqlite::ToSql>>,
}

impl TransactionFilter {
    /// Create a new filter builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to transactions at or after `from`
    pub fn from(mut self, from: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self
    }

    /// Restrict to transactions at or before `to`
    pub fn to(mut self, to: DateTime<Utc>) -> Self {
        self.to = Some(to);
        self
    }

    /// Set both bounds at once
    pub fn between(self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.from(from).to(to)
    }

    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn evaluated_only(mut self, value: bool) -> Self {
        self.evaluated_only = value;
        self
    }

    pub fn unevaluated_only(mut self, value: bool) -> Self {
        self.unevaluated_only = value;
        self
    }

    /// Build the filter components for `user_id`
    pub fn build(&self, user_id: &str) -> FilterResult {
        let mut conditions = vec!["user_id = ?".to_string()];
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id.to_string())];

        if let Some(from) = self.from {
            conditions.push("date >= ?".to_string());
            params.push(Box::new(format_timestamp(&from)));
        }

        if let Some(to) = self.to {
            conditions.push("date <= ?".to_string());
            params.push(Box::new(format_timestamp(&to)));
        }

        if let Some(kind) = self.kind {
            conditions.push("type = ?".to_string());
            params.push(Box::new(kind.as_str()));
        }

        if self.evaluated_only {
            conditions.push("regret_status IS NOT NULL".to_string());
        }

        if self.unevaluated_only {
            conditions.push("type = 'expense' AND regret_status IS NULL".to_string());
        }

        FilterResult {
            where_clause: format!("WHERE {}", conditions.join(" AND ")),
            params,
        }
    }
}

impl FilterResult {
    /// Get parameter references for query execution
    pub fn params_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}
