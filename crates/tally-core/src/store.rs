//! Record store abstraction used by the behavior engine
//!
//! `Database` is the production implementation. Aggregation and scoring only
//! ever see records through this trait, so they can be exercised against
//! other stores in tests.

use chrono::{DateTime, Utc};

use crate::calendar::Month;
use crate::db::TransactionFilter;
use crate::error::Result;
use crate::models::{Budget, FutureSelfLetter, RegretStatus, Streak, Transaction};

pub trait RecordStore: Send + Sync {
    /// Transactions of `user_id` matching `filter`, newest first
    fn find_transactions(&self, user_id: &str, filter: &TransactionFilter)
        -> Result<Vec<Transaction>>;

    fn get_transaction(&self, user_id: &str, id: i64) -> Result<Option<Transaction>>;

    fn save_regret_status(
        &self,
        user_id: &str,
        id: i64,
        status: RegretStatus,
        evaluated_at: DateTime<Utc>,
    ) -> Result<Transaction>;

    /// Budgets of `user_id`, optionally restricted to one month
    fn find_budgets(&self, user_id: &str, month: Option<Month>) -> Result<Vec<Budget>>;

    fn get_or_create_streak(&self, user_id: &str) -> Result<Streak>;

    fn save_streak(&self, streak: &Streak) -> Result<()>;

    fn latest_letter(&self, user_id: &str) -> Result<Option<FutureSelfLetter>>;

    fn upsert_letter(&self, user_id: &str, month: Month, content: &str)
        -> Result<FutureSelfLetter>;
}
