//! `RecordStore` backed by SQLite

use chrono::{DateTime, Utc};

use super::{Database, TransactionFilter};
use crate::calendar::Month;
use crate::error::Result;
use crate::models::{Budget, FutureSelfLetter, RegretStatus, Streak, Transaction};
use crate::store::RecordStore;

impl RecordStore for Database {
    fn find_transactions(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>> {
        Database::find_transactions(self, user_id, filter)
    }

    fn get_transaction(&self, user_id: &str, id: i64) -> Result<Option<Transaction>> {
        Database::get_transaction(self, user_id, id)
    }

    fn save_regret_status(
        &self,
        user_id: &str,
        id: i64,
        status: RegretStatus,
        evaluated_at: DateTime<Utc>,
    ) -> Result<Transaction> {
        self.set_regret_status(user_id, id, status, evaluated_at)
    }

    fn find_budgets(&self, user_id: &str, month: Option<Month>) -> Result<Vec<Budget>> {
        self.list_budgets(user_id, month)
    }

    fn get_or_create_streak(&self, user_id: &str) -> Result<Streak> {
        Database::get_or_create_streak(self, user_id)
    }

    fn save_streak(&self, streak: &Streak) -> Result<()> {
        Database::save_streak(self, streak)
    }

    fn latest_letter(&self, user_id: &str) -> Result<Option<FutureSelfLetter>> {
        Database::latest_letter(self, user_id)
    }

    fn upsert_letter(
        &self,
        user_id: &str,
        month: Month,
        content: &str,
    ) -> Result<FutureSelfLetter> {
        Database::upsert_letter(self, user_id, month, content)
    }
}
