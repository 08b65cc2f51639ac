//! Transaction operations

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use super::transaction_filter::TransactionFilter;
use super::{
    format_timestamp, optional_parsed_column, optional_timestamp_column, parsed_column,
    timestamp_column, Database,
};
use crate::error::{Error, Result};
use crate::models::{NewTransaction, RegretStatus, Transaction};

/// Column list shared by every transaction SELECT (see `row_to_transaction`)
const TRANSACTION_COLUMNS: &str = "id, user_id, type, amount, category, description, date, \
     is_recurring, frequency, regret_status, regret_evaluated_at, created_at";

impl Database {
    /// Insert a transaction for `user_id`
    pub fn insert_transaction(&self, user_id: &str, tx: &NewTransaction) -> Result<Transaction> {
        tx.validate()?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO transactions (user_id, type, amount, category, description, date, is_recurring, frequency, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                tx.kind.as_str(),
                tx.amount,
                tx.category.trim(),
                tx.description.trim(),
                format_timestamp(&tx.date),
                tx.is_recurring,
                tx.frequency.map(|f| f.as_str()),
                format_timestamp(&Utc::now()),
            ],
        )?;

        let id = conn.last_insert_rowid();
        drop(conn);

        self.get_transaction(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Transaction {} not found after insert", id)))
    }

    /// Get a single transaction owned by `user_id`
    pub fn get_transaction(&self, user_id: &str, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM transactions WHERE id = ? AND user_id = ?",
            TRANSACTION_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let transaction = stmt
            .query_row(params![id, user_id], |row| Self::row_to_transaction(row))
            .optional()?;

        Ok(transaction)
    }

    /// Find every transaction matching `filter`, newest first
    pub fn find_transactions(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let filter = filter.build(user_id);

        let sql = format!(
            "SELECT {} FROM transactions {} ORDER BY date DESC, id DESC",
            TRANSACTION_COLUMNS, filter.where_clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let transactions = stmt
            .query_map(filter.params_refs().as_slice(), |row| {
                Self::row_to_transaction(row)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// List a page of transactions, newest first
    pub fn list_transactions(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM transactions WHERE user_id = ? ORDER BY date DESC, id DESC LIMIT ? OFFSET ?",
            TRANSACTION_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let transactions = stmt
            .query_map(params![user_id, limit, offset], |row| {
                Self::row_to_transaction(row)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Count a user's transactions
    pub fn count_transactions(&self, user_id: &str) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Replace the editable fields of a transaction
    ///
    /// The regret verdict (if any) is kept.
    pub fn update_transaction(
        &self,
        user_id: &str,
        id: i64,
        tx: &NewTransaction,
    ) -> Result<Transaction> {
        tx.validate()?;
        let conn = self.conn()?;

        let updated = conn.execute(
            r#"
            UPDATE transactions
            SET type = ?, amount = ?, category = ?, description = ?, date = ?, is_recurring = ?, frequency = ?
            WHERE id = ? AND user_id = ?
            "#,
            params![
                tx.kind.as_str(),
                tx.amount,
                tx.category.trim(),
                tx.description.trim(),
                format_timestamp(&tx.date),
                tx.is_recurring,
                tx.frequency.map(|f| f.as_str()),
                id,
                user_id,
            ],
        )?;
        drop(conn);

        if updated == 0 {
            return Err(Error::NotFound(format!("Transaction {}", id)));
        }

        self.get_transaction(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Transaction {}", id)))
    }

    /// Delete a transaction, returning the removed row
    pub fn delete_transaction(&self, user_id: &str, id: i64) -> Result<Transaction> {
        let existing = self
            .get_transaction(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Transaction {}", id)))?;

        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM transactions WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;

        Ok(existing)
    }

    /// Record a regret verdict on a transaction
    pub fn set_regret_status(
        &self,
        user_id: &str,
        id: i64,
        status: RegretStatus,
        evaluated_at: DateTime<Utc>,
    ) -> Result<Transaction> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE transactions SET regret_status = ?, regret_evaluated_at = ? WHERE id = ? AND user_id = ?",
            params![status.as_str(), format_timestamp(&evaluated_at), id, user_id],
        )?;
        drop(conn);

        if updated == 0 {
            return Err(Error::NotFound(format!("Transaction {}", id)));
        }

        self.get_transaction(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Transaction {}", id)))
    }

    /// Helper to convert a row to Transaction
    /// Column order: see `TRANSACTION_COLUMNS`
    pub(crate) fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
        Ok(Transaction {
            id: row.get(0)?,
            user_id: row.get(1)?,
            kind: parsed_column(row, 2)?,
            amount: row.get(3)?,
            category: row.get(4)?,
            description: row.get(5)?,
            date: timestamp_column(row, 6)?,
            is_recurring: row.get(7)?,
            frequency: optional_parsed_column(row, 8)?,
            regret_status: optional_parsed_column(row, 9)?,
            regret_evaluated_at: optional_timestamp_column(row, 10)?,
            created_at: timestamp_column(row, 11)?,
        })
    }
}
