//! Future-self letter persistence

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::{format_timestamp, parsed_column, timestamp_column, Database};
use crate::calendar::Month;
use crate::error::Result;
use crate::models::FutureSelfLetter;

impl Database {
    /// Store the letter for a month, replacing the content of an existing one
    ///
    /// The original `created_at` survives a replace.
    pub fn upsert_letter(
        &self,
        user_id: &str,
        month: Month,
        content: &str,
    ) -> Result<FutureSelfLetter> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO letters (user_id, month, content, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(user_id, month) DO UPDATE SET content = excluded.content
            "#,
            params![
                user_id,
                month.to_string(),
                content,
                format_timestamp(&Utc::now())
            ],
        )?;

        let letter = conn.query_row(
            "SELECT id, user_id, month, content, created_at FROM letters
             WHERE user_id = ? AND month = ?",
            params![user_id, month.to_string()],
            |row| Self::row_to_letter(row),
        )?;

        Ok(letter)
    }

    /// Get the letter for a specific month
    pub fn get_letter(&self, user_id: &str, month: Month) -> Result<Option<FutureSelfLetter>> {
        let conn = self.conn()?;
        let letter = conn
            .query_row(
                "SELECT id, user_id, month, content, created_at FROM letters
                 WHERE user_id = ? AND month = ?",
                params![user_id, month.to_string()],
                |row| Self::row_to_letter(row),
            )
            .optional()?;

        Ok(letter)
    }

    /// Letter for the newest month on record
    pub fn latest_letter(&self, user_id: &str) -> Result<Option<FutureSelfLetter>> {
        let conn = self.conn()?;
        let letter = conn
            .query_row(
                "SELECT id, user_id, month, content, created_at FROM letters
                 WHERE user_id = ?
                 ORDER BY month DESC
                 LIMIT 1",
                params![user_id],
                |row| Self::row_to_letter(row),
            )
            .optional()?;

        Ok(letter)
    }

    /// All letters, newest month first
    pub fn list_letters(&self, user_id: &str) -> Result<Vec<FutureSelfLetter>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, month, content, created_at FROM letters
             WHERE user_id = ?
             ORDER BY month DESC",
        )?;

        let letters = stmt
            .query_map(params![user_id], |row| Self::row_to_letter(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(letters)
    }

    /// Column order: id, user_id, month, content, created_at
    fn row_to_letter(row: &rusqlite::Row) -> rusqlite::Result<FutureSelfLetter> {
        Ok(FutureSelfLetter {
            id: row.get(0)?,
            user_id: row.get(1)?,
            month: parsed_column(row, 2)?,
            content: row.get(3)?,
            created_at: timestamp_column(row, 4)?,
        })
    }
}
