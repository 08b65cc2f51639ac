//! Streak persistence

use chrono::NaiveDate;
use rusqlite::params;

use super::Database;
use crate::error::{Error, Result};
use crate::models::Streak;

impl Database {
    /// Load the user's streak, creating a zeroed one on first access
    pub fn get_or_create_streak(&self, user_id: &str) -> Result<Streak> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT OR IGNORE INTO streaks (user_id, current_streak, longest_streak) VALUES (?, 0, 0)",
            params![user_id],
        )?;

        let streak = conn.query_row(
            "SELECT user_id, current_streak, longest_streak, last_evaluated_date
             FROM streaks WHERE user_id = ?",
            params![user_id],
            |row| {
                let last: Option<String> = row.get(3)?;
                let last_evaluated_date = last
                    .map(|s| {
                        NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|e| {
                            rusqlite::Error::FromSqlConversionFailure(
                                3,
                                rusqlite::types::Type::Text,
                                Box::new(e),
                            )
                        })
                    })
                    .transpose()?;
                Ok(Streak {
                    user_id: row.get(0)?,
                    current_streak: row.get(1)?,
                    longest_streak: row.get(2)?,
                    last_evaluated_date,
                })
            },
        )?;

        Ok(streak)
    }

    /// Persist a streak record
    pub fn save_streak(&self, streak: &Streak) -> Result<()> {
        if streak.longest_streak < streak.current_streak {
            return Err(Error::InvalidData(format!(
                "Longest streak {} is below current streak {}",
                streak.longest_streak, streak.current_streak
            )));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO streaks (user_id, current_streak, longest_streak, last_evaluated_date)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                current_streak = excluded.current_streak,
                longest_streak = excluded.longest_streak,
                last_evaluated_date = excluded.last_evaluated_date
            "#,
            params![
                streak.user_id,
                streak.current_streak,
                streak.longest_streak,
                streak
                    .last_evaluated_date
                    .map(|d| d.format("%Y-%m-%d").to_string()),
            ],
        )?;

        Ok(())
    }
}
