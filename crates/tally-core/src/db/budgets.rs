//! Budget operations
//!
//! A budget is unique per (user, category, month); setting one again
//! replaces its limit.

use rusqlite::params;

use super::{parsed_column, Database};
use crate::calendar::Month;
use crate::error::{Error, Result};
use crate::models::{Budget, NewBudget};

impl Database {
    /// Create or replace the budget for a category and month
    pub fn set_budget(&self, user_id: &str, budget: &NewBudget) -> Result<Budget> {
        budget.validate()?;
        let conn = self.conn()?;
        let category = budget.category.trim();
        let month = budget.month.to_string();

        conn.execute(
            r#"
            INSERT INTO budgets (user_id, category, limit_amount, month)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(user_id, category, month) DO UPDATE SET limit_amount = excluded.limit_amount
            "#,
            params![user_id, category, budget.limit, month],
        )?;

        let saved = conn.query_row(
            "SELECT id, user_id, category, limit_amount, month FROM budgets
             WHERE user_id = ? AND category = ? AND month = ?",
            params![user_id, category, month],
            |row| Self::row_to_budget(row),
        )?;

        Ok(saved)
    }

    /// List budgets, optionally for a single month
    pub fn list_budgets(&self, user_id: &str, month: Option<Month>) -> Result<Vec<Budget>> {
        let conn = self.conn()?;

        let budgets = match month {
            Some(month) => {
                let mut stmt = conn.prepare(
                    "SELECT id, user_id, category, limit_amount, month FROM budgets
                     WHERE user_id = ? AND month = ?
                     ORDER BY category",
                )?;
                let rows = stmt
                    .query_map(params![user_id, month.to_string()], |row| {
                        Self::row_to_budget(row)
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT id, user_id, category, limit_amount, month FROM budgets
                     WHERE user_id = ?
                     ORDER BY month DESC, category",
                )?;
                let rows = stmt
                    .query_map(params![user_id], |row| Self::row_to_budget(row))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
        };

        Ok(budgets)
    }

    /// Delete a budget
    pub fn delete_budget(&self, user_id: &str, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM budgets WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;

        if deleted == 0 {
            return Err(Error::NotFound(format!("Budget {}", id)));
        }
        Ok(())
    }

    /// Column order: id, user_id, category, limit_amount, month
    fn row_to_budget(row: &rusqlite::Row) -> rusqlite::Result<Budget> {
        Ok(Budget {
            id: row.get(0)?,
            user_id: row.get(1)?,
            category: row.get(2)?,
            limit: row.get(3)?,
            month: parsed_column(row, 4)?,
        })
    }
}
