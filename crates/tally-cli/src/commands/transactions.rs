//! Transaction command implementations
//!
//! Writes re-evaluate the streak for the touched day, the same way the API does.

use anyhow::{anyhow, Result};
use chrono::Utc;
use tally_core::behavior::affected_days;
use tally_core::calendar::{parse_day, start_of_day};
use tally_core::models::{Frequency, NewTransaction, RegretStatus, Streak, TransactionType};
use tally_core::{BehaviorEngine, Database};

use super::truncate;

/// Raw `transactions add` arguments
pub struct TransactionInput<'a> {
    pub kind: &'a str,
    pub amount: f64,
    pub category: &'a str,
    pub description: &'a str,
    pub date: Option<&'a str>,
    pub recurring: Option<&'a str>,
}

impl TransactionInput<'_> {
    fn parse(&self) -> Result<NewTransaction> {
        let kind: TransactionType = self.kind.parse().map_err(|e: String| anyhow!(e))?;
        let date = match self.date {
            Some(day) => start_of_day(parse_day(day)?),
            None => Utc::now(),
        };
        let frequency = self
            .recurring
            .map(|f| f.parse::<Frequency>())
            .transpose()
            .map_err(|e| anyhow!(e))?;

        Ok(NewTransaction {
            kind,
            amount: self.amount,
            category: self.category.to_string(),
            description: self.description.to_string(),
            date,
            is_recurring: frequency.is_some(),
            frequency,
        })
    }
}

pub fn cmd_transactions_list(db: &Database, user_id: &str, limit: i64) -> Result<()> {
    let transactions = db.list_transactions(user_id, limit, 0)?;

    if transactions.is_empty() {
        println!("No transactions found. Log one with:");
        println!("  tally transactions add --amount 12.50 --category Food");
        return Ok(());
    }

    let total = db.count_transactions(user_id)?;

    println!();
    println!("📝 Recent Transactions ({} total)", total);
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions {
        let amount_str = if tx.is_expense() {
            format!("\x1b[31m-${:.2}\x1b[0m", tx.amount) // Red for expenses
        } else {
            format!("\x1b[32m+${:.2}\x1b[0m", tx.amount) // Green for income
        };
        let verdict = tx
            .regret_status
            .map(|s| format!(" [{}]", s))
            .unwrap_or_default();

        println!(
            "   [{}] {} │ {:>10} │ {:<12} │ {}{}",
            tx.id,
            tx.day(),
            amount_str,
            truncate(&tx.category, 12),
            truncate(&tx.description, 30),
            verdict
        );
    }

    Ok(())
}

pub fn cmd_transactions_add(
    engine: &BehaviorEngine<Database>,
    user_id: &str,
    input: &TransactionInput<'_>,
) -> Result<()> {
    let new_tx = input.parse()?;
    let tx = engine.store().insert_transaction(user_id, &new_tx)?;
    let days = affected_days(None, Some(&tx));
    tracing::debug!("Re-evaluating streak for {:?} after adding transaction {}", days, tx.id);
    let streak = engine.evaluate_days(user_id, &days)?;

    println!(
        "✅ Logged {} of ${:.2} in {} on {} (ID: {})",
        tx.kind,
        tx.amount,
        tx.category,
        tx.day(),
        tx.id
    );
    print_streak_line(streak.as_ref());

    Ok(())
}

pub fn cmd_transactions_delete(
    engine: &BehaviorEngine<Database>,
    user_id: &str,
    id: i64,
) -> Result<()> {
    let removed = engine.store().delete_transaction(user_id, id)?;
    let days = affected_days(Some(&removed), None);
    tracing::debug!("Re-evaluating streak for {:?} after deleting transaction {}", days, id);
    let streak = engine.evaluate_days(user_id, &days)?;

    println!(
        "🗑️  Deleted transaction {} (${:.2} {} on {})",
        id,
        removed.amount,
        removed.category,
        removed.day()
    );
    print_streak_line(streak.as_ref());

    Ok(())
}

pub fn cmd_transactions_regret(
    engine: &BehaviorEngine<Database>,
    user_id: &str,
    id: i64,
    status: &str,
) -> Result<()> {
    let status: RegretStatus = status.parse().map_err(|e: String| anyhow!(e))?;
    let tx = engine.record_regret(user_id, id, status, Utc::now())?;

    let emoji = match status {
        RegretStatus::WorthIt => "👍",
        RegretStatus::Neutral => "😐",
        RegretStatus::Regret => "👎",
    };
    println!(
        "{} Marked ${:.2} {} as \"{}\"",
        emoji, tx.amount, tx.category, status
    );

    Ok(())
}

fn print_streak_line(streak: Option<&Streak>) {
    if let Some(streak) = streak {
        println!(
            "   🔥 Streak: {} day(s) (best {})",
            streak.current_streak, streak.longest_streak
        );
    }
}
