//! Budget command implementations

use anyhow::Result;
use chrono::Utc;
use tally_core::models::NewBudget;
use tally_core::{Database, Month};

pub fn cmd_budgets_list(db: &Database, user_id: &str, month: Option<&str>) -> Result<()> {
    let month = month.map(str::parse::<Month>).transpose()?;
    let budgets = db.list_budgets(user_id, month)?;

    if budgets.is_empty() {
        println!("No budgets set. Add one with:");
        println!("  tally budgets set Food 400");
        return Ok(());
    }

    println!();
    println!("💰 Budgets");
    println!("   ─────────────────────────────────────────");

    let mut current: Option<Month> = None;
    for budget in &budgets {
        if current != Some(budget.month) {
            let total: f64 = budgets
                .iter()
                .filter(|b| b.month == budget.month)
                .map(|b| b.limit)
                .sum();
            println!("   {} (total ${:.2})", budget.month.long_label(), total);
            current = Some(budget.month);
        }
        println!(
            "     [{}] {:<20} ${:>10.2}",
            budget.id, budget.category, budget.limit
        );
    }

    Ok(())
}

pub fn cmd_budgets_set(
    db: &Database,
    user_id: &str,
    category: &str,
    limit: f64,
    month: Option<&str>,
) -> Result<()> {
    let today = Utc::now().date_naive();
    let month = match month {
        Some(m) => m.parse::<Month>()?,
        None => Month::of(today),
    };

    let budget = db.set_budget(
        user_id,
        &NewBudget {
            category: category.to_string(),
            limit,
            month,
        },
    )?;

    println!(
        "✅ Budget for {} in {}: ${:.2} (ID: {})",
        budget.category, budget.month, budget.limit, budget.id
    );

    Ok(())
}

pub fn cmd_budgets_delete(db: &Database, user_id: &str, id: i64) -> Result<()> {
    db.delete_budget(user_id, id)?;
    println!("🗑️  Deleted budget {}", id);
    Ok(())
}
