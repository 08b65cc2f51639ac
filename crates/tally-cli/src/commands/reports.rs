//! Report command implementation

use anyhow::{Context, Result};
use chrono::Utc;
use tally_core::aggregate;
use tally_core::{BehaviorEngine, Database, TransactionFilter};

/// Width of the trend bar for the largest month
const BAR_WIDTH: f64 = 30.0;

pub fn cmd_report(
    engine: &BehaviorEngine<Database>,
    user_id: &str,
    months: Option<u32>,
    json: bool,
) -> Result<()> {
    let months = months.unwrap_or(engine.config().trailing_months).max(1);
    let today = Utc::now().date_naive();

    let transactions = engine
        .store()
        .find_transactions(user_id, &TransactionFilter::new())?;
    let trend = aggregate::sum_by_month(&transactions, months, today);
    let report = aggregate::build_report(&transactions);

    if json {
        let output = serde_json::json!({
            "trend": trend,
            "report": report,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialize report")?
        );
        return Ok(());
    }

    println!();
    println!("📈 Income vs Expense (last {} months)", months);
    println!("   ─────────────────────────────────────────────────────────────");

    let peak = trend
        .iter()
        .map(|m| m.income.max(m.expense))
        .fold(0.0_f64, f64::max);
    for month in &trend {
        let bar_len = if peak > 0.0 {
            (month.expense / peak * BAR_WIDTH).round() as usize
        } else {
            0
        };
        println!(
            "   {:<9} │ \x1b[32m+${:>9.2}\x1b[0m │ \x1b[31m-${:>9.2}\x1b[0m │ {}",
            month.label,
            month.income,
            month.expense,
            "█".repeat(bar_len)
        );
    }

    if !report.expense_categories.is_empty() {
        println!();
        println!("💸 Spending by Category");
        println!("   ─────────────────────────────");
        let total: f64 = report.expense_categories.values().sum();
        let mut categories: Vec<_> = report.expense_categories.iter().collect();
        categories.sort_by(|a, b| b.1.total_cmp(a.1));
        for (category, amount) in categories {
            println!(
                "   {:<20} ${:>10.2}  ({:.0}%)",
                category,
                amount,
                amount / total * 100.0
            );
        }
    }

    if !report.income_categories.is_empty() {
        println!();
        println!("💵 Income by Category");
        println!("   ─────────────────────────────");
        for (category, amount) in &report.income_categories {
            println!("   {:<20} ${:>10.2}", category, amount);
        }
    }

    let evaluated = report.regret_stats.total();
    println!();
    println!("🤔 Regret Check ({} evaluated)", evaluated);
    println!("   ─────────────────────────────");
    if evaluated == 0 {
        println!("   Nothing evaluated yet.");
    } else {
        println!("   👍 Worth it: {}", report.regret_stats.worth_it);
        println!("   😐 Neutral:  {}", report.regret_stats.neutral);
        println!("   👎 Regret:   {}", report.regret_stats.regret);
    }

    Ok(())
}
