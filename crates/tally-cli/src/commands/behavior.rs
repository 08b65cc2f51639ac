//! Behavior command implementations (streak, scores, letters)

use anyhow::{anyhow, Result};
use chrono::Utc;
use tally_core::calendar::parse_day;
use tally_core::models::{MonthlyLetter, ScoreWindow};
use tally_core::{BehaviorEngine, Database, Month};

pub fn cmd_streak(
    engine: &BehaviorEngine<Database>,
    user_id: &str,
    evaluate: Option<&str>,
) -> Result<()> {
    let streak = match evaluate {
        Some(day) => {
            let date = parse_day(day)?;
            println!("🔍 Evaluating {}...", date);
            engine.evaluate_daily_streak(user_id, date)?
        }
        None => engine.get_streak(user_id)?,
    };

    println!();
    println!("🔥 Spending Streak");
    println!("   ─────────────────────────────");
    println!("   Current: {} day(s)", streak.current_streak);
    println!("   Longest: {} day(s)", streak.longest_streak);
    match streak.last_evaluated_date {
        Some(date) => println!("   Last evaluated: {}", date),
        None => println!("   Last evaluated: never"),
    }

    Ok(())
}

pub fn cmd_scores(engine: &BehaviorEngine<Database>, user_id: &str, duration: &str) -> Result<()> {
    let window: ScoreWindow = duration.parse().map_err(|e: String| anyhow!(e))?;
    let scores = engine.get_regret_scores(user_id, window, Utc::now())?;

    println!();
    println!("🎯 Regret Scores ({})", window.as_str());
    println!("   ─────────────────────────────");

    if scores.total_evaluated == 0 {
        println!("   No evaluated expenses yet.");
        println!("   Rate one with: tally transactions regret <id> \"Worth it\"");
        return Ok(());
    }

    println!("   Discipline score: {:.1}%", scores.score);
    println!("   Regret rate:      {:.1}%", scores.regret_percentage);
    println!("   Evaluated:        {}", scores.total_evaluated);
    println!();
    println!("   By category:");
    for (category, stats) in &scores.category_regret {
        println!(
            "     {:<20} {} of {} regretted",
            category, stats.regrets, stats.total
        );
    }

    Ok(())
}

pub fn cmd_letter(
    engine: &BehaviorEngine<Database>,
    user_id: &str,
    month: Option<&str>,
) -> Result<()> {
    let today = Utc::now().date_naive();
    let letter = match month {
        Some(m) => engine.generate_monthly_letter(user_id, m.parse::<Month>()?, today)?,
        None => engine.latest_letter(user_id, today)?,
    };

    println!();
    match &letter {
        MonthlyLetter::Stored(stored) => println!(
            "✉️  Letter for {} (written {})",
            stored.month.long_label(),
            stored.created_at.format("%Y-%m-%d")
        ),
        MonthlyLetter::Onboarding(onboarding) => {
            println!("👋 {}", onboarding.month.long_label())
        }
    }
    println!("   ─────────────────────────────");
    for line in letter.content().lines() {
        println!("   {}", line);
    }

    Ok(())
}

pub fn cmd_letter_archive(db: &Database, user_id: &str) -> Result<()> {
    let letters = db.list_letters(user_id)?;

    if letters.is_empty() {
        println!("No letters yet. Generate this month's with: tally letter");
        return Ok(());
    }

    println!();
    println!("📚 Letter Archive");
    println!("   ─────────────────────────────");
    for letter in &letters {
        let first_line = letter
            .content
            .lines()
            .find(|l| !l.trim().is_empty() && !l.starts_with("Dear"))
            .unwrap_or("");
        println!(
            "   {} │ {}",
            letter.month,
            super::truncate(first_line, 60)
        );
    }
    println!();
    println!("   Use 'tally letter --month YYYY-MM' to regenerate one.");

    Ok(())
}
