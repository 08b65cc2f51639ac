//! Regret scoring
//!
//! Scores are recomputed from evaluated expenses on every call.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::calendar::{start_of_day, Month};
use crate::config::BehaviorConfig;
use crate::error::{Error, Result};
use crate::models::{CategoryRegret, RegretScores, RegretStatus, ScoreWindow, Transaction};

/// Lower bound of a scoring window; `None` means unbounded
pub fn window_start(window: ScoreWindow, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match window {
        ScoreWindow::Day => Some(start_of_day(now.date_naive())),
        ScoreWindow::Month => Some(Month::of(now.date_naive()).start()),
        ScoreWindow::All => None,
    }
}

/// Score a set of transactions; unevaluated ones and income are ignored
pub fn score_regrets(transactions: &[Transaction]) -> RegretScores {
    let mut worth_it = 0u32;
    let mut regrets = 0u32;
    let mut total_evaluated = 0u32;
    let mut category_regret: BTreeMap<String, CategoryRegret> = BTreeMap::new();

    for tx in transactions.iter().filter(|t| t.is_expense()) {
        let Some(status) = tx.regret_status else {
            continue;
        };

        total_evaluated += 1;
        let entry = category_regret.entry(tx.category.clone()).or_default();
        entry.total += 1;

        match status {
            RegretStatus::WorthIt => worth_it += 1,
            RegretStatus::Regret => {
                regrets += 1;
                entry.regrets += 1;
            }
            RegretStatus::Neutral => {}
        }
    }

    let (score, regret_percentage) = if total_evaluated == 0 {
        (100.0, 0.0)
    } else {
        let total = f64::from(total_evaluated);
        (
            f64::from(worth_it) / total * 100.0,
            f64::from(regrets) / total * 100.0,
        )
    };

    RegretScores {
        score,
        regret_percentage,
        total_evaluated,
        category_regret,
    }
}

/// Check that a transaction may receive a regret verdict at `now`
pub fn check_eligible(tx: &Transaction, now: DateTime<Utc>, config: &BehaviorConfig) -> Result<()> {
    if !tx.is_expense() {
        return Err(Error::InvalidData(format!(
            "Transaction {} is income; only expenses can be evaluated",
            tx.id
        )));
    }

    let age = now - tx.date;
    if age < config.eligibility_min() {
        return Err(Error::InvalidData(format!(
            "Transaction {} can be evaluated {} hours after it happened",
            tx.id, config.eligibility_min_hours
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;
    use chrono::{Duration, TimeZone};

    fn expense(category: &str, status: Option<RegretStatus>) -> Transaction {
        let date = Utc.with_ymd_and_hms(2024, 5, 5, 10, 0, 0).unwrap();
        Transaction {
            id: 1,
            user_id: "alice".to_string(),
            kind: TransactionType::Expense,
            amount: 10.0,
            category: category.to_string(),
            description: "item".to_string(),
            date,
            is_recurring: false,
            frequency: None,
            regret_status: status,
            regret_evaluated_at: None,
            created_at: date,
        }
    }

    #[test]
    fn test_empty_set_scores_perfect() {
        let scores = score_regrets(&[]);
        assert_eq!(scores.score, 100.0);
        assert_eq!(scores.regret_percentage, 0.0);
        assert_eq!(scores.total_evaluated, 0);
        assert!(scores.category_regret.is_empty());
    }

    #[test]
    fn test_percentages_and_categories() {
        let txs = vec![
            expense("Food", Some(RegretStatus::WorthIt)),
            expense("Food", Some(RegretStatus::Regret)),
            expense("Fun", Some(RegretStatus::Neutral)),
            expense("Fun", Some(RegretStatus::WorthIt)),
            expense("Fun", None),
        ];

        let scores = score_regrets(&txs);
        assert_eq!(scores.total_evaluated, 4);
        assert_eq!(scores.score, 50.0);
        assert_eq!(scores.regret_percentage, 25.0);
        assert_eq!(scores.category_regret["Food"], CategoryRegret { total: 2, regrets: 1 });
        assert_eq!(scores.category_regret["Fun"], CategoryRegret { total: 2, regrets: 0 });
    }

    #[test]
    fn test_window_start() {
        let now = Utc.with_ymd_and_hms(2024, 5, 17, 15, 30, 0).unwrap();
        assert_eq!(
            window_start(ScoreWindow::Day, now),
            Some(Utc.with_ymd_and_hms(2024, 5, 17, 0, 0, 0).unwrap())
        );
        assert_eq!(
            window_start(ScoreWindow::Month, now),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(window_start(ScoreWindow::All, now), None);
    }

    #[test]
    fn test_eligibility() {
        let config = BehaviorConfig::default();
        let tx = expense("Food", None);

        assert!(check_eligible(&tx, tx.date + Duration::hours(23), &config).is_err());
        assert!(check_eligible(&tx, tx.date + Duration::hours(24), &config).is_ok());
        assert!(check_eligible(&tx, tx.date + Duration::days(30), &config).is_ok());

        let mut income = tx.clone();
        income.kind = TransactionType::Income;
        assert!(matches!(
            check_eligible(&income, tx.date + Duration::days(2), &config),
            Err(Error::InvalidData(_))
        ));
    }
}
