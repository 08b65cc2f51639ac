//! Behavioral coaching engine
//!
//! Three components sit on top of the record store:
//! - `streak` - per-day discipline streak, mutated only by `evaluate_daily_streak`
//! - `regret` - regret scores over evaluated expenses (read-only)
//! - `letter` - templated monthly letter, upserted once per user and month
//!
//! The engine never cascades on its own. Whoever writes a transaction calls
//! `evaluate_daily_streak` for the affected day(s) afterwards.

pub mod letter;
pub mod regret;
pub mod streak;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};

use crate::calendar::{check_day, end_of_day, start_of_day, Month};
use crate::config::BehaviorConfig;
use crate::db::TransactionFilter;
use crate::error::{Error, Result};
use crate::models::{
    MonthlyLetter, OnboardingLetter, RegretScores, RegretStatus, ScoreWindow, Streak,
    Transaction, TransactionType,
};
use crate::store::RecordStore;

pub use letter::{end_of_month_letter, mid_month_letter, ONBOARDING_LETTER};
pub use regret::{check_eligible, score_regrets, window_start};
pub use streak::{affected_days, StreakDay, StreakOutcome};

/// Streak, regret and letter operations over a record store
pub struct BehaviorEngine<S> {
    store: S,
    config: BehaviorConfig,
    /// One lock per user, held across each streak read-modify-write
    ///
    /// Only users with an evaluation in flight keep an entry.
    streak_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S: RecordStore> BehaviorEngine<S> {
    pub fn new(store: S, config: BehaviorConfig) -> Self {
        Self {
            store,
            config,
            streak_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &BehaviorConfig {
        &self.config
    }

    fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .streak_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the user's entry once no other evaluation holds it
    fn release_user_lock(&self, user_id: &str) {
        let mut locks = self
            .streak_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if locks
            .get(user_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(user_id);
        }
    }

    #[cfg(test)]
    fn tracked_locks(&self) -> usize {
        self.streak_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Evaluate one day of discipline and persist the resulting streak
    pub fn evaluate_daily_streak(&self, user_id: &str, date: NaiveDate) -> Result<Streak> {
        let date = check_day(date)?;
        let lock = self.user_lock(user_id);
        let result = {
            let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            self.evaluate_locked(user_id, date)
        };
        drop(lock);
        self.release_user_lock(user_id);
        result
    }

    /// Streak read-modify-write; the caller holds the user's lock
    fn evaluate_locked(&self, user_id: &str, date: NaiveDate) -> Result<Streak> {
        let month = Month::of(date);
        let total_monthly_budget: f64 = self
            .store
            .find_budgets(user_id, Some(month))?
            .iter()
            .map(|b| b.limit)
            .sum();

        let filter = TransactionFilter::new()
            .between(start_of_day(date), end_of_day(date))
            .kind(TransactionType::Expense);
        let daily_expense: f64 = self
            .store
            .find_transactions(user_id, &filter)?
            .iter()
            .map(|t| t.amount)
            .sum();

        let day = StreakDay {
            date,
            total_monthly_budget,
            days_in_month: month.days(),
            daily_expense,
        };

        let streak = self.store.get_or_create_streak(user_id)?;
        let outcome = day.outcome(&streak);
        let updated = day.apply(&streak);

        debug!(
            user = user_id,
            %date,
            daily_expense,
            daily_limit = ?day.daily_limit(),
            ?outcome,
            "Evaluated streak day"
        );

        self.store.save_streak(&updated)?;

        if updated.current_streak != streak.current_streak {
            info!(
                user = user_id,
                from = streak.current_streak,
                to = updated.current_streak,
                longest = updated.longest_streak,
                "Streak changed"
            );
        }

        Ok(updated)
    }

    /// Evaluate every day touched by a transaction write, in order
    pub fn evaluate_days(&self, user_id: &str, days: &[NaiveDate]) -> Result<Option<Streak>> {
        let mut last = None;
        for day in days {
            last = Some(self.evaluate_daily_streak(user_id, *day)?);
        }
        Ok(last)
    }

    /// Current streak, created on first access
    pub fn get_streak(&self, user_id: &str) -> Result<Streak> {
        self.store.get_or_create_streak(user_id)
    }

    /// Regret scores over evaluated expenses since the start of `window`
    pub fn get_regret_scores(
        &self,
        user_id: &str,
        window: ScoreWindow,
        now: DateTime<Utc>,
    ) -> Result<RegretScores> {
        let mut filter = TransactionFilter::new()
            .kind(TransactionType::Expense)
            .evaluated_only(true);
        if let Some(start) = window_start(window, now) {
            filter = filter.from(start);
        }

        let transactions = self.store.find_transactions(user_id, &filter)?;
        let scores = score_regrets(&transactions);

        debug!(
            user = user_id,
            window = window.as_str(),
            evaluated = scores.total_evaluated,
            "Computed regret scores"
        );
        Ok(scores)
    }

    /// Record a regret verdict on an eligible expense
    pub fn record_regret(
        &self,
        user_id: &str,
        transaction_id: i64,
        status: RegretStatus,
        now: DateTime<Utc>,
    ) -> Result<Transaction> {
        let tx = self
            .store
            .get_transaction(user_id, transaction_id)?
            .ok_or_else(|| Error::NotFound(format!("Transaction {}", transaction_id)))?;

        check_eligible(&tx, now, &self.config)?;

        let updated = self
            .store
            .save_regret_status(user_id, transaction_id, status, now)?;
        info!(
            user = user_id,
            transaction = transaction_id,
            status = status.as_str(),
            "Recorded regret verdict"
        );
        Ok(updated)
    }

    /// Synthesize and upsert the letter for `month`
    ///
    /// A month without transactions yields the onboarding text, which is not stored.
    pub fn generate_monthly_letter(
        &self,
        user_id: &str,
        month: Month,
        today: NaiveDate,
    ) -> Result<MonthlyLetter> {
        let today = check_day(today)?;
        let filter = TransactionFilter::new().between(month.start(), month.end());
        let transactions = self.store.find_transactions(user_id, &filter)?;

        if transactions.is_empty() {
            debug!(user = user_id, %month, "No activity, returning onboarding letter");
            return Ok(MonthlyLetter::Onboarding(OnboardingLetter {
                month,
                content: ONBOARDING_LETTER.to_string(),
            }));
        }

        let mut regret_count = 0u32;
        let mut worth_it_count = 0u32;
        for tx in transactions.iter().filter(|t| t.is_expense()) {
            match tx.regret_status {
                Some(RegretStatus::Regret) => regret_count += 1,
                Some(RegretStatus::WorthIt) => worth_it_count += 1,
                _ => {}
            }
        }

        let streak = self.store.get_or_create_streak(user_id)?;

        let content = if today == month.last_day() {
            end_of_month_letter(
                month,
                regret_count,
                streak.current_streak,
                self.config.celebration_streak_days,
            )
        } else {
            mid_month_letter(month, worth_it_count, regret_count)
        };

        let letter = self.store.upsert_letter(user_id, month, &content)?;
        info!(user = user_id, %month, "Saved monthly letter");

        Ok(MonthlyLetter::Stored(letter))
    }

    /// The current month's letter, generated on first access
    pub fn latest_letter(&self, user_id: &str, today: NaiveDate) -> Result<MonthlyLetter> {
        let current = Month::of(check_day(today)?);

        match self.store.latest_letter(user_id)? {
            Some(letter) if letter.month == current => Ok(MonthlyLetter::Stored(letter)),
            _ => self.generate_monthly_letter(user_id, current, today),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{NewBudget, NewTransaction};
    use chrono::TimeZone;

    fn setup() -> BehaviorEngine<Database> {
        let db = Database::in_memory().unwrap();
        BehaviorEngine::new(db, BehaviorConfig::default())
    }

    fn expense(amount: f64, date: DateTime<Utc>) -> NewTransaction {
        NewTransaction {
            kind: TransactionType::Expense,
            amount,
            category: "Food".to_string(),
            description: "Groceries".to_string(),
            date,
            is_recurring: false,
            frequency: None,
        }
    }

    #[test]
    fn test_evaluate_counts_only_that_day() {
        let engine = setup();
        let db = engine.store();
        db.set_budget(
            "alice",
            &NewBudget {
                category: "Food".to_string(),
                limit: 3000.0,
                month: Month::new(2024, 7).unwrap(),
            },
        )
        .unwrap();

        // Late on the previous day and early on the next day do not count
        db.insert_transaction("alice", &expense(500.0, Utc.with_ymd_and_hms(2024, 7, 9, 23, 59, 59).unwrap()))
            .unwrap();
        db.insert_transaction("alice", &expense(500.0, Utc.with_ymd_and_hms(2024, 7, 11, 0, 0, 0).unwrap()))
            .unwrap();
        db.insert_transaction("alice", &expense(50.0, Utc.with_ymd_and_hms(2024, 7, 10, 8, 0, 0).unwrap()))
            .unwrap();

        let day = NaiveDate::from_ymd_opt(2024, 7, 10).unwrap();
        let streak = engine.evaluate_daily_streak("alice", day).unwrap();
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.last_evaluated_date, Some(day));
    }

    #[test]
    fn test_streak_is_per_user() {
        let engine = setup();
        let day = NaiveDate::from_ymd_opt(2024, 7, 10).unwrap();

        engine.evaluate_daily_streak("alice", day).unwrap();
        assert_eq!(engine.get_streak("alice").unwrap().current_streak, 1);
        assert_eq!(engine.get_streak("bob").unwrap().current_streak, 0);
    }

    #[test]
    fn test_concurrent_evaluations_count_once() {
        let engine = Arc::new(setup());
        let day = NaiveDate::from_ymd_opt(2024, 7, 10).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || engine.evaluate_daily_streak("alice", day).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(engine.get_streak("alice").unwrap().current_streak, 1);
        assert_eq!(engine.tracked_locks(), 0);
    }

    #[test]
    fn test_locks_released_after_evaluation() {
        let engine = setup();
        let day = NaiveDate::from_ymd_opt(2024, 7, 10).unwrap();

        for user in ["alice", "bob", "carol"] {
            engine.evaluate_daily_streak(user, day).unwrap();
        }
        assert_eq!(engine.tracked_locks(), 0);

        // A held entry survives until its holder is done
        let held = engine.user_lock("alice");
        engine.release_user_lock("alice");
        assert_eq!(engine.tracked_locks(), 1);
        drop(held);
        engine.release_user_lock("alice");
        assert_eq!(engine.tracked_locks(), 0);
    }

    #[test]
    fn test_out_of_range_dates_are_invalid() {
        let engine = setup();

        let result = engine.evaluate_daily_streak("alice", NaiveDate::MAX);
        assert!(matches!(result, Err(Error::InvalidData(_))));
        let result = engine.evaluate_daily_streak("alice", NaiveDate::MIN);
        assert!(matches!(result, Err(Error::InvalidData(_))));
        assert!(matches!(
            engine.latest_letter("alice", NaiveDate::MAX),
            Err(Error::InvalidData(_))
        ));

        // Nothing was persisted
        assert_eq!(engine.get_streak("alice").unwrap().last_evaluated_date, None);

        let last = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();
        let streak = engine.evaluate_daily_streak("alice", last).unwrap();
        assert_eq!(streak.last_evaluated_date, Some(last));
    }

    #[test]
    fn test_record_regret_rules() {
        let engine = setup();
        let db = engine.store();
        let spent_at = Utc.with_ymd_and_hms(2024, 7, 10, 8, 0, 0).unwrap();
        let tx = db.insert_transaction("alice", &expense(20.0, spent_at)).unwrap();

        let too_soon = engine.record_regret("alice", tx.id, RegretStatus::Regret, spent_at + chrono::Duration::hours(2));
        assert!(matches!(too_soon, Err(Error::InvalidData(_))));

        let other_user = engine.record_regret("bob", tx.id, RegretStatus::Regret, spent_at + chrono::Duration::hours(30));
        assert!(matches!(other_user, Err(Error::NotFound(_))));

        let now = spent_at + chrono::Duration::hours(30);
        let updated = engine.record_regret("alice", tx.id, RegretStatus::Regret, now).unwrap();
        assert_eq!(updated.regret_status, Some(RegretStatus::Regret));
        assert_eq!(updated.regret_evaluated_at, Some(now));

        let scores = engine.get_regret_scores("alice", ScoreWindow::All, now).unwrap();
        assert_eq!(scores.total_evaluated, 1);
        assert_eq!(scores.regret_percentage, 100.0);
        assert_eq!(scores.score, 0.0);
    }

    #[test]
    fn test_scores_respect_window() {
        let engine = setup();
        let db = engine.store();
        let old = Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap();
        let recent = Utc.with_ymd_and_hms(2024, 7, 2, 8, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 7, 10, 8, 0, 0).unwrap();

        let a = db.insert_transaction("alice", &expense(20.0, old)).unwrap();
        let b = db.insert_transaction("alice", &expense(20.0, recent)).unwrap();
        engine.record_regret("alice", a.id, RegretStatus::Regret, now).unwrap();
        engine.record_regret("alice", b.id, RegretStatus::WorthIt, now).unwrap();

        let month = engine.get_regret_scores("alice", ScoreWindow::Month, now).unwrap();
        assert_eq!(month.total_evaluated, 1);
        assert_eq!(month.score, 100.0);

        let day = engine.get_regret_scores("alice", ScoreWindow::Day, now).unwrap();
        assert_eq!(day.total_evaluated, 0);

        let all = engine.get_regret_scores("alice", ScoreWindow::All, now).unwrap();
        assert_eq!(all.total_evaluated, 2);
        assert_eq!(all.score, 50.0);
    }

    #[test]
    fn test_latest_letter_generates_for_current_month() {
        let engine = setup();
        let db = engine.store();
        let today = NaiveDate::from_ymd_opt(2024, 7, 10).unwrap();

        let onboarding = engine.latest_letter("alice", today).unwrap();
        assert!(!onboarding.is_stored());
        assert_eq!(onboarding.content(), ONBOARDING_LETTER);

        db.insert_transaction("alice", &expense(20.0, Utc.with_ymd_and_hms(2024, 7, 3, 8, 0, 0).unwrap()))
            .unwrap();
        let letter = engine.latest_letter("alice", today).unwrap();
        assert!(letter.is_stored());
        assert!(letter.content().contains("I'm currently navigating July 2024."));
        assert_eq!(letter.month(), Month::new(2024, 7).unwrap());

        // Served from the store on the next call
        let again = engine.latest_letter("alice", today).unwrap();
        assert_eq!(again.content(), letter.content());
        assert_eq!(db.list_letters("alice").unwrap().len(), 1);
    }
}
