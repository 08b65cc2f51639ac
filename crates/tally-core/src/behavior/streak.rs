//! Daily discipline streak
//!
//! A day qualifies when its expense total stays within the flat daily share
//! of the month's combined budgets. Without budgets every day qualifies.

use chrono::NaiveDate;

use crate::models::{Streak, Transaction};

/// Inputs for evaluating one calendar day
#[derive(Debug, Clone, PartialEq)]
pub struct StreakDay {
    pub date: NaiveDate,
    /// Sum of every budget limit for the month containing `date`
    pub total_monthly_budget: f64,
    pub days_in_month: u32,
    /// Sum of the day's expenses
    pub daily_expense: f64,
}

/// What an evaluation did to the streak
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakOutcome {
    /// Qualified day counted for the first time
    Extended,
    /// Qualified, but the day (or a later one) was already counted
    AlreadyCounted,
    /// Over the daily limit with budgets set
    Reset,
}

impl StreakDay {
    /// Daily spending limit; `None` when no budget is set for the month
    pub fn daily_limit(&self) -> Option<f64> {
        if self.total_monthly_budget > 0.0 && self.days_in_month > 0 {
            Some(self.total_monthly_budget / f64::from(self.days_in_month))
        } else {
            None
        }
    }

    pub fn is_qualified(&self) -> bool {
        match self.daily_limit() {
            Some(limit) => self.daily_expense <= limit,
            None => true,
        }
    }

    /// Classify the evaluation of this day against `streak`
    pub fn outcome(&self, streak: &Streak) -> StreakOutcome {
        if self.is_qualified() {
            match streak.last_evaluated_date {
                Some(last) if last >= self.date => StreakOutcome::AlreadyCounted,
                _ => StreakOutcome::Extended,
            }
        } else {
            StreakOutcome::Reset
        }
    }

    /// The streak after evaluating this day
    ///
    /// `last_evaluated_date` always becomes `date`, even when it moves backwards.
    pub fn apply(&self, streak: &Streak) -> Streak {
        let mut next = streak.clone();

        match self.outcome(streak) {
            StreakOutcome::Extended => {
                next.current_streak += 1;
                next.longest_streak = next.longest_streak.max(next.current_streak);
            }
            StreakOutcome::AlreadyCounted => {}
            StreakOutcome::Reset => next.current_streak = 0,
        }

        next.last_evaluated_date = Some(self.date);
        next
    }
}

/// Days whose streak evaluation is affected by a transaction write
///
/// For an update that moved the date both days are returned, old day first.
pub fn affected_days(previous: Option<&Transaction>, current: Option<&Transaction>) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(2);
    for tx in [previous, current].into_iter().flatten() {
        let day = tx.day();
        if !days.contains(&day) {
            days.push(day);
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn day(budget: f64, spent: f64) -> StreakDay {
        StreakDay {
            date: date(2024, 7, 10),
            total_monthly_budget: budget,
            days_in_month: 31,
            daily_expense: spent,
        }
    }

    #[test]
    fn test_daily_limit_is_flat_share() {
        let limit = day(3000.0, 0.0).daily_limit().unwrap();
        assert!((limit - 96.774).abs() < 0.001);
        assert_eq!(day(0.0, 0.0).daily_limit(), None);
    }

    #[test]
    fn test_qualified_day_extends_once() {
        let streak = Streak::new("alice");
        let evaluated = day(3000.0, 50.0).apply(&streak);
        assert_eq!(evaluated.current_streak, 1);
        assert_eq!(evaluated.longest_streak, 1);
        assert_eq!(evaluated.last_evaluated_date, Some(date(2024, 7, 10)));

        let again = day(3000.0, 50.0).apply(&evaluated);
        assert_eq!(again, evaluated);
    }

    #[test]
    fn test_overspend_resets_only_with_budget() {
        let streak = Streak {
            user_id: "alice".to_string(),
            current_streak: 4,
            longest_streak: 7,
            last_evaluated_date: Some(date(2024, 7, 9)),
        };

        let reset = day(3000.0, 200.0).apply(&streak);
        assert_eq!(reset.current_streak, 0);
        assert_eq!(reset.longest_streak, 7);

        let unbounded = day(0.0, 200.0).apply(&streak);
        assert_eq!(unbounded.current_streak, 5);
    }

    #[test]
    fn test_limit_is_inclusive() {
        let exact = StreakDay {
            date: date(2024, 4, 1),
            total_monthly_budget: 300.0,
            days_in_month: 30,
            daily_expense: 10.0,
        };
        assert!(exact.is_qualified());
    }

    #[test]
    fn test_rewind_moves_last_date_back_without_increment() {
        let streak = Streak {
            user_id: "alice".to_string(),
            current_streak: 3,
            longest_streak: 3,
            last_evaluated_date: Some(date(2024, 7, 20)),
        };

        let rewound = day(3000.0, 10.0).apply(&streak);
        assert_eq!(rewound.current_streak, 3);
        assert_eq!(rewound.last_evaluated_date, Some(date(2024, 7, 10)));
        assert_eq!(day(3000.0, 10.0).outcome(&streak), StreakOutcome::AlreadyCounted);
    }

    #[test]
    fn test_longest_tracks_new_record() {
        let streak = Streak {
            user_id: "alice".to_string(),
            current_streak: 7,
            longest_streak: 7,
            last_evaluated_date: Some(date(2024, 7, 9)),
        };
        let next = day(0.0, 0.0).apply(&streak);
        assert_eq!(next.current_streak, 8);
        assert_eq!(next.longest_streak, 8);
    }
}
