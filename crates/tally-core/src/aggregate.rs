//! Aggregation over transaction sets
//!
//! Pure functions feeding the dashboard, reports and analytics views.
//! Callers supply "today"/"now"; nothing here reads a clock or touches the store.

use std::collections::BTreeMap;

use chrono::{DateTime, Days, NaiveDate, Utc};

use crate::calendar::Month;
use crate::config::BehaviorConfig;
use crate::models::{
    Budget, DailyTotals, DashboardData, DashboardStats, MonthlyTotals, RegretBreakdown,
    ReportData, Transaction, TransactionType,
};

/// Number of transactions shown in the dashboard's recent list
pub const RECENT_TRANSACTIONS: usize = 10;

/// Total amount per category for transactions of `kind`
pub fn sum_by_category(transactions: &[Transaction], kind: TransactionType) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for tx in transactions.iter().filter(|t| t.kind == kind) {
        *totals.entry(tx.category.clone()).or_insert(0.0) += tx.amount;
    }
    totals
}

/// Sum of every transaction of `kind`
pub fn total(transactions: &[Transaction], kind: TransactionType) -> f64 {
    transactions
        .iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.amount)
        .sum()
}

/// Expense total within one month
pub fn month_expense(transactions: &[Transaction], month: Month) -> f64 {
    transactions
        .iter()
        .filter(|t| t.is_expense() && t.month() == month)
        .map(|t| t.amount)
        .sum()
}

/// Income and expense totals for the `months` trailing months ending at the
/// month of `today`, oldest first; months without activity report zero
pub fn sum_by_month(transactions: &[Transaction], months: u32, today: NaiveDate) -> Vec<MonthlyTotals> {
    let window = Month::of(today).trailing(months);

    let mut totals: BTreeMap<Month, (f64, f64)> =
        window.iter().map(|m| (*m, (0.0, 0.0))).collect();

    for tx in transactions {
        if let Some((income, expense)) = totals.get_mut(&tx.month()) {
            match tx.kind {
                TransactionType::Income => *income += tx.amount,
                TransactionType::Expense => *expense += tx.amount,
            }
        }
    }

    totals
        .into_iter()
        .map(|(month, (income, expense))| MonthlyTotals {
            month,
            label: month.short_label(),
            income,
            expense,
        })
        .collect()
}

/// Daily income and expense totals for every day in `[from, to]`
///
/// Returns an empty series when `from` is after `to`.
pub fn sum_by_day(transactions: &[Transaction], from: NaiveDate, to: NaiveDate) -> Vec<DailyTotals> {
    let mut totals: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    let mut day = from;
    while day <= to {
        totals.insert(day, (0.0, 0.0));
        match day.checked_add_days(Days::new(1)) {
            Some(next) => day = next,
            None => break,
        }
    }

    for tx in transactions {
        if let Some((income, expense)) = totals.get_mut(&tx.day()) {
            match tx.kind {
                TransactionType::Income => *income += tx.amount,
                TransactionType::Expense => *expense += tx.amount,
            }
        }
    }

    totals
        .into_iter()
        .map(|(date, (income, expense))| DailyTotals {
            date,
            income,
            expense,
        })
        .collect()
}

/// Regret verdict counts over evaluated expenses, overall and per category
pub fn regret_breakdown(transactions: &[Transaction]) -> RegretBreakdown {
    let mut breakdown = RegretBreakdown::default();

    for tx in transactions.iter().filter(|t| t.is_expense()) {
        if let Some(status) = tx.regret_status {
            breakdown.overall.record(status);
            breakdown
                .by_category
                .entry(tx.category.clone())
                .or_default()
                .record(status);
        }
    }

    breakdown
}

/// Reports view payload
pub fn build_report(transactions: &[Transaction]) -> ReportData {
    let breakdown = regret_breakdown(transactions);

    ReportData {
        income_categories: sum_by_category(transactions, TransactionType::Income),
        expense_categories: sum_by_category(transactions, TransactionType::Expense),
        regret_stats: breakdown.overall,
        category_regret: breakdown.by_category,
    }
}

/// Unevaluated expenses whose age is strictly inside the reflection window
pub fn pending_regret_evaluations(
    transactions: &[Transaction],
    now: DateTime<Utc>,
    config: &BehaviorConfig,
) -> Vec<Transaction> {
    let oldest = now - config.eligibility_max();
    let newest = now - config.eligibility_min();

    transactions
        .iter()
        .filter(|t| t.is_expense() && t.regret_status.is_none())
        .filter(|t| t.date > oldest && t.date < newest)
        .cloned()
        .collect()
}

/// Percent change from `previous` to `current`; zero when there is no baseline
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else {
        0.0
    }
}

/// Dashboard payload from a user's full transaction history and budgets
pub fn dashboard(
    transactions: &[Transaction],
    budgets: &[Budget],
    now: DateTime<Utc>,
    config: &BehaviorConfig,
) -> DashboardData {
    let total_income = total(transactions, TransactionType::Income);
    let total_expense = total(transactions, TransactionType::Expense);

    let this_month = Month::of(now.date_naive());
    let current = month_expense(transactions, this_month);
    let previous = month_expense(transactions, this_month.previous());

    let total_budget = budgets
        .iter()
        .filter(|b| b.month == this_month)
        .map(|b| b.limit)
        .sum();

    let mut recent: Vec<Transaction> = transactions.to_vec();
    recent.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    recent.truncate(RECENT_TRANSACTIONS);

    DashboardData {
        stats: DashboardStats {
            total_income,
            total_expense,
            budget_balance: total_income - total_expense,
            total_budget,
            expense_change: percent_change(current, previous),
        },
        recent_transactions: recent,
        pending_regret_evaluations: pending_regret_evaluations(transactions, now, config),
    }
}
