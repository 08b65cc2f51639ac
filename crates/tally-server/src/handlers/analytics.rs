//! Analytics handlers (chart series)

use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    Json,
};
use chrono::{Days, Utc};
use serde::Deserialize;

use crate::{get_user_id, AppError, AppState};
use tally_core::aggregate;
use tally_core::calendar::{end_of_day, parse_day, start_of_day};
use tally_core::models::{DailyTotals, MonthlyTotals};
use tally_core::{Month, TransactionFilter};

/// Longest trend the monthly endpoint will compute
const MAX_TREND_MONTHS: u32 = 120;

/// Longest series the daily endpoint will compute
const MAX_SERIES_DAYS: i64 = 366;

/// Days in the series when no start is given
const DEFAULT_SERIES_DAYS: u64 = 30;

/// Query parameters for the monthly trend
#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    pub months: Option<u32>,
}

/// GET /api/analytics/monthly - Income/expense per trailing month
pub async fn monthly_trend(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MonthlyQuery>,
    request: Request,
) -> Result<Json<Vec<MonthlyTotals>>, AppError> {
    let user_id = get_user_id(request.headers());

    let months = params
        .months
        .unwrap_or(state.behavior.config().trailing_months)
        .clamp(1, MAX_TREND_MONTHS);
    let today = Utc::now().date_naive();

    let window = Month::of(today).trailing(months);
    let filter = match (window.first(), window.last()) {
        (Some(first), Some(last)) => TransactionFilter::new().between(first.start(), last.end()),
        _ => TransactionFilter::new(),
    };
    let transactions = state.db.find_transactions(&user_id, &filter)?;
    let trend = aggregate::sum_by_month(&transactions, months, today);

    state.db.log_audit(
        &user_id,
        "report",
        Some("analytics_monthly"),
        None,
        Some(&format!("months={}", months)),
    )?;

    Ok(Json(trend))
}

/// Query parameters for the daily series
#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    /// Start date (YYYY-MM-DD), defaults to 30 days ago
    pub from: Option<String>,
    /// End date (YYYY-MM-DD), defaults to today
    pub to: Option<String>,
}

/// GET /api/analytics/daily - Income/expense per day in a range
pub async fn daily_series(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DailyQuery>,
    request: Request,
) -> Result<Json<Vec<DailyTotals>>, AppError> {
    let user_id = get_user_id(request.headers());
    let today = Utc::now().date_naive();

    let to = match params.to.as_deref() {
        Some(s) => parse_day(s)?,
        None => today,
    };
    let from = match params.from.as_deref() {
        Some(s) => parse_day(s)?,
        None => to
            .checked_sub_days(Days::new(DEFAULT_SERIES_DAYS - 1))
            .ok_or_else(|| AppError::bad_request("'to' is out of range"))?,
    };

    if from > to {
        return Err(AppError::bad_request("'from' must not be after 'to'"));
    }
    if (to - from).num_days() >= MAX_SERIES_DAYS {
        return Err(AppError::bad_request(&format!(
            "Range too long (max {} days)",
            MAX_SERIES_DAYS
        )));
    }

    let filter = TransactionFilter::new().between(start_of_day(from), end_of_day(to));
    let transactions = state.db.find_transactions(&user_id, &filter)?;
    let series = aggregate::sum_by_day(&transactions, from, to);

    state.db.log_audit(
        &user_id,
        "report",
        Some("analytics_daily"),
        None,
        Some(&format!("from={}, to={}", from, to)),
    )?;

    Ok(Json(series))
}
