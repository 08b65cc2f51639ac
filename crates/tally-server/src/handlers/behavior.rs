//! Behavior handlers (streak, regret scores, letters)

use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use super::read_json_or_default;
use crate::{get_user_id, AppError, AppState};
use tally_core::models::{FutureSelfLetter, MonthlyLetter, RegretScores, ScoreWindow, Streak};
use tally_core::Month;

/// GET /api/behavior/streak - Current and longest streak
pub async fn get_streak(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Streak>, AppError> {
    let user_id = get_user_id(request.headers());

    let streak = state.behavior.get_streak(&user_id)?;

    state
        .db
        .log_audit(&user_id, "view", Some("streak"), None, None)?;

    Ok(Json(streak))
}

/// Query parameters for regret scores
#[derive(Debug, Deserialize)]
pub struct ScoresQuery {
    /// day, month or all (default)
    pub duration: Option<String>,
}

/// GET /api/behavior/scores - Regret scores over a window
pub async fn get_regret_scores(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ScoresQuery>,
    request: Request,
) -> Result<Json<RegretScores>, AppError> {
    let user_id = get_user_id(request.headers());

    let window: ScoreWindow = params
        .duration
        .as_deref()
        .unwrap_or("all")
        .parse()
        .map_err(|e: String| AppError::bad_request(&e))?;

    let scores = state
        .behavior
        .get_regret_scores(&user_id, window, Utc::now())?;

    state.db.log_audit(
        &user_id,
        "report",
        Some("regret_scores"),
        None,
        Some(&format!("duration={}", window.as_str())),
    )?;

    Ok(Json(scores))
}

/// GET /api/behavior/letter/latest - This month's letter, generated on first access
pub async fn get_latest_letter(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<MonthlyLetter>, AppError> {
    let user_id = get_user_id(request.headers());

    let letter = state
        .behavior
        .latest_letter(&user_id, Utc::now().date_naive())?;

    state.db.log_audit(
        &user_id,
        "view",
        Some("letter"),
        None,
        Some(&format!("month={}", letter.month())),
    )?;

    Ok(Json(letter))
}

/// GET /api/behavior/letter/archive - Stored letters, newest month first
pub async fn list_letters(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<FutureSelfLetter>>, AppError> {
    let user_id = get_user_id(request.headers());

    let letters = state.db.list_letters(&user_id)?;

    state.db.log_audit(
        &user_id,
        "list",
        Some("letter"),
        None,
        Some(&format!("returned={}", letters.len())),
    )?;

    Ok(Json(letters))
}

/// Request body for a manual streak evaluation
#[derive(Debug, Default, Deserialize)]
pub struct EvaluateRequest {
    /// Day to evaluate (YYYY-MM-DD), defaults to today
    pub date: Option<NaiveDate>,
}

/// POST /api/behavior/evaluate - Evaluate the streak for one day
pub async fn evaluate_streak(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Streak>, AppError> {
    let user_id = get_user_id(request.headers());
    let req: EvaluateRequest = read_json_or_default(request).await?;

    let date = req.date.unwrap_or_else(|| Utc::now().date_naive());
    let streak = state.behavior.evaluate_daily_streak(&user_id, date)?;

    state.db.log_audit(
        &user_id,
        "evaluate",
        Some("streak"),
        None,
        Some(&format!(
            "date={}, current={}, longest={}",
            date, streak.current_streak, streak.longest_streak
        )),
    )?;

    Ok(Json(streak))
}

/// Request body for letter generation
#[derive(Debug, Default, Deserialize)]
pub struct GenerateLetterRequest {
    /// Month to write about (YYYY-MM), defaults to the current month
    pub month: Option<Month>,
}

/// POST /api/behavior/generate-letter - Regenerate a month's letter
pub async fn generate_letter(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<MonthlyLetter>, AppError> {
    let user_id = get_user_id(request.headers());
    let req: GenerateLetterRequest = read_json_or_default(request).await?;

    let today = Utc::now().date_naive();
    let month = req.month.unwrap_or_else(|| Month::of(today));
    let letter = state
        .behavior
        .generate_monthly_letter(&user_id, month, today)?;

    state.db.log_audit(
        &user_id,
        "generate",
        Some("letter"),
        None,
        Some(&format!("month={}, stored={}", month, letter.is_stored())),
    )?;

    Ok(Json(letter))
}
