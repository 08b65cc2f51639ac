//! Budget handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Json,
};
use serde::Deserialize;

use super::read_json;
use crate::{get_user_id, AppError, AppState, SuccessResponse};
use tally_core::models::{Budget, NewBudget};
use tally_core::Month;

/// Query parameters for listing budgets
#[derive(Debug, Deserialize)]
pub struct BudgetQuery {
    /// Month filter (YYYY-MM)
    pub month: Option<String>,
}

/// GET /api/budgets - List budgets, optionally for one month
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BudgetQuery>,
    request: Request,
) -> Result<Json<Vec<Budget>>, AppError> {
    let user_id = get_user_id(request.headers());

    let month = params
        .month
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .map(str::parse::<Month>)
        .transpose()?;

    let budgets = state.db.list_budgets(&user_id, month)?;

    state.db.log_audit(
        &user_id,
        "list",
        Some("budget"),
        None,
        Some(&format!("month={:?}, returned={}", params.month, budgets.len())),
    )?;

    Ok(Json(budgets))
}

/// POST /api/budgets - Create or replace a category budget for a month
pub async fn set_budget(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Budget>, AppError> {
    let user_id = get_user_id(request.headers());
    let req: NewBudget = read_json(request).await?;

    let budget = state.db.set_budget(&user_id, &req)?;

    state.db.log_audit(
        &user_id,
        "upsert",
        Some("budget"),
        Some(budget.id),
        Some(&format!(
            "category={}, limit={}, month={}",
            budget.category, budget.limit, budget.month
        )),
    )?;

    Ok(Json(budget))
}

/// DELETE /api/budgets/:id - Remove a budget
pub async fn delete_budget(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_id = get_user_id(request.headers());

    state.db.delete_budget(&user_id, id)?;

    state
        .db
        .log_audit(&user_id, "delete", Some("budget"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}
