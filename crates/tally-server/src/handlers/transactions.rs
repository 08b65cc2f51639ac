//! Transaction handlers
//!
//! Every write re-evaluates the streak for the day(s) it touched before
//! responding, so an evaluation failure fails the request.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::read_json;
use crate::{get_user_id, AppError, AppState, SuccessResponse, MAX_PAGE_LIMIT};
use tally_core::aggregate;
use tally_core::behavior::affected_days;
use tally_core::models::{
    DashboardData, NewTransaction, RegretStatus, ReportData, Transaction,
};
use tally_core::TransactionFilter;

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Serialize)]
pub struct TransactionResponse {
    pub transactions: Vec<Transaction>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// GET /api/transactions - List transactions, newest first
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransactionQuery>,
    request: Request,
) -> Result<Json<TransactionResponse>, AppError> {
    let user_id = get_user_id(request.headers());

    // Input validation: clamp pagination parameters
    let limit = params.limit.clamp(1, MAX_PAGE_LIMIT);
    let offset = params.offset.max(0);

    let transactions = state.db.list_transactions(&user_id, limit, offset)?;
    let total = state.db.count_transactions(&user_id)?;

    // Audit log - read access
    state.db.log_audit(
        &user_id,
        "list",
        Some("transaction"),
        None,
        Some(&format!(
            "limit={}, offset={}, returned={}",
            limit,
            offset,
            transactions.len()
        )),
    )?;

    Ok(Json(TransactionResponse {
        transactions,
        total,
        limit,
        offset,
    }))
}

/// POST /api/transactions - Log a transaction
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Transaction>, AppError> {
    let user_id = get_user_id(request.headers());
    let new_tx: NewTransaction = read_json(request).await?;

    let tx = state.db.insert_transaction(&user_id, &new_tx)?;
    state
        .behavior
        .evaluate_days(&user_id, &affected_days(None, Some(&tx)))?;

    state.db.log_audit(
        &user_id,
        "create",
        Some("transaction"),
        Some(tx.id),
        Some(&format!(
            "type={}, amount={}, category={}",
            tx.kind, tx.amount, tx.category
        )),
    )?;

    Ok(Json(tx))
}

/// GET /api/transactions/:id - Get a single transaction
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Transaction>, AppError> {
    let user_id = get_user_id(request.headers());

    let tx = state
        .db
        .get_transaction(&user_id, id)?
        .ok_or_else(|| AppError::not_found(&format!("Transaction {} not found", id)))?;

    state
        .db
        .log_audit(&user_id, "view", Some("transaction"), Some(id), None)?;

    Ok(Json(tx))
}

/// PUT /api/transactions/:id - Replace a transaction's fields
pub async fn update_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Transaction>, AppError> {
    let user_id = get_user_id(request.headers());
    let changes: NewTransaction = read_json(request).await?;

    let previous = state
        .db
        .get_transaction(&user_id, id)?
        .ok_or_else(|| AppError::not_found(&format!("Transaction {} not found", id)))?;

    let updated = state.db.update_transaction(&user_id, id, &changes)?;
    state
        .behavior
        .evaluate_days(&user_id, &affected_days(Some(&previous), Some(&updated)))?;

    state.db.log_audit(
        &user_id,
        "update",
        Some("transaction"),
        Some(id),
        Some(&format!(
            "amount={} -> {}, date={} -> {}",
            previous.amount,
            updated.amount,
            previous.day(),
            updated.day()
        )),
    )?;

    Ok(Json(updated))
}

/// DELETE /api/transactions/:id - Remove a transaction
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_id = get_user_id(request.headers());

    let removed = state.db.delete_transaction(&user_id, id)?;
    state
        .behavior
        .evaluate_days(&user_id, &affected_days(Some(&removed), None))?;

    state.db.log_audit(
        &user_id,
        "delete",
        Some("transaction"),
        Some(id),
        Some(&format!("amount={}, date={}", removed.amount, removed.day())),
    )?;

    Ok(Json(SuccessResponse { success: true }))
}

/// Request body for a regret verdict
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegretRequest {
    pub regret_status: RegretStatus,
}

/// PUT /api/transactions/:id/regret - Record a regret verdict
pub async fn update_regret_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Transaction>, AppError> {
    let user_id = get_user_id(request.headers());
    let req: RegretRequest = read_json(request).await?;

    let tx = state
        .behavior
        .record_regret(&user_id, id, req.regret_status, Utc::now())?;

    state.db.log_audit(
        &user_id,
        "evaluate",
        Some("transaction"),
        Some(id),
        Some(&format!("regret_status={}", req.regret_status)),
    )?;

    Ok(Json(tx))
}

/// GET /api/transactions/dashboard - Headline stats and pending evaluations
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<DashboardData>, AppError> {
    let user_id = get_user_id(request.headers());

    let transactions = state
        .db
        .find_transactions(&user_id, &TransactionFilter::new())?;
    let budgets = state.db.list_budgets(&user_id, None)?;
    let data = aggregate::dashboard(
        &transactions,
        &budgets,
        Utc::now(),
        state.behavior.config(),
    );

    state
        .db
        .log_audit(&user_id, "view", Some("dashboard"), None, None)?;

    Ok(Json(data))
}

/// GET /api/transactions/reports - Category totals and regret breakdown
pub async fn get_reports(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<ReportData>, AppError> {
    let user_id = get_user_id(request.headers());

    let transactions = state
        .db
        .find_transactions(&user_id, &TransactionFilter::new())?;
    let report = aggregate::build_report(&transactions);

    state
        .db
        .log_audit(&user_id, "view", Some("report"), None, None)?;

    Ok(Json(report))
}
