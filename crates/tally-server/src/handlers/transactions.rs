//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{AppError, AppState, MAX_PAGE_LIMIT};
use tally_core::{CreateOutcome, NewTransaction, Transaction, TransactionCategory};

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

#[derive(Serialize)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Clamp pagination parameters to sane bounds
fn clamp_page(params: &PageQuery) -> (i64, i64) {
    (params.limit.clamp(1, MAX_PAGE_LIMIT), params.offset.max(0))
}

/// POST /api/transactions - Create a transaction from raw input
///
/// Only the amount is required; the classifier fills in the rest. Responds
/// 201 for a new record and 200 when a feed-supplied external id already
/// exists (the stored record comes back untouched).
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewTransaction>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    match state.service.create(input).await? {
        CreateOutcome::Created(tx) => Ok((StatusCode::CREATED, Json(tx))),
        CreateOutcome::Duplicate(tx) => Ok((StatusCode::OK, Json(tx))),
    }
}

/// Query parameters for quick capture
#[derive(Debug, Deserialize)]
pub struct QuickQuery {
    pub amount: String,
}

/// POST /api/transactions/quick?amount= - Amount-only capture
pub async fn quick_create_transaction(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QuickQuery>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let amount: Decimal = params
        .amount
        .trim()
        .parse()
        .map_err(|_| AppError::bad_request("Invalid amount"))?;

    let outcome = state
        .service
        .create(NewTransaction::from_amount(amount))
        .await?;
    Ok((StatusCode::CREATED, Json(outcome.into_record())))
}

/// GET /api/transactions - List transactions (paginated, newest first)
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageQuery>,
) -> Result<Json<TransactionPage>, AppError> {
    let (limit, offset) = clamp_page(&params);
    let (transactions, total) = state.service.list(limit, offset)?;

    Ok(Json(TransactionPage {
        transactions,
        total,
        limit,
        offset,
    }))
}

/// GET /api/transactions/:id - Get a single transaction
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Transaction>, AppError> {
    state
        .service
        .get(id)?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Transaction not found"))
}

/// PUT /api/transactions/:id - Update and re-classify a transaction
pub async fn update_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(input): Json<NewTransaction>,
) -> Result<Json<Transaction>, AppError> {
    state
        .service
        .update(id, input)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Transaction not found"))
}

/// DELETE /api/transactions/:id - Delete a transaction
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if state.service.delete(id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Transaction not found"))
    }
}

/// Query parameters for the recent list
#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

/// GET /api/transactions/recent - Most recent transactions (default 10)
pub async fn recent_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecentQuery>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let limit = params.limit.map(|l| l.clamp(1, MAX_PAGE_LIMIT));
    Ok(Json(state.service.list_recent(limit)?))
}

/// GET /api/transactions/category/:category - Transactions in one category
///
/// An unknown category name yields an empty page rather than an error.
pub async fn transactions_by_category(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
    Query(params): Query<PageQuery>,
) -> Result<Json<TransactionPage>, AppError> {
    let (limit, offset) = clamp_page(&params);

    let Ok(category) = category.parse::<TransactionCategory>() else {
        warn!(category = %category, "Unknown category in query");
        return Ok(Json(TransactionPage {
            transactions: vec![],
            total: 0,
            limit,
            offset,
        }));
    };

    let (transactions, total) = state.service.list_by_category(category, limit, offset)?;
    Ok(Json(TransactionPage {
        transactions,
        total,
        limit,
        offset,
    }))
}

/// Query parameters for date-windowed endpoints
#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub start: String,
    pub end: String,
}

/// GET /api/transactions/date-range?start&end - Transactions in a window
pub async fn transactions_by_date_range(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DateRangeQuery>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let (start, end) = parse_window(&params.start, &params.end)?;
    Ok(Json(state.service.list_by_date_range(start, end)?))
}

/// Query parameters for search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub keyword: String,
}

/// GET /api/transactions/search?keyword= - Keyword search
pub async fn search_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    Ok(Json(state.service.search(&params.keyword)?))
}

/// Parse an inclusive window from query strings
///
/// Accepts RFC3339 datetimes or bare `YYYY-MM-DD` dates; a date-only start
/// means midnight and a date-only end means the last second of that day.
pub(crate) fn parse_window(
    start: &str,
    end: &str,
) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
    let start = parse_bound(start, false)
        .ok_or_else(|| AppError::bad_request("Invalid start date (use RFC3339 or YYYY-MM-DD)"))?;
    let end = parse_bound(end, true)
        .ok_or_else(|| AppError::bad_request("Invalid end date (use RFC3339 or YYYY-MM-DD)"))?;
    Ok((start, end))
}

fn parse_bound(s: &str, is_end: bool) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    let time = if is_end {
        NaiveTime::from_hms_opt(23, 59, 59).unwrap()
    } else {
        NaiveTime::from_hms_opt(0, 0, 0).unwrap()
    };
    Some(date.and_time(time).and_utc())
}
