//! Statistics handler

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::transactions::parse_window;
use crate::{AppError, AppState};
use tally_core::{stats, StatisticsSummary};

/// Query parameters for the statistics window
#[derive(Debug, Deserialize)]
pub struct StatisticsQuery {
    pub start: String,
    pub end: String,
}

/// GET /api/transactions/statistics?start&end - Aggregate totals for a window
///
/// A window with no matching records (or a reversed one) returns an all-zero
/// summary rather than an error.
pub async fn get_statistics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatisticsQuery>,
) -> Result<Json<StatisticsSummary>, AppError> {
    let (start, end) = parse_window(&params.start, &params.end)?;
    let summary = stats::summarize(state.service.db(), start, end)?;
    Ok(Json(summary))
}
