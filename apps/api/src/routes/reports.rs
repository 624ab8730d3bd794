//! Sales report handlers.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use kasir_core::validation::parse_report_range;
use kasir_core::SalesSummary;
use serde::Deserialize;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// GET /api/report/today (alias /api/report/hari-ini)
pub async fn today(State(state): State<AppState>) -> ApiResult<Json<SalesSummary>> {
    let summary = state.db.reports().today_summary().await?;
    Ok(Json(summary))
}

/// GET /api/report?start_date=YYYY-MM-DD&end_date=YYYY-MM-DD
pub async fn range(
    State(state): State<AppState>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> ApiResult<Json<SalesSummary>> {
    let Query(query) = query?;
    let range = parse_report_range(
        query.start_date.as_deref().unwrap_or_default(),
        query.end_date.as_deref().unwrap_or_default(),
    )?;
    let summary = state.db.reports().range_summary(range).await?;
    Ok(Json(summary))
}
