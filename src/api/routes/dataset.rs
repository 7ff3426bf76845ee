//! Dataset Routes
//!
//! - GET /api/v1/drugs - Series names, colours and the month axis
//! - GET /api/v1/rows - Rows for a selection
//! - GET /api/v1/summary - Summary figures for a selection

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::analytics::{filter_rows, Summary};
use crate::api::dto::{DrugsResponse, RowsResponse, SelectionParams, SummaryResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;

/// GET /api/v1/drugs
pub async fn list_drugs(State(state): State<Arc<AppState>>) -> Json<DrugsResponse> {
    Json(DrugsResponse {
        drugs: state.dataset.palette(),
        months: state.dataset.months().to_vec(),
        dataset_url: state.config.ui.dataset_url.clone(),
    })
}

/// GET /api/v1/rows?drugs=a,b
pub async fn list_rows(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SelectionParams>,
) -> ApiResult<Json<RowsResponse>> {
    let selection = params.selection(state.dataset)?;
    let rows: Vec<_> = filter_rows(state.dataset, &selection)
        .into_iter()
        .cloned()
        .collect();

    tracing::debug!(drugs = %selection.to_query(state.dataset), rows = rows.len(), "Rows served");

    Ok(Json(RowsResponse {
        drugs: selection
            .ordered(state.dataset)
            .into_iter()
            .map(str::to_string)
            .collect(),
        count: rows.len(),
        rows,
    }))
}

/// GET /api/v1/summary?drugs=a,b
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SelectionParams>,
) -> ApiResult<Json<SummaryResponse>> {
    let selection = params.selection(state.dataset)?;
    let summary = Summary::for_selection(state.dataset, &selection);

    Ok(Json(SummaryResponse {
        drugs: selection
            .ordered(state.dataset)
            .into_iter()
            .map(str::to_string)
            .collect(),
        summary,
    }))
}
