//! Chart Routes
//!
//! - GET /api/v1/chart - Chart geometry as JSON (204 when nothing is selected)
//! - GET /api/v1/chart.svg - Rendered SVG (placeholder when nothing is selected)

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::analytics::line_chart;
use crate::api::dto::SelectionParams;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::chart::{svg, ChartLayout};

/// Query parameters for the SVG endpoint
#[derive(Debug, Default, Deserialize)]
pub struct SvgParams {
    #[serde(default)]
    pub drugs: Option<String>,
    /// Draw the tooltip for one point, as `Drug@YYYY-MM`
    #[serde(default)]
    pub hover: Option<String>,
}

/// GET /api/v1/chart?drugs=a,b
pub async fn chart_geometry(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SelectionParams>,
) -> ApiResult<Response> {
    let selection = params.selection(state.dataset)?;

    Ok(match line_chart(state.dataset, &selection) {
        Some(chart) => Json(chart.geometry()).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

/// GET /api/v1/chart.svg?drugs=a,b&hover=Fentanyl@2023-08
pub async fn chart_svg(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SvgParams>,
) -> ApiResult<Response> {
    let selection = SelectionParams {
        drugs: params.drugs,
    }
    .selection(state.dataset)?;

    let document = match line_chart(state.dataset, &selection) {
        Some(chart) => {
            let tooltip = params
                .hover
                .as_deref()
                .map(|hover| chart.tooltip_for(hover))
                .transpose()
                .map_err(|e| ApiError::Validation(e.to_string()))?;
            svg::render(&chart, tooltip.as_ref())
        }
        None => svg::render_placeholder(&ChartLayout::default(), svg::EMPTY_SELECTION_MESSAGE),
    };

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "image/svg+xml; charset=utf-8")],
        document,
    )
        .into_response())
}
