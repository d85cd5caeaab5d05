use crate::dashboard::{Chart, ChartRequest, MIN_SPAN_DAYS};
use crate::errors::AppError;
use crate::models::{ChartPoint, ChartQuery, ChartResponse, MetaResponse};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use tracing::{debug, warn};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(&state.dashboard.meta()))
}

pub async fn get_meta(State(state): State<AppState>) -> Json<MetaResponse> {
    Json(state.dashboard.meta())
}

pub async fn get_chart(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ChartResponse>, AppError> {
    let request = to_request(query)?;
    let chart = build_chart(&state, &request)?;

    Ok(Json(ChartResponse {
        title: chart.title,
        kind: request.kind,
        country: request.country,
        averaged: request.average,
        columns: chart.columns,
        points: chart
            .rows
            .into_iter()
            .map(|(date, value)| ChartPoint { date, value })
            .collect(),
    }))
}

pub async fn get_chart_csv(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Result<impl IntoResponse, AppError> {
    let request = to_request(query)?;
    let chart = build_chart(&state, &request)?;
    let body = chart_csv(&chart).map_err(AppError::internal)?;
    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], body))
}

fn build_chart(state: &AppState, request: &ChartRequest) -> Result<Chart, AppError> {
    let chart = state.dashboard.chart(request).inspect_err(|err| {
        warn!(kind = %request.kind, country = %request.country, "chart rejected: {err}");
    })?;
    debug!(kind = %request.kind, country = %request.country, rows = chart.rows.len(), "chart built");
    Ok(chart)
}

/// Enforces the picker's minimum span when both bounds are given.
fn to_request(query: ChartQuery) -> Result<ChartRequest, AppError> {
    let country = query.country.trim();
    if country.is_empty() {
        return Err(AppError::bad_request("country must not be empty"));
    }
    if let (Some(start), Some(end)) = (query.start, query.end) {
        if end.signed_duration_since(start).num_days() < MIN_SPAN_DAYS {
            return Err(AppError::bad_request(format!(
                "end date must be at least {MIN_SPAN_DAYS} days after start date"
            )));
        }
    }

    Ok(ChartRequest {
        kind: query.kind,
        country: country.to_string(),
        start: query.start,
        end: query.end,
        average: query.average,
    })
}

fn chart_csv(chart: &Chart) -> Result<Vec<u8>, csv::Error> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(&chart.columns)?;
    for (date, value) in &chart.rows {
        wtr.write_record([date.to_string(), value.to_string()])?;
    }
    wtr.into_inner().map_err(|err| err.into_error().into())
}
