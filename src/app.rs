use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/meta", get(handlers::get_meta))
        .route("/api/chart", get(handlers::get_chart))
        .route("/api/chart.csv", get(handlers::get_chart_csv))
        .with_state(state)
}
