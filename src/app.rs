use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/chart.svg", get(handlers::get_chart))
        .route("/api/counter", get(handlers::get_counter))
        .route("/api/periods", get(handlers::get_periods))
        .with_state(state)
}
