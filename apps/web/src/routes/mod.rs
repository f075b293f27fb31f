pub mod health;
pub mod report;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Browser pages
        .route("/", get(report::handle_index))
        .route("/report", post(report::handle_report_page))
        // JSON API
        .route("/api/v1/report", post(report::handle_report_json))
        .route("/api/v1/present", post(report::handle_present))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
