// Route table for the dashboard API
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_analytics, get_catalog, get_heatmap, get_map, get_risk, get_sample, health_check, put_analytics, put_map,
    put_risk, stream_events, upload_fasta,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;

pub fn router(state: Arc<AppState>) -> Router {
    let upload_limit = state.upload_limit;
    Router::new()
        .route("/healthz", get(health_check))
        .route("/api/catalog", get(get_catalog))
        .route("/api/sample", get(get_sample))
        .route(
            "/api/sample/fasta",
            post(upload_fasta).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/risk", get(get_risk).put(put_risk))
        .route("/api/map", get(get_map).put(put_map))
        .route("/api/analytics", get(get_analytics).put(put_analytics))
        .route("/api/analytics/heatmap", get(get_heatmap))
        .route("/api/events", get(stream_events))
        .with_state(state)
}
