// HTTP request handlers
use crate::application::analytics_service::{AnalyticsFilters, AnalyticsPanel};
use crate::application::map_service::{MapFilters, MapSelection};
use crate::application::sample_service::SampleSnapshot;
use crate::application::view_state::ViewSnapshot;
use crate::domain::choropleth::MapPanel;
use crate::domain::heatmap::HeatmapView;
use crate::domain::regional::MapType;
use crate::domain::risk::{Antibiotic, RiskPanel};
use crate::infrastructure::ndjson_stream::{ndjson_response, receiver_stream};
use crate::presentation::app_state::AppState;
use crate::presentation::error::{ApiError, ApiResult};
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

#[derive(Serialize)]
pub struct CatalogResponse {
    pub antibiotics: Vec<Antibiotic>,
    /// Antibiotics the surveillance data covers, as reported by the service
    pub surveillance_antibiotics: ViewSnapshot<Vec<String>>,
    pub pathogens: Vec<String>,
    pub map_types: [MapType; 3],
}

pub async fn get_catalog(State(state): State<Arc<AppState>>) -> Json<CatalogResponse> {
    Json(CatalogResponse {
        antibiotics: state.risk.catalog().to_vec(),
        surveillance_antibiotics: state.analytics.antibiotics(),
        pathogens: state.analytics.pathogens().to_vec(),
        map_types: MapType::ALL,
    })
}

pub async fn get_sample(State(state): State<Arc<AppState>>) -> Json<SampleSnapshot> {
    Json(state.sample.snapshot())
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub sample: SampleSnapshot,
}

/// Forward the `file` field of a multipart form to the prediction service
pub async fn upload_fasta(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> ApiResult<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| rejected_upload(&state, e))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload.fasta").to_string();
        let contents = field.bytes().await.map_err(|e| rejected_upload(&state, e))?;

        let outcome = state.sample.upload_fasta(&file_name, contents.to_vec()).await?;
        return Ok(Json(UploadResponse {
            message: outcome.status_message(),
            sample: state.sample.snapshot(),
        }));
    }

    Err(ApiError::BadRequest("multipart form has no 'file' field".to_string()))
}

/// The file never reached the prediction service
fn rejected_upload(state: &AppState, e: MultipartError) -> ApiError {
    state.sample.mark_upload_failed();
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(format!("FASTA upload exceeds the {} byte limit", state.upload_limit))
    } else {
        ApiError::BadRequest(e.body_text())
    }
}

#[derive(Serialize)]
pub struct RiskResponse {
    pub selected: String,
    pub view: ViewSnapshot<RiskPanel>,
}

#[derive(Deserialize)]
pub struct RiskSelection {
    pub antibiotic: String,
}

pub async fn get_risk(State(state): State<Arc<AppState>>) -> Json<RiskResponse> {
    Json(RiskResponse {
        selected: state.risk.selected(),
        view: state.risk.snapshot(),
    })
}

pub async fn put_risk(
    State(state): State<Arc<AppState>>,
    Json(selection): Json<RiskSelection>,
) -> ApiResult<Json<RiskResponse>> {
    state.risk.select_antibiotic(&selection.antibiotic)?;
    Ok(get_risk(State(state)).await)
}

#[derive(Serialize)]
pub struct MapResponse {
    pub filters: MapFilters,
    pub view: ViewSnapshot<MapPanel>,
}

pub async fn get_map(State(state): State<Arc<AppState>>) -> Json<MapResponse> {
    Json(MapResponse {
        filters: state.map.filters(),
        view: state.map.snapshot(),
    })
}

pub async fn put_map(State(state): State<Arc<AppState>>, Json(selection): Json<MapSelection>) -> Json<MapResponse> {
    let filters = state.map.select(selection);
    Json(MapResponse {
        filters,
        view: state.map.snapshot(),
    })
}

#[derive(Serialize)]
pub struct AnalyticsResponse {
    pub filters: AnalyticsFilters,
    pub view: ViewSnapshot<AnalyticsPanel>,
}

pub async fn get_analytics(State(state): State<Arc<AppState>>) -> Json<AnalyticsResponse> {
    Json(AnalyticsResponse {
        filters: state.analytics.filters(),
        view: state.analytics.snapshot(),
    })
}

pub async fn put_analytics(
    State(state): State<Arc<AppState>>,
    Json(change): Json<AnalyticsFilters>,
) -> ApiResult<Json<AnalyticsResponse>> {
    let filters = state.analytics.select(change)?;
    Ok(Json(AnalyticsResponse {
        filters,
        view: state.analytics.snapshot(),
    }))
}

pub async fn get_heatmap(State(state): State<Arc<AppState>>) -> Json<ViewSnapshot<HeatmapView>> {
    Json(state.analytics.heatmap())
}

/// Stream view transitions as NDJSON until the client disconnects
pub async fn stream_events(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match ndjson_response(receiver_stream(state.events.subscribe())) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}
