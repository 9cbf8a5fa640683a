// HTTP client for the prediction/analytics service
use crate::application::analytics_repository::{AnalyticsRepository, GatewayError};
use crate::domain::heatmap::HeatmapMatrix;
use crate::domain::regional::{MapData, MapType};
use crate::domain::risk::RiskAssessment;
use crate::domain::sample::{GenePresencePanel, UploadOutcome};
use crate::domain::trends::TrendSeries;
use crate::infrastructure::response_mapper::{
    analysis_to_domain, heatmap_to_domain, map_to_domain, trends_to_domain, upload_to_domain,
};
use crate::infrastructure::wire::{
    AnalysisRequest, AnalysisResponse, AntibioticsResponse, HeatmapResponse, MapResponse, TrendsResponse,
    UploadResponse,
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Message shown when a map request fails before the service answers
pub const MAP_FALLBACK_MESSAGE: &str = "Data unavailable";

#[derive(Debug, Clone)]
pub struct AnalyticsClient {
    client: reqwest::Client,
    base_url: String,
}

impl AnalyticsClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, GatewayError> {
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }
}

fn transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Transport("request timed out".to_string())
    } else if e.is_connect() {
        GatewayError::Transport(format!("service unreachable: {}", e))
    } else {
        GatewayError::Transport(e.to_string())
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GatewayError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GatewayError::Status {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| GatewayError::Decode(e.to_string()))
}

/// Build a query from the filters that are actually set
fn present<'a>(params: &[(&'a str, Option<&'a str>)]) -> Vec<(&'a str, &'a str)> {
    params
        .iter()
        .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (*key, v)))
        .collect()
}

#[async_trait]
impl AnalyticsRepository for AnalyticsClient {
    async fn analyze_sample(
        &self,
        antibiotic: &str,
        genes: &GenePresencePanel,
    ) -> Result<RiskAssessment, GatewayError> {
        let request = AnalysisRequest {
            antibiotic,
            gene_presence: genes,
        };

        let response = self
            .client
            .post(self.url("/prediction/analyze"))
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let body: AnalysisResponse = decode(response).await?;
        tracing::debug!(
            "Analysis for {}: {} ({} gene drivers)",
            antibiotic,
            body.risk_category,
            body.gene_drivers.len()
        );
        analysis_to_domain(body)
    }

    async fn upload_fasta(&self, file_name: &str, contents: Vec<u8>) -> Result<UploadOutcome, GatewayError> {
        let size = contents.len();
        let form = Form::new().part("file", Part::bytes(contents).file_name(file_name.to_string()));

        let response = self
            .client
            .post(self.url("/prediction/upload_fasta"))
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let body: UploadResponse = decode(response).await?;
        tracing::info!("Uploaded {} ({} bytes), service status {}", file_name, size, body.status);
        Ok(upload_to_domain(body))
    }

    async fn map_data(&self, map_type: MapType, antibiotic: Option<&str>) -> MapData {
        let path = format!("/maps/{}", urlencoding::encode(map_type.as_str()));
        let query = present(&[("antibiotic", antibiotic)]);

        match self.get_json::<MapResponse>(&path, &query).await {
            Ok(body) => map_to_domain(body),
            Err(e) => {
                tracing::warn!("Map data for {} unavailable: {}", map_type.as_str(), e);
                MapData::unavailable(MAP_FALLBACK_MESSAGE)
            }
        }
    }

    async fn trends(&self, antibiotic: Option<&str>, pathogen: Option<&str>) -> TrendSeries {
        let query = present(&[("antibiotic", antibiotic), ("pathogen", pathogen)]);

        match self.get_json::<TrendsResponse>("/maps/analytics/trends", &query).await {
            Ok(body) => trends_to_domain(body),
            Err(e) => {
                tracing::warn!("Failed to fetch trends: {}", e);
                TrendSeries::default()
            }
        }
    }

    async fn antibiotics(&self) -> Vec<String> {
        match self.get_json::<AntibioticsResponse>("/maps/antibiotics", &[]).await {
            Ok(body) => body.antibiotics,
            Err(e) => {
                tracing::warn!("Failed to fetch antibiotics: {}", e);
                Vec::new()
            }
        }
    }

    async fn heatmap(&self) -> HeatmapMatrix {
        match self.get_json::<HeatmapResponse>("/maps/analytics/heatmap", &[]).await {
            Ok(body) => heatmap_to_domain(body),
            Err(e) => {
                tracing::warn!("Failed to fetch heatmap: {}", e);
                HeatmapMatrix::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::regional::MapStatus;
    use crate::domain::risk::DriverDirection;
    use axum::extract::{Multipart, Path, Query};
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use std::collections::HashMap;

    async fn analyze(Json(body): Json<Value>) -> Json<Value> {
        assert_eq!(body["gene_presence"]["blaNDM"], 1);
        Json(json!({
            "overall_risk_score": 0.82,
            "risk_category": "high",
            "pathogen_breakdown": [{"name": "E. coli", "risk": 0.9}],
            "gene_drivers": {"blaNDM": {"score": 0.7, "direction": "Resistant"}},
            "antibiotic": body["antibiotic"],
        }))
    }

    async fn upload(mut multipart: Multipart) -> Result<Json<Value>, StatusCode> {
        while let Some(field) = multipart.next_field().await.map_err(|_| StatusCode::BAD_REQUEST)? {
            if field.name() != Some("file") {
                continue;
            }
            let name = field.file_name().unwrap_or_default().to_string();
            let text = field.text().await.map_err(|_| StatusCode::BAD_REQUEST)?;
            if text.contains("blaKPC") {
                return Ok(Json(json!({"filename": name, "status": "success", "genes": {"blaKPC": 1}})));
            }
            return Ok(Json(json!({"filename": name, "status": "validation_phase"})));
        }
        Err(StatusCode::BAD_REQUEST)
    }

    async fn map(Path(map_type): Path<String>, Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        let message = params.get("antibiotic").cloned().unwrap_or_else(|| "Overall".to_string());
        Json(json!({
            "map_type": map_type,
            "status": "success",
            "data": [{"region": "Kerala", "value": 35.5, "metadata": {"isolates": 20}}],
            "message": message,
        }))
    }

    async fn spawn_backend() -> String {
        let api = Router::new()
            .route("/prediction/analyze", post(analyze))
            .route("/prediction/upload_fasta", post(upload))
            .route("/maps/antibiotics", get(|| async { Json(json!({"antibiotics": ["Ciprofloxacin"]})) }))
            .route(
                "/maps/analytics/trends",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            )
            .route(
                "/maps/analytics/heatmap",
                get(|| async { Json(json!({"x_labels": ["E. coli"], "y_labels": ["Meropenem"], "data": [[0.5]]})) }),
            )
            .route("/maps/:map_type", get(map));
        let app = Router::new().nest("/api/v1", api);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api/v1/", addr)
    }

    async fn unreachable_client() -> AnalyticsClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        AnalyticsClient::new(&format!("http://{}/api/v1", addr), Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_analyze_sample() {
        let client = AnalyticsClient::new(&spawn_backend().await, Duration::from_secs(5)).unwrap();
        let genes = GenePresencePanel::with_present(["blaNDM"]);

        let assessment = client.analyze_sample("meropenem", &genes).await.unwrap();
        assert_eq!(assessment.overall_risk, 0.82);
        assert_eq!(assessment.pathogens[0].count, None);
        assert_eq!(assessment.genes[0].direction, DriverDirection::Increase);
    }

    #[tokio::test]
    async fn test_upload_fasta_multipart() {
        let client = AnalyticsClient::new(&spawn_backend().await, Duration::from_secs(5)).unwrap();

        let outcome = client
            .upload_fasta("isolate.fasta", b">contig_1 blaKPC\nACGT\n".to_vec())
            .await
            .unwrap();
        assert_eq!(outcome, UploadOutcome::Extracted(GenePresencePanel::with_present(["blaKPC"])));

        let outcome = client.upload_fasta("reads.fa", b">contig_2\nACGT\n".to_vec()).await.unwrap();
        assert_eq!(outcome, UploadOutcome::ValidationPhase);
    }

    #[tokio::test]
    async fn test_read_paths() {
        let client = AnalyticsClient::new(&spawn_backend().await, Duration::from_secs(5)).unwrap();

        let map = client.map_data(MapType::AntibioticPerformance, Some("Meropenem")).await;
        assert_eq!(map.status, MapStatus::Success);
        assert_eq!(map.message.as_deref(), Some("Meropenem"));
        assert_eq!(map.data[0].metadata.isolates, Some(20));

        assert_eq!(client.antibiotics().await, vec!["Ciprofloxacin".to_string()]);
        assert_eq!(client.heatmap().await.data, vec![vec![50.0]]);

        // a 500 from the service degrades to an empty series
        assert!(client.trends(Some("Meropenem"), None).await.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        let client = unreachable_client().await;

        let map = client.map_data(MapType::CarbapenemResistance, None).await;
        assert_eq!(map.status, MapStatus::Unavailable);
        assert!(map.data.is_empty());
        assert_eq!(map.message.as_deref(), Some(MAP_FALLBACK_MESSAGE));

        assert!(client.trends(None, None).await.is_empty());
        assert!(client.antibiotics().await.is_empty());
        assert!(client.heatmap().await.is_empty());

        let err = client
            .analyze_sample("meropenem", &GenePresencePanel::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
        assert!(client.upload_fasta("a.fasta", Vec::new()).await.is_err());
    }

    #[test]
    fn test_present_skips_blank_filters() {
        let query = present(&[("antibiotic", Some("")), ("pathogen", Some("E. coli")), ("x", None)]);
        assert_eq!(query, vec![("pathogen", "E. coli")]);
    }
}
