// Repository trait for the prediction/analytics service
use crate::domain::heatmap::HeatmapMatrix;
use crate::domain::regional::{MapData, MapType};
use crate::domain::risk::RiskAssessment;
use crate::domain::sample::{GenePresencePanel, UploadOutcome};
use crate::domain::trends::TrendSeries;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request to prediction service failed: {0}")]
    Transport(String),

    #[error("prediction service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode prediction service response: {0}")]
    Decode(String),
}

/// Primary-flow calls (analysis, upload) return errors to the caller.
/// Read-path calls never fail: they degrade to an empty but valid value.
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    async fn analyze_sample(
        &self,
        antibiotic: &str,
        genes: &GenePresencePanel,
    ) -> Result<RiskAssessment, GatewayError>;

    async fn upload_fasta(&self, file_name: &str, contents: Vec<u8>) -> Result<UploadOutcome, GatewayError>;

    async fn map_data(&self, map_type: MapType, antibiotic: Option<&str>) -> MapData;

    async fn trends(&self, antibiotic: Option<&str>, pathogen: Option<&str>) -> TrendSeries;

    async fn antibiotics(&self) -> Vec<String>;

    async fn heatmap(&self) -> HeatmapMatrix;
}
