// Wire types for the prediction/analytics service JSON API
use crate::domain::sample::GenePresencePanel;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct AnalysisRequest<'a> {
    pub antibiotic: &'a str,
    pub gene_presence: &'a GenePresencePanel,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisResponse {
    pub overall_risk_score: f64,
    pub risk_category: String,
    #[serde(default)]
    pub pathogen_breakdown: Vec<PathogenBreakdown>,
    /// Gene name to `{score, direction}`, kept in server order
    #[serde(default)]
    pub gene_drivers: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct PathogenBreakdown {
    pub name: String,
    pub risk: f64,
}

#[derive(Debug, Deserialize)]
pub struct GeneDriverEntry {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub direction: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    #[serde(default)]
    pub genes: Option<std::collections::BTreeMap<String, u8>>,
}

#[derive(Debug, Deserialize)]
pub struct MapResponse {
    pub status: String,
    #[serde(default)]
    pub data: Vec<RegionEntry>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegionEntry {
    pub region: String,
    pub value: Option<f64>,
    #[serde(default)]
    pub metadata: Option<RegionMetadataEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegionMetadataEntry {
    #[serde(default)]
    pub isolates: Option<u64>,
    #[serde(default)]
    pub estimated: bool,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub info: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrendsResponse {
    /// Years; the service sends integers but strings are accepted too
    #[serde(default)]
    pub labels: Vec<serde_json::Value>,
    #[serde(default)]
    pub datasets: Vec<TrendDataset>,
    #[serde(default)]
    pub pathogen_distribution: Vec<PathogenCount>,
}

#[derive(Debug, Deserialize)]
pub struct TrendDataset {
    #[serde(default)]
    pub data: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
pub struct PathogenCount {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Deserialize)]
pub struct AntibioticsResponse {
    #[serde(default)]
    pub antibiotics: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct HeatmapResponse {
    #[serde(default)]
    pub x_labels: Vec<String>,
    #[serde(default)]
    pub y_labels: Vec<String>,
    /// Resistance fractions; -1 or null where there is no data
    #[serde(default)]
    pub data: Vec<Vec<Option<f64>>>,
}
