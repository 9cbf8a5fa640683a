// Regional surveillance domain models
use serde::{Deserialize, Serialize};

/// Sentinel carried in place of a value when a region or cell has no data.
pub const NO_DATA: f64 = -1.0;

pub fn is_no_data(value: f64) -> bool {
    value == NO_DATA || value.is_nan()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapType {
    AntibioticPerformance,
    CarbapenemResistance,
    GeneDistribution,
}

impl MapType {
    pub const ALL: [MapType; 3] = [
        MapType::AntibioticPerformance,
        MapType::CarbapenemResistance,
        MapType::GeneDistribution,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MapType::AntibioticPerformance => "antibiotic_performance",
            MapType::CarbapenemResistance => "carbapenem_resistance",
            MapType::GeneDistribution => "gene_distribution",
        }
    }

    /// Only the performance map can be narrowed to a single antibiotic
    pub fn accepts_antibiotic(&self) -> bool {
        matches!(self, MapType::AntibioticPerformance)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegionMetadata {
    pub isolates: Option<u64>,
    pub estimated: bool,
    pub detail: Option<String>,
    pub info: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalDatum {
    pub region: String,
    pub value: f64,
    pub metadata: RegionMetadata,
}

impl RegionalDatum {
    pub fn new(region: impl Into<String>, value: f64) -> Self {
        Self {
            region: region.into(),
            value,
            metadata: RegionMetadata::default(),
        }
    }

    pub fn has_data(&self) -> bool {
        !is_no_data(self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MapStatus {
    Success,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapData {
    pub status: MapStatus,
    pub data: Vec<RegionalDatum>,
    pub message: Option<String>,
}

impl MapData {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            status: MapStatus::Unavailable,
            data: Vec::new(),
            message: Some(message.into()),
        }
    }
}

/// Highest-resistance regions first, at most `limit` of them.
///
/// Non-positive values count as missing rather than zero resistance. The
/// sort is stable so ties keep their input order.
pub fn top_regions(data: &[RegionalDatum], limit: usize) -> Vec<RegionalDatum> {
    let mut ranked: Vec<RegionalDatum> = data.iter().filter(|d| d.value > 0.0).cloned().collect();
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
    ranked.truncate(limit);
    ranked
}
