// Resistance trend domain models
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year: String,
    /// Percent of resistant isolates
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathogenShare {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendSeries {
    pub points: Vec<TrendPoint>,
    pub pathogen_distribution: Vec<PathogenShare>,
}

impl TrendSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
