// Risk assessment domain models
use serde::{Deserialize, Serialize, Serializer};

/// An antibiotic the risk overview can be run against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Antibiotic {
    pub id: String,
    pub name: String,
    pub class: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverDirection {
    Increase,
    Decrease,
}

impl DriverDirection {
    /// Anything other than "Resistant" reads as susceptibility, including
    /// missing or unrecognised values.
    pub fn from_server(direction: Option<&str>) -> Self {
        match direction {
            Some("Resistant") => DriverDirection::Increase,
            Some("Susceptible") | None => DriverDirection::Decrease,
            Some(other) => {
                tracing::debug!("Unrecognised gene driver direction {:?}, treating as susceptible", other);
                DriverDirection::Decrease
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneDriver {
    pub name: String,
    pub score: f64,
    pub direction: DriverDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathogenRisk {
    pub name: String,
    pub risk: f64,
    /// Isolate counts are not part of an inference result
    #[serde(serialize_with = "count_or_na")]
    pub count: Option<u64>,
}

fn count_or_na<S: Serializer>(count: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
    match count {
        Some(n) => serializer.serialize_u64(*n),
        None => serializer.serialize_str("N/A"),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub overall_risk: f64,
    pub risk_level: String,
    pub pathogens: Vec<PathogenRisk>,
    pub genes: Vec<GeneDriver>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

impl RiskBand {
    pub fn from_score(score: f64) -> Self {
        if score < 0.33 {
            RiskBand::Low
        } else if score < 0.66 {
            RiskBand::Moderate
        } else {
            RiskBand::High
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathogenBar {
    pub name: String,
    pub risk_pct: f64,
}

pub const NO_DRIVERS_NOTE: &str = "No significant gene drivers detected for this sample.";

/// Everything the risk overview, pathogen comparison and gene driver
/// panels render for one antibiotic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskPanel {
    pub antibiotic: String,
    pub assessment: RiskAssessment,
    pub band: RiskBand,
    pub overall_pct: f64,
    pub pathogen_bars: Vec<PathogenBar>,
    pub drivers_note: Option<&'static str>,
}

impl RiskPanel {
    pub fn new(antibiotic: String, assessment: RiskAssessment) -> Self {
        let band = RiskBand::from_score(assessment.overall_risk);
        let overall_pct = assessment.overall_risk * 100.0;
        let pathogen_bars = assessment
            .pathogens
            .iter()
            .map(|p| PathogenBar {
                name: p.name.clone(),
                risk_pct: p.risk * 100.0,
            })
            .collect();
        let drivers_note = assessment.genes.is_empty().then_some(NO_DRIVERS_NOTE);

        Self {
            antibiotic,
            assessment,
            band,
            overall_pct,
            pathogen_bars,
            drivers_note,
        }
    }
}
