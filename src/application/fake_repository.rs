// In-memory repository for exercising services and handlers
use crate::application::analytics_repository::{AnalyticsRepository, GatewayError};
use crate::application::view_state::ViewSnapshot;
use crate::domain::heatmap::HeatmapMatrix;
use crate::domain::regional::{MapData, MapStatus, MapType, RegionalDatum};
use crate::domain::risk::{DriverDirection, GeneDriver, PathogenRisk, RiskAssessment};
use crate::domain::sample::{GenePresencePanel, UploadOutcome};
use crate::domain::trends::{TrendPoint, TrendSeries};
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeRepository {
    pub fail_analysis: bool,
    pub upload: Option<UploadOutcome>,
    pub analyzed: Mutex<Vec<(String, GenePresencePanel)>>,
    pub map_requests: Mutex<Vec<(MapType, Option<String>)>>,
}

impl FakeRepository {
    pub fn analyzed(&self) -> Vec<(String, GenePresencePanel)> {
        self.analyzed.lock().unwrap().clone()
    }

    pub fn map_requests(&self) -> Vec<(MapType, Option<String>)> {
        self.map_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalyticsRepository for FakeRepository {
    async fn analyze_sample(
        &self,
        antibiotic: &str,
        genes: &GenePresencePanel,
    ) -> Result<RiskAssessment, GatewayError> {
        self.analyzed
            .lock()
            .unwrap()
            .push((antibiotic.to_string(), genes.clone()));

        if self.fail_analysis {
            return Err(GatewayError::Transport("connection refused".to_string()));
        }

        Ok(RiskAssessment {
            overall_risk: 0.82,
            risk_level: "high".to_string(),
            pathogens: vec![PathogenRisk {
                name: "E. coli".to_string(),
                risk: 0.9,
                count: None,
            }],
            genes: genes
                .is_present("blaNDM")
                .then(|| GeneDriver {
                    name: "blaNDM".to_string(),
                    score: 0.7,
                    direction: DriverDirection::Increase,
                })
                .into_iter()
                .collect(),
        })
    }

    async fn upload_fasta(&self, _file_name: &str, _contents: Vec<u8>) -> Result<UploadOutcome, GatewayError> {
        self.upload.clone().ok_or(GatewayError::Status {
            status: 500,
            body: "upload rejected".to_string(),
        })
    }

    async fn map_data(&self, map_type: MapType, antibiotic: Option<&str>) -> MapData {
        self.map_requests
            .lock()
            .unwrap()
            .push((map_type, antibiotic.map(str::to_string)));

        if map_type == MapType::GeneDistribution {
            return MapData::unavailable("Gene distribution data currently separate from regional surveillance.");
        }

        MapData {
            status: MapStatus::Success,
            data: vec![
                RegionalDatum::new("Kerala", 35.0),
                RegionalDatum::new("Delhi", 72.5),
                RegionalDatum::new("Goa", 0.0),
            ],
            message: None,
        }
    }

    async fn trends(&self, _antibiotic: Option<&str>, _pathogen: Option<&str>) -> TrendSeries {
        TrendSeries {
            points: vec![
                TrendPoint { year: "2019".to_string(), value: 41.0 },
                TrendPoint { year: "2020".to_string(), value: 47.5 },
            ],
            pathogen_distribution: Vec::new(),
        }
    }

    async fn antibiotics(&self) -> Vec<String> {
        vec!["Ciprofloxacin".to_string(), "Meropenem".to_string()]
    }

    async fn heatmap(&self) -> HeatmapMatrix {
        HeatmapMatrix {
            x_labels: vec!["E. coli".to_string()],
            y_labels: vec!["Meropenem".to_string()],
            data: vec![vec![64.0]],
        }
    }
}

/// Poll a view snapshot until `predicate` holds, panicking after ~2s
pub async fn wait_until<T, S, P>(snapshot: S, predicate: P) -> ViewSnapshot<T>
where
    S: Fn() -> ViewSnapshot<T>,
    P: Fn(&ViewSnapshot<T>) -> bool,
{
    for _ in 0..200 {
        let snap = snapshot();
        if predicate(&snap) {
            return snap;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("view never reached the expected state");
}
