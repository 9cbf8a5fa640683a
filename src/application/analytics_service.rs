// Analytics service - Trends, regional ranking and the resistance matrix
use crate::application::analytics_repository::AnalyticsRepository;
use crate::application::error::DashboardError;
use crate::application::view_scheduler::{spawn_once, spawn_view};
use crate::application::view_state::{ViewCell, ViewEvents, ViewSnapshot};
use crate::domain::heatmap::HeatmapView;
use crate::domain::regional::{MapType, RegionalDatum, top_regions};
use crate::domain::trends::TrendSeries;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsFilters {
    #[serde(default)]
    pub antibiotic: Option<String>,
    #[serde(default)]
    pub pathogen: Option<String>,
}

impl AnalyticsFilters {
    fn normalized(self) -> Self {
        let clean = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            antibiotic: clean(self.antibiotic),
            pathogen: clean(self.pathogen),
        }
    }

    pub fn trend_title(&self) -> String {
        let subject = match &self.antibiotic {
            Some(ab) => format!("{} ", ab),
            None => "Aggregate ".to_string(),
        };
        let pathogen = self
            .pathogen
            .as_ref()
            .map(|p| format!(" ({})", p))
            .unwrap_or_default();
        format!("{}Resistance Trends{}", subject, pathogen)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsPanel {
    pub filters: AnalyticsFilters,
    pub trend_title: String,
    pub trends: TrendSeries,
    pub top_regions: Vec<RegionalDatum>,
}

#[derive(Clone)]
pub struct AnalyticsService {
    pathogens: Arc<Vec<String>>,
    filters: Arc<watch::Sender<AnalyticsFilters>>,
    panel: Arc<ViewCell<AnalyticsPanel>>,
    heatmap: Arc<ViewCell<HeatmapView>>,
    antibiotics: Arc<ViewCell<Vec<String>>>,
}

impl AnalyticsService {
    /// Start the analytics views. The antibiotic list and heatmap load once,
    /// concurrently; trends and the regional ranking follow the filters.
    pub fn start(
        repository: Arc<dyn AnalyticsRepository>,
        pathogens: Vec<String>,
        top_n: usize,
        events: ViewEvents,
    ) -> Self {
        let (filters, filters_rx) = watch::channel(AnalyticsFilters::default());
        let panel = Arc::new(ViewCell::new("analytics", events.clone()));
        let heatmap = Arc::new(ViewCell::new("heatmap", events.clone()));
        let antibiotics = Arc::new(ViewCell::new("antibiotics", events));

        let repo = repository.clone();
        spawn_once(antibiotics.clone(), async move { Ok(repo.antibiotics().await) });

        let repo = repository.clone();
        spawn_once(heatmap.clone(), async move {
            let matrix = repo.heatmap().await;
            Ok(HeatmapView::from_matrix(&matrix))
        });

        spawn_view(filters_rx, panel.clone(), move |filters: AnalyticsFilters| {
            let repository = repository.clone();
            async move {
                let antibiotic = filters.antibiotic.as_deref();
                let (trends, regional) = futures::join!(
                    repository.trends(antibiotic, filters.pathogen.as_deref()),
                    repository.map_data(MapType::AntibioticPerformance, antibiotic),
                );

                Ok(AnalyticsPanel {
                    trend_title: filters.trend_title(),
                    top_regions: top_regions(&regional.data, top_n),
                    trends,
                    filters,
                })
            }
        });

        Self {
            pathogens: Arc::new(pathogens),
            filters: Arc::new(filters),
            panel,
            heatmap,
            antibiotics,
        }
    }

    pub fn pathogens(&self) -> &[String] {
        &self.pathogens
    }

    pub fn filters(&self) -> AnalyticsFilters {
        self.filters.borrow().clone()
    }

    pub fn select(&self, change: AnalyticsFilters) -> Result<AnalyticsFilters, DashboardError> {
        let next = change.normalized();
        if let Some(pathogen) = &next.pathogen {
            if !self.pathogens.iter().any(|p| p == pathogen) {
                return Err(DashboardError::UnknownPathogen(pathogen.clone()));
            }
        }

        self.filters.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next.clone();
            true
        });
        Ok(next)
    }

    pub fn snapshot(&self) -> ViewSnapshot<AnalyticsPanel> {
        self.panel.snapshot()
    }

    pub fn heatmap(&self) -> ViewSnapshot<HeatmapView> {
        self.heatmap.snapshot()
    }

    pub fn antibiotics(&self) -> ViewSnapshot<Vec<String>> {
        self.antibiotics.snapshot()
    }
}
