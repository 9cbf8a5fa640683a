// Map service - Use case for the regional surveillance choropleth
use crate::application::analytics_repository::AnalyticsRepository;
use crate::application::view_scheduler::spawn_view;
use crate::application::view_state::{ViewCell, ViewEvents, ViewSnapshot};
use crate::domain::choropleth::MapPanel;
use crate::domain::color::{PaletteSet, Rgb};
use crate::domain::regional::MapType;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapFilters {
    pub map_type: MapType,
    pub antibiotic: Option<String>,
}

impl Default for MapFilters {
    fn default() -> Self {
        Self {
            map_type: MapType::AntibioticPerformance,
            antibiotic: None,
        }
    }
}

/// A partial filter change. An empty antibiotic clears the selection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapSelection {
    pub map_type: Option<MapType>,
    pub antibiotic: Option<String>,
}

impl MapFilters {
    /// Picking an antibiotic switches to the performance map; maps that
    /// cannot be narrowed to one antibiotic drop the selection.
    pub fn apply(&self, change: MapSelection) -> MapFilters {
        let mut next = self.clone();

        if let Some(antibiotic) = change.antibiotic {
            let antibiotic = antibiotic.trim();
            next.antibiotic = (!antibiotic.is_empty()).then(|| antibiotic.to_string());
            if next.antibiotic.is_some() {
                next.map_type = MapType::AntibioticPerformance;
            }
        }
        if let Some(map_type) = change.map_type {
            next.map_type = map_type;
        }
        if !next.map_type.accepts_antibiotic() {
            next.antibiotic = None;
        }

        next
    }
}

/// Static rendering inputs for the choropleth
#[derive(Debug, Clone)]
pub struct MapStyle {
    pub geography: Vec<String>,
    pub palettes: PaletteSet,
    pub no_data: Rgb,
}

#[derive(Clone)]
pub struct MapService {
    filters: Arc<watch::Sender<MapFilters>>,
    cell: Arc<ViewCell<MapPanel>>,
}

impl MapService {
    pub fn start(repository: Arc<dyn AnalyticsRepository>, style: MapStyle, events: ViewEvents) -> Self {
        let (filters, filters_rx) = watch::channel(MapFilters::default());
        let cell = Arc::new(ViewCell::new("map", events));
        let style = Arc::new(style);

        spawn_view(filters_rx, cell.clone(), move |filters: MapFilters| {
            let repository = repository.clone();
            let style = style.clone();
            async move {
                let data = repository
                    .map_data(filters.map_type, filters.antibiotic.as_deref())
                    .await;
                Ok(MapPanel::new(
                    filters.map_type,
                    filters.antibiotic,
                    data,
                    &style.geography,
                    style.palettes.palette_for(filters.map_type),
                    style.no_data,
                ))
            }
        });

        Self {
            filters: Arc::new(filters),
            cell,
        }
    }

    pub fn filters(&self) -> MapFilters {
        self.filters.borrow().clone()
    }

    pub fn select(&self, change: MapSelection) -> MapFilters {
        let mut applied = MapFilters::default();
        self.filters.send_if_modified(|current| {
            applied = current.apply(change);
            if applied == *current {
                return false;
            }
            *current = applied.clone();
            true
        });
        applied
    }

    pub fn snapshot(&self) -> ViewSnapshot<MapPanel> {
        self.cell.snapshot()
    }
}
