// Choropleth map view model
use super::color::{ColorScale, Palette, Rgb};
use super::regional::{MapData, MapStatus, MapType, RegionalDatum};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionTooltip {
    pub name: String,
    pub value: Option<f64>,
    pub detail: String,
    pub isolates: Option<u64>,
    pub info: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethRegion {
    pub name: String,
    pub fill: Rgb,
    pub has_data: bool,
    pub tooltip: RegionTooltip,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub stops: Vec<Rgb>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethView {
    pub regions: Vec<ChoroplethRegion>,
    pub legend: Legend,
}

impl ChoroplethView {
    /// Color every region of the geography, then any extra regions the data names.
    pub fn build(data: &[RegionalDatum], geography: &[String], palette: &Palette, no_data: Rgb) -> Self {
        let scale = ColorScale::from_values(data.iter().filter(|d| d.has_data()).map(|d| d.value), palette);
        let by_region: HashMap<&str, &RegionalDatum> = data.iter().map(|d| (d.region.as_str(), d)).collect();

        let mut regions: Vec<ChoroplethRegion> = geography
            .iter()
            .map(|name| region(name, by_region.get(name.as_str()).copied(), &scale, no_data))
            .collect();

        for datum in data {
            if !geography.iter().any(|g| g == &datum.region) {
                regions.push(region(&datum.region, Some(datum), &scale, no_data));
            }
        }

        let (min, max) = scale.domain();
        Self {
            regions,
            legend: Legend {
                label: palette.label().to_string(),
                min: min.round(),
                max: max.round(),
                stops: palette.stops().to_vec(),
            },
        }
    }
}

fn region(name: &str, datum: Option<&RegionalDatum>, scale: &ColorScale, no_data: Rgb) -> ChoroplethRegion {
    match datum.filter(|d| d.has_data()) {
        Some(d) => ChoroplethRegion {
            name: name.to_string(),
            fill: scale.color(d.value),
            has_data: true,
            tooltip: RegionTooltip {
                name: name.to_string(),
                value: Some(d.value),
                detail: d
                    .metadata
                    .detail
                    .clone()
                    .unwrap_or_else(|| format!("{}%", d.value)),
                isolates: d.metadata.isolates.filter(|n| *n > 0),
                info: d.metadata.info.clone(),
            },
        },
        None => ChoroplethRegion {
            name: name.to_string(),
            fill: no_data,
            has_data: false,
            tooltip: RegionTooltip {
                name: name.to_string(),
                value: None,
                detail: "No data available".to_string(),
                isolates: None,
                info: None,
            },
        },
    }
}

pub const MAP_UNAVAILABLE_MESSAGE: &str = "Regional metadata missing.";

/// Map panel: either a rendered choropleth or the reason it is unavailable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPanel {
    pub map_type: MapType,
    pub antibiotic: Option<String>,
    pub description: String,
    pub status: MapStatus,
    pub message: Option<String>,
    pub choropleth: Option<ChoroplethView>,
}

impl MapPanel {
    pub fn new(
        map_type: MapType,
        antibiotic: Option<String>,
        map_data: MapData,
        geography: &[String],
        palette: &Palette,
        no_data: Rgb,
    ) -> Self {
        let description = describe(map_type, antibiotic.as_deref());
        match map_data.status {
            MapStatus::Unavailable => Self {
                map_type,
                antibiotic,
                description,
                status: MapStatus::Unavailable,
                message: Some(map_data.message.unwrap_or_else(|| MAP_UNAVAILABLE_MESSAGE.to_string())),
                choropleth: None,
            },
            MapStatus::Success => Self {
                map_type,
                antibiotic,
                description,
                status: MapStatus::Success,
                choropleth: Some(ChoroplethView::build(&map_data.data, geography, palette, no_data)),
                message: map_data.message,
            },
        }
    }
}

fn describe(map_type: MapType, antibiotic: Option<&str>) -> String {
    match (map_type, antibiotic) {
        (MapType::AntibioticPerformance, Some(ab)) => format!("Resistance rates for {} across Indian states.", ab),
        (MapType::AntibioticPerformance, None) => "Overall antibiotic resistance rates across Indian states.".to_string(),
        (MapType::CarbapenemResistance, _) => {
            "Carbapenem (last-resort antibiotic) resistance; high rates signal critical AMR threat zones.".to_string()
        }
        (MapType::GeneDistribution, _) => "Distribution of resistance genes across Indian states.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::regional::RegionMetadata;

    fn palette() -> Palette {
        Palette::new(
            "Resistance Rate".to_string(),
            vec![Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)],
        )
        .unwrap()
    }

    fn geography() -> Vec<String> {
        ["Kerala", "Goa", "Assam"].iter().map(|s| s.to_string()).collect()
    }

    const GREY: Rgb = Rgb::new(0xe0, 0xe0, 0xe0);

    #[test]
    fn test_absent_regions_use_no_data_fill() {
        let data = vec![
            RegionalDatum {
                region: "Kerala".to_string(),
                value: 40.0,
                metadata: RegionMetadata {
                    isolates: Some(120),
                    estimated: false,
                    detail: Some("Resistance: 40%".to_string()),
                    info: None,
                },
            },
            RegionalDatum::new("Assam", 80.0),
        ];

        let view = ChoroplethView::build(&data, &geography(), &palette(), GREY);
        assert_eq!(view.regions.len(), 3);

        let kerala = &view.regions[0];
        assert!(kerala.has_data);
        assert_eq!(kerala.fill, Rgb::new(0, 0, 0));
        assert_eq!(kerala.tooltip.isolates, Some(120));
        assert_eq!(kerala.tooltip.detail, "Resistance: 40%");

        let goa = &view.regions[1];
        assert!(!goa.has_data);
        assert_eq!(goa.fill, GREY);
        assert_eq!(goa.tooltip.detail, "No data available");

        let assam = &view.regions[2];
        assert_eq!(assam.fill, Rgb::new(255, 255, 255));
        assert_eq!(assam.tooltip.detail, "80%");

        assert_eq!(view.legend.min, 40.0);
        assert_eq!(view.legend.max, 80.0);
    }

    #[test]
    fn test_sentinel_and_unknown_regions() {
        let data = vec![RegionalDatum::new("Goa", -1.0), RegionalDatum::new("Atlantis", 10.0)];

        let view = ChoroplethView::build(&data, &geography(), &palette(), GREY);
        assert_eq!(view.regions.len(), 4);
        assert_eq!(view.regions[1].fill, GREY);
        assert_eq!(view.regions[3].name, "Atlantis");
        assert!(view.regions[3].has_data);
    }

    #[test]
    fn test_empty_dataset_legend_defaults() {
        let view = ChoroplethView::build(&[], &geography(), &palette(), GREY);
        assert!(view.regions.iter().all(|r| !r.has_data));
        assert_eq!((view.legend.min, view.legend.max), (0.0, 100.0));
    }

    #[test]
    fn test_unavailable_panel_keeps_message() {
        let panel = MapPanel::new(
            MapType::CarbapenemResistance,
            None,
            MapData::unavailable("No carbapenem data available."),
            &geography(),
            &palette(),
            GREY,
        );
        assert_eq!(panel.status, MapStatus::Unavailable);
        assert!(panel.choropleth.is_none());
        assert_eq!(panel.message.as_deref(), Some("No carbapenem data available."));
    }
}
