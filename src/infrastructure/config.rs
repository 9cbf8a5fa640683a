use crate::application::map_service::MapStyle;
use crate::domain::color::{Palette, PaletteSet, Rgb};
use crate::domain::regional::MapType;
use crate::domain::risk::Antibiotic;
use crate::domain::sample::GenePresencePanel;
use anyhow::{Context, anyhow};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub server: ServerSettings,
    pub service: ServiceSettings,
    pub sample: SampleSettings,
    #[serde(default)]
    pub antibiotics: Vec<Antibiotic>,
    pub analytics: AnalyticsSettings,
    pub map: MapSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
    /// Request size cap for FASTA uploads; whole genomes run to several MB
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_max_upload_bytes() -> usize {
    64 * 1024 * 1024
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceSettings {
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    10_000
}

/// Default demo isolate shown before any upload
#[derive(Debug, Deserialize, Clone)]
pub struct SampleSettings {
    pub name: String,
    #[serde(default)]
    pub genes: Vec<String>,
}

impl SampleSettings {
    pub fn gene_panel(&self) -> GenePresencePanel {
        GenePresencePanel::with_present(self.genes.iter().map(String::as_str))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalyticsSettings {
    #[serde(default)]
    pub pathogens: Vec<String>,
    #[serde(default = "default_top_regions")]
    pub top_regions: usize,
}

fn default_top_regions() -> usize {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct MapSettings {
    pub no_data_color: String,
    #[serde(default)]
    pub geography: Vec<String>,
    #[serde(default)]
    pub palettes: Vec<PaletteConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaletteConfig {
    pub map_type: MapType,
    pub label: String,
    pub stops: Vec<String>,
}

impl MapSettings {
    pub fn style(&self) -> anyhow::Result<MapStyle> {
        let no_data = parse_color(&self.no_data_color)?;

        let mut entries = Vec::with_capacity(self.palettes.len());
        for palette in &self.palettes {
            let stops = palette
                .stops
                .iter()
                .map(|s| parse_color(s))
                .collect::<anyhow::Result<Vec<_>>>()
                .with_context(|| format!("Invalid palette for {}", palette.map_type.as_str()))?;
            let built = Palette::new(palette.label.clone(), stops)
                .ok_or_else(|| anyhow!("Palette for {} has no stops", palette.map_type.as_str()))?;
            entries.push((palette.map_type, built));
        }
        let palettes = PaletteSet::new(entries).ok_or_else(|| anyhow!("At least one map palette is required"))?;

        Ok(MapStyle {
            geography: self.geography.clone(),
            palettes,
            no_data,
        })
    }
}

fn parse_color(hex: &str) -> anyhow::Result<Rgb> {
    Rgb::from_hex(hex).ok_or_else(|| anyhow!("Invalid color '{}', expected #rrggbb", hex))
}

pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard"))
        .add_source(config::Environment::with_prefix("AMR_DASHBOARD").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
