// Mapper from service wire types to domain models
//
// All fraction to percent conversion happens here, once. Views downstream
// only ever see percentages (or the no-data sentinel) for rates.
use crate::application::analytics_repository::GatewayError;
use crate::domain::heatmap::HeatmapMatrix;
use crate::domain::regional::{MapData, MapStatus, NO_DATA, RegionMetadata, RegionalDatum, is_no_data};
use crate::domain::risk::{DriverDirection, GeneDriver, PathogenRisk, RiskAssessment};
use crate::domain::sample::{GenePresencePanel, UploadOutcome};
use crate::domain::trends::{PathogenShare, TrendPoint, TrendSeries};
use crate::infrastructure::wire::{
    AnalysisResponse, GeneDriverEntry, HeatmapResponse, MapResponse, RegionEntry, TrendsResponse, UploadResponse,
};

pub fn analysis_to_domain(response: AnalysisResponse) -> Result<RiskAssessment, GatewayError> {
    let pathogens = response
        .pathogen_breakdown
        .into_iter()
        .map(|p| PathogenRisk {
            name: p.name,
            risk: p.risk,
            count: None,
        })
        .collect();

    let mut genes = Vec::with_capacity(response.gene_drivers.len());
    for (name, raw) in response.gene_drivers {
        let entry: GeneDriverEntry = serde_json::from_value(raw)
            .map_err(|e| GatewayError::Decode(format!("gene driver {}: {}", name, e)))?;
        genes.push(GeneDriver {
            name,
            score: entry.score,
            direction: DriverDirection::from_server(entry.direction.as_deref()),
        });
    }

    Ok(RiskAssessment {
        overall_risk: response.overall_risk_score,
        risk_level: response.risk_category,
        pathogens,
        genes,
    })
}

pub fn upload_to_domain(response: UploadResponse) -> UploadOutcome {
    match response.status.as_str() {
        "validation_phase" => UploadOutcome::ValidationPhase,
        "success" => UploadOutcome::Extracted(GenePresencePanel::from_flags(response.genes.unwrap_or_default())),
        _ => UploadOutcome::Other(response.status),
    }
}

pub fn map_to_domain(response: MapResponse) -> MapData {
    let status = match response.status.as_str() {
        "unavailable" => MapStatus::Unavailable,
        _ => MapStatus::Success,
    };

    MapData {
        status,
        data: response.data.into_iter().map(region_to_domain).collect(),
        message: response.message,
    }
}

fn region_to_domain(entry: RegionEntry) -> RegionalDatum {
    let metadata = entry.metadata.unwrap_or_default();
    RegionalDatum {
        region: entry.region,
        value: entry.value.unwrap_or(NO_DATA),
        metadata: RegionMetadata {
            isolates: metadata.isolates,
            estimated: metadata.estimated,
            detail: metadata.detail,
            info: metadata.info,
        },
    }
}

pub fn trends_to_domain(response: TrendsResponse) -> TrendSeries {
    let pathogen_distribution = response
        .pathogen_distribution
        .into_iter()
        .map(|p| PathogenShare {
            name: p.name,
            value: p.value,
        })
        .collect();

    let Some(dataset) = response.datasets.into_iter().next() else {
        return TrendSeries {
            points: Vec::new(),
            pathogen_distribution,
        };
    };

    let points = response
        .labels
        .iter()
        .zip(dataset.data)
        .filter_map(|(label, value)| {
            let year = match label {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            value.map(|v| TrendPoint { year, value: v * 100.0 })
        })
        .collect();

    TrendSeries {
        points,
        pathogen_distribution,
    }
}

pub fn heatmap_to_domain(response: HeatmapResponse) -> HeatmapMatrix {
    let data = response
        .data
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| match cell {
                    Some(v) if !is_no_data(v) => v * 100.0,
                    _ => NO_DATA,
                })
                .collect()
        })
        .collect();

    HeatmapMatrix {
        x_labels: response.x_labels,
        y_labels: response.y_labels,
        data,
    }
}
