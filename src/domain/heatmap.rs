// Antibiotic x pathogen resistance matrix
use super::color::Rgb;
use super::regional::{NO_DATA, is_no_data};
use serde::Serialize;

/// Fill for cells without enough isolates
pub const INSUFFICIENT_DATA_COLOR: &str = "#f5f5f5";

const CELL_ALPHA: f64 = 0.7;

/// Resistance rates in percent, rows are antibiotics and columns pathogens.
/// Missing cells hold the `NO_DATA` sentinel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeatmapMatrix {
    pub x_labels: Vec<String>,
    pub y_labels: Vec<String>,
    pub data: Vec<Vec<f64>>,
}

impl HeatmapMatrix {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Cell at (row, col), sentinel when the row is short or missing
    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.data
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(NO_DATA)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellColor {
    InsufficientData,
    Ramp(Rgb),
}

impl CellColor {
    pub fn css(&self) -> String {
        match self {
            CellColor::InsufficientData => INSUFFICIENT_DATA_COLOR.to_string(),
            CellColor::Ramp(c) => format!("rgba({}, {}, {}, {})", c.r, c.g, c.b, CELL_ALPHA),
        }
    }
}

/// Two-segment RGB ramp: green to yellow below 50%, yellow to red from 50%.
pub fn cell_color(value: f64) -> CellColor {
    if is_no_data(value) {
        return CellColor::InsufficientData;
    }

    let intensity = value / 100.0;
    let channel = |v: f64| v.round().clamp(0.0, 255.0) as u8;
    if intensity < 0.5 {
        CellColor::Ramp(Rgb::new(channel(510.0 * intensity), 255, 0))
    } else {
        CellColor::Ramp(Rgb::new(255, channel(510.0 * (1.0 - intensity)), 0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub value: Option<f64>,
    pub color: String,
    pub text_color: &'static str,
    pub label: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapRow {
    pub label: String,
    pub cells: Vec<HeatmapCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapView {
    pub x_labels: Vec<String>,
    pub rows: Vec<HeatmapRow>,
}

impl HeatmapView {
    pub fn from_matrix(matrix: &HeatmapMatrix) -> Self {
        let rows = matrix
            .y_labels
            .iter()
            .enumerate()
            .map(|(row, y_label)| HeatmapRow {
                label: y_label.clone(),
                cells: matrix
                    .x_labels
                    .iter()
                    .enumerate()
                    .map(|(col, x_label)| build_cell(y_label, x_label, matrix.value(row, col)))
                    .collect(),
            })
            .collect();

        Self {
            x_labels: matrix.x_labels.clone(),
            rows,
        }
    }
}

fn build_cell(y_label: &str, x_label: &str, value: f64) -> HeatmapCell {
    let color = cell_color(value).css();
    if is_no_data(value) {
        return HeatmapCell {
            value: None,
            color,
            text_color: "black",
            label: "-".to_string(),
            title: format!("{} vs {}: No Data", y_label, x_label),
        };
    }

    HeatmapCell {
        value: Some(value),
        color,
        text_color: if value > 50.0 { "white" } else { "black" },
        label: format!("{}%", value.round()),
        // `{:.1}` alone would round halves to even
        title: format!("{} vs {}: {:.1}%", y_label, x_label, (value * 10.0).round() / 10.0),
    }
}
