// Color primitives and the choropleth color scale
use super::regional::MapType;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` color
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| {
            let value = a as f64 + (b as f64 - a as f64) * t;
            value.round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Named gradient used by one map type. Always has at least one stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Palette {
    label: String,
    stops: Vec<Rgb>,
}

impl Palette {
    pub fn new(label: String, stops: Vec<Rgb>) -> Option<Self> {
        if stops.is_empty() {
            return None;
        }
        Some(Self { label, stops })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn stops(&self) -> &[Rgb] {
        &self.stops
    }
}

/// Palettes keyed by map type, with the antibiotic performance palette
/// (or the first configured one) as fallback for unconfigured types.
#[derive(Debug, Clone)]
pub struct PaletteSet {
    entries: Vec<(MapType, Palette)>,
    fallback: usize,
}

impl PaletteSet {
    pub fn new(entries: Vec<(MapType, Palette)>) -> Option<Self> {
        if entries.is_empty() {
            return None;
        }
        let fallback = entries
            .iter()
            .position(|(map_type, _)| *map_type == MapType::AntibioticPerformance)
            .unwrap_or(0);
        Some(Self { entries, fallback })
    }

    pub fn palette_for(&self, map_type: MapType) -> &Palette {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == map_type)
            .map(|(_, palette)| palette)
            .unwrap_or(&self.entries[self.fallback].1)
    }
}

/// Linear multi-stop scale over the observed value domain.
///
/// Stops are spread evenly between the dataset minimum and maximum and
/// values outside the domain clamp to the end colors. An empty dataset
/// falls back to a 0-100 domain.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    min: f64,
    max: f64,
    stops: Vec<Rgb>,
}

impl ColorScale {
    pub const DEFAULT_DOMAIN: (f64, f64) = (0.0, 100.0);

    pub fn from_values<I>(values: I, palette: &Palette) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |bounds: Option<(f64, f64)>, v| match bounds {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .unwrap_or(Self::DEFAULT_DOMAIN);

        Self {
            min,
            max,
            stops: palette.stops().to_vec(),
        }
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn color(&self, value: f64) -> Rgb {
        let first = self.stops[0];
        let last = self.stops[self.stops.len() - 1];

        if self.stops.len() == 1 || value.is_nan() || value <= self.min {
            return first;
        }
        // Also catches a zero-width domain before the division below.
        if value >= self.max {
            return last;
        }

        let segments = (self.stops.len() - 1) as f64;
        let position = (value - self.min) / (self.max - self.min) * segments;
        let index = (position.floor() as usize).min(self.stops.len() - 2);
        self.stops[index].lerp(self.stops[index + 1], position - index as f64)
    }
}
