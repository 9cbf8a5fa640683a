// Domain layer - View models and the color/normalization rules behind them
pub mod choropleth;
pub mod color;
pub mod heatmap;
pub mod regional;
pub mod risk;
pub mod sample;
pub mod trends;
