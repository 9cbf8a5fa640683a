// Errors raised by dashboard use cases
use crate::application::analytics_repository::GatewayError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("unknown antibiotic: {0}")]
    UnknownAntibiotic(String),

    #[error("unknown pathogen: {0}")]
    UnknownPathogen(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
