// Application state for HTTP handlers
use crate::application::analytics_service::AnalyticsService;
use crate::application::map_service::MapService;
use crate::application::risk_service::RiskService;
use crate::application::sample_service::SampleContext;
use crate::application::view_state::ViewEvents;

/// One dashboard session per process
#[derive(Clone)]
pub struct AppState {
    pub sample: SampleContext,
    pub risk: RiskService,
    pub map: MapService,
    pub analytics: AnalyticsService,
    pub events: ViewEvents,
    /// Largest accepted FASTA upload request, in bytes
    pub upload_limit: usize,
}
