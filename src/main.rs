// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};
use anyhow::Context;
use tower_http::compression::CompressionLayer;
use tower_http::compression::predicate::{DefaultPredicate, NotForContentType, Predicate};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::analytics_service::AnalyticsService;
use crate::application::map_service::MapService;
use crate::application::risk_service::RiskService;
use crate::application::sample_service::SampleContext;
use crate::application::view_state::ViewEvents;
use crate::infrastructure::analytics_client::AnalyticsClient;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::ndjson_stream::NDJSON_CONTENT_TYPE;
use crate::presentation::app_state::AppState;
use crate::presentation::routes::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("amr_dashboard=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let config = load_dashboard_config()?;
    let style = config.map.style()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(AnalyticsClient::new(
        &config.service.base_url,
        Duration::from_millis(config.service.timeout_ms),
    )?);

    // Create services (application layer)
    let events = ViewEvents::new();
    let sample = SampleContext::new(
        repository.clone(),
        config.sample.name.clone(),
        config.sample.gene_panel(),
    );
    let risk = RiskService::start(repository.clone(), &sample, config.antibiotics.clone(), events.clone());
    let map = MapService::start(repository.clone(), style, events.clone());
    let analytics = AnalyticsService::start(
        repository,
        config.analytics.pathogens.clone(),
        config.analytics.top_regions,
        events.clone(),
    );

    let state = Arc::new(AppState {
        sample,
        risk,
        map,
        analytics,
        events,
        upload_limit: config.server.max_upload_bytes,
    });

    // Build router (presentation layer)
    // Event lines must reach clients as they happen
    let compress = DefaultPredicate::new().and(NotForContentType::const_new(NDJSON_CONTENT_TYPE));
    let app = router(state)
        .layer(CompressionLayer::new().compress_when(compress))
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind))?;
    tracing::info!("Starting amr-dashboard on {} (service {})", addr, config.service.base_url);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
