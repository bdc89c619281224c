//! Waypoint service entry point.
//!
//! Startup order: configuration, logging, journey definitions (malformed
//! documents abort startup), adapters, router, serve.

use std::sync::Arc;
use std::time::Duration;

use http::{HeaderValue, Method};
use secrecy::ExposeSecret;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use waypoint::adapters::http::{routes, AppState};
use waypoint::adapters::{HttpExtractor, HttpExtractorConfig, InMemorySessionStore};
use waypoint::config::AppConfig;
use waypoint::domain::journey::load_journey_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(&config.server.log_level)
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    config.validate()?;

    // Malformed journeys fail startup, never a request.
    let journeys = load_journey_dir(&config.journeys.dir)?;
    tracing::info!(
        journeys = journeys.len(),
        dir = %config.journeys.dir,
        "journey definitions loaded"
    );

    let store = Arc::new(InMemorySessionStore::new());

    let api_key = config
        .extractor
        .api_key
        .as_ref()
        .map(|key| key.expose_secret().clone())
        .unwrap_or_default();
    let extractor = Arc::new(HttpExtractor::new(
        HttpExtractorConfig::new(&config.extractor.endpoint, api_key)
            .with_timeout(config.extractor.timeout()),
    ));

    let state = AppState::new(
        store,
        extractor,
        Arc::new(journeys),
        config.extractor.timeout(),
    );

    let cors = build_cors(&config);
    let app = routes().with_state(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            .layer(cors),
    );

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "waypoint listening");

    axum::serve(listener, app).await?;
    Ok(())
}

fn build_cors(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers(Any)
    }
}
