mod config;
mod cover_letter;
mod documents;
mod errors;
mod matching;
mod routes;
mod state;
mod storage;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::cover_letter::extraction::build_extractor;
use crate::cover_letter::fetcher::HttpProfileFetcher;
use crate::matching::MatchEngine;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::connect_store;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on invalid values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Matching engine: vocabulary + rewrite rules, optionally from files
    let engine = Arc::new(MatchEngine::from_config(&config)?);

    // Saved resume store (Redis or in-memory)
    let store = connect_store(&config).await?;

    // Company profile fetcher; the timeout is applied per call
    let profile_fetcher = Arc::new(HttpProfileFetcher::new()?);
    info!(
        "Company profile fetch timeout: {}s",
        config.fetch_timeout.as_secs()
    );

    // Extraction strategy (placeholder unless EXTRACTION_STRATEGY says otherwise)
    let extractor = build_extractor(config.extraction_strategy, engine.vocabulary());
    info!("Extraction strategy: {}", extractor.name());

    // Build app state
    let state = AppState {
        config: config.clone(),
        engine,
        profile_fetcher,
        extractor,
        store,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the web client's origin

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
