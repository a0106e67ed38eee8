mod config;
mod errors;
mod matching_client;
mod models;
mod parsers;
mod pipeline;
mod results;
mod routes;
mod session;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::matching_client::MatchingClient;
use crate::routes::build_router;
use crate::session::busy::InFlight;
use crate::state::AppState;
use crate::store::{MemoryStore, RedisStore, SessionStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SmartMatch API v{}", env!("CARGO_PKG_VERSION"));

    // Session store: Redis when configured, process memory otherwise
    let store: Arc<dyn SessionStore> = match &config.redis_url {
        Some(url) => Arc::new(RedisStore::open(url)?),
        None => {
            info!("REDIS_URL not set; sessions are kept in memory");
            Arc::new(MemoryStore::new())
        }
    };

    let matching = MatchingClient::new(
        config.matching_service_url.clone(),
        config.matching_timeout_secs.map(Duration::from_secs),
    )?;
    info!("Matching service: {}", matching.base_url());

    let state = AppState {
        store,
        matching,
        config: config.clone(),
        in_flight: InFlight::new(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the web client's host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
