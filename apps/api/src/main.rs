mod ai_gateway;
mod analysis;
mod auth;
mod config;
mod cvs;
mod db;
mod errors;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ai_gateway::AiClient;
use crate::auth::AuthClient;
use crate::config::Config;
use crate::db::create_pool;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (aborts on missing required env vars —
    // a missing AI credential must fail boot, never degrade silently)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("smartcv_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SmartCV API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize auth client
    let auth = AuthClient::new(config.auth_base_url.clone(), config.auth_service_key.clone());
    info!("Auth client initialized");

    // Initialize AI gateway client
    let ai = AiClient::new(config.ai_gateway_api_key.clone());
    info!("AI gateway client initialized (model: {})", ai_gateway::MODEL);

    // Build app state
    let state = AppState { db, ai, auth };

    // Build router. Permissive CORS also answers OPTIONS preflight for the
    // browser clients calling the analyze endpoint cross-origin.
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
