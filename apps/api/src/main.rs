mod accounts;
mod config;
mod db;
mod errors;
mod export;
mod extract;
mod generation;
mod llm_client;
mod models;
mod profiles;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::accounts::session::RedisSessionStore;
use crate::config::Config;
use crate::db::{create_pool, PgUserStore};
use crate::export::PdfRenderer;
use crate::llm_client::{ChatModel, LlmClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Fails fast on missing required env vars
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Portfolio API v{}", env!("CARGO_PKG_VERSION"));

    // User collection
    let pool = create_pool(&config.database).await?;
    let users = PgUserStore::new(pool, &config.database.collection);
    users.ensure_collection().await?;
    info!(
        "User collection '{}' ready in database '{}'",
        config.database.collection, config.database.name
    );

    // Sessions
    let redis = redis::Client::open(config.redis_url.clone())?;
    let sessions = RedisSessionStore::new(redis, config.session_ttl);
    info!(
        "Redis session store initialized (ttl: {}s)",
        config.session_ttl.as_secs()
    );

    let model = LlmClient::new(&config.model)?;
    info!("LLM client initialized (model: {})", model.model_name());

    let state = AppState {
        users: Arc::new(users),
        sessions: Arc::new(sessions),
        model: Arc::new(model),
        pdf: PdfRenderer::new(config.pdf_renderer.clone()),
    };

    // TODO: restrict CORS origins once the web client has a fixed host
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
