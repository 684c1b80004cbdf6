use anyhow::Result;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

use reputation_engine::{
    api::{create_reputation_router, ReputationApiState},
    config::EngineConfig,
    ReputationStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first - this validates the store tuning
    let config = EngineConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        eprintln!("Please check REPUTATION_* environment variables.");
        e
    })?;

    init_logging(&config)?;

    info!("Starting Quality Reputation Engine");
    info!(
        "Store settings: initial_score={}, quality_window={}, history_window={}, leaderboard_limit={}",
        config.reputation.initial_score,
        config.reputation.quality_window,
        config.reputation.history_window,
        config.reputation.default_leaderboard_limit
    );

    // The in-memory store is the source of truth; deployments that need
    // durability attach a ReputationRepository via with_repository here.
    let store = Arc::new(ReputationStore::new(config.reputation.to_settings()));

    let app = Router::new()
        .nest(
            "/reputation",
            create_reputation_router(ReputationApiState {
                store: store.clone(),
            }),
        )
        .route("/health", get(|| async { "OK" }))
        .layer(TraceLayer::new_for_http());

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", bind_addr, e))?;

    info!("Reputation engine listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(config: &EngineConfig) -> Result<()> {
    // RUST_LOG wins when set, otherwise the configured level applies
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(if config.logging.log_requests {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        })
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set logging subscriber: {}", e))?;

    Ok(())
}
