//! ReAct agent HTTP Server
//!
//! Axum-based server exposing the agent over a small JSON API.

mod handlers;
mod state;
#[cfg(test)]
mod testing;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::AgentConfig;

use crate::handlers::{health_check, list_models, run_agent};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = AgentConfig::from_env()?;
    let provider = agent_runtime::create_client(&config)?;

    tracing::info!(
        provider = %config.provider,
        model = %config.model,
        strategy = config.strategy.as_str(),
        "Agent configured"
    );

    let app = router(AppState::new(config, provider));

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Agent server running on http://{}", addr);
    tracing::info!("  GET  /health      - Health check");
    tracing::info!("  GET  /api/models  - List supported models");
    tracing::info!("  POST /api/agent   - Run a task");

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/models", get(list_models))
        .route("/api/agent", post(run_agent))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
