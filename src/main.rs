//! Guardrail Core - Prompt Guardrails Gateway
//!
//! This service screens user prompts before they reach a text-generation
//! model and screens the model's response before it reaches the user.

use std::sync::Arc;

use tokio::net::TcpListener;

mod api;
mod config;
mod domain;
mod engine;
mod error;
mod logging;

use crate::api::build_router;
use crate::config::Config;
use crate::engine::GuardedPipeline;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The guarded pipeline. Built once, shared by every request.
    pub pipeline: Arc<GuardedPipeline>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file loaded ({e})");
    }

    // Logging is configured from the file, so it starts after loading it
    let config = Config::load().map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    logging::init(&config.logging);

    tracing::info!("Starting Guardrail Core v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        backend = ?config.backend.kind,
        model = %config.backend.model,
        "Configuration loaded"
    );

    // Build the guarded pipeline
    let input_rules = engine::input_rules(&config.rules)?;
    let output_rules = engine::output_rules(&config.rules)?;
    let backend = engine::from_config(&config.backend)?;

    let pipeline = GuardedPipeline::new(input_rules, output_rules, backend);
    let (input_count, output_count) = pipeline.rule_counts();
    tracing::info!(
        input_rules = input_count,
        output_rules = output_count,
        "Guarded pipeline ready"
    );

    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    let app = build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "Server listening");
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
