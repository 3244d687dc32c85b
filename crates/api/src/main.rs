//! ERPGate - project queries and ERP order submission gateway
//!
//! Main entry point: loads configuration, wires the context, serves HTTP.

use std::sync::Arc;

use anyhow::Context;
use erpgate_api::utils::logging::init_tracing;
use erpgate_api::{build_router, AppContext};
use erpgate_domain::constants::SERVICE_NAME;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{info, warn, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the filter reads RUST_LOG
    let dotenv = dotenvy::dotenv();

    init_tracing();

    match dotenv {
        Ok(path) => info!(path = ?path, "loaded .env"),
        Err(err) => warn!(error = %err, "could not load .env file"),
    }

    let config = erpgate_infra::config::load().context("failed to load configuration")?;
    let bind_addr = config.server.bind_addr.clone();

    let ctx = Arc::new(AppContext::new(config).context("failed to initialise application")?);

    let app = build_router(ctx).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(addr = %bind_addr, service = SERVICE_NAME, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server crashed")?;

    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
