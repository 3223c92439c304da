/*
 * Responsibility
 * - config load → dependency construction → Router assembly
 * - middleware application (CORS, request-id/trace; auth sits on the /v1 subtree)
 * - startup via axum::serve() with graceful shutdown
 */
use std::panic;

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::AppConfig;
use crate::middleware;
use crate::services::auth::build_verifier;
use crate::services::compute::ComputeClient;
use crate::services::uploads::UploadStore;
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,celvox_service=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook() {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Surface panics via tracing as well; stderr may be swallowed when
        // the service runs under a process manager.
        tracing::error!(?info, "panic");
        default_hook(info);
    }));
}

pub async fn run() -> Result<()> {
    // .env first, so a RUST_LOG set there is seen by the filter below.
    dotenvy::dotenv().ok();
    init_tracing();
    init_panic_hook();

    let config = AppConfig::load_from_args().context("failed to load configuration")?;

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let addr = config.addr();
    tracing::info!(%addr, backend = %config.compute_backend_url, "starting service");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn build_state(config: &AppConfig) -> Result<AppState> {
    let verifier = build_verifier(config).context("failed to build token verifier")?;

    let uploads = UploadStore::new(&config.uploads_folder).await.with_context(|| {
        format!(
            "failed to prepare uploads folder {}",
            config.uploads_folder.display()
        )
    })?;

    let compute = ComputeClient::new(&config.compute_backend_url);

    Ok(AppState::new(verifier, compute, uploads))
}

fn build_router(state: AppState, config: &AppConfig) -> Router {
    // Liveness probe for the reverse proxy / process manager; public on purpose.
    async fn live() -> &'static str {
        "ok"
    }

    let router = Router::new()
        .route("/", get(live))
        .nest("/v1", api::v1::routes(state.clone()))
        .with_state(state);

    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received, draining connections");
}
