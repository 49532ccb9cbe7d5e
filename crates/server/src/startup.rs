use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, ServerState};
use service::students::StudentStore;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the snapshot named in `cfg` (creating it and its directory if missing)
/// and build the application router on top of it.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let data_file = &cfg.storage.data_file;
    let store = StudentStore::new(data_file.as_str()).await?;
    info!(path = %data_file, "student snapshot ready");
    Ok(router_for(store))
}

/// Router over an already opened store.
pub fn router_for(store: Arc<StudentStore>) -> Router {
    routes::build_router(ServerState::new(store), build_cors())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl+C; running until killed");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
}

/// Public entry: build the app and run the HTTP server until Ctrl+C.
/// `.env`, logging and config loading are the caller's job.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    let listener = tokio::net::TcpListener::bind(cfg.server.bind_addr()).await?;
    let addr: SocketAddr = listener.local_addr()?;
    info!(%addr, "student grading service listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
