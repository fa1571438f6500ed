//! admin-server: restaurant back-office API
//!
//! Long-running service that:
//! - Manages the order lifecycle for each restaurant (JWT authenticated)
//! - Serves sales, menu and dashboard analytics
//! - Administers staff roles and permissions

use admin_server::utils::logger::init_logger;
use admin_server::{AppState, BoxError, Config, api};

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    // Keep the guard alive so file logs are flushed on exit
    let _log_guard = init_logger(&config.log_level, config.log_dir.as_deref());

    tracing::info!(
        "Starting admin-server (env: {}, storage: {:?}, zone: {})",
        config.environment,
        config.storage,
        config.business_timezone
    );

    let state = AppState::new(&config).await?;
    let app = api::create_router(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("admin-server HTTP listening on {http_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("admin-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
