//! # Kasir API
//!
//! Binary entry point: load config, open the database, serve HTTP until
//! SIGINT/SIGTERM.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use kasir_api::{build_router, AppConfig, AppState};
use kasir_db::Database;

const DEFAULT_LOG_FILTER: &str = "kasir_api=debug,kasir_db=debug,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    kasir_api::config::load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(true)
        .init();

    info!("Starting Kasir API server...");

    let config = AppConfig::from_env().context("failed to load configuration")?;
    info!(
        env = %config.env,
        addr = %config.bind_addr(),
        database = %config.database_path,
        api_key = config.api_key.is_some(),
        "Configuration loaded"
    );

    // Migrations run as part of connecting.
    let db = Database::new(config.db_config())
        .await
        .context("failed to open database")?;

    let listener = TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;
    info!(addr = %config.bind_addr(), "Listening");

    let app = build_router(AppState::new(db.clone(), config));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
