//! FitTrack backend: accounts, daily meal/water/workout records, a calorie
//! dashboard, Google Calendar reminders and a scripted chat assistant.

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod queries;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
pub mod validation;

pub use config::Config;
pub use database::{DbConn, DbPool};
pub use error::{Error, Result};
pub use routes::create_router;
pub use state::AppState;

use tokio::{net::TcpListener, signal};

use services::chatbot::STATE_TABLE;

/// Load configuration from environment variables
pub fn load_config() -> std::result::Result<Config, Box<dyn std::error::Error>> {
    Ok(Config::load()?)
}

/// Connects to the database, builds the router and serves until a shutdown
/// signal arrives.
pub async fn run_api_server(config: Config) -> Result<()> {
    config.validate()?;
    STATE_TABLE
        .validate()
        .map_err(|e| Error::Internal(format!("Invalid chat state table: {}", e)))?;

    let pool = database::connect(&config.database).await?;
    let address = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState::new(config, pool)?;
    let app = create_router(state)?;

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind {}: {}", address, e)))?;
    tracing::info!("FitTrack API listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
}
