use fittrack::{load_config, run_api_server};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fittrack=info,tower_http=info")),
        )
        .init();

    let config = load_config()?;
    tracing::info!("Loaded configuration:\n{}", config);

    run_api_server(config).await?;
    Ok(())
}
