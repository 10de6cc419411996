use anyhow::Result;
use portfolio_binder::config::Config;
use portfolio_binder::server;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("portfolio_binder=info".parse()?),
        )
        .init();

    info!("Starting portfolio server");

    let config = Config::from_env()?;
    match &config.site_base_url {
        Some(url) => info!("Documents from {}", url),
        None => info!("Documents from {}", config.site_dir.display()),
    }

    server::serve(&config).await
}
