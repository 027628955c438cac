use anyhow::{Context, Result};
use festival_server::config::Config;
use festival_server::routes::{router, AppState};
use festival_server::store::DocumentStore;
use std::net::SocketAddr;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("festival_server=info".parse()?),
        )
        .init();

    info!("Starting festival server");

    let config = Config::from_env()?;

    if config.admin_api_key.is_none() {
        warn!("ADMIN_API_KEY not set, admin routes will reject every request");
    }

    let store = match &config.seed_file {
        Some(path) => {
            info!("Loading seed data from {}", path);
            DocumentStore::from_seed_file(path)?
        }
        None => DocumentStore::new(),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = router(AppState::new(config, store));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
