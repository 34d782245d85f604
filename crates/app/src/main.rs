mod customers;
mod orders;
mod problem;
mod products;
mod router;
mod telemetry;

use std::net::SocketAddr;

use esales_storage::Database;
use esales_util::{load_env_file, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_env_file();
    let config = AppConfig::from_env()?;

    telemetry::init_tracing(&config)?;
    let metrics = telemetry::init_metrics()?;

    let storage = Database::connect(&config.database_url).await?;
    storage.run_migrations().await?;
    info!(stage = "storage", url = %config.database_url, "database ready");

    let state = router::AppState::new(metrics, storage);

    let addr: SocketAddr = config.bind_addr;
    info!(stage = "app", %addr, env = %config.environment.as_str(), "starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router::app_router(state)).await?;
    Ok(())
}
