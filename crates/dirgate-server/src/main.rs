//! dirgate server: application entry point.

use dirgate_server::{AppState, ServerConfig, StartupError, router};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dirgate=info")),
        )
        .json()
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(bind_addr = %config.bind_addr, "Starting dirgate server...");

    let store = dirgate_db::DbManager::open(&config.db).await?;

    let app = router(AppState::new(store.into_client(), config.authz.clone()));
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    tracing::info!("dirgate server stopped.");
    Ok(())
}
