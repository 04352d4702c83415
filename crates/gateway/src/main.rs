//! Quiver gateway binary

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use quiver_gateway::{routes, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().context("invalid configuration")?;

    if config.base_host.is_none() {
        tracing::warn!("BASE_HOST is not set; all requests will be forwarded untouched");
    }
    if config.session_jwt_secret.is_none() {
        tracing::warn!("SESSION_JWT_SECRET is not set; all requests resolve as anonymous");
    }

    let pool = match config.database_url.as_deref() {
        Some(url) => Some(
            quiver_shared::create_pool(url, config.database_max_connections)
                .await
                .context("failed to connect to database")?,
        ),
        None => {
            tracing::warn!("DATABASE_URL is not set; tenant resolution is disabled");
            None
        }
    };

    let bind_address = config.bind_address.clone();
    let state = AppState::new(config, pool);
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;
    tracing::info!("quiver-gateway listening on {bind_address}");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
