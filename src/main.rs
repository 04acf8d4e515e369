//! Sunny Online Store - product and order API

use std::sync::Arc;

use anyhow::{Context, Result};
use sunny_store::{app, store::MongoStore, AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let store = MongoStore::connect(config.database_url.as_deref(), config.database_name.as_deref()).await;
    let addr = config.listen_addr();
    let state = AppState::new(Arc::new(store), config);

    let listener = tokio::net::TcpListener::bind(&addr).await.with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("🚀 Sunny Store listening on {}", addr);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
