use anyhow::Context;
use db::DbService;
use server::{AppState, app};
use tracing_subscriber::EnvFilter;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let host = env_or("HOST", "127.0.0.1");
    let port = env_or("PORT", "8787");
    let mongodb_url = env_or("MONGODB_URL", "mongodb://127.0.0.1:27017");
    let database_name = env_or("MONGODB_DB", "bugboard");

    let db = DbService::connect(&mongodb_url, &database_name)
        .await
        .context("failed to connect to MongoDB")?;

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(addr = %addr, "bugboard server listening");

    axum::serve(listener, app(AppState::new(db)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown signal received");
    }
}
