use anyhow::Context;

use stocktake_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stocktake_observability::init();

    let config = ApiConfig::from_env()?;
    let app = stocktake_api::app::build_app(&config).context("failed to initialize services")?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
