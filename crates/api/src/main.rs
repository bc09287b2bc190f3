use anyhow::Context;

use stallbook_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stallbook_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let app = stallbook_api::app::build_app(&config).context("failed to start shop services")?;

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
