use anyhow::Context;

use ecovision_infra::{load_dotenv, AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = load_dotenv();
    ecovision_observability::init();
    if let Some(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    let config = AppConfig::from_env();
    let services = ecovision_api::app::services::build_services(&config)
        .await
        .context("failed to initialise climate store")?;

    let app = ecovision_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
    }
}
