use dashgate_api::config::ApiConfig;
use dashgate_observability::LogConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env()?;

    dashgate_observability::init_with(&LogConfig {
        format: config.log_format,
        ..LogConfig::default()
    });

    if config.jwt_secret_is_default {
        tracing::warn!("DASHGATE_JWT_SECRET not set; using insecure dev default");
    }

    let app = dashgate_api::app::build_app(&config)?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
