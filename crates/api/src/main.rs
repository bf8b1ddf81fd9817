use anyhow::Context;

use relaychat_infra::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    relaychat_observability::init();

    let settings = Settings::from_env().context("invalid configuration")?;

    let services = relaychat_api::app::services::build_services(&settings)
        .await
        .context("failed to initialise stores")?;

    let app = relaychat_api::app::build_app(services, &settings.route_prefix);

    let listener = tokio::net::TcpListener::bind(settings.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.listen_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        route_prefix = %settings.route_prefix,
        persistent = settings.use_persistent_stores,
        "listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
