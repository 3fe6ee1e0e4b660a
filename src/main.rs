//! `sitewatch` server binary.

use anyhow::Context;
use sitewatch::{apply_migrations, ensure_database_exists, AppState, Catalog, SelfAssertedIdentity, Settings};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sitewatch=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env().context("invalid configuration")?;
    tracing::info!(bind = %settings.bind_addr, schema = %settings.schema, prefix = %settings.api_prefix, "sitewatch starting");

    ensure_database_exists(&settings.database_url)
        .await
        .context("failed to ensure database exists")?;
    let pool = sitewatch::store::connect(&settings)
        .await
        .context("failed to connect to database")?;
    sitewatch::store::ping(&pool).await.context("database is not reachable")?;
    tracing::info!("database connected");

    let catalog = Catalog::standard();
    catalog.check().context("resource catalogue is inconsistent")?;
    if settings.auto_migrate {
        apply_migrations(&pool, &settings.schema, &catalog)
            .await
            .context("failed to apply migrations")?;
    }

    let state = AppState {
        pool,
        catalog: Arc::new(catalog),
        schema: Arc::from(settings.schema.as_str()),
        identity: Arc::new(SelfAssertedIdentity),
    };
    let app = sitewatch::app(state, &settings);

    let listener = TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("sitewatch stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
