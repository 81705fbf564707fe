use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reelfeed::{
    config::Config,
    db::{create_pool, create_redis_client, Cache, CachedCatalogStore, CatalogStore, PgCatalogStore},
    routes::{create_router, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("reelfeed=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url, config.db_max_connections)
        .await
        .context("Failed to connect to Postgres")?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let postgres: Arc<dyn CatalogStore> = Arc::new(PgCatalogStore::new(pool));

    let (catalog, cache_writer) = match config.redis_url.as_deref() {
        Some(redis_url) => {
            let client = create_redis_client(redis_url)?;
            let timeout = Duration::from_millis(config.cache_timeout_ms);
            match Cache::new(client, timeout).await {
                Ok((cache, writer)) => {
                    tracing::info!(ttl_secs = config.cache_ttl_secs, "Response cache enabled");
                    let cached: Arc<dyn CatalogStore> = Arc::new(CachedCatalogStore::new(
                        postgres,
                        cache,
                        config.cache_ttl_secs,
                    ));
                    (cached, Some(writer))
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Redis unreachable, response cache disabled");
                    (postgres, None)
                }
            }
        }
        None => {
            tracing::info!("REDIS_URL not set, response cache disabled");
            (postgres, None)
        }
    };

    let state = Arc::new(AppState::new(catalog, config.paging(), config.ranking()));
    let app = create_router(state);

    let address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    tracing::info!(
        address = %address,
        page_size = config.feed_page_size,
        diversity_window = config.diversity_window,
        "Server running"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(writer) = cache_writer {
        writer.shutdown().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
