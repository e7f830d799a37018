//! Catalog Cache - a product catalog service
//!
//! Serves the catalog REST API over a SQL store and a TTL cache.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_cache::api::create_router;
use catalog_cache::cache::{CacheLayer, MemoryCache, RedisCache};
use catalog_cache::config::CacheBackend;
use catalog_cache::store::SqliteProductStore;
use catalog_cache::{spawn_cleanup_task, AppState, CatalogCoordinator, Config, TtlPolicy};

/// Main entry point for the catalog server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect the product store (bounded by the connect timeout)
/// 4. Build the configured cache layer, starting the TTL sweeper for the memory backend
/// 5. Create the coordinator and the Axum router
/// 6. Serve until SIGINT/SIGTERM, then shut down gracefully
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting catalog server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, cache_backend={:?}, aside_ttl={}s, transactional_ttl={}s, recent_capacity={}",
        config.server_port,
        config.cache_backend,
        config.aside_ttl,
        config.transactional_ttl,
        config.recent_capacity
    );

    let store = SqliteProductStore::connect(
        &config.database_url,
        config.db_max_connections,
        Duration::from_secs(config.db_connect_timeout),
    )
    .await
    .context("failed to open the product store")?;
    let store = Arc::new(store);

    let (cache, cleanup_handle): (Arc<dyn CacheLayer>, Option<JoinHandle<()>>) =
        match config.cache_backend {
            CacheBackend::Memory => {
                let cache = Arc::new(MemoryCache::new());
                let handle = spawn_cleanup_task(
                    cache.clone(),
                    Duration::from_secs(config.cleanup_interval),
                );
                info!("In-memory cache initialized");
                (cache as Arc<dyn CacheLayer>, Some(handle))
            }
            CacheBackend::Redis => {
                let cache = RedisCache::connect(&config.redis_url)
                    .await
                    .context("failed to connect to Redis")?;
                (Arc::new(cache) as Arc<dyn CacheLayer>, None)
            }
        };

    let ttl = TtlPolicy {
        aside: Duration::from_secs(config.aside_ttl),
        transactional: Duration::from_secs(config.transactional_ttl),
    };
    let coordinator =
        CatalogCoordinator::with_policy(store.clone(), cache, ttl, config.recent_capacity);

    let app = create_router(AppState::new(coordinator));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    store.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the cleanup task if one is running.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cleanup task aborted");
    }
}
