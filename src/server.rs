//! HTTP server initialization and runtime setup.
//!
//! Opens storage, applies migrations, wires the service graph and runs the
//! Axum server until Ctrl+C.

use crate::application::services::UrlService;
use crate::config::{Config, StorageBackend, mask_connection_string};
use crate::domain::repositories::UrlRepository;
use crate::infrastructure::persistence::{MemoryUrlRepository, PgUrlRepository};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::CodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// Connects to PostgreSQL, retrying with exponential backoff.
///
/// Makes one initial attempt plus `db_connect_retries` retries, with delays
/// starting at 100ms and capped at 5s.
///
/// # Errors
///
/// Returns the last connection error once all attempts are exhausted.
pub async fn connect_pool(config: &Config, database_url: &str) -> Result<PgPool> {
    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime));

    let strategy = ExponentialBackoff::from_millis(10)
        .factor(10)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(config.db_connect_retries);

    let pool = Retry::spawn(strategy, || {
        let options = options.clone();
        async move {
            options.connect(database_url).await.inspect_err(|e| {
                tracing::warn!(error = %e, "Database connection attempt failed");
            })
        }
    })
    .await
    .with_context(|| {
        format!(
            "Failed to connect to database at {}",
            mask_connection_string(database_url)
        )
    })?;

    Ok(pool)
}

/// Builds the repository selected by `STORAGE_BACKEND`.
async fn open_repository(config: &Config) -> Result<Arc<dyn UrlRepository>> {
    match config.storage_backend {
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres storage backend")?;

            let pool = connect_pool(config, database_url).await?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Migrations applied");

            Ok(Arc::new(PgUrlRepository::new(Arc::new(pool))))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; records are lost on restart");
            Ok(Arc::new(MemoryUrlRepository::new()))
        }
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl+C"),
    }
}

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = open_repository(&config).await?;

    let url_service = Arc::new(UrlService::new(repository, CodeGenerator::from_os_rng()));
    let state = AppState::new(url_service);

    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}
