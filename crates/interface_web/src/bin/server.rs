//! Blog server binary
//!
//! # Usage
//!
//! ```bash
//! # PostgreSQL-backed (default)
//! BLOG_DATABASE_URL=postgres://localhost/blog cargo run --bin blog-server
//!
//! # Throwaway in-memory store
//! BLOG_STORAGE=memory cargo run --bin blog-server
//! ```
//!
//! # Environment Variables
//!
//! * `BLOG_HOST` / `BLOG_PORT` - Listen address (default: 0.0.0.0:8080)
//! * `BLOG_JWT_SECRET` - Token signing secret (required in production)
//! * `BLOG_DATABASE_URL` - PostgreSQL connection string
//! * `BLOG_STORAGE` - `postgres` or `memory`
//! * `BLOG_MEDIA_ROOT` - Directory for uploaded images (default: media)
//! * `BLOG_LOG_LEVEL` - Log level when `RUST_LOG` is unset (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_blog::{BlogStore, InMemoryBlogStore};
use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresBlogStore};
use interface_web::config::{StorageBackend, WebConfig};
use interface_web::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let (config, config_error) = match WebConfig::from_env() {
        Ok(config) => (config, None),
        Err(e) => (WebConfig::default(), Some(e)),
    };

    init_tracing(&config.log_level);
    if let Some(e) = config_error {
        tracing::warn!(error = %e, "Invalid BLOG_* configuration, using defaults");
    }

    config.validate()?;

    tracing::info!(
        host = %config.host,
        port = %config.port,
        storage = ?config.storage,
        "Starting blog server"
    );

    let store = open_store(&config).await?;
    let state = AppState::new(store, config.clone());
    state
        .media
        .ensure_dirs()
        .await
        .context("creating media directory")?;

    let app = create_router(state);

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .context("parsing listen address")?;
    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Opens the configured blog store, migrating PostgreSQL first
async fn open_store(config: &WebConfig) -> anyhow::Result<Arc<dyn BlogStore>> {
    match config.storage {
        StorageBackend::Postgres => {
            let pool = create_pool(DatabaseConfig::new(&config.database_url))
                .await
                .context("connecting to database")?;
            run_migrations(&pool).await.context("running migrations")?;
            Ok(Arc::new(PostgresBlogStore::new(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on shutdown");
            Ok(Arc::new(InMemoryBlogStore::new()))
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
