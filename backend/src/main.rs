//! Apple Catalog Backend
//!
//! Serves the heritage apple catalog and the admin API.
//!
//! ## Startup
//!
//! 1. Load configuration (the JWT secret must be supplied)
//! 2. Connect to Postgres and run migrations
//! 3. Provision the bootstrap admin, if configured
//! 4. Ingest the inventory spreadsheet once
//! 5. Serve HTTP until SIGINT/SIGTERM

use anyhow::Result;
use apple_catalog_backend::{config, db, routes, services::AdminService, state::AppState};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let config = config::AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if config::AppConfig::is_production() { "production" } else { "development" },
        "Starting Apple Catalog Backend"
    );

    info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database).await?;
    db::run_migrations(&db_pool).await?;

    if let (Some(email), Some(password)) = (
        config.admin.bootstrap_email.as_deref(),
        config.admin.bootstrap_password.as_deref(),
    ) {
        AdminService::bootstrap(&db_pool, email, password).await?;
    }

    let state = AppState::new(db_pool, config.clone());

    // Completes before the listener binds, so no request sees a half-loaded catalog.
    let outcome = state.ingestion().run().await;
    info!(status = outcome.status(), loaded = outcome.loaded(), "Startup ingestion finished");

    let app = routes::create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "apple_catalog_backend=info,apple_catalog=info,tower_http=info".into()
        } else {
            "apple_catalog_backend=debug,apple_catalog=debug,tower_http=debug,sqlx=warn".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
