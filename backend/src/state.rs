//! Application state management
//!
//! Shared resources passed to every handler via Axum's state extraction.
//! Everything here is created once at startup and is cheap to clone.

use crate::auth::JwtService;
use crate::config::AppConfig;
use crate::repositories::{CatalogStore, PgCatalogStore};
use crate::services::CatalogIngestion;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (admin accounts)
    pub db: PgPool,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Pre-initialized JWT service with cached keys
    pub jwt: JwtService,
    /// Catalog document store
    pub catalog: Arc<dyn CatalogStore>,
    /// Ingestion service sharing `catalog`
    pub ingestion: Arc<CatalogIngestion>,
}

impl AppState {
    /// Create state backed by the Postgres catalog store
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        let catalog: Arc<dyn CatalogStore> = Arc::new(PgCatalogStore::new(db.clone()));
        Self::with_catalog(db, config, catalog)
    }

    /// Create state with an explicit catalog store
    pub fn with_catalog(db: PgPool, config: AppConfig, catalog: Arc<dyn CatalogStore>) -> Self {
        let jwt = JwtService::new(&config.jwt.secret, config.jwt.token_expiry_secs);
        let ingestion = Arc::new(CatalogIngestion::new(
            Arc::clone(&catalog),
            config.catalog.clone(),
        ));

        Self {
            db,
            config: Arc::new(config),
            jwt,
            catalog,
            ingestion,
        }
    }

    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    #[inline]
    pub fn catalog(&self) -> &dyn CatalogStore {
        self.catalog.as_ref()
    }

    #[inline]
    pub fn ingestion(&self) -> &CatalogIngestion {
        &self.ingestion
    }
}
