//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and external systems.

pub mod admin;
pub mod ingestion;

pub use admin::AdminService;
pub use ingestion::{CatalogIngestion, IngestionError, IngestionOutcome};
