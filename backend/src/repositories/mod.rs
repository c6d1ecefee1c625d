//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod admin;
pub mod catalog;
pub mod memory;

pub use admin::{AdminRecord, AdminRepository};
pub use catalog::{CatalogStore, PgCatalogStore};
pub use memory::MemoryCatalogStore;
