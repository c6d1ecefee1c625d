//! Apple Catalog Backend Library
//!
//! Admin authentication and the apple-cultivar catalog, exposed for the
//! binary and for integration tests.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
