//! Apple Catalog Shared Library
//!
//! Types and helpers shared between the backend and API clients: request and
//! response bodies, the credential error kind, and input validation.

pub mod errors;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
