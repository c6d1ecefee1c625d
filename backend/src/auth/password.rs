//! Password hashing using bcrypt
//!
//! Provides salted, adaptive password hashing and verification.
//!
//! # Performance Considerations
//!
//! bcrypt is intentionally CPU-intensive. In async contexts use the `_async`
//! variants, which move the work onto the blocking thread pool.

use anyhow::Result;
use std::sync::OnceLock;
use tracing::warn;

const PLACEHOLDER_PASSWORD: &str = "apple-catalog-no-such-account";

/// Default-cost hash checked when there is no stored hash to check against
static PLACEHOLDER_HASH: OnceLock<String> = OnceLock::new();

/// Password hashing service
///
/// Hashes embed their own salt and cost, so verification needs nothing but
/// the stored string.
pub struct PasswordService;

impl PasswordService {
    /// Hash a password with the default bcrypt cost (blocking operation)
    pub fn hash(password: &str) -> Result<String> {
        Self::hash_with_cost(password, bcrypt::DEFAULT_COST)
    }

    /// Hash a password with an explicit cost factor (blocking operation)
    pub fn hash_with_cost(password: &str, cost: u32) -> Result<String> {
        bcrypt::hash(password, cost).map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
    }

    /// Hash a password asynchronously (non-blocking)
    pub async fn hash_async(password: String) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a stored hash (blocking operation)
    ///
    /// A stored hash that cannot be parsed verifies as `false`. Callers see
    /// the same outcome as a wrong password.
    pub fn verify(password: &str, hash: &str) -> bool {
        match bcrypt::verify(password, hash) {
            Ok(valid) => valid,
            Err(e) => {
                warn!("Stored password hash could not be parsed: {}", e);
                false
            }
        }
    }

    /// Verify a password asynchronously (non-blocking)
    pub async fn verify_async(password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))
    }

    /// Verify `password` against a fixed placeholder hash and discard the
    /// outcome. An unknown account then costs as much as a wrong password.
    pub async fn verify_placeholder_async(password: String) -> Result<()> {
        tokio::task::spawn_blocking(move || {
            Self::verify(&password, placeholder_hash());
        })
        .await
        .map_err(|e| anyhow::anyhow!("Task join error: {}", e))
    }
}

fn placeholder_hash() -> &'static str {
    PLACEHOLDER_HASH.get_or_init(|| PasswordService::hash(PLACEHOLDER_PASSWORD).unwrap_or_default())
}
