//! JWT token generation and validation
//!
//! Issues HS256-signed bearer tokens with a fixed validity window and checks
//! them back, distinguishing expired tokens from invalid ones.

use anyhow::Result;
use apple_catalog_shared::CredentialError;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (admin email)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Pre-computed JWT keys for efficient token operations
/// These are expensive to create, so we cache them in AppState
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    /// Create new JWT keys from secret
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// JWT service for token operations
///
/// Cloning is cheap; keys are shared behind `Arc`.
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    validation: Validation,
    token_expiry_secs: i64,
}

impl JwtService {
    /// Create a new JWT service with pre-computed keys
    ///
    /// Call this once at application startup and store in AppState.
    pub fn new(secret: &str, token_expiry_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact: no clock skew allowance.
        validation.leeway = 0;

        Self {
            keys: JwtKeys::new(secret),
            validation,
            token_expiry_secs,
        }
    }

    /// Generate a token for `subject`, valid for the configured window
    pub fn generate_token(&self, subject: &str) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.token_expiry_secs);

        let claims = Claims {
            sub: subject.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, self.keys.encoding())
            .map_err(|e| anyhow::anyhow!("Failed to generate token: {}", e))
    }

    /// Validate a token and return its claims
    ///
    /// The signature is checked before expiry, so a forged token is always
    /// `Invalid` regardless of its `exp`.
    pub fn validate_token(&self, token: &str) -> Result<Claims, CredentialError> {
        let token_data = decode::<Claims>(token, self.keys.decoding(), &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => CredentialError::Expired,
                _ => CredentialError::Invalid,
            })?;

        // jsonwebtoken accepts exp == now; a token is only good while now < exp.
        if token_data.claims.exp <= Utc::now().timestamp() {
            return Err(CredentialError::Expired);
        }

        Ok(token_data.claims)
    }

    /// Token validity window in seconds
    #[inline]
    pub fn token_expiry_secs(&self) -> i64 {
        self.token_expiry_secs
    }
}
