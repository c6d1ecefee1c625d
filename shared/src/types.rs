//! API request and response types

use serde::{Deserialize, Serialize};

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Admin login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Bearer token issued on successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    pub token_type: String,
    /// Validity window in seconds
    pub expires_in: i64,
}

/// The authenticated admin, as seen by the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminProfile {
    pub email: String,
    /// Unix timestamp at which the presented token stops being accepted
    pub expires_at: i64,
}

/// Result of a catalog refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshSummary {
    /// One of `loaded`, `skipped`, `no_matching_records`, `failed`
    pub status: String,
    /// Number of records written; zero unless `status` is `loaded`
    pub loaded: usize,
}
