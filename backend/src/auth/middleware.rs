//! Authentication extractor
//!
//! Validates the bearer token on protected routes using the pre-computed JWT
//! keys held in AppState.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts},
};

/// Authenticated admin extracted from the bearer token
#[derive(Debug, Clone)]
pub struct AdminAuth {
    pub email: String,
    pub expires_at: i64,
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AdminAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("Invalid authorization format".to_string()))?;

        let claims = app_state.jwt().validate_token(token)?;

        Ok(AdminAuth {
            email: claims.sub,
            expires_at: claims.exp,
        })
    }
}
