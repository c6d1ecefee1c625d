//! Admin login service
//!
//! Password verification runs on the blocking thread pool; token issuance uses
//! the pre-computed keys in the JWT service.

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::AdminRepository;
use apple_catalog_shared::AuthToken;
use sqlx::PgPool;
use tracing::{info, warn};
use validator::ValidateEmail;

/// Admin authentication operations
pub struct AdminService;

impl AdminService {
    /// Login with email and password
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(
        pool: &PgPool,
        jwt_service: &JwtService,
        email: &str,
        password: &str,
    ) -> Result<AuthToken, ApiError> {
        check_email(email)?;

        let admin = AdminRepository::find_by_email(pool, email)
            .await
            .map_err(ApiError::Internal)?;

        let Some(admin) = admin else {
            // Same bcrypt work as a real account
            PasswordService::verify_placeholder_async(password.to_string())
                .await
                .map_err(ApiError::Internal)?;
            warn!("Login attempt for unknown admin");
            return Err(invalid_credentials());
        };

        let valid = PasswordService::verify_async(password.to_string(), admin.password_hash)
            .await
            .map_err(ApiError::Internal)?;

        if !valid {
            warn!(admin_id = admin.id, "Login attempt with wrong password");
            return Err(invalid_credentials());
        }

        let access_token = jwt_service
            .generate_token(&admin.email)
            .map_err(ApiError::Internal)?;

        info!(admin_id = admin.id, "Admin logged in");

        Ok(AuthToken {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt_service.token_expiry_secs(),
        })
    }

    /// Provision (or re-key) an admin account from configuration
    pub async fn bootstrap(pool: &PgPool, email: &str, password: &str) -> anyhow::Result<()> {
        check_email(email)?;
        apple_catalog_shared::validation::validate_password(password).map_err(anyhow::Error::msg)?;

        let hash = PasswordService::hash_async(password.to_string()).await?;
        let admin = AdminRepository::upsert(pool, email, &hash).await?;
        info!(admin_id = admin.id, "Bootstrap admin account ready");
        Ok(())
    }
}

/// Login and bootstrap accept the same addresses
fn check_email(email: &str) -> Result<(), ApiError> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(ApiError::Validation("Invalid email format".to_string()))
    }
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid credentials".to_string())
}
