//! Admin credential repository

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Admin record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdminRecord {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Admin repository for database operations
pub struct AdminRepository;

impl AdminRepository {
    /// Find admin by email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<AdminRecord>> {
        let admin = sqlx::query_as::<_, AdminRecord>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM admins
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(admin)
    }

    /// Create the admin, or replace the password hash if the email exists
    pub async fn upsert(pool: &PgPool, email: &str, password_hash: &str) -> Result<AdminRecord> {
        let admin = sqlx::query_as::<_, AdminRecord>(
            r#"
            INSERT INTO admins (email, password_hash)
            VALUES ($1, $2)
            ON CONFLICT (email) DO UPDATE SET password_hash = EXCLUDED.password_hash
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await?;

        Ok(admin)
    }
}
