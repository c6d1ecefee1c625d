//! Catalog document store
//!
//! The `apple_data` collection holds one JSONB document per cultivar record.

use crate::catalog::CultivarRecord;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

/// Rows per multi-row INSERT; one bind each, well under Postgres' 65535 limit
const INSERT_BATCH: usize = 1000;

/// Storage for ingested cultivar records
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Remove every record, returning how many were deleted
    async fn delete_all(&self) -> Result<u64>;

    /// Append records in order, returning how many were inserted
    async fn insert_many(&self, records: &[CultivarRecord]) -> Result<u64>;

    /// All records in insertion order
    async fn find_all(&self) -> Result<Vec<CultivarRecord>>;

    /// Records whose `ACCESSION` renders as `accession`
    async fn find_by_accession(&self, accession: &str) -> Result<Vec<CultivarRecord>>;

    async fn count(&self) -> Result<i64>;

    /// Swap the whole collection for `records`
    async fn replace_all(&self, records: &[CultivarRecord]) -> Result<u64> {
        self.delete_all().await?;
        self.insert_many(records).await
    }
}

/// Postgres-backed catalog store
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_in(tx: &mut Transaction<'_, Postgres>, records: &[CultivarRecord]) -> Result<u64> {
        let mut inserted = 0;
        for batch in records.chunks(INSERT_BATCH) {
            let result = insert_query(batch).build().execute(&mut **tx).await?;
            inserted += result.rows_affected();
        }
        Ok(inserted)
    }
}

fn insert_query(batch: &[CultivarRecord]) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("INSERT INTO apple_data (document) ");
    builder.push_values(batch, |mut row, record| {
        row.push_bind(Value::Object(record.fields.clone()));
    });
    builder
}

fn into_records(documents: Vec<Value>) -> Result<Vec<CultivarRecord>> {
    documents.into_iter().map(CultivarRecord::try_from).collect()
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM apple_data")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn insert_many(&self, records: &[CultivarRecord]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let inserted = Self::insert_in(&mut tx, records).await?;
        tx.commit().await?;
        Ok(inserted)
    }

    async fn find_all(&self) -> Result<Vec<CultivarRecord>> {
        let documents = sqlx::query_scalar::<_, Value>(
            r#"
            SELECT document
            FROM apple_data
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        into_records(documents)
    }

    async fn find_by_accession(&self, accession: &str) -> Result<Vec<CultivarRecord>> {
        // ->> renders numbers without quotes, matching value_as_text
        let documents = sqlx::query_scalar::<_, Value>(
            r#"
            SELECT document
            FROM apple_data
            WHERE document ->> 'ACCESSION' = $1
            ORDER BY id
            "#,
        )
        .bind(accession)
        .fetch_all(&self.pool)
        .await?;

        into_records(documents)
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM apple_data")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Delete and insert inside one transaction so readers never see an
    /// empty collection mid-refresh.
    async fn replace_all(&self, records: &[CultivarRecord]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM apple_data")
            .execute(&mut *tx)
            .await?;
        let inserted = Self::insert_in(&mut tx, records).await?;
        tx.commit().await?;
        Ok(inserted)
    }
}
