//! In-process catalog store
//!
//! Backs the router and ingestion tests; the server itself always uses Postgres.

use super::catalog::CatalogStore;
use crate::catalog::CultivarRecord;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryCatalogStore {
    records: RwLock<Vec<CultivarRecord>>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with `records`
    pub fn with_records(records: Vec<CultivarRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn delete_all(&self) -> Result<u64> {
        let mut records = self.records.write().await;
        let deleted = records.len() as u64;
        records.clear();
        Ok(deleted)
    }

    async fn insert_many(&self, new_records: &[CultivarRecord]) -> Result<u64> {
        self.records.write().await.extend_from_slice(new_records);
        Ok(new_records.len() as u64)
    }

    async fn find_all(&self) -> Result<Vec<CultivarRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn find_by_accession(&self, accession: &str) -> Result<Vec<CultivarRecord>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|record| record.accession() == accession)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.records.read().await.len() as i64)
    }

    async fn replace_all(&self, new_records: &[CultivarRecord]) -> Result<u64> {
        let mut records = self.records.write().await;
        *records = new_records.to_vec();
        Ok(records.len() as u64)
    }
}
