//! Integration tests for catalog ingestion

mod common;

use anyhow::Result;
use apple_catalog_backend::{
    catalog::CultivarRecord,
    config::CatalogConfig,
    repositories::{CatalogStore, MemoryCatalogStore},
    services::{CatalogIngestion, IngestionError, IngestionOutcome},
};
use async_trait::async_trait;
use serde_json::json;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Notify;

const HEADER: &str = "ACCESSION,CULTIVAR NAME,ORIGIN";

/// Lay out `TDInventory.csv` and `FruitPictures/Heritage/<images>` under `root`
fn fixture(root: &Path, rows: &[&str], images: &[&str]) -> CatalogConfig {
    let config = common::catalog_config(root).catalog;

    let mut csv = String::from(HEADER);
    for row in rows {
        csv.push('\n');
        csv.push_str(row);
    }
    fs::write(&config.spreadsheet_path, csv).unwrap();

    fs::create_dir_all(&config.image_dir).unwrap();
    for image in images {
        fs::write(config.image_dir.join(image), b"jpeg").unwrap();
    }

    config
}

fn seeded_store() -> Arc<MemoryCatalogStore> {
    Arc::new(MemoryCatalogStore::with_records(vec![common::record(
        json!({"ACCESSION": "old", "CULTIVAR NAME": "Previous Load"}),
    )]))
}

fn ingestion(store: &Arc<MemoryCatalogStore>, config: CatalogConfig) -> CatalogIngestion {
    let store: Arc<dyn CatalogStore> = store.clone();
    CatalogIngestion::new(store, config)
}

#[tokio::test]
async fn test_matching_row_gets_image_url() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture(dir.path(), &["123,Gala Apple,NZ"], &["Gala_Apple_123.jpg"]);
    let store = Arc::new(MemoryCatalogStore::new());

    let outcome = ingestion(&store, config).run().await;

    assert_eq!(outcome, IngestionOutcome::Loaded(1));
    let records = store.find_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].image_url(),
        Some("/static/FruitPictures/Heritage/Gala_Apple_123.jpg")
    );
    assert_eq!(records[0].text("ORIGIN"), "NZ");
}

#[tokio::test]
async fn test_unmatched_rows_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture(
        dir.path(),
        &["123,Gala Apple,NZ", "456,Fuji,JP", "789,Braeburn,"],
        &["Gala_Apple_123.jpg", "Braeburn_000.jpg"],
    );
    let store = Arc::new(MemoryCatalogStore::new());

    let outcome = ingestion(&store, config).run().await;

    assert_eq!(outcome, IngestionOutcome::Loaded(1));
    let accessions: Vec<String> = store
        .find_all()
        .await
        .unwrap()
        .iter()
        .map(CultivarRecord::accession)
        .collect();
    assert_eq!(accessions, vec!["123"]);
}

#[tokio::test]
async fn test_no_matches_preserves_existing_store() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture(dir.path(), &["456,Fuji,JP"], &["Gala_Apple_123.jpg"]);
    let store = seeded_store();
    let before = store.find_all().await.unwrap();

    let service = ingestion(&store, config);
    assert!(matches!(
        service.try_run().await,
        Err(IngestionError::NoMatchingRecords)
    ));
    assert_eq!(service.run().await, IngestionOutcome::NoMatchingRecords);

    assert_eq!(store.find_all().await.unwrap(), before);
}

#[tokio::test]
async fn test_empty_spreadsheet_preserves_existing_store() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture(dir.path(), &[], &["Gala_Apple_123.jpg"]);
    let store = seeded_store();
    let before = store.find_all().await.unwrap();

    let outcome = ingestion(&store, config).run().await;

    assert_eq!(outcome, IngestionOutcome::NoMatchingRecords);
    assert_eq!(store.find_all().await.unwrap(), before);
}

#[tokio::test]
async fn test_missing_spreadsheet_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fixture(dir.path(), &["123,Gala Apple,NZ"], &["Gala_Apple_123.jpg"]);
    config.spreadsheet_path = dir.path().join("absent.xlsx");
    let store = seeded_store();
    let before = store.find_all().await.unwrap();

    let service = ingestion(&store, config);
    assert!(matches!(
        service.try_run().await,
        Err(IngestionError::SourceMissing(_))
    ));
    assert_eq!(service.run().await, IngestionOutcome::Skipped);

    assert_eq!(store.find_all().await.unwrap(), before);
}

#[tokio::test]
async fn test_missing_image_folder_fails_without_touching_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fixture(dir.path(), &["123,Gala Apple,NZ"], &[]);
    config.image_dir = dir.path().join("no-such-folder");
    let store = seeded_store();
    let before = store.find_all().await.unwrap();

    let service = ingestion(&store, config);
    let err = service.try_run().await.unwrap_err();
    assert_eq!(err.kind(), "image_directory");
    assert_eq!(service.run().await, IngestionOutcome::Failed);

    assert_eq!(store.find_all().await.unwrap(), before);
}

#[tokio::test]
async fn test_unreadable_source_fails_without_touching_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fixture(dir.path(), &["123,Gala Apple,NZ"], &["Gala_Apple_123.jpg"]);
    // Present but not a workbook
    let bogus = dir.path().join("TDInventory.xlsx");
    fs::write(&bogus, b"definitely not a zip archive").unwrap();
    config.spreadsheet_path = bogus;
    let store = seeded_store();
    let before = store.find_all().await.unwrap();

    let service = ingestion(&store, config);
    assert_eq!(service.try_run().await.unwrap_err().kind(), "parse");
    assert_eq!(store.find_all().await.unwrap(), before);
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture(
        dir.path(),
        &["123,Gala Apple,NZ", "7,Fuji,JP"],
        &["Gala_Apple_123.jpg", "Fuji-7.png", "unrelated.jpg"],
    );
    let store = Arc::new(MemoryCatalogStore::new());
    let service = ingestion(&store, config);

    assert_eq!(service.run().await, IngestionOutcome::Loaded(2));
    let first = store.find_all().await.unwrap();

    assert_eq!(service.run().await, IngestionOutcome::Loaded(2));
    assert_eq!(store.find_all().await.unwrap(), first);
}

#[tokio::test]
async fn test_first_image_in_name_order_wins() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture(
        dir.path(),
        &["123,Gala Apple,NZ"],
        &["Gala_Apple_123_side.jpg", "Gala_Apple_123_front.jpg"],
    );
    let store = Arc::new(MemoryCatalogStore::new());

    ingestion(&store, config).run().await;

    let records = store.find_all().await.unwrap();
    assert_eq!(
        records[0].image_url(),
        Some("/static/FruitPictures/Heritage/Gala_Apple_123_front.jpg")
    );
}

/// Store whose `replace_all` parks until released
struct ParkedStore {
    inner: MemoryCatalogStore,
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl CatalogStore for ParkedStore {
    async fn delete_all(&self) -> Result<u64> {
        self.inner.delete_all().await
    }

    async fn insert_many(&self, records: &[CultivarRecord]) -> Result<u64> {
        self.inner.insert_many(records).await
    }

    async fn find_all(&self) -> Result<Vec<CultivarRecord>> {
        self.inner.find_all().await
    }

    async fn find_by_accession(&self, accession: &str) -> Result<Vec<CultivarRecord>> {
        self.inner.find_by_accession(accession).await
    }

    async fn count(&self) -> Result<i64> {
        self.inner.count().await
    }

    async fn replace_all(&self, records: &[CultivarRecord]) -> Result<u64> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.replace_all(records).await
    }
}

#[tokio::test]
async fn test_concurrent_run_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture(dir.path(), &["123,Gala Apple,NZ"], &["Gala_Apple_123.jpg"]);
    let store = Arc::new(ParkedStore {
        inner: MemoryCatalogStore::new(),
        entered: Notify::new(),
        release: Notify::new(),
    });
    let dyn_store: Arc<dyn CatalogStore> = store.clone();
    let service = Arc::new(CatalogIngestion::new(dyn_store, config));

    let first = tokio::spawn({
        let service = Arc::clone(&service);
        async move { service.run().await }
    });
    store.entered.notified().await;

    assert_eq!(service.run().await, IngestionOutcome::AlreadyRunning);

    store.release.notify_one();
    assert_eq!(first.await.unwrap(), IngestionOutcome::Loaded(1));
    assert_eq!(store.count().await.unwrap(), 1);
}

fn workbook_fixture() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/inventory.xlsx")
}

#[tokio::test]
async fn test_workbook_numeric_accession_matches_image() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fixture(dir.path(), &[], &["Gala_Apple_123.jpg", "Unrelated.jpg"]);
    config.spreadsheet_path = workbook_fixture();
    let store = Arc::new(MemoryCatalogStore::new());

    let outcome = ingestion(&store, config).run().await;

    assert_eq!(outcome, IngestionOutcome::Loaded(1));
    let records = store.find_all().await.unwrap();
    assert_eq!(records[0].accession(), "123");
    assert_eq!(records[0].text("RECEIVED"), "2021-03-15");
    assert_eq!(
        records[0].image_url(),
        Some("/static/FruitPictures/Heritage/Gala_Apple_123.jpg")
    );
}

#[tokio::test]
async fn test_workbook_without_sheet_fails_without_touching_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fixture(dir.path(), &[], &["Gala_Apple_123.jpg"]);
    config.spreadsheet_path = workbook_fixture();
    config.sheet_name = "Pyrus".to_string();
    let store = seeded_store();
    let before = store.find_all().await.unwrap();

    let service = ingestion(&store, config);
    assert_eq!(service.try_run().await.unwrap_err().kind(), "parse");
    assert_eq!(service.run().await, IngestionOutcome::Failed);

    assert_eq!(store.find_all().await.unwrap(), before);
}
