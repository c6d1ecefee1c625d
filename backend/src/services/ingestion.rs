//! Catalog ingestion service
//!
//! Loads the inventory spreadsheet, keeps only rows that have a matching image
//! in the image folder, and swaps the catalog store contents for that set.
//!
//! A run never fails outward: every problem is logged and the store is left
//! as it was. Runs are single-flight; a run requested while another is in
//! progress is refused rather than queued.

use crate::catalog::{read_records, CultivarRecord, ImageIndex, SourceError};
use crate::config::CatalogConfig;
use crate::repositories::CatalogStore;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Why an ingestion run did not load anything
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Spreadsheet not found at {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("Failed to read spreadsheet: {0}")]
    Source(#[from] SourceError),

    #[error("Failed to list image folder {}: {source}", .path.display())]
    ImageDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No records matched an image")]
    NoMatchingRecords,

    #[error("Failed to write catalog: {0}")]
    Store(anyhow::Error),

    #[error("Ingestion already in progress")]
    AlreadyRunning,

    #[error("Ingestion task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IngestionError {
    /// Short label for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            IngestionError::SourceMissing(_) => "source_missing",
            IngestionError::Source(SourceError::Io(_)) => "io",
            IngestionError::Source(_) => "parse",
            IngestionError::ImageDirectory { .. } => "image_directory",
            IngestionError::NoMatchingRecords => "no_matching_records",
            IngestionError::Store(_) => "store",
            IngestionError::AlreadyRunning => "already_running",
            IngestionError::Task(_) => "task",
        }
    }
}

/// What a run did, for reporting only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionOutcome {
    /// Store replaced with this many records
    Loaded(usize),
    /// Spreadsheet absent; store untouched
    Skipped,
    /// Nothing matched an image; store untouched
    NoMatchingRecords,
    /// Read, match or write failed; store untouched
    Failed,
    /// Another run held the guard; store untouched
    AlreadyRunning,
}

impl IngestionOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            IngestionOutcome::Loaded(_) => "loaded",
            IngestionOutcome::Skipped => "skipped",
            IngestionOutcome::NoMatchingRecords => "no_matching_records",
            IngestionOutcome::Failed => "failed",
            IngestionOutcome::AlreadyRunning => "already_running",
        }
    }

    pub fn loaded(&self) -> usize {
        match self {
            IngestionOutcome::Loaded(n) => *n,
            _ => 0,
        }
    }
}

/// Spreadsheet-to-store ingestion
pub struct CatalogIngestion {
    store: Arc<dyn CatalogStore>,
    config: CatalogConfig,
    guard: Mutex<()>,
}

impl CatalogIngestion {
    pub fn new(store: Arc<dyn CatalogStore>, config: CatalogConfig) -> Self {
        Self {
            store,
            config,
            guard: Mutex::new(()),
        }
    }

    /// Run ingestion, absorbing and logging any error
    pub async fn run(&self) -> IngestionOutcome {
        match self.try_run().await {
            Ok(loaded) => {
                info!(loaded, "Apple data with images loaded into catalog store");
                IngestionOutcome::Loaded(loaded)
            }
            Err(IngestionError::SourceMissing(path)) => {
                warn!(path = %path.display(), "Spreadsheet not found, skipping catalog ingestion");
                IngestionOutcome::Skipped
            }
            Err(IngestionError::NoMatchingRecords) => {
                warn!("No apple data with images found, skipping insertion");
                IngestionOutcome::NoMatchingRecords
            }
            Err(IngestionError::AlreadyRunning) => {
                warn!("Catalog ingestion already in progress");
                IngestionOutcome::AlreadyRunning
            }
            Err(e) => {
                error!(error = %e, kind = e.kind(), "Catalog ingestion failed, store left unchanged");
                IngestionOutcome::Failed
            }
        }
    }

    /// Run ingestion and report the typed error
    pub async fn try_run(&self) -> Result<usize, IngestionError> {
        let _guard = self
            .guard
            .try_lock()
            .map_err(|_| IngestionError::AlreadyRunning)?;

        let config = self.config.clone();
        let records = tokio::task::spawn_blocking(move || prepare_records(&config)).await??;

        if records.is_empty() {
            return Err(IngestionError::NoMatchingRecords);
        }

        self.store
            .replace_all(&records)
            .await
            .map_err(IngestionError::Store)?;

        Ok(records.len())
    }
}

/// Read the spreadsheet and keep the rows that have an image (blocking)
pub fn prepare_records(config: &CatalogConfig) -> Result<Vec<CultivarRecord>, IngestionError> {
    let path = &config.spreadsheet_path;
    if !path.exists() {
        return Err(IngestionError::SourceMissing(path.clone()));
    }

    let rows = read_records(path, &config.sheet_name)?;
    if rows.is_empty() {
        return Ok(rows);
    }

    let images = ImageIndex::scan(&config.image_dir).map_err(|source| {
        IngestionError::ImageDirectory {
            path: config.image_dir.clone(),
            source,
        }
    })?;

    let total = rows.len();
    let matched = attach_images(rows, &images, &config.image_url_prefix);
    info!(rows = total, images = images.len(), matched = matched.len(), "Matched catalog rows to images");

    Ok(matched)
}

/// Keep rows with a matching image, setting their `image_url`
pub fn attach_images(
    rows: Vec<CultivarRecord>,
    images: &ImageIndex,
    url_prefix: &str,
) -> Vec<CultivarRecord> {
    rows.into_iter()
        .filter_map(|mut record| {
            let filename = images.find(&record.accession(), &record.filename_stem())?;
            let url = format!("{}/{}", url_prefix.trim_end_matches('/'), filename);
            record.set_image_url(url);
            Some(record)
        })
        .collect()
}
