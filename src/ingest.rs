//! Cache-aware roster ingestion
//!
//! The single entry point the rest of the application uses to obtain
//! employee records. Given a spreadsheet path it serves the cached result
//! when the source file is unchanged, and otherwise runs a full parse and
//! refreshes the cache. Cache problems never fail a request; only a missing
//! source file or an undecodable workbook does.

use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use thiserror::Error;
use tokio::task;
use tracing::{info, warn};

use crate::cache::CacheStore;
use crate::data::{read_workbook, Employee, ParsedSheet, SheetError};

/// Errors that abort an ingestion request
#[derive(Debug, Error)]
pub enum IngestError {
    /// The source spreadsheet does not exist or cannot be inspected
    #[error("Excel file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The workbook could not be decoded (unreadable file, no worksheet)
    #[error(transparent)]
    Sheet(#[from] SheetError),

    /// The background decode task was cancelled or panicked
    #[error("workbook decode task failed: {0}")]
    Task(#[from] task::JoinError),
}

/// Result of a cache-aware ingestion call
#[derive(Debug)]
pub struct ParsedData {
    /// Decoded employee records, in sheet row order
    pub data: Vec<Employee>,
    /// Source file modification time (ms since epoch) the data was parsed at
    pub last_modified: i64,
}

/// Service object for roster ingestion
///
/// Construct one at startup and share it by reference; it holds no request
/// state beyond the cache store handle. Without a resolvable cache
/// directory every request falls back to a full parse.
#[derive(Debug, Clone)]
pub struct ExcelIngestor {
    /// Cache store for parsed rosters
    cache: Option<CacheStore>,
}

impl ExcelIngestor {
    /// Creates an ingestor backed by the per-user application data directory
    pub fn new() -> Self {
        Self {
            cache: CacheStore::new(),
        }
    }

    /// Creates an ingestor with a custom cache store
    pub fn with_cache(cache: CacheStore) -> Self {
        Self { cache: Some(cache) }
    }

    /// Cache-aware parse of the roster at `path`
    ///
    /// Serves the cached records when the stored source identity (path +
    /// modification time) matches the file on disk; otherwise performs a
    /// full parse and rewrites the cache. A missing source file is fatal;
    /// unreadable cache state and cache-write failures are logged and
    /// absorbed.
    pub async fn get_parsed_data(&self, path: &Path) -> Result<ParsedData, IngestError> {
        if let Some(cache) = &self.cache {
            if let Err(error) = cache.ensure_ready() {
                warn!(%error, "cache directory unavailable, proceeding without cache");
            }
        }

        let mtime_ms = source_mtime_ms(path).await?;

        if let Some(cache) = &self.cache {
            if cache.is_fresh(path, mtime_ms) {
                match cache.load() {
                    Ok(data) => {
                        info!(records = data.len(), "serving roster from cache");
                        return Ok(ParsedData {
                            data,
                            last_modified: mtime_ms,
                        });
                    }
                    Err(error) => warn!(%error, "cache unreadable, parsing fresh data"),
                }
            }
        }

        let parsed = decode_on_blocking_task(path).await?;

        if let Some(cache) = &self.cache {
            if let Err(error) = cache.store(&parsed.employees, path, mtime_ms) {
                warn!(%error, "failed to write roster cache");
            }
        }

        Ok(ParsedData {
            data: parsed.employees,
            last_modified: mtime_ms,
        })
    }

    /// Forced fresh parse of the roster at `path`, bypassing the cache
    ///
    /// Neither reads nor writes cache state.
    pub async fn parse_excel(&self, path: &Path) -> Result<Vec<Employee>, IngestError> {
        Ok(decode_on_blocking_task(path).await?.employees)
    }

    /// Deletes the cached roster and its metadata
    ///
    /// Nothing-to-delete is not an error.
    pub async fn clear_cache(&self) -> io::Result<()> {
        if let Some(cache) = &self.cache {
            cache.ensure_ready()?;
            cache.clear()?;
        }
        Ok(())
    }
}

impl Default for ExcelIngestor {
    fn default() -> Self {
        Self::new()
    }
}

/// Modification time of the source file in whole milliseconds since the epoch
///
/// Any stat failure maps to [`IngestError::SourceNotFound`]; there is no
/// fallback for a missing source.
async fn source_mtime_ms(path: &Path) -> Result<i64, IngestError> {
    let not_found = || IngestError::SourceNotFound(path.to_path_buf());
    let metadata = tokio::fs::metadata(path).await.map_err(|_| not_found())?;
    let modified = metadata.modified().map_err(|_| not_found())?;
    Ok(modified
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0))
}

/// Runs the blocking workbook decode off the async runtime's worker threads
async fn decode_on_blocking_task(path: &Path) -> Result<ParsedSheet, IngestError> {
    let path = path.to_path_buf();
    Ok(task::spawn_blocking(move || read_workbook(&path)).await??)
}
