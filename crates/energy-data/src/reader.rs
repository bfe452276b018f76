//! CSV discovery and loading for per-building meter exports.
//!
//! Each `*.csv` file in the data directory is one building's export. Files
//! that cannot be read or normalized are skipped with a warning; the rest are
//! merged into one time-sorted [`ReadingTable`].

use std::path::{Path, PathBuf};

use energy_core::models::ReadingTable;
use tracing::{debug, error, warn};

use crate::normalizer::{RawTable, RecordNormalizer};

// ── LoadReport ────────────────────────────────────────────────────────────────

/// What happened while loading a data directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// CSV files found in the directory.
    pub files_found: usize,
    /// Files that produced at least one reading.
    pub files_loaded: usize,
    /// Files skipped as unreadable or schema-invalid.
    pub skipped: Vec<PathBuf>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Find the `.csv` files directly inside `data_dir`, sorted by path.
pub fn find_csv_files(data_dir: &Path) -> Vec<PathBuf> {
    if !data_dir.exists() {
        warn!("Data directory does not exist: {}", data_dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_dir)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == "csv")
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Read and normalize one building export.
///
/// The building is named `building_name` when given, otherwise after the file
/// stem. Returns `None`, after logging why, when the file is missing,
/// unreadable or lacks the required columns.
pub fn read_building_file(path: &Path, building_name: Option<&str>) -> Option<ReadingTable> {
    let result = RawTable::from_csv_path(path)
        .and_then(|raw| RecordNormalizer::normalize(&raw, building_name));

    match result {
        Ok(table) => Some(table),
        Err(e) if e.is_skippable() => {
            warn!("{}", e);
            None
        }
        Err(e) => {
            error!("Failed to load {}: {}", path.display(), e);
            None
        }
    }
}

/// Load every CSV export in `data_dir`.
///
/// Returns the union of all normalized tables, stably sorted by timestamp,
/// together with a [`LoadReport`]. An empty directory, or one where every
/// file fails, yields an empty table.
pub fn load_all(data_dir: &Path) -> (ReadingTable, LoadReport) {
    let files = find_csv_files(data_dir);
    let mut report = LoadReport {
        files_found: files.len(),
        ..LoadReport::default()
    };

    let mut combined = ReadingTable::new();
    for file in &files {
        match read_building_file(file, None) {
            Some(table) => {
                debug!("Loaded {} readings from {}", table.len(), file.display());
                report.files_loaded += 1;
                combined.extend(table);
            }
            None => {
                warn!("Skipping file: {}", file.display());
                report.skipped.push(file.clone());
            }
        }
    }

    combined.sort_by_timestamp();
    (combined, report)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
