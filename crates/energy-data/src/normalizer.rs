//! Schema normalization for heterogeneous meter exports.
//!
//! Turns a [`RawTable`] (header row plus string cells, any column names)
//! into a canonical [`ReadingTable`] of `(timestamp, kwh, building)` rows.

use std::io::Read;
use std::path::Path;

use energy_core::models::{MeterRow, ReadingTable, KWH_COLUMN, TIMESTAMP_COLUMN};
use energy_core::time_utils::parse_timestamp;
use energy_core::{EnergyError, Result};
use tracing::debug;

// ── RawTable ──────────────────────────────────────────────────────────────────

/// An untyped tabular source: a name, a header row and string cells.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    name: String,
    headers: Vec<String>,
    records: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(name: impl Into<String>, headers: Vec<String>, records: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            headers: headers.into_iter().map(|h| h.trim().to_string()).collect(),
            records,
        }
    }

    /// Read a CSV file; the table is named after the file stem.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let unavailable = |source: csv::Error| EnergyError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        };
        let file = std::fs::File::open(path).map_err(|e| unavailable(e.into()))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_csv_reader(name, file).map_err(|e| match e {
            EnergyError::Csv(source) => unavailable(source),
            other => other,
        })
    }

    /// Read CSV text from any reader. Rows may be ragged.
    pub fn from_csv_reader<R: Read>(name: impl Into<String>, reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut records = Vec::new();
        for result in rdr.records() {
            let record = result?;
            records.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self::new(name, headers, records))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Vec<String>] {
        &self.records
    }
}

// ── Column aliases ────────────────────────────────────────────────────────────

/// A canonical column and the alternates accepted for it, highest priority
/// first.
#[derive(Debug, Clone, Copy)]
pub struct ColumnAlias {
    pub canonical: &'static str,
    pub candidates: &'static [&'static str],
}

impl ColumnAlias {
    /// Index of the column serving as `canonical` in `headers`.
    ///
    /// The canonical name wins outright; otherwise the first candidate present
    /// is used, regardless of where it sits in the header row.
    pub fn resolve(&self, headers: &[String]) -> Option<usize> {
        std::iter::once(self.canonical)
            .chain(self.candidates.iter().copied())
            .find_map(|name| headers.iter().position(|h| h == name))
    }
}

/// Resolution rules for every required column.
pub const COLUMN_ALIASES: &[ColumnAlias] = &[
    ColumnAlias {
        canonical: TIMESTAMP_COLUMN,
        candidates: &["time", "date", "datetime"],
    },
    ColumnAlias {
        canonical: KWH_COLUMN,
        candidates: &["kWh", "consumption", "energy"],
    },
];

// ── RecordNormalizer ──────────────────────────────────────────────────────────

/// Stateless converter from [`RawTable`] to the canonical schema.
pub struct RecordNormalizer;

impl RecordNormalizer {
    /// Normalize `raw` into canonical rows tagged with one building name.
    ///
    /// The building is `building` when given and non-empty, otherwise the
    /// source name. Rows whose timestamp does not parse are dropped; kwh
    /// cells that do not parse become `0.0`.
    ///
    /// Fails with [`EnergyError::Schema`] when a required column cannot be
    /// resolved or when no row survives.
    pub fn normalize(raw: &RawTable, building: Option<&str>) -> Result<ReadingTable> {
        let [ts_idx, kwh_idx] = Self::resolve_columns(raw)?;

        let building = building
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| raw.name())
            .to_string();
        if building.is_empty() {
            return Err(EnergyError::schema(raw.name(), "no building name available"));
        }

        let mut table = ReadingTable::new();
        let mut dropped = 0usize;
        let mut coerced = 0usize;

        for record in raw.records() {
            let cell = |idx: usize| record.get(idx).map(String::as_str).unwrap_or("");

            let Some(timestamp) = parse_timestamp(cell(ts_idx)) else {
                dropped += 1;
                continue;
            };

            let kwh = match parse_kwh(cell(kwh_idx)) {
                Some(v) => v,
                None => {
                    coerced += 1;
                    0.0
                }
            };

            table.push(MeterRow::new(timestamp, kwh, building.clone()));
        }

        debug!(
            "Normalized {}: {} rows kept, {} dropped (bad timestamp), {} kwh coerced to 0",
            raw.name(),
            table.len(),
            dropped,
            coerced,
        );

        if table.is_empty() {
            return Err(EnergyError::schema(raw.name(), "no valid rows"));
        }

        Ok(table)
    }

    /// Column indices for `[timestamp, kwh]`.
    fn resolve_columns(raw: &RawTable) -> Result<[usize; 2]> {
        let mut found = [0usize; 2];
        for (slot, alias) in found.iter_mut().zip(COLUMN_ALIASES) {
            *slot = alias.resolve(raw.headers()).ok_or_else(|| {
                EnergyError::schema(
                    raw.name(),
                    format!("missing required column '{}'", alias.canonical),
                )
            })?;
        }
        Ok(found)
    }
}

/// Parse a consumption cell. `None` for empty, non-numeric or non-finite
/// input; negative values pass through.
pub fn parse_kwh(cell: &str) -> Option<f64> {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
