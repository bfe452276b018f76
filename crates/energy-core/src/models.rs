use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

/// Canonical column names every normalized table carries.
pub const TIMESTAMP_COLUMN: &str = "timestamp";
pub const KWH_COLUMN: &str = "kwh";
pub const BUILDING_COLUMN: &str = "building";

/// Layout used when a timestamp is written back out to CSV or text.
pub const TIMESTAMP_OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn serialize_timestamp<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&ts.format(TIMESTAMP_OUTPUT_FORMAT))
}

// ── MeterRow / ReadingTable ───────────────────────────────────────────────────

/// One row of the canonical `(timestamp, kwh, building)` schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeterRow {
    /// Wall-clock time of the reading, no timezone attached.
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
    /// Consumption in kilowatt-hours.
    pub kwh: f64,
    /// Building identifier; never empty.
    pub building: String,
}

impl MeterRow {
    /// CSV header for serialized rows, in field order.
    pub const COLUMNS: [&'static str; 3] = [TIMESTAMP_COLUMN, KWH_COLUMN, BUILDING_COLUMN];

    pub fn new(timestamp: NaiveDateTime, kwh: f64, building: impl Into<String>) -> Self {
        Self {
            timestamp,
            kwh,
            building: building.into(),
        }
    }
}

/// A flat, ordered table of canonical rows.
///
/// This is both the normalizer's output and the shape the aggregation
/// functions consume. Row order is whatever the producer chose; call
/// [`ReadingTable::sort_by_timestamp`] for a globally time-ordered view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingTable {
    rows: Vec<MeterRow>,
}

impl ReadingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<MeterRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[MeterRow] {
        &self.rows
    }

    pub fn push(&mut self, row: MeterRow) {
        self.rows.push(row);
    }

    /// Append every row of `other`, keeping its order.
    pub fn extend(&mut self, other: ReadingTable) {
        self.rows.extend(other.rows);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Stable sort by timestamp; rows sharing a timestamp keep their order.
    pub fn sort_by_timestamp(&mut self) {
        self.rows.sort_by_key(|r| r.timestamp);
    }

    /// The first row holding the maximum `kwh`, or `None` for an empty table.
    pub fn peak(&self) -> Option<&MeterRow> {
        self.rows.iter().fold(None, |best: Option<&MeterRow>, row| match best {
            Some(b) if b.kwh >= row.kwh => Some(b),
            _ => Some(row),
        })
    }

    /// Distinct building identifiers in order of first appearance.
    pub fn building_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !names.contains(&row.building.as_str()) {
                names.push(&row.building);
            }
        }
        names
    }
}

impl FromIterator<MeterRow> for ReadingTable {
    fn from_iter<I: IntoIterator<Item = MeterRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

// ── Reading / Building ────────────────────────────────────────────────────────

/// A single meter reading owned by a [`Building`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub timestamp: NaiveDateTime,
    pub kwh: f64,
}

/// All readings collected for one building during a run.
#[derive(Debug, Clone)]
pub struct Building {
    name: String,
    readings: Vec<Reading>,
}

impl Building {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            readings: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Readings in ingestion order.
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn add_reading(&mut self, timestamp: NaiveDateTime, kwh: f64) {
        self.readings.push(Reading { timestamp, kwh });
    }

    /// Readings stably sorted by timestamp, for output.
    pub fn sorted_readings(&self) -> Vec<Reading> {
        let mut sorted = self.readings.clone();
        sorted.sort_by_key(|r| r.timestamp);
        sorted
    }

    pub fn total_consumption(&self) -> f64 {
        self.readings.iter().map(|r| r.kwh).sum()
    }

    /// Summary statistics over every reading, or `None` when there are none.
    pub fn summary(&self) -> Option<SummaryRow> {
        let values: Vec<f64> = self.readings.iter().map(|r| r.kwh).collect();
        SummaryRow::from_values(&self.name, &values)
    }
}

// ── SummaryRow ────────────────────────────────────────────────────────────────

/// Per-building statistics over its full reading set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub building: String,
    pub total_kwh: f64,
    pub avg_kwh: f64,
    pub min_kwh: f64,
    pub max_kwh: f64,
    /// Sample standard deviation; `None` with fewer than two readings.
    pub std_kwh: Option<f64>,
}

impl SummaryRow {
    /// CSV header for serialized rows, in field order.
    pub const COLUMNS: [&'static str; 6] =
        ["building", "total_kwh", "avg_kwh", "min_kwh", "max_kwh", "std_kwh"];

    /// Reduce `values` to a summary row. Returns `None` for an empty slice.
    pub fn from_values(building: &str, values: &[f64]) -> Option<Self> {
        let (min_kwh, max_kwh) = crate::stats::min_max(values)?;
        Some(Self {
            building: building.to_string(),
            total_kwh: values.iter().sum(),
            avg_kwh: crate::stats::mean(values)?,
            min_kwh,
            max_kwh,
            std_kwh: crate::stats::sample_std_dev(values),
        })
    }
}

// ── PivotTable ────────────────────────────────────────────────────────────────

/// Bucket × building matrix of summed consumption.
///
/// Every building has a value at every bucket; absent combinations hold `0.0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PivotTable {
    /// Bucket labels, ascending and contiguous.
    pub buckets: Vec<NaiveDateTime>,
    /// Column labels, sorted by name.
    pub buildings: Vec<String>,
    /// `values[row][col]` is the sum for `buckets[row]` and `buildings[col]`.
    pub values: Vec<Vec<f64>>,
}

impl PivotTable {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of bucket rows.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    fn column_index(&self, building: &str) -> Option<usize> {
        self.buildings.iter().position(|b| b == building)
    }

    /// All bucket values for one building, top to bottom.
    pub fn column(&self, building: &str) -> Option<Vec<f64>> {
        let idx = self.column_index(building)?;
        Some(self.values.iter().map(|row| row[idx]).collect())
    }

    pub fn get(&self, bucket: NaiveDateTime, building: &str) -> Option<f64> {
        let col = self.column_index(building)?;
        let row = self.buckets.binary_search(&bucket).ok()?;
        Some(self.values[row][col])
    }

    pub fn column_total(&self, building: &str) -> Option<f64> {
        self.column(building).map(|c| c.iter().sum())
    }

    /// Mean over every bucket, zero-filled ones included.
    pub fn column_mean(&self, building: &str) -> Option<f64> {
        self.column(building).and_then(|c| crate::stats::mean(&c))
    }
}
