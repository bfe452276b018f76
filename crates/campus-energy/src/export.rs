use std::path::{Path, PathBuf};

use anyhow::Context;
use energy_core::models::{
    MeterRow, PivotTable, ReadingTable, SummaryRow, TIMESTAMP_COLUMN, TIMESTAMP_OUTPUT_FORMAT,
};
use serde::Serialize;
use energy_data::analysis::AnalysisResult;

pub const CLEANED_FILE: &str = "cleaned_energy_data.csv";
pub const SUMMARY_FILE: &str = "building_summary.csv";
pub const DAILY_FILE: &str = "daily_totals.csv";
pub const WEEKLY_FILE: &str = "weekly_totals.csv";
pub const EXECUTIVE_SUMMARY_FILE: &str = "summary.txt";

// ── ExecutiveSummary ───────────────────────────────────────────────────────────

/// Campus-wide headline figures derived from the analysis outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutiveSummary {
    /// Sum of every building's total.
    pub total_kwh: f64,
    /// Building with the largest total, and that total.
    pub top_building: Option<(String, f64)>,
    /// The single largest reading.
    pub peak: Option<MeterRow>,
}

impl ExecutiveSummary {
    /// Derive the headline figures.
    ///
    /// Ties for the top building go to the earliest summary row; ties for the
    /// peak go to the earliest row of `combined`.
    pub fn derive(summaries: &[SummaryRow], combined: &ReadingTable) -> Self {
        let total_kwh = summaries.iter().map(|s| s.total_kwh).sum();
        let top_building = summaries
            .iter()
            .fold(None, |best: Option<&SummaryRow>, s| match best {
                Some(b) if b.total_kwh >= s.total_kwh => Some(b),
                _ => Some(s),
            })
            .map(|s| (s.building.clone(), s.total_kwh));

        Self {
            total_kwh,
            top_building,
            peak: combined.peak().cloned(),
        }
    }

    /// Render as the three-line `summary.txt` body.
    pub fn render(&self) -> String {
        let top = match &self.top_building {
            Some((name, total)) => format!("{} ({:.2} kWh)", name, total),
            None => "none".to_string(),
        };
        let peak = match &self.peak {
            Some(row) => format!(
                "{:.2} at {}",
                row.kwh,
                row.timestamp.format(TIMESTAMP_OUTPUT_FORMAT)
            ),
            None => "none".to_string(),
        };

        format!(
            "Total campus consumption (kWh): {:.2}\n\
             Highest consuming building: {}\n\
             Peak recorded kWh: {}\n",
            self.total_kwh, top, peak
        )
    }
}

// ── Writers ────────────────────────────────────────────────────────────────────

fn create_writer(path: &Path, header: &[&str]) -> anyhow::Result<csv::Writer<std::fs::File>> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    wtr.write_record(header)?;
    Ok(wtr)
}

/// Write serializable rows under `header`. The header is written even when
/// there are no rows.
fn write_rows<T: Serialize>(
    path: &Path,
    header: &[&str],
    rows: impl IntoIterator<Item = T>,
) -> anyhow::Result<()> {
    let mut wtr = create_writer(path, header)?;
    for row in rows {
        wtr.serialize(row)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the cleaned `(timestamp, kwh, building)` table.
pub fn write_cleaned(path: &Path, table: &ReadingTable) -> anyhow::Result<()> {
    write_rows(path, &MeterRow::COLUMNS, table.rows())
}

/// Write the building summary; an absent standard deviation is an empty cell.
pub fn write_summary(path: &Path, summaries: &[SummaryRow]) -> anyhow::Result<()> {
    write_rows(path, &SummaryRow::COLUMNS, summaries)
}

/// Write a pivot as `timestamp,<building>...` rows.
///
/// Cells are serialized like the other exports, so `10.0` is written `10.0`.
pub fn write_pivot(path: &Path, pivot: &PivotTable) -> anyhow::Result<()> {
    let mut header = vec![TIMESTAMP_COLUMN];
    header.extend(pivot.buildings.iter().map(String::as_str));
    let mut wtr = create_writer(path, &header)?;

    for (bucket, row) in pivot.buckets.iter().zip(&pivot.values) {
        wtr.write_field(bucket.format(TIMESTAMP_OUTPUT_FORMAT).to_string())?;
        wtr.serialize(row)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    wtr.flush()?;
    Ok(())
}

/// Paths of every file written by [`export_all`].
#[derive(Debug, Clone)]
pub struct ExportPaths {
    pub cleaned: PathBuf,
    pub summary: PathBuf,
    pub daily: PathBuf,
    pub weekly: PathBuf,
    pub executive_summary: PathBuf,
}

/// Write every export for `result` into `out_dir`.
pub fn export_all(result: &AnalysisResult, out_dir: &Path) -> anyhow::Result<ExportPaths> {
    let paths = ExportPaths {
        cleaned: out_dir.join(CLEANED_FILE),
        summary: out_dir.join(SUMMARY_FILE),
        daily: out_dir.join(DAILY_FILE),
        weekly: out_dir.join(WEEKLY_FILE),
        executive_summary: out_dir.join(EXECUTIVE_SUMMARY_FILE),
    };

    write_cleaned(&paths.cleaned, &result.cleaned)?;
    write_summary(&paths.summary, &result.summaries)?;
    write_pivot(&paths.daily, &result.daily)?;
    write_pivot(&paths.weekly, &result.weekly)?;

    let executive = ExecutiveSummary::derive(&result.summaries, &result.combined);
    std::fs::write(&paths.executive_summary, executive.render()).with_context(|| {
        format!("Failed to write {}", paths.executive_summary.display())
    })?;

    Ok(paths)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use energy_data::analysis::analyze_table;
    use energy_data::reader::LoadReport;
    use tempfile::TempDir;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn example_result() -> AnalysisResult {
        let table = ReadingTable::from_rows(vec![
            MeterRow::new(day(1), 10.0, "A"),
            MeterRow::new(day(2), 5.0, "A"),
            MeterRow::new(day(8), 7.0, "B"),
        ]);
        analyze_table(table, &LoadReport::default(), 0.0)
    }

    // ── ExecutiveSummary ──────────────────────────────────────────────────────

    #[test]
    fn test_executive_summary_figures() {
        let result = example_result();
        let summary = ExecutiveSummary::derive(&result.summaries, &result.combined);

        assert!((summary.total_kwh - 22.0).abs() < 1e-9);
        assert_eq!(summary.top_building, Some(("A".to_string(), 15.0)));
        let peak = summary.peak.unwrap();
        assert_eq!(peak.kwh, 10.0);
        assert_eq!(peak.timestamp, day(1));
    }

    #[test]
    fn test_executive_summary_render() {
        let result = example_result();
        let text = ExecutiveSummary::derive(&result.summaries, &result.combined).render();
        assert_eq!(
            text,
            "Total campus consumption (kWh): 22.00\n\
             Highest consuming building: A (15.00 kWh)\n\
             Peak recorded kWh: 10.00 at 2024-01-01 00:00:00\n"
        );
    }

    #[test]
    fn test_executive_summary_empty() {
        let summary = ExecutiveSummary::derive(&[], &ReadingTable::new());
        assert_eq!(summary.total_kwh, 0.0);
        assert!(summary.top_building.is_none());
        assert!(summary.render().contains("Peak recorded kWh: none"));
    }

    // ── Writers ───────────────────────────────────────────────────────────────

    #[test]
    fn test_export_all_writes_every_file() {
        let dir = TempDir::new().unwrap();
        let paths = export_all(&example_result(), dir.path()).unwrap();

        let cleaned = std::fs::read_to_string(&paths.cleaned).unwrap();
        assert!(cleaned.starts_with("timestamp,kwh,building\n2024-01-01 00:00:00,10.0,A\n"));

        let summary = std::fs::read_to_string(&paths.summary).unwrap();
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines[0], "building,total_kwh,avg_kwh,min_kwh,max_kwh,std_kwh");
        assert_eq!(lines[2], "B,7.0,7.0,7.0,7.0,");

        let daily = std::fs::read_to_string(&paths.daily).unwrap();
        let daily_lines: Vec<&str> = daily.lines().collect();
        assert_eq!(daily_lines.len(), 9);
        assert_eq!(daily_lines[0], "timestamp,A,B");
        assert_eq!(daily_lines[1], "2024-01-01 00:00:00,10.0,0.0");
        assert_eq!(daily_lines[8], "2024-01-08 00:00:00,0.0,7.0");

        let weekly = std::fs::read_to_string(&paths.weekly).unwrap();
        assert!(weekly.contains("2024-01-07 00:00:00,15.0,0.0"));

        assert!(paths.executive_summary.exists());
    }

    #[test]
    fn test_write_empty_tables_keep_headers() {
        let dir = TempDir::new().unwrap();
        let cleaned = dir.path().join("c.csv");
        let summary = dir.path().join("s.csv");
        let pivot = dir.path().join("p.csv");

        write_cleaned(&cleaned, &ReadingTable::new()).unwrap();
        write_summary(&summary, &[]).unwrap();
        write_pivot(&pivot, &PivotTable::default()).unwrap();

        assert_eq!(std::fs::read_to_string(cleaned).unwrap(), "timestamp,kwh,building\n");
        assert_eq!(
            std::fs::read_to_string(summary).unwrap(),
            "building,total_kwh,avg_kwh,min_kwh,max_kwh,std_kwh\n"
        );
        assert_eq!(std::fs::read_to_string(pivot).unwrap(), "timestamp\n");
    }
}
