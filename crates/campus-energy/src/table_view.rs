//! Terminal tables for the daily/weekly pivots and the building summary.

use comfy_table::{modifiers, presets, Attribute, Cell, CellAlignment, Color, Table};
use energy_core::formatting::{format_number, share_percent};
use energy_core::models::{PivotTable, SummaryRow};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table
}

fn kwh_cell(value: f64) -> Cell {
    Cell::new(format_number(value, 2)).set_alignment(CellAlignment::Right)
}

/// Pivot rows with one column per building, then a totals row and an
/// average-per-bucket row.
///
/// `label_format` is the strftime layout for the bucket column.
pub fn build_pivot_table(pivot: &PivotTable, label_format: &str) -> Table {
    let mut table = new_table();

    let mut header = vec![Cell::new("Period")];
    header.extend(pivot.buildings.iter().map(Cell::new));
    table.set_header(header);

    for (bucket, values) in pivot.buckets.iter().zip(&pivot.values) {
        let mut row = vec![Cell::new(bucket.format(label_format))];
        row.extend(values.iter().map(|&v| {
            let cell = kwh_cell(v);
            if v == 0.0 {
                cell.add_attribute(Attribute::Dim)
            } else {
                cell
            }
        }));
        table.add_row(row);
    }

    let mut totals = vec![Cell::new("TOTAL").add_attribute(Attribute::Bold)];
    totals.extend(
        pivot
            .buildings
            .iter()
            .map(|b| kwh_cell(pivot.column_total(b).unwrap_or(0.0)).add_attribute(Attribute::Bold)),
    );
    table.add_row(totals);

    let mut means = vec![Cell::new("AVERAGE").add_attribute(Attribute::Dim)];
    means.extend(
        pivot
            .buildings
            .iter()
            .map(|b| kwh_cell(pivot.column_mean(b).unwrap_or(0.0))),
    );
    table.add_row(means);

    table
}

/// One row per building with its statistics and share of the campus total.
/// The building with the largest total is highlighted.
pub fn build_summary_table(summaries: &[SummaryRow]) -> Table {
    let campus_total: f64 = summaries.iter().map(|s| s.total_kwh).sum();
    let top_total = summaries
        .iter()
        .map(|s| s.total_kwh)
        .fold(f64::NEG_INFINITY, f64::max);

    let mut table = new_table();
    table.set_header(vec!["Building", "Total", "Average", "Min", "Max", "Std dev", "Share"]);

    for s in summaries {
        let std_cell = match s.std_kwh {
            Some(std) => kwh_cell(std),
            None => Cell::new("n/a")
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
        };
        let name = Cell::new(&s.building);
        let name = if s.total_kwh == top_total {
            name.fg(Color::Yellow)
        } else {
            name
        };

        table.add_row(vec![
            name,
            kwh_cell(s.total_kwh),
            kwh_cell(s.avg_kwh),
            kwh_cell(s.min_kwh),
            kwh_cell(s.max_kwh),
            std_cell,
            Cell::new(format!("{:.1}%", share_percent(s.total_kwh, campus_total)))
                .set_alignment(CellAlignment::Right),
        ]);
    }
    table
}
