//! Consumption rollups over daily and weekly buckets, and per-building
//! statistics.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};
use energy_core::models::{PivotTable, ReadingTable, SummaryRow};
use energy_core::time_utils::{bucket_range, day_bucket, week_end_bucket};

// ── ConsumptionAggregator ─────────────────────────────────────────────────────

/// Stateless reductions over a combined reading table.
///
/// Every method is a pure function of its input, so the three reductions may
/// run in any order, or concurrently, against the same table.
pub struct ConsumptionAggregator;

impl ConsumptionAggregator {
    /// Sum consumption per building per calendar day.
    ///
    /// Rows cover every day from the first to the last observed day; days a
    /// building has no readings for hold `0.0`.
    pub fn daily_totals(table: &ReadingTable) -> PivotTable {
        Self::pivot_by_bucket(table, |ts| Some(day_bucket(ts)), Duration::days(1))
    }

    /// Sum consumption per building per week ending on Sunday.
    ///
    /// Each row is labelled with its closing Sunday at midnight.
    pub fn weekly_totals(table: &ReadingTable) -> PivotTable {
        Self::pivot_by_bucket(table, week_end_bucket, Duration::weeks(1))
    }

    /// Total, mean, min, max and sample standard deviation per building,
    /// ordered by building name.
    pub fn building_summary(table: &ReadingTable) -> Vec<SummaryRow> {
        let mut grouped: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for row in table.rows() {
            grouped.entry(&row.building).or_default().push(row.kwh);
        }

        grouped
            .into_iter()
            .filter_map(|(building, values)| SummaryRow::from_values(building, &values))
            .collect()
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Generic pivot driver.
    ///
    /// `bucket_fn` maps a timestamp to its bucket label; labels of adjacent
    /// buckets must be exactly `step` apart. Rows without a label are left out.
    fn pivot_by_bucket(
        table: &ReadingTable,
        bucket_fn: impl Fn(NaiveDateTime) -> Option<NaiveDateTime>,
        step: Duration,
    ) -> PivotTable {
        let mut sums: BTreeMap<&str, BTreeMap<NaiveDateTime, f64>> = BTreeMap::new();
        for row in table.rows() {
            let Some(bucket) = bucket_fn(row.timestamp) else {
                continue;
            };
            *sums
                .entry(&row.building)
                .or_default()
                .entry(bucket)
                .or_insert(0.0) += row.kwh;
        }

        let first = sums.values().filter_map(|m| m.keys().next()).min().copied();
        let last = sums.values().filter_map(|m| m.keys().next_back()).max().copied();
        let (Some(first), Some(last)) = (first, last) else {
            return PivotTable::default();
        };

        let buckets = bucket_range(first, last, step);
        let values = buckets
            .iter()
            .map(|bucket| {
                sums.values()
                    .map(|per_bucket| per_bucket.get(bucket).copied().unwrap_or(0.0))
                    .collect()
            })
            .collect();

        PivotTable {
            buckets,
            buildings: sums.keys().map(|b| b.to_string()).collect(),
            values,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use energy_core::models::MeterRow;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn make_table(rows: &[(NaiveDateTime, f64, &str)]) -> ReadingTable {
        rows.iter()
            .map(|&(ts, kwh, b)| MeterRow::new(ts, kwh, b))
            .collect()
    }

    fn example_table() -> ReadingTable {
        make_table(&[
            (at(2024, 1, 1, 0), 10.0, "A"),
            (at(2024, 1, 2, 0), 5.0, "A"),
            (at(2024, 1, 8, 0), 7.0, "B"),
        ])
    }

    // ── daily_totals ──────────────────────────────────────────────────────────

    #[test]
    fn test_daily_fills_full_range() {
        let daily = ConsumptionAggregator::daily_totals(&example_table());

        assert_eq!(daily.len(), 8);
        assert_eq!(daily.buckets[0], at(2024, 1, 1, 0));
        assert_eq!(daily.buckets[7], at(2024, 1, 8, 0));
        assert_eq!(daily.buildings, vec!["A", "B"]);
        assert_eq!(
            daily.column("A").unwrap(),
            vec![10.0, 5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
        );
        assert_eq!(
            daily.column("B").unwrap(),
            vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 7.0]
        );
    }

    #[test]
    fn test_daily_sums_within_day() {
        let table = make_table(&[
            (at(2024, 3, 1, 0), 1.5, "gym"),
            (at(2024, 3, 1, 12), 2.0, "gym"),
            (at(2024, 3, 1, 23), 0.5, "gym"),
        ]);
        let daily = ConsumptionAggregator::daily_totals(&table);
        assert_eq!(daily.len(), 1);
        assert_eq!(daily.get(at(2024, 3, 1, 0), "gym"), Some(4.0));
    }

    #[test]
    fn test_daily_buildings_sorted_by_name() {
        let table = make_table(&[
            (at(2024, 3, 1, 0), 1.0, "science"),
            (at(2024, 3, 1, 0), 1.0, "arts"),
        ]);
        let daily = ConsumptionAggregator::daily_totals(&table);
        assert_eq!(daily.buildings, vec!["arts", "science"]);
    }

    #[test]
    fn test_daily_empty_table() {
        let daily = ConsumptionAggregator::daily_totals(&ReadingTable::new());
        assert!(daily.is_empty());
        assert!(daily.buildings.is_empty());
        assert!(daily.values.is_empty());
    }

    // ── weekly_totals ─────────────────────────────────────────────────────────

    #[test]
    fn test_weekly_labels_are_sundays() {
        let weekly = ConsumptionAggregator::weekly_totals(&example_table());

        // Mon 1st and Tue 2nd close on Sun 7th; Mon 8th closes on Sun 14th.
        assert_eq!(weekly.buckets, vec![at(2024, 1, 7, 0), at(2024, 1, 14, 0)]);
        assert_eq!(weekly.column("A").unwrap(), vec![15.0, 0.0]);
        assert_eq!(weekly.column("B").unwrap(), vec![0.0, 7.0]);
    }

    #[test]
    fn test_weekly_sunday_evening_stays_in_week() {
        let table = make_table(&[
            (at(2024, 1, 7, 23), 2.0, "A"),
            (at(2024, 1, 8, 0), 3.0, "A"),
        ]);
        let weekly = ConsumptionAggregator::weekly_totals(&table);
        assert_eq!(weekly.get(at(2024, 1, 7, 0), "A"), Some(2.0));
        assert_eq!(weekly.get(at(2024, 1, 14, 0), "A"), Some(3.0));
    }

    #[test]
    fn test_weekly_fills_gap_weeks() {
        let table = make_table(&[
            (at(2024, 1, 1, 0), 1.0, "A"),
            (at(2024, 1, 29, 0), 1.0, "A"),
        ]);
        let weekly = ConsumptionAggregator::weekly_totals(&table);
        assert_eq!(weekly.len(), 5);
        assert_eq!(weekly.column("A").unwrap(), vec![1.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_weekly_empty_table() {
        assert!(ConsumptionAggregator::weekly_totals(&ReadingTable::new()).is_empty());
    }

    // ── building_summary ──────────────────────────────────────────────────────

    #[test]
    fn test_summary_example() {
        let summary = ConsumptionAggregator::building_summary(&example_table());
        assert_eq!(summary.len(), 2);

        let a = &summary[0];
        assert_eq!(a.building, "A");
        assert_eq!(a.total_kwh, 15.0);
        assert_eq!(a.avg_kwh, 7.5);
        assert_eq!(a.min_kwh, 5.0);
        assert_eq!(a.max_kwh, 10.0);
        assert!((a.std_kwh.unwrap() - 12.5_f64.sqrt()).abs() < 1e-9);

        let b = &summary[1];
        assert_eq!(b.building, "B");
        assert_eq!(b.total_kwh, 7.0);
        assert_eq!(b.avg_kwh, 7.0);
        assert_eq!(b.min_kwh, 7.0);
        assert_eq!(b.max_kwh, 7.0);
        assert!(b.std_kwh.is_none());
    }

    #[test]
    fn test_summary_empty_table() {
        assert!(ConsumptionAggregator::building_summary(&ReadingTable::new()).is_empty());
    }

    // ── reconciliation ────────────────────────────────────────────────────────

    #[test]
    fn test_rollups_reconcile_with_summary_totals() {
        let table = make_table(&[
            (at(2024, 2, 3, 4), 1.25, "A"),
            (at(2024, 2, 4, 10), 2.5, "B"),
            (at(2024, 2, 11, 0), 0.75, "A"),
            (at(2024, 2, 12, 8), 4.0, "C"),
            (at(2024, 2, 20, 16), 3.5, "A"),
            (at(2024, 2, 20, 17), -0.5, "B"),
        ]);
        let daily = ConsumptionAggregator::daily_totals(&table);
        let weekly = ConsumptionAggregator::weekly_totals(&table);

        for row in ConsumptionAggregator::building_summary(&table) {
            let d = daily.column_total(&row.building).unwrap();
            let w = weekly.column_total(&row.building).unwrap();
            assert!((d - row.total_kwh).abs() < 1e-9, "daily {}", row.building);
            assert!((w - row.total_kwh).abs() < 1e-9, "weekly {}", row.building);
        }
    }

    #[test]
    fn test_weekly_near_max_date_does_not_panic() {
        let last_day = NaiveDateTime::MAX.date().and_hms_opt(0, 0, 0).unwrap();
        let table = make_table(&[(last_day, 3.0, "A")]);

        let weekly = ConsumptionAggregator::weekly_totals(&table);
        assert!(weekly.len() <= 1);

        let daily = ConsumptionAggregator::daily_totals(&table);
        assert_eq!(daily.len(), 1);
        assert_eq!(daily.column_total("A"), Some(3.0));
    }
}
