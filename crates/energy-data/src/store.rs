//! In-memory reading store keyed by building.

use std::collections::HashMap;

use energy_core::models::{Building, MeterRow, ReadingTable, SummaryRow};

/// Per-building reading collections for a single run.
///
/// Buildings are kept in order of first appearance. Ingestion appends and
/// never deduplicates: ingesting the same table twice doubles its totals.
#[derive(Debug, Default)]
pub struct BuildingManager {
    buildings: Vec<Building>,
    index: HashMap<String, usize>,
}

impl BuildingManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every row of `table` to its building, creating buildings on
    /// first sight. Row order is preserved within each building.
    pub fn ingest(&mut self, table: &ReadingTable) {
        for row in table.rows() {
            self.building_mut(&row.building).add_reading(row.timestamp, row.kwh);
        }
    }

    fn building_mut(&mut self, name: &str) -> &mut Building {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                self.buildings.push(Building::new(name));
                let idx = self.buildings.len() - 1;
                self.index.insert(name.to_string(), idx);
                idx
            }
        };
        &mut self.buildings[idx]
    }

    /// Buildings in insertion order.
    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn get(&self, name: &str) -> Option<&Building> {
        self.index.get(name).map(|&idx| &self.buildings[idx])
    }

    /// Number of distinct buildings.
    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    /// Total readings across all buildings.
    pub fn reading_count(&self) -> usize {
        self.buildings.iter().map(|b| b.readings().len()).sum()
    }

    /// Every reading as one flat table.
    ///
    /// Buildings follow insertion order and each building's rows are sorted
    /// by timestamp; the result is not sorted globally.
    pub fn combined(&self) -> ReadingTable {
        self.buildings
            .iter()
            .flat_map(|b| {
                b.sorted_readings()
                    .into_iter()
                    .map(move |r| MeterRow::new(r.timestamp, r.kwh, b.name()))
            })
            .collect()
    }

    /// One summary per building that has readings, in insertion order.
    pub fn summaries(&self) -> Vec<SummaryRow> {
        self.buildings.iter().filter_map(Building::summary).collect()
    }
}
