//! Data ingestion and aggregation layer for campus energy reporting.
//!
//! Responsible for discovering and reading per-building CSV exports,
//! normalizing them into the canonical schema, grouping readings by building
//! and rolling them up into daily/weekly pivots and building statistics.

pub mod aggregator;
pub mod analysis;
pub mod normalizer;
pub mod reader;
pub mod store;

pub use energy_core as core;
