//! Shared domain types for campus energy reporting.
//!
//! Canonical meter rows, per-building readings, pivot tables and summary
//! rows, plus the error type, timestamp and bucket helpers, statistics,
//! number formatting and command-line settings used by the other crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod stats;
pub mod time_utils;

pub use error::{EnergyError, Result};
