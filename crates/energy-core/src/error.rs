use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the campus energy crates.
#[derive(Error, Debug)]
pub enum EnergyError {
    /// A meter export could not be opened or read from disk.
    #[error("Source unavailable {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A source lacks a required column after alias resolution, or none of
    /// its rows survived coercion.
    #[error("Schema error in {name}: {reason}")]
    Schema { name: String, reason: String },

    /// A CSV document could not be written or decoded.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EnergyError {
    /// Build a [`EnergyError::Schema`] for the source called `name`.
    pub fn schema(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Schema {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Whether the loader should skip the offending source and keep going.
    ///
    /// Only the two per-source failures are skippable.
    pub fn is_skippable(&self) -> bool {
        matches!(self, Self::SourceUnavailable { .. } | Self::Schema { .. })
    }
}

/// Convenience alias used throughout the energy crates.
pub type Result<T> = std::result::Result<T, EnergyError>;
