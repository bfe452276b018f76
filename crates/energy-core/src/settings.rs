use clap::Parser;
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Campus electricity consumption reports from per-building meter exports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "campus-energy",
    about = "Campus electricity consumption reports from per-building meter exports",
    version
)]
pub struct Settings {
    /// Directory holding one CSV export per building
    #[arg(long, env = "ENERGY_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Directory the cleaned data, summaries and totals are written to
    #[arg(long, env = "ENERGY_OUT_DIR", default_value = "outputs")]
    pub out_dir: PathBuf,

    /// Table printed after the exports are written
    #[arg(long, default_value = "summary", value_parser = ["summary", "daily", "weekly", "buildings"])]
    pub view: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse settings from the process arguments.
    pub fn load() -> Self {
        Self::parse()
    }

    /// The log level after `--debug` is taken into account.
    pub fn effective_log_level(&self) -> &str {
        if self.debug {
            "DEBUG"
        } else {
            &self.log_level
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
