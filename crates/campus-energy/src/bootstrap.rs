use std::path::Path;

use energy_core::EnergyError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Create the output directory (and any missing parents) if absent.
pub fn ensure_output_dir(out_dir: &Path) -> Result<(), EnergyError> {
    if out_dir.exists() && !out_dir.is_dir() {
        return Err(EnergyError::Config(format!(
            "output path {} exists and is not a directory",
            out_dir.display()
        )));
    }
    std::fs::create_dir_all(out_dir)?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `DEBUG`/`INFO`/`WARNING`/`ERROR`/`CRITICAL` level name onto a
/// tracing filter directive.
fn filter_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        other => other.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber on stderr.
///
/// Falls back to `info` when the level is not recognised.
pub fn setup_logging(log_level: &str) {
    let filter =
        EnvFilter::try_new(filter_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false);

    tracing_subscriber::registry().with(filter).with(layer).init();
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_output_dir_creates_nested() {
        let tmp = TempDir::new().expect("tempdir");
        let out = tmp.path().join("reports").join("2024");

        ensure_output_dir(&out).expect("create output dir");
        assert!(out.is_dir());

        // Second call is a no-op.
        ensure_output_dir(&out).expect("idempotent");
    }

    #[test]
    fn test_ensure_output_dir_rejects_file() {
        let tmp = TempDir::new().expect("tempdir");
        let file = tmp.path().join("outputs");
        std::fs::write(&file, "not a dir").unwrap();

        let err = ensure_output_dir(&file).unwrap_err();
        assert!(matches!(err, EnergyError::Config(_)));
    }

    #[test]
    fn test_filter_directive_mapping() {
        assert_eq!(filter_directive("DEBUG"), "debug");
        assert_eq!(filter_directive("info"), "info");
        assert_eq!(filter_directive("WARNING"), "warn");
        assert_eq!(filter_directive("CRITICAL"), "error");
        assert_eq!(filter_directive("trace"), "trace");
    }
}
