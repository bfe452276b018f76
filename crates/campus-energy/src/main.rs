mod bootstrap;
mod export;
mod table_view;

use anyhow::{bail, Result};
use energy_core::formatting::format_kwh;
use energy_core::settings::Settings;
use energy_data::analysis::analyze_consumption;

use crate::export::ExecutiveSummary;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(settings.effective_log_level());

    tracing::info!("Campus energy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Data: {}, Output: {}, View: {}",
        settings.data_dir.display(),
        settings.out_dir.display(),
        settings.view
    );

    // 1. Ingest, store, aggregate.
    let result = analyze_consumption(&settings.data_dir);
    if result.is_empty() {
        tracing::error!("No data loaded. Exiting.");
        bail!("no readings found in {}", settings.data_dir.display());
    }
    tracing::info!(
        "{} readings across {} buildings ({} files skipped), {} in total",
        result.metadata.readings_processed,
        result.metadata.buildings,
        result.metadata.files_skipped,
        format_kwh(result.summaries.iter().map(|s| s.total_kwh).sum())
    );
    tracing::debug!(
        "Analysis generated at {}: {}/{} files loaded, load {:.3}s, aggregate {:.3}s",
        result.metadata.generated_at,
        result.metadata.files_loaded,
        result.metadata.files_found,
        result.metadata.load_time_seconds,
        result.metadata.aggregate_time_seconds
    );

    // 2. Exports.
    bootstrap::ensure_output_dir(&settings.out_dir)?;
    let paths = export::export_all(&result, &settings.out_dir)?;
    tracing::info!("Saved cleaned data to {}", paths.cleaned.display());
    tracing::info!("Saved building summary to {}", paths.summary.display());
    tracing::info!(
        "Saved daily and weekly totals to {} and {}",
        paths.daily.display(),
        paths.weekly.display()
    );
    tracing::info!("Wrote textual summary to {}", paths.executive_summary.display());

    // 3. Terminal view.
    match settings.view.as_str() {
        "daily" => println!("{}", table_view::build_pivot_table(&result.daily, "%Y-%m-%d")),
        "weekly" => println!(
            "{}",
            table_view::build_pivot_table(&result.weekly, "week ending %Y-%m-%d")
        ),
        "buildings" => println!("{}", table_view::build_summary_table(&result.summaries)),
        _ => print!(
            "{}",
            ExecutiveSummary::derive(&result.summaries, &result.combined).render()
        ),
    }

    Ok(())
}
