// src/main.rs
//
// Opens the configured data set and logs a summary report.
//
// Environment:
// - POKEDEX_DATA_DIR, POKEDEX_BACKEND, POKEDEX_DATABASE (see config.rs)
// - RUST_LOG overrides the default `info` filter

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use pokedex::{bootstrap, AppConfig};

fn main() -> Result<()> {
    // 1. LOGGING (also forwards `log` records from the library)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // 2. CONFIG
    let config = AppConfig::from_env().context("Failed to read configuration")?;
    log::info!(
        "Data directory {} ({} backend)",
        config.data_dir().display(),
        config.backend
    );

    // 3. WIRING
    let state = bootstrap(&config).context("Failed to open the data set")?;

    // 4. REPORT
    let summary = state
        .report_service
        .summary()
        .context("Failed to build the summary report")?;

    log::info!(
        "{} creatures, {} moves, {} trainers",
        summary.total_creatures,
        summary.total_moves,
        summary.total_trainers
    );
    for (category, count) in &summary.creatures_by_category {
        log::info!("  {:<10} {}", category, count);
    }
    for (rank, trainer) in summary.top_trainers.iter().enumerate() {
        log::info!(
            "  #{:<2} {} ({}) owns {}",
            rank + 1,
            trainer.nombre,
            trainer.id,
            trainer.owned
        );
    }

    Ok(())
}
