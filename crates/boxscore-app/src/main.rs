// boxscore entry point.
//
// Startup sequence:
// 1. Load config (installing defaults on first run)
// 2. Initialize tracing into the configured log directory
// 3. Resolve the year range (config, overridden by CLI arguments)
// 4. Open the feature store and season reader
// 5. Run extract / transform / load per season, then publish
// 6. Print the run summary

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use boxscore_app::config::{self, Config};
use boxscore_app::pipeline::Pipeline;
use boxscore_store::parse_year;

use anyhow::Context;
use tracing::{info, warn};

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "boxscore=info,boxscore_app=info,boxscore_core=info,boxscore_store=info,warn";

fn main() -> anyhow::Result<()> {
    // 1. Config comes first: it names the log directory
    let config = config::load_config().context("failed to load configuration")?;

    // 2. Tracing
    let log_path = init_tracing(Path::new(&config.paths.log_dir))?;
    info!("boxscore starting up, logging to {}", log_path.display());
    info!(
        "Config loaded: dh={}, bullpen={:?}, data_dir={}, db_path={}",
        config.lineup.use_dh,
        config.lineup_config().bullpen_size,
        config.paths.data_dir,
        config.paths.db_path
    );

    // 3. Year range: `boxscore [first [last]]`
    let args: Vec<String> = std::env::args().skip(1).collect();
    let years = year_range(&config, &args)?;
    info!("Processing seasons {}..={}", years.start(), years.end());

    // 4. Open the feature store and season reader
    let mut pipeline = Pipeline::from_config(&config)?;

    // 5. Run
    let summary = pipeline.run(years)?;
    for year in &summary.failed_seasons {
        warn!("season {} was not processed", year);
    }
    info!(
        "Run complete: {} seasons, {} rows, {} skipped games, {} failed seasons",
        summary.seasons.len(),
        summary.rows(),
        summary.skipped(),
        summary.failed_seasons.len()
    );

    // 6. Summary
    println!(
        "{} seasons, {} games stored, {} skipped, {} seasons failed (log: {})",
        summary.seasons.len(),
        summary.rows(),
        summary.skipped(),
        summary.failed_seasons.len(),
        log_path.display()
    );

    Ok(())
}

/// No arguments runs the configured range; one year runs that season alone;
/// two run the inclusive range between them.
fn year_range(config: &Config, args: &[String]) -> anyhow::Result<RangeInclusive<i32>> {
    let (first, last) = match args {
        [] => (config.years.first, config.years.last),
        [only] => {
            let year = parse_year(only).context("invalid year")?;
            (year, year)
        }
        [first, last, ..] => (
            parse_year(first).context("invalid first year")?,
            parse_year(last).context("invalid last year")?,
        ),
    };
    if first > last {
        anyhow::bail!("first year {first} is after last year {last}");
    }
    Ok(first..=last)
}

/// Route all tracing output to `<log_dir>/boxscore.log`, truncated per run.
/// The terminal only gets the final summary line.
fn init_tracing(log_dir: &Path) -> anyhow::Result<PathBuf> {
    use tracing_subscriber::EnvFilter;

    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
    let log_path = log_dir.join("boxscore.log");
    let log_file = std::fs::File::create(&log_path)
        .with_context(|| format!("failed to create {}", log_path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to set tracing subscriber: {e}"))?;

    Ok(log_path)
}
