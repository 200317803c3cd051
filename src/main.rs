//! # press_watch
//!
//! A press-watch tool for the French-language press. It queries the GDELT
//! DOC 2.1 index for articles matching a keyword query over the last N days,
//! normalizes them, ranks them newest first and shows them as a table with
//! optional title and domain filters.
//!
//! ## Usage
//!
//! ```sh
//! press_watch --days 7 --domain-filter lemonde.fr
//! press_watch --interactive --json-output-dir ./snapshots
//! ```
//!
//! ## Architecture
//!
//! One render is a short pipeline:
//! 1. **Fetch**: build a dated request, call GDELT (through a 30 minute cache)
//! 2. **Normalize**: resolve fields, parse dates, drop undated items, sort
//! 3. **Filter**: case-insensitive title/domain substring filters
//! 4. **Output**: print the table, optionally write a JSON snapshot
//!
//! A failing source never aborts a render: its error is shown inline and
//! the render continues with zero records from it.

use clap::Parser;
use std::error::Error;
use tokio::io::BufReader;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cache;
mod cli;
mod config;
mod dashboard;
mod error;
mod filter;
mod models;
mod outputs;
mod shell;
mod sources;
mod utils;

use cache::CachedSource;
use cli::Cli;
use config::{FileConfig, Settings};
use sources::gdelt::GdeltClient;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("press_watch starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let file_config = match args.config.as_deref() {
        Some(path) => FileConfig::load(path).await?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(&args, file_config)?;
    info!(
        query = %settings.dashboard.query,
        window_days = settings.dashboard.window_days,
        use_gdelt = settings.dashboard.use_gdelt,
        endpoint = %settings.endpoint,
        "Resolved settings"
    );

    // Early check: ensure JSON output dir is writable
    if let Some(dir) = settings.json_output_dir.as_deref() {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "JSON output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    let gdelt = CachedSource::new(GdeltClient::new(&settings.endpoint, settings.timeout)?);
    let mut stdout = tokio::io::stdout();

    if settings.interactive {
        let stdin = BufReader::new(tokio::io::stdin());
        shell::run(
            &gdelt,
            settings.dashboard.clone(),
            stdin,
            &mut stdout,
            settings.json_output_dir.as_deref(),
        )
        .await?;
        info!(cached_keys = gdelt.len().await, "Interactive session closed");
    } else {
        let view = dashboard::render(&gdelt, &settings.dashboard).await;
        outputs::emit(
            &mut stdout,
            &settings.dashboard,
            &view,
            settings.json_output_dir.as_deref(),
        )
        .await?;
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
