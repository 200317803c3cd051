//! Command-line interface definitions for press_watch.
//!
//! Every option is optional: unset flags fall back to the YAML config file
//! (when `--config` is given) and then to built-in defaults. See
//! [`crate::config`] for the precedence rules.

use clap::Parser;

/// Command-line arguments for press_watch.
///
/// # Examples
///
/// ```sh
/// # Default query, last 30 days
/// press_watch
///
/// # Custom query over one week, only lemonde.fr
/// press_watch --query "harcèlement théâtre" --days 7 --domain-filter lemonde.fr
///
/// # Interactive session with JSON snapshots
/// press_watch --interactive --json-output-dir ./snapshots
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Free-text GDELT query
    #[arg(short, long)]
    pub query: Option<String>,

    /// Look-back window in days (1-365)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=365))]
    pub days: Option<u32>,

    /// Disable the GDELT source
    #[arg(long)]
    pub no_gdelt: bool,

    /// Keep only articles whose title contains this text (case-insensitive)
    #[arg(short, long)]
    pub title_filter: Option<String>,

    /// Keep only articles whose domain contains this text (e.g. lemonde.fr)
    #[arg(long)]
    pub domain_filter: Option<String>,

    /// Optional path to a config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Also write each rendered result set as JSON under this directory
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Read commands from stdin and re-render after each one
    #[arg(short, long)]
    pub interactive: bool,

    /// Override the GDELT DOC endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}
