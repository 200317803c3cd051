//! JSON snapshots of rendered result sets.
//!
//! Each render can be exported for later reading or diffing.
//!
//! # Output Structure
//!
//! Files are grouped by UTC date and named after the UTC time of the render,
//! to the millisecond. A name is never reused: when two renders land on the
//! same millisecond the later one gets a `-1`, `-2`, ... suffix.
//! ```text
//! json_output_dir/
//! └── 2024-01-20/
//!     ├── 081500250.json
//!     ├── 081500250-1.json
//!     └── 093012004.json
//! ```
//!
//! Snapshots are write-only. Nothing in the application reads them back.

use crate::config::DashboardConfig;
use crate::dashboard::ResultSet;
use crate::models::TableRow;
use crate::utils::ensure_writable_dir;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

/// Suffixes tried for one timestamp before giving up.
const MAX_NAME_ATTEMPTS: u32 = 100;

/// One exported render.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    /// RFC 3339 UTC time of the render.
    pub generated_at: String,
    pub query: String,
    pub window_days: u32,
    pub title_filter: String,
    pub domain_filter: String,
    /// Same value as `rows.len()`, kept for readers that only want the count.
    pub count: usize,
    pub notices: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl Snapshot {
    pub fn new(config: &DashboardConfig, set: &ResultSet, at: DateTime<Utc>) -> Self {
        Self {
            generated_at: at.to_rfc3339(),
            query: config.query.clone(),
            window_days: config.window_days,
            title_filter: config.title_filter.clone(),
            domain_filter: config.domain_filter.clone(),
            count: set.count(),
            notices: set.notices.clone(),
            rows: set.rows.clone(),
        }
    }
}

/// Path of the snapshot for a render at `at` under `json_output_dir`.
///
/// `attempt` 0 is the plain timestamp; later attempts add a `-N` suffix.
pub fn snapshot_path(json_output_dir: &str, at: DateTime<Utc>, attempt: u32) -> PathBuf {
    let stem = at.format("%H%M%S%3f");
    let file = match attempt {
        0 => format!("{stem}.json"),
        n => format!("{stem}-{n}.json"),
    };
    PathBuf::from(json_output_dir)
        .join(at.format("%Y-%m-%d").to_string())
        .join(file)
}

/// Write a [`Snapshot`] of `set` under `json_output_dir`.
///
/// Creates the dated directory if needed. Never overwrites an existing
/// snapshot. Returns the path written.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_snapshot(
    config: &DashboardConfig,
    set: &ResultSet,
    json_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let now = Utc::now();
    let snapshot = Snapshot::new(config, set, now);
    let json = serde_json::to_string_pretty(&snapshot)?;

    let path = write_new_file(json_output_dir, now, json.as_bytes()).await?;
    info!(path = %path.display(), count = snapshot.count, "Wrote JSON snapshot");
    Ok(path)
}

/// Write `contents` to the first free snapshot name for `at`.
async fn write_new_file(
    json_output_dir: &str,
    at: DateTime<Utc>,
    contents: &[u8],
) -> Result<PathBuf, Box<dyn Error>> {
    let first = snapshot_path(json_output_dir, at, 0);
    if let Some(dir) = first.parent().and_then(|p| p.to_str()) {
        ensure_writable_dir(dir).await?;
    }

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let path = snapshot_path(json_output_dir, at, attempt);
        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!(path = %path.display(), "Snapshot name taken, trying next suffix");
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(contents).await?;
        file.flush().await?;
        return Ok(path);
    }

    Err(format!(
        "no free snapshot name after {MAX_NAME_ATTEMPTS} attempts near {}",
        first.display()
    )
    .into())
}
