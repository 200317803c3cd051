//! One render cycle: fetch from the enabled sources, filter, project.
//!
//! A source that fails does not abort the render. Its error becomes an
//! inline notice and the render carries on as if that source had returned
//! nothing. "No source enabled" and "zero rows" are informational states,
//! not failures.

use crate::config::DashboardConfig;
use crate::models::{ArticleRecord, TableRow};
use crate::sources::ArticleSource;
use tracing::{error, info, instrument};

/// What a render produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardView {
    /// Every source is switched off; nothing was fetched.
    NoSources,
    Results(ResultSet),
}

/// Rows to display plus any per-source failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    pub rows: Vec<TableRow>,
    /// User-facing messages, one per failed source.
    pub notices: Vec<String>,
}

impl ResultSet {
    /// Row count shown next to the table.
    pub fn count(&self) -> usize {
        self.rows.len()
    }
}

/// Fetch from `source` when enabled, logging and converting failures into notices.
///
/// Returns the records (empty on failure) and an optional notice.
async fn collect_from<S>(source: &S, config: &DashboardConfig) -> (Vec<ArticleRecord>, Option<String>)
where
    S: ArticleSource,
{
    match source.fetch(&config.query, config.window_days).await {
        Ok(records) => (records, None),
        Err(e) => {
            error!(provider = source.provider(), error = %e, "Source failed; continuing without it");
            (Vec::new(), Some(format!("{} error: {}", source.provider(), e)))
        }
    }
}

/// Run one render cycle against the GDELT source.
#[instrument(level = "info", skip_all, fields(query = %config.query, window_days = config.window_days))]
pub async fn render<S>(gdelt: &S, config: &DashboardConfig) -> DashboardView
where
    S: ArticleSource,
{
    let mut batches: Vec<Vec<ArticleRecord>> = Vec::new();
    let mut notices = Vec::new();

    if config.use_gdelt {
        let (records, notice) = collect_from(gdelt, config).await;
        batches.push(records);
        notices.extend(notice);
    }

    if batches.is_empty() {
        info!("No source enabled");
        return DashboardView::NoSources;
    }

    let fetched: Vec<ArticleRecord> = batches.into_iter().flatten().collect();
    let fetched_count = fetched.len();
    let kept = config.filter().apply(fetched);

    info!(
        fetched = fetched_count,
        shown = kept.len(),
        failed_sources = notices.len(),
        "Render complete"
    );

    DashboardView::Results(ResultSet {
        rows: kept.iter().map(TableRow::from).collect(),
        notices,
    })
}
