//! Output generation for rendered result sets.
//!
//! # Submodules
//!
//! - [`table`]: plain-text table for the terminal (`Display` for the view types)
//! - [`json`]: optional JSON snapshots written to disk
//!
//! # Output Structure
//!
//! ```text
//! stdout:
//!   <notices>
//!   Results (N)
//!   date  title  domain  url  provider
//!
//! json_output_dir/
//! └── 2024-01-20/
//!     └── 081500.json
//! ```

pub mod json;
pub mod table;

use crate::config::DashboardConfig;
use crate::dashboard::DashboardView;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::error;

/// Print a rendered view to `out` and, when a directory is given, export it.
///
/// A failed export is logged and does not stop the session.
pub async fn emit<W>(
    out: &mut W,
    config: &DashboardConfig,
    view: &DashboardView,
    json_output_dir: Option<&str>,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    out.write_all(view.to_string().as_bytes()).await?;
    out.flush().await?;

    if let (DashboardView::Results(set), Some(dir)) = (view, json_output_dir) {
        if let Err(e) = json::write_snapshot(config, set, dir).await {
            error!(error = %e, dir, "Failed to write JSON snapshot");
        }
    }
    Ok(())
}
