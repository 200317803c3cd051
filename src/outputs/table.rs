//! Plain-text table rendering for the terminal.
//!
//! ```text
//! Results (2)
//! date        title                         domain         url                              provider
//! ----------  ----------------------------  -------------  -------------------------------  --------
//! 20/01/2024  Festival: une enquête ouve…   lemonde.fr     https://www.lemonde.fr/culture/  GDELT
//! ```
//!
//! Notices from failed sources are printed above the count. Date, title,
//! domain and provider cells are cut to a per-column maximum. URLs are
//! always printed whole so they stay usable as links.

use crate::dashboard::{DashboardView, ResultSet};
use crate::models::TableRow;
use crate::utils::truncate_cell;
use itertools::Itertools;
use std::fmt;

/// Maximum width per column, in the order of [`TableRow::HEADERS`].
/// `None` means the column is never cut.
const MAX_WIDTHS: [Option<usize>; 5] = [Some(10), Some(70), Some(32), None, Some(10)];
const COLUMN_GAP: &str = "  ";

pub const NO_SOURCE_MESSAGE: &str = "No source enabled (turn GDELT on to fetch articles).";
pub const NO_RESULTS_MESSAGE: &str = "No articles match the current query and filters.";

fn column_widths(rows: &[TableRow]) -> [usize; 5] {
    let mut widths = TableRow::HEADERS.map(|h| h.chars().count());
    for row in rows {
        for (i, cell) in row.cells().iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }
    for (w, max) in widths.iter_mut().zip(MAX_WIDTHS) {
        if let Some(max) = max {
            *w = (*w).min(max);
        }
    }
    widths
}

fn format_line<'a>(cells: impl IntoIterator<Item = &'a str>, widths: &[usize; 5]) -> String {
    cells
        .into_iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", truncate_cell(cell, width)))
        .join(COLUMN_GAP)
        .trim_end()
        .to_string()
}

impl fmt::Display for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for notice in &self.notices {
            writeln!(f, "{notice}")?;
        }
        writeln!(f, "Results ({})", self.count())?;

        if self.rows.is_empty() {
            return writeln!(f, "{NO_RESULTS_MESSAGE}");
        }

        let widths = column_widths(&self.rows);
        writeln!(f, "{}", format_line(TableRow::HEADERS, &widths))?;
        writeln!(f, "{}", widths.iter().map(|w| "-".repeat(*w)).join(COLUMN_GAP))?;
        for row in &self.rows {
            writeln!(f, "{}", format_line(row.cells(), &widths))?;
        }
        Ok(())
    }
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardView::NoSources => writeln!(f, "{NO_SOURCE_MESSAGE}"),
            DashboardView::Results(set) => fmt::Display::fmt(set, f),
        }
    }
}
