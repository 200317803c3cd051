//! Data models for normalized articles and their tabular projection.
//!
//! - [`ArticleRecord`]: one article as produced by the fetch pipeline
//! - [`TableRow`]: the five columns shown to the reader
//!
//! Records are built fresh on every fetch and only live as long as a render
//! (or a cache entry).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Label stamped on every record produced by the GDELT backend.
pub const GDELT_PROVIDER: &str = "GDELT";

/// Format a timestamp as `dd/mm/yyyy`.
pub fn ddmmyyyy(dt: &NaiveDateTime) -> String {
    dt.format("%d/%m/%Y").to_string()
}

/// A single article after field resolution and date normalization.
///
/// `published_at` is always present: articles whose date cannot be parsed
/// never become records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Publication time, naive, expressed in UTC when the source carried an offset.
    pub published_at: NaiveDateTime,
    pub title: String,
    /// Country code or source name, whichever the upstream filled in first.
    pub source_label: String,
    pub domain: String,
    pub url: String,
    pub snippet: String,
    /// Which backend produced this record.
    pub provider: String,
}

impl ArticleRecord {
    /// Display form of [`Self::published_at`], recomputed on every call.
    pub fn published_at_display(&self) -> String {
        ddmmyyyy(&self.published_at)
    }
}

/// One row of the rendered results table.
///
/// Column order is fixed: date, title, domain, url, provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub date: String,
    pub title: String,
    pub domain: String,
    pub url: String,
    pub provider: String,
}

impl TableRow {
    /// Column headers, in render order.
    pub const HEADERS: [&'static str; 5] = ["date", "title", "domain", "url", "provider"];

    /// Cell values in the same order as [`Self::HEADERS`].
    pub fn cells(&self) -> [&str; 5] {
        [
            self.date.as_str(),
            self.title.as_str(),
            self.domain.as_str(),
            self.url.as_str(),
            self.provider.as_str(),
        ]
    }
}

impl From<&ArticleRecord> for TableRow {
    fn from(record: &ArticleRecord) -> Self {
        TableRow {
            date: record.published_at_display(),
            title: record.title.clone(),
            domain: record.domain.clone(),
            url: record.url.clone(),
            provider: record.provider.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record_at(y: i32, m: u32, d: u32) -> ArticleRecord {
        ArticleRecord {
            published_at: NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(9, 15, 0)
                .unwrap(),
            title: "Festival: une enquête ouverte".to_string(),
            source_label: "France".to_string(),
            domain: "lemonde.fr".to_string(),
            url: "https://www.lemonde.fr/culture/article".to_string(),
            snippet: String::new(),
            provider: GDELT_PROVIDER.to_string(),
        }
    }

    #[test]
    fn test_display_date_is_zero_padded() {
        let record = record_at(2024, 1, 5);
        assert_eq!(record.published_at_display(), "05/01/2024");
    }

    #[test]
    fn test_display_date_follows_published_at() {
        let mut record = record_at(2024, 1, 5);
        record.published_at = NaiveDate::from_ymd_opt(2023, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        assert_eq!(record.published_at_display(), "31/12/2023");
    }

    #[test]
    fn test_table_row_projection() {
        let record = record_at(2024, 1, 20);
        let row = TableRow::from(&record);

        assert_eq!(
            row.cells(),
            [
                "20/01/2024",
                "Festival: une enquête ouverte",
                "lemonde.fr",
                "https://www.lemonde.fr/culture/article",
                "GDELT",
            ]
        );
    }

    #[test]
    fn test_table_row_serialization_has_only_five_columns() {
        let row = TableRow::from(&record_at(2024, 1, 20));
        let value = serde_json::to_value(&row).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 5);
        for header in TableRow::HEADERS {
            assert!(obj.contains_key(header), "missing column {header}");
        }
    }
}
