//! GDELT DOC 2.1 article search.
//!
//! This module queries the [GDELT DOC API](https://blog.gdeltproject.org/gdelt-2-1-api-debuts/)
//! in `ArtList` mode and turns its JSON answer into [`ArticleRecord`]s.
//!
//! # Request
//!
//! The API has no "last N days" parameter, only an absolute `startdatetime`,
//! so the window start is recomputed from the wall clock on every call:
//!
//! ```text
//! https://api.gdeltproject.org/api/v2/doc/doc
//!     ?query=<escaped>&mode=ArtList&format=json&maxrecords=250
//!     &startdatetime=YYYYMMDDhhmmss&sourcelang=French
//! ```
//!
//! `maxrecords` is capped at 250 by the API. Windows with more matches are
//! silently truncated, so results are a sample, not a complete set.
//!
//! # Normalization
//!
//! Field names differ between GDELT endpoints and modes, so every logical
//! attribute is resolved from an ordered list of candidate keys (see
//! [`first_non_empty`]). Articles without a parsable date are dropped.

use crate::error::RetrievalError;
use crate::models::{ArticleRecord, GDELT_PROVIDER};
use crate::sources::ArticleSource;
use crate::utils::truncate_for_log;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use std::time::{Duration as StdDuration, Instant};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Public DOC 2.1 endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.gdeltproject.org/api/v2/doc/doc";
/// Hard cap enforced by the API in `ArtList` mode.
pub const MAX_RECORDS: u32 = 250;
/// Only French-language sources are requested.
pub const SOURCE_LANG: &str = "French";
pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(30);

/// Candidate keys for the publication date, most specific first.
pub const DATE_FIELDS: &[&str] = &["seendate", "datetime", "date"];
pub const TITLE_FIELDS: &[&str] = &["title"];
pub const SOURCE_LABEL_FIELDS: &[&str] = &["sourceCountry", "source"];
pub const DOMAIN_FIELDS: &[&str] = &["domain"];
pub const URL_FIELDS: &[&str] = &["url"];
pub const SNIPPET_FIELDS: &[&str] = &["summary", "snippet"];

/// Formats tried, in order, for timestamps without an offset.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y%m%dT%H%M%SZ",
    "%Y%m%dT%H%M%S",
    "%Y%m%d%H%M%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    // English month names; `%B` also accepts the three-letter abbreviation
    "%d %B %Y %H:%M:%S",
    "%d %B %Y %H:%M",
    "%B %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d", "%Y/%m/%d", "%d %B %Y", "%B %d, %Y"];

/// Compute the `startdatetime` parameter: `now - window_days`, as `YYYYMMDDhhmmss`.
pub fn start_datetime(now: DateTime<Utc>, window_days: u32) -> String {
    (now - Duration::days(i64::from(window_days)))
        .format("%Y%m%d%H%M%S")
        .to_string()
}

/// Return the first candidate whose value is present and not empty.
///
/// `null` and `""` count as empty. Any other value, including a non-string,
/// is returned as-is and left for the caller to interpret.
pub fn first_non_empty<'a>(article: &'a Map<String, Value>, candidates: &[&str]) -> Option<&'a Value> {
    candidates
        .iter()
        .filter_map(|key| article.get(*key))
        .find(|value| match value {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            _ => true,
        })
}

/// Resolve a text attribute, defaulting to an empty string.
fn text_field(article: &Map<String, Value>, candidates: &[&str]) -> String {
    first_non_empty(article, candidates)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Parse a publication timestamp in any of the shapes GDELT and its mirrors emit.
///
/// Offsets are folded into UTC before the zone is dropped. Date-only values
/// land at midnight.
pub fn parse_published_at(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.naive_utc());
    }
    if let Some(dt) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt);
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Build one record from a raw article object, or `None` if it has no usable date.
pub fn normalize_article(article: &Map<String, Value>, provider: &str) -> Option<ArticleRecord> {
    let published_at = first_non_empty(article, DATE_FIELDS)
        .and_then(Value::as_str)
        .and_then(parse_published_at)?;

    Some(ArticleRecord {
        published_at,
        title: text_field(article, TITLE_FIELDS),
        source_label: text_field(article, SOURCE_LABEL_FIELDS),
        domain: text_field(article, DOMAIN_FIELDS),
        url: text_field(article, URL_FIELDS),
        snippet: text_field(article, SNIPPET_FIELDS),
        provider: provider.to_string(),
    })
}

/// Turn a full `ArtList` response document into records, newest first.
///
/// A missing `articles` key yields an empty list. Items that are not objects
/// or lack a parsable date are skipped. The sort is stable, so articles with
/// equal timestamps keep the order the API returned them in.
pub fn normalize_response(doc: &Value, provider: &str) -> Vec<ArticleRecord> {
    let raw = doc
        .get("articles")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut records: Vec<ArticleRecord> = raw
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|article| normalize_article(article, provider))
        .collect();

    let dropped = raw.len() - records.len();
    if dropped > 0 {
        debug!(dropped, total = raw.len(), "Skipped articles without a usable date");
    }

    records.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    records
}

/// Client for the GDELT DOC API.
#[derive(Debug, Clone)]
pub struct GdeltClient {
    http: reqwest::Client,
    endpoint: Url,
    timeout: StdDuration,
}

impl GdeltClient {
    /// Create a client against `endpoint` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Fails if the endpoint is not a valid URL or the HTTP client cannot be built.
    pub fn new(endpoint: &str, timeout: StdDuration) -> Result<Self, RetrievalError> {
        let endpoint = Url::parse(endpoint)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            endpoint,
            timeout,
        })
    }

    /// Build the full request URL for a query and window, relative to `now`.
    pub fn request_url(&self, query: &str, window_days: u32, now: DateTime<Utc>) -> Url {
        let mut url = self.endpoint.clone();
        let params = format!(
            "query={}&mode=ArtList&format=json&maxrecords={}&startdatetime={}&sourcelang={}",
            urlencoding::encode(query),
            MAX_RECORDS,
            start_datetime(now, window_days),
            SOURCE_LANG,
        );
        url.set_query(Some(&params));
        url
    }

    fn classify(&self, e: reqwest::Error) -> RetrievalError {
        if e.is_timeout() {
            RetrievalError::Timeout(self.timeout)
        } else {
            RetrievalError::Transport(e)
        }
    }
}

impl ArticleSource for GdeltClient {
    fn provider(&self) -> &str {
        GDELT_PROVIDER
    }

    #[instrument(level = "info", skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch(
        &self,
        query: &str,
        window_days: u32,
    ) -> Result<Vec<ArticleRecord>, RetrievalError> {
        let t0 = Instant::now();
        let url = self.request_url(query, window_days, Utc::now());
        debug!(%url, "Requesting GDELT article list");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, elapsed_ms = t0.elapsed().as_millis(), "GDELT returned non-success status");
            return Err(RetrievalError::Status(status));
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        let doc: Value = serde_json::from_str(&body).map_err(|e| {
            warn!(
                error = %e,
                body_preview = %truncate_for_log(&body, 300),
                "GDELT body is not JSON"
            );
            RetrievalError::Body(e)
        })?;

        let records = normalize_response(&doc, self.provider());
        info!(
            count = records.len(),
            elapsed_ms = t0.elapsed().as_millis(),
            "Fetched GDELT articles"
        );
        Ok(records)
    }
}
