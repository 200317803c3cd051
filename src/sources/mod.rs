//! Remote article sources.
//!
//! Every backend implements [`ArticleSource`]: take a free-text query and a
//! look-back window in days, return normalized records newest first. The
//! dashboard concatenates the output of every enabled source.
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | GDELT DOC 2.1 | [`gdelt`] | JSON `ArtList` | Free, no key; capped at 250 records |
//!
//! # Decorators
//!
//! [`crate::cache::CachedSource`] wraps any source with a freshness window,
//! in the same way a retry wrapper would wrap a client.

use crate::error::RetrievalError;
use crate::models::ArticleRecord;

pub mod gdelt;

/// Trait for async article retrieval.
pub trait ArticleSource {
    /// Label stamped on the records this source produces.
    fn provider(&self) -> &str;

    /// Fetch articles matching `query` published within the last `window_days`.
    ///
    /// Returns records sorted by publication time, newest first. An empty
    /// vector is a valid answer.
    async fn fetch(
        &self,
        query: &str,
        window_days: u32,
    ) -> Result<Vec<ArticleRecord>, RetrievalError>;
}
