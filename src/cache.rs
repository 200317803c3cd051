//! Time-boxed memoization of fetch results.
//!
//! [`CachedSource`] wraps any [`ArticleSource`] and remembers successful
//! results keyed by the exact `(query, window_days)` pair. A remembered
//! result is served again while it is younger than the freshness window
//! (30 minutes by default); after that the next call goes back to the
//! network. There is no manual invalidation.
//!
//! # Rules
//!
//! - Only successful fetches are stored. A failure leaves the map untouched
//!   and is returned to the caller as-is.
//! - Entries are fresh while `now - fetched_at < freshness`.
//! - Each key has its own slot lock, held across that key's fetch. A key
//!   is fetched at most once per freshness window even when identical
//!   calls race, and a slow fetch never delays lookups of other keys.
//! - The map of slots is only locked long enough to find or create a slot.
//! - Idle slots that are empty or expired are pruned after every fetch.

use crate::error::RetrievalError;
use crate::models::ArticleRecord;
use crate::sources::ArticleSource;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, instrument};

/// How long a fetched result may be reused.
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(30 * 60);

type CacheKey = (String, u32);

#[derive(Debug)]
struct CacheEntry {
    records: Vec<ArticleRecord>,
    fetched_at: Instant,
}

/// Per-key storage. `None` until the first successful fetch.
type Slot = Arc<Mutex<Option<CacheEntry>>>;

/// Memoizing wrapper around an [`ArticleSource`].
pub struct CachedSource<S> {
    /// The source actually hitting the network.
    inner: S,
    freshness: Duration,
    slots: Mutex<HashMap<CacheKey, Slot>>,
}

impl<S> CachedSource<S>
where
    S: ArticleSource,
{
    /// Wrap `inner` with the default 30 minute freshness window.
    pub fn new(inner: S) -> Self {
        Self::with_freshness(inner, FRESHNESS_WINDOW)
    }

    pub fn with_freshness(inner: S, freshness: Duration) -> Self {
        Self {
            inner,
            freshness,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Return the memoized result for `(query, window_days)` if it is still
    /// fresh, otherwise fetch, store and return a new one.
    #[instrument(level = "info", skip(self))]
    pub async fn get_or_fetch(
        &self,
        query: &str,
        window_days: u32,
    ) -> Result<Vec<ArticleRecord>, RetrievalError> {
        let key = (query.to_string(), window_days);
        let slot = {
            let mut slots = self.slots.lock().await;
            Arc::clone(slots.entry(key).or_default())
        };

        let mut entry = slot.lock().await;
        if let Some(cached) = entry.as_ref() {
            let age = cached.fetched_at.elapsed();
            if age < self.freshness {
                debug!(age_secs = age.as_secs(), count = cached.records.len(), "Cache hit");
                return Ok(cached.records.clone());
            }
            debug!(age_secs = age.as_secs(), "Cache entry expired");
        }

        let result = self.inner.fetch(query, window_days).await;
        if let Ok(records) = &result {
            *entry = Some(CacheEntry {
                records: records.clone(),
                fetched_at: Instant::now(),
            });
            info!(count = records.len(), "Stored fresh result");
        }
        drop(entry);
        drop(slot);

        self.prune().await;
        result
    }

    /// Drop slots nobody is using whose entry is missing or expired.
    ///
    /// A slot referenced outside the map belongs to an in-flight call and is
    /// always kept; the map lock prevents new references while we look.
    async fn prune(&self) {
        let freshness = self.freshness;
        let mut slots = self.slots.lock().await;
        slots.retain(|_, slot| {
            if Arc::strong_count(slot) > 1 {
                return true;
            }
            match slot.try_lock() {
                Ok(entry) => entry
                    .as_ref()
                    .is_some_and(|e| e.fetched_at.elapsed() < freshness),
                Err(_) => true,
            }
        });
        debug!(cached_keys = slots.len(), "Pruned cache slots");
    }

    /// The wrapped source.
    #[cfg(test)]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Number of keys holding a stored result, fresh or not.
    pub async fn len(&self) -> usize {
        let slots: Vec<Slot> = self.slots.lock().await.values().cloned().collect();
        let mut held = 0;
        for slot in slots {
            if slot.lock().await.is_some() {
                held += 1;
            }
        }
        held
    }
}

impl<S> fmt::Debug for CachedSource<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedSource")
            .field("freshness", &self.freshness)
            .finish()
    }
}

impl<S> ArticleSource for CachedSource<S>
where
    S: ArticleSource,
{
    fn provider(&self) -> &str {
        self.inner.provider()
    }

    async fn fetch(
        &self,
        query: &str,
        window_days: u32,
    ) -> Result<Vec<ArticleRecord>, RetrievalError> {
        self.get_or_fetch(query, window_days).await
    }
}
