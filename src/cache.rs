//! Per-query memoization of normalized series with a time-to-live.
//!
//! The memo table is the only shared mutable state in the crate. Each
//! query key owns an async mutex, which makes access single-flight: one
//! in-flight fetch per key, same-key callers await that result, distinct
//! keys proceed fully in parallel. Nothing survives the process; TTL
//! expiry is checked lazily on access.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ahash::AHashMap;
use tokio::sync::Mutex;

use crate::error::SourceError;
use crate::models::{ProviderQuery, Series};

pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

struct Slot {
    series: Series,
    fetched_at: Instant,
}

/// TTL cache keyed structurally by [`ProviderQuery`]. The key space is
/// the small, fixed (country x indicator) catalog, so there is no
/// eviction beyond expiry.
pub struct SeriesCache {
    ttl: Duration,
    slots: Mutex<AHashMap<ProviderQuery, Arc<Mutex<Option<Slot>>>>>,
}

impl SeriesCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(AHashMap::new()),
        }
    }

    /// Return the cached series for `query`, fetching with `fetch` when
    /// the entry is missing or older than the TTL. At most one fresh
    /// fetch runs per query per TTL window. A fetch failure is not
    /// cached — the next caller retries.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        query: &ProviderQuery,
        fetch: F,
    ) -> Result<Series, SourceError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Series, SourceError>>,
    {
        let slot = {
            let mut slots = self.slots.lock().await;
            slots
                .entry(query.clone())
                .or_insert_with(|| Arc::new(Mutex::new(None)))
                .clone()
        };

        let mut guard = slot.lock().await;
        if let Some(entry) = guard.as_ref() {
            if entry.fetched_at.elapsed() <= self.ttl {
                log::debug!("cache hit for {}", query.source_id());
                return Ok(entry.series.clone());
            }
        }

        log::debug!("cache miss for {}", query.source_id());
        let series = fetch().await?;
        *guard = Some(Slot {
            series: series.clone(),
            fetched_at: Instant::now(),
        });
        Ok(series)
    }
}

impl Default for SeriesCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
