//! In-memory resolution cache with a time-to-live.
//!
//! Entries are keyed by normalized query and expire lazily: an entry whose
//! age has reached the TTL is evicted by the read that finds it. There is no
//! size bound.

mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use serde::Serialize;

use crate::models::ResolutionResult;

/// Default time-to-live for cached resolutions, in seconds (24 hours).
pub const DEFAULT_CACHE_TTL_SECS: i64 = 86_400;

#[derive(Clone, Debug)]
struct CacheEntry {
    value: ResolutionResult,
    created_at: DateTime<Utc>,
}

/// Per-entry view returned by [`ResolutionCache::stats`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntryStats {
    pub key: String,
    pub ticker: Option<String>,
    /// Age in whole seconds.
    pub age_secs: i64,
}

/// Cache statistics.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub entries: Vec<CacheEntryStats>,
}

/// TTL cache of successful resolutions.
pub struct ResolutionCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ResolutionCache {
    /// Create a cache on the wall clock with the default TTL.
    pub fn new() -> Self {
        Self::with_clock(Duration::seconds(DEFAULT_CACHE_TTL_SECS), Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// Current time according to this cache's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn lock_entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("Resolution cache mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Fetch the cached result for `key`, evicting it if it has expired.
    pub fn get(&self, key: &str) -> Option<ResolutionResult> {
        let now = self.clock.now();
        let mut entries = self.lock_entries();

        let expired = now - entries.get(key)?.created_at >= self.ttl;
        if expired {
            debug!("Cache entry '{}' expired, evicting", key);
            entries.remove(key);
            return None;
        }

        entries.get(key).map(|entry| entry.value.clone())
    }

    /// Insert or replace the entry for `key`, stamped with the current time.
    pub fn set(&self, key: impl Into<String>, value: ResolutionResult) {
        let created_at = self.clock.now();
        self.lock_entries()
            .insert(key.into(), CacheEntry { value, created_at });
    }

    /// Remove one entry, or every entry when `key` is `None`.
    pub fn clear(&self, key: Option<&str>) {
        let mut entries = self.lock_entries();
        match key {
            Some(key) => {
                entries.remove(key);
            }
            None => entries.clear(),
        }
    }

    /// Snapshot of the cache contents. Does not evict.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let entries = self.lock_entries();

        let mut list: Vec<CacheEntryStats> = entries
            .iter()
            .map(|(key, entry)| CacheEntryStats {
                key: key.clone(),
                ticker: entry.value.ticker().map(str::to_string),
                age_secs: (now - entry.created_at).num_seconds(),
            })
            .collect();
        list.sort_by(|a, b| a.key.cmp(&b.key));

        CacheStats {
            size: list.len(),
            entries: list,
        }
    }
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ResolutionOutcome, ResolvedFrom, SymbolRecord, TelemetryEvent, TelemetryKind};
    use chrono::TimeZone;

    fn resolved(ticker: &str, now: DateTime<Utc>) -> ResolutionResult {
        let outcome = ResolutionOutcome::Resolved {
            symbol: SymbolRecord::new(ticker, Some("NASDAQ".to_string()), 0.99),
            resolved_from: ResolvedFrom::LocalCache,
        };
        ResolutionResult {
            input: ticker.to_lowercase(),
            telemetry: TelemetryEvent::new(TelemetryKind::SymbolResolved, ticker, &outcome, now),
            outcome,
        }
    }

    fn cache_at(start: DateTime<Utc>) -> (ResolutionCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start));
        let cache = ResolutionCache::with_clock(Duration::hours(24), clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_set_and_get() {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let (cache, _) = cache_at(start);

        cache.set("nvidia", resolved("NVDA", start));
        assert_eq!(cache.get("nvidia").unwrap().ticker(), Some("NVDA"));
        assert!(cache.get("apple").is_none());
    }

    #[test]
    fn test_entry_expires_at_ttl() {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let (cache, clock) = cache_at(start);
        cache.set("nvidia", resolved("NVDA", start));

        clock.advance(Duration::hours(24) - Duration::seconds(1));
        assert!(cache.get("nvidia").is_some());

        clock.advance(Duration::seconds(1));
        assert!(cache.get("nvidia").is_none());
        assert_eq!(cache.stats().size, 0);
    }

    #[test]
    fn test_set_refreshes_created_at() {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let (cache, clock) = cache_at(start);
        cache.set("nvidia", resolved("NVDA", start));

        clock.advance(Duration::hours(20));
        cache.set("nvidia", resolved("NVDA", start));
        clock.advance(Duration::hours(20));
        assert!(cache.get("nvidia").is_some());
    }

    #[test]
    fn test_clear_one_and_all() {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let (cache, _) = cache_at(start);
        cache.set("nvidia", resolved("NVDA", start));
        cache.set("apple", resolved("AAPL", start));

        cache.clear(Some("nvidia"));
        assert!(cache.get("nvidia").is_none());
        assert!(cache.get("apple").is_some());

        cache.clear(None);
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn test_stats_reports_age() {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let (cache, clock) = cache_at(start);
        cache.set("nvidia", resolved("NVDA", start));
        clock.advance(Duration::seconds(90));
        cache.set("apple", resolved("AAPL", start));

        let stats = cache.stats();
        assert_eq!(stats.size, 2);
        assert_eq!(
            stats.entries,
            vec![
                CacheEntryStats {
                    key: "apple".to_string(),
                    ticker: Some("AAPL".to_string()),
                    age_secs: 0,
                },
                CacheEntryStats {
                    key: "nvidia".to_string(),
                    ticker: Some("NVDA".to_string()),
                    age_secs: 90,
                },
            ]
        );
    }
}
