// =============================================================================
// Fetch cache — short-TTL memoization of upstream responses
// =============================================================================
//
// The page polls on a timer and the overview tab fans out over dozens of
// symbols; without a cache every tick would replay the same upstream calls.
// Entries live for a fixed TTL (default 60 s, matching the refresh default)
// and are evicted lazily on lookup.
// =============================================================================

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::debug;

use crate::market::PriceSeries;
use crate::types::{Interval, Range};

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Cache key: one entry per (symbol, range, interval) triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub symbol: String,
    pub range: Range,
    pub interval: Interval,
}

impl CacheKey {
    pub fn new(symbol: &str, range: Range, interval: Interval) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            range,
            interval,
        }
    }
}

struct CacheEntry {
    series: PriceSeries,
    fetched_at: Instant,
}

/// TTL cache for fetched price series.
pub struct FetchCache {
    ttl: Duration,
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl FetchCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// A still-fresh cached series for `key`, if any. Stale entries are
    /// removed on the way out.
    pub fn get(&self, key: &CacheKey) -> Option<PriceSeries> {
        {
            let entries = self.entries.read();
            let entry = entries.get(key)?;
            if entry.fetched_at.elapsed() < self.ttl {
                debug!(symbol = %key.symbol, range = %key.range, "fetch cache hit");
                return Some(entry.series.clone());
            }
        }

        // Entry exists but expired — evict under the write lock.
        self.entries.write().remove(key);
        None
    }

    /// Store a freshly fetched series.
    pub fn insert(&self, key: CacheKey, series: PriceSeries) {
        self.entries.write().insert(
            key,
            CacheEntry {
                series,
                fetched_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for FetchCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
