// =============================================================================
// Central Application State — MarketDeck
// =============================================================================
//
// The shared state behind the HTTP handlers: the settings snapshot, the
// upstream client, the fetch cache, and the usage log. Each request runs the
// fetch → compute → assemble pipeline sequentially against this state; the
// only cross-request coordination is the read-mostly locks here.
//
// Thread safety:
//   - Atomic counter for lock-free version tracking.
//   - parking_lot::RwLock for the mutable settings snapshot.
//   - UsageLog and FetchCache manage their own interior mutability.
// =============================================================================

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;

use crate::analytics::UsageLog;
use crate::market::cache::{CacheKey, FetchCache};
use crate::market::client::MarketClient;
use crate::market::{FetchError, PriceSeries};
use crate::settings::DashboardSettings;
use crate::types::{Interval, Range};

/// Shared application state, held as `Arc<AppState>` by every handler.
pub struct AppState {
    /// Monotonically increasing version counter, bumped on every settings
    /// change so the page can cheaply detect staleness.
    state_version: AtomicU64,

    /// Process start time, reported by the health endpoint.
    pub started_at: DateTime<Utc>,

    /// Current user settings; read once per request as a snapshot.
    pub settings: RwLock<DashboardSettings>,

    /// Where settings are persisted on change and on shutdown.
    pub settings_path: PathBuf,

    pub market: MarketClient,
    pub cache: FetchCache,
    pub analytics: UsageLog,
}

impl AppState {
    pub fn new(
        settings: DashboardSettings,
        settings_path: impl Into<PathBuf>,
        market: MarketClient,
        analytics: UsageLog,
    ) -> Self {
        Self {
            state_version: AtomicU64::new(1),
            started_at: Utc::now(),
            settings: RwLock::new(settings),
            settings_path: settings_path.into(),
            market,
            cache: FetchCache::default(),
            analytics,
        }
    }

    pub fn increment_version(&self) -> u64 {
        self.state_version.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current_state_version(&self) -> u64 {
        self.state_version.load(Ordering::SeqCst)
    }

    /// Fetch a series through the cache.
    ///
    /// Errors are never cached: a failed symbol is retried on the next poll.
    pub async fn fetch_cached(
        &self,
        symbol: &str,
        range: Range,
        interval: Interval,
    ) -> Result<PriceSeries, FetchError> {
        let key = CacheKey::new(symbol, range, interval);
        if let Some(series) = self.cache.get(&key) {
            return Ok(series);
        }

        let series = self.market.fetch_series(symbol, range, interval).await?;
        debug!(symbol = %key.symbol, bars = series.len(), "caching fetched series");
        self.cache.insert(key, series.clone());
        Ok(series)
    }
}
