// =============================================================================
// Market Data Access — upstream quote API shim
// =============================================================================
//
// Everything the rest of the dashboard knows about market data enters through
// this module: the `PriceSeries` shape, the upstream client, response
// normalization, the short-TTL fetch cache, and the static symbol universe
// used by the market overview page.
//
// Failure taxonomy is fixed at this boundary: "symbol not found / no data" is
// distinct from a transient network failure, so the UI can render a useful
// message and simply retry on its next refresh tick.
// =============================================================================

pub mod cache;
pub mod client;
pub mod normalize;
pub mod universe;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Interval;

// =============================================================================
// Bar / PriceSeries
// =============================================================================

/// One OHLCV bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub ts: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// An ordered OHLCV series for one symbol at one bar interval.
///
/// Invariant: timestamps are strictly increasing. A `PriceSeries` is produced
/// fresh by every fetch and never mutated afterwards; normalization is the
/// only place bars are dropped or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub interval: Interval,
    pub bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, interval: Interval, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Closing prices in bar order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// The most recent bar, if any.
    pub fn latest(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Percentage change from the first bar's open to the last bar's close.
    ///
    /// This is the "daily move" used by the overview page when the series
    /// covers a single session. `None` on an empty series or a zero open.
    pub fn open_to_close_pct(&self) -> Option<f64> {
        let first = self.bars.first()?;
        let last = self.bars.last()?;
        if first.open == 0.0 {
            return None;
        }
        let pct = (last.close - first.open) / first.open * 100.0;
        pct.is_finite().then_some(pct)
    }
}

// =============================================================================
// FetchError
// =============================================================================

/// Failure taxonomy for upstream market-data fetches.
///
/// `SymbolNotFound` is a definitive answer (retrying will not help);
/// `RateLimited` and `Transient` are expected to succeed on a later refresh
/// tick. `Malformed` means the upstream answered but the payload did not
/// match the documented shape.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no data for symbol '{0}'")]
    SymbolNotFound(String),

    #[error("upstream rate limit exceeded")]
    RateLimited,

    #[error("upstream request failed: {0}")]
    Transient(String),

    #[error("malformed upstream response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Whether a retry on the next refresh tick can reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::Transient(_))
    }
}
