// =============================================================================
// Upstream quote client — Yahoo Finance v8 chart endpoint
// =============================================================================
//
// Public, unauthenticated endpoint:
//   GET {base}/v8/finance/chart/{symbol}?range={range}&interval={interval}
//
// The response carries parallel arrays (timestamp + one quote object of
// open/high/low/close/volume arrays); `normalize` turns that into the fixed
// `PriceSeries` shape. No retry loop lives here: the page's polling cycle
// already retries transient failures on the next tick.
// =============================================================================

use reqwest::StatusCode;
use tracing::{debug, instrument, warn};

use crate::market::{normalize, FetchError, PriceSeries};
use crate::types::{Interval, Range};

/// Default upstream base URL, overridable via `DASHBOARD_UPSTREAM_URL`.
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Per-request timeout. A fetch blocks its render cycle, so it must give up
/// well before the refresh interval elapses.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// HTTP client for the upstream quote API.
#[derive(Debug, Clone)]
pub struct MarketClient {
    base_url: String,
    client: reqwest::Client,
}

impl MarketClient {
    /// Create a client against `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("marketdeck/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build reqwest client");

        let base_url = base_url.into();
        debug!(%base_url, "MarketClient initialised");

        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch an OHLCV series for `symbol` over `range` at `interval`.
    ///
    /// Distinguishes a definitive "no data for this symbol" from transient
    /// network trouble; see [`FetchError`]. An upstream answer with zero
    /// usable bars is reported as `SymbolNotFound`, never as an
    /// empty-but-valid series.
    #[instrument(skip(self), name = "market::fetch_series")]
    pub async fn fetch_series(
        &self,
        symbol: &str,
        range: Range,
        interval: Interval,
    ) -> Result<PriceSeries, FetchError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(FetchError::SymbolNotFound(String::new()));
        }

        let url = format!(
            "{}/v8/finance/chart/{}?range={}&interval={}",
            self.base_url, symbol, range, interval
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transient(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!(symbol, "upstream rate limit hit");
            return Err(FetchError::RateLimited);
        }

        // The chart endpoint reports unknown symbols as 404 with a JSON error
        // body; other non-2xx statuses are treated as transient.
        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| FetchError::Malformed(e.to_string()))?;

        if let Some(message) = upstream_error_message(&body) {
            debug!(symbol, %status, message, "upstream reported an error");
            if status == StatusCode::NOT_FOUND || message.contains("No data found") {
                return Err(FetchError::SymbolNotFound(symbol.to_string()));
            }
            return Err(FetchError::Transient(message));
        }
        if !status.is_success() {
            return Err(FetchError::Transient(format!("upstream returned {status}")));
        }

        let result = body
            .get("chart")
            .and_then(|c| c.get("result"))
            .and_then(|r| r.as_array())
            .and_then(|arr| arr.first())
            .ok_or_else(|| FetchError::Malformed("missing chart.result[0]".into()))?;

        let series = normalize::price_series_from_chart(symbol, interval, result)?;
        if series.is_empty() {
            return Err(FetchError::SymbolNotFound(symbol.to_string()));
        }

        debug!(symbol, %range, %interval, bars = series.len(), "series fetched");
        Ok(series)
    }
}

/// Extract the human-readable error description from a chart response, if the
/// upstream reported one.
fn upstream_error_message(body: &serde_json::Value) -> Option<String> {
    let error = body.get("chart")?.get("error")?;
    if error.is_null() {
        return None;
    }
    let description = error
        .get("description")
        .and_then(|d| d.as_str())
        .unwrap_or("unknown upstream error");
    Some(description.to_string())
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_error_message_extracts_description() {
        let body = serde_json::json!({
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        });
        let msg = upstream_error_message(&body).unwrap();
        assert!(msg.contains("No data found"));
    }

    #[test]
    fn upstream_error_message_null_error_is_none() {
        let body = serde_json::json!({
            "chart": { "result": [], "error": null }
        });
        assert!(upstream_error_message(&body).is_none());
    }

    #[tokio::test]
    async fn empty_symbol_is_not_found_without_a_request() {
        // Unroutable base URL: if the client tried the network this would be
        // a transient error instead.
        let client = MarketClient::new("http://127.0.0.1:0");
        let err = client
            .fetch_series("   ", Range::OneMonth, Interval::OneDay)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::SymbolNotFound(_)));
    }

    #[tokio::test]
    async fn unreachable_upstream_is_transient() {
        let client = MarketClient::new("http://127.0.0.1:1");
        let err = client
            .fetch_series("AAPL", Range::OneMonth, Interval::OneDay)
            .await
            .unwrap_err();
        assert!(err.is_retryable(), "expected retryable error, got {err:?}");
    }
}
