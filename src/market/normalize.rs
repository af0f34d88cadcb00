// =============================================================================
// Upstream response normalization
// =============================================================================
//
// The chart endpoint returns parallel arrays:
//
//   result.timestamp               — epoch seconds, one per row
//   result.indicators.quote[0]    — { open: [...], high: [...], low: [...],
//                                     close: [...], volume: [...] }
//
// Rows are joined by index into `Bar`s. The upstream is not perfectly tidy:
// key casing varies between mirrors ("close" vs "Close"), halted sessions
// produce null entries, and occasionally a timestamp repeats. Normalization
// enforces the `PriceSeries` invariants here so nothing downstream has to:
//
//   - any row with a null timestamp or null OHLC field is dropped
//   - a null volume is kept as 0 (upstream does this for indices)
//   - rows with non-increasing timestamps are dropped
// =============================================================================

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use crate::market::{Bar, FetchError, PriceSeries};
use crate::types::Interval;

/// Build a `PriceSeries` from `result` (the first element of `chart.result`).
///
/// Structural problems (missing arrays) are `Malformed`; bad individual rows
/// are silently dropped.
pub fn price_series_from_chart(
    symbol: &str,
    interval: Interval,
    result: &Value,
) -> Result<PriceSeries, FetchError> {
    let timestamps = result
        .get("timestamp")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let quote = result
        .get("indicators")
        .and_then(|i| i.get("quote"))
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
        .ok_or_else(|| FetchError::Malformed("missing indicators.quote[0]".into()))?;

    let opens = field(quote, "open")?;
    let highs = field(quote, "high")?;
    let lows = field(quote, "low")?;
    let closes = field(quote, "close")?;
    let volumes = field(quote, "volume")?;

    let rows = timestamps.len();
    let mut bars: Vec<Bar> = Vec::with_capacity(rows);
    let mut dropped = 0usize;

    for i in 0..rows {
        let row = (|| {
            let ts = timestamps.get(i)?.as_i64()?;
            let ts = DateTime::<Utc>::from_timestamp(ts, 0)?;
            Some(Bar {
                ts,
                open: finite(opens.get(i))?,
                high: finite(highs.get(i))?,
                low: finite(lows.get(i))?,
                close: finite(closes.get(i))?,
                volume: volumes.get(i).and_then(Value::as_u64).unwrap_or(0),
            })
        })();

        match row {
            Some(bar) => {
                // Strictly increasing timestamps: drop repeats and rewinds.
                if bars.last().is_some_and(|prev: &Bar| bar.ts <= prev.ts) {
                    dropped += 1;
                    continue;
                }
                bars.push(bar);
            }
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!(symbol, dropped, kept = bars.len(), "dropped unusable upstream rows");
    }

    Ok(PriceSeries::new(symbol.to_uppercase(), interval, bars))
}

/// Look up a quote field case-insensitively ("close", "Close", "CLOSE"...).
fn field<'a>(quote: &'a Value, name: &str) -> Result<&'a Vec<Value>, FetchError> {
    let obj = quote
        .as_object()
        .ok_or_else(|| FetchError::Malformed("quote is not an object".into()))?;

    obj.iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .and_then(|(_, v)| v.as_array())
        .ok_or_else(|| FetchError::Malformed(format!("missing quote field '{name}'")))
}

/// A finite f64 from a JSON value, or `None` (nulls, NaN strings, etc.).
fn finite(value: Option<&Value>) -> Option<f64> {
    let v = value?.as_f64()?;
    v.is_finite().then_some(v)
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn chart_result(
        timestamps: serde_json::Value,
        quote: serde_json::Value,
    ) -> serde_json::Value {
        serde_json::json!({
            "timestamp": timestamps,
            "indicators": { "quote": [quote] }
        })
    }

    #[test]
    fn parses_well_formed_rows() {
        let result = chart_result(
            serde_json::json!([100, 160, 220]),
            serde_json::json!({
                "open": [1.0, 2.0, 3.0],
                "high": [1.5, 2.5, 3.5],
                "low": [0.5, 1.5, 2.5],
                "close": [1.2, 2.2, 3.2],
                "volume": [10, 20, 30]
            }),
        );
        let series = price_series_from_chart("aapl", Interval::OneDay, &result).unwrap();
        assert_eq!(series.symbol, "AAPL");
        assert_eq!(series.len(), 3);
        assert_eq!(series.bars[1].close, 2.2);
        assert_eq!(series.bars[2].volume, 30);
    }

    #[test]
    fn capitalized_keys_parse_identically() {
        let lower = chart_result(
            serde_json::json!([100, 160]),
            serde_json::json!({
                "open": [1.0, 2.0], "high": [1.5, 2.5],
                "low": [0.5, 1.5], "close": [1.2, 2.2], "volume": [10, 20]
            }),
        );
        let upper = chart_result(
            serde_json::json!([100, 160]),
            serde_json::json!({
                "Open": [1.0, 2.0], "High": [1.5, 2.5],
                "Low": [0.5, 1.5], "Close": [1.2, 2.2], "Volume": [10, 20]
            }),
        );
        let a = price_series_from_chart("MSFT", Interval::OneDay, &lower).unwrap();
        let b = price_series_from_chart("MSFT", Interval::OneDay, &upper).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn null_ohlc_rows_are_dropped() {
        let result = chart_result(
            serde_json::json!([100, 160, 220]),
            serde_json::json!({
                "open": [1.0, null, 3.0],
                "high": [1.5, 2.5, 3.5],
                "low": [0.5, 1.5, 2.5],
                "close": [1.2, 2.2, 3.2],
                "volume": [10, 20, 30]
            }),
        );
        let series = price_series_from_chart("AAPL", Interval::OneDay, &result).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars[0].ts.timestamp(), 100);
        assert_eq!(series.bars[1].ts.timestamp(), 220);
    }

    #[test]
    fn null_volume_is_kept_as_zero() {
        let result = chart_result(
            serde_json::json!([100]),
            serde_json::json!({
                "open": [1.0], "high": [1.5], "low": [0.5], "close": [1.2],
                "volume": [null]
            }),
        );
        let series = price_series_from_chart("^GSPC", Interval::OneDay, &result).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.bars[0].volume, 0);
    }

    #[test]
    fn non_increasing_timestamps_are_dropped() {
        let result = chart_result(
            serde_json::json!([100, 100, 90, 160]),
            serde_json::json!({
                "open": [1.0, 1.0, 1.0, 2.0],
                "high": [1.5, 1.5, 1.5, 2.5],
                "low": [0.5, 0.5, 0.5, 1.5],
                "close": [1.2, 1.2, 1.2, 2.2],
                "volume": [10, 10, 10, 20]
            }),
        );
        let series = price_series_from_chart("AAPL", Interval::OneDay, &result).unwrap();
        assert_eq!(series.len(), 2);
        assert!(series.bars.windows(2).all(|w| w[0].ts < w[1].ts));
    }

    #[test]
    fn missing_quote_is_malformed() {
        let result = serde_json::json!({ "timestamp": [100] });
        let err = price_series_from_chart("AAPL", Interval::OneDay, &result).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn missing_field_is_malformed() {
        let result = chart_result(
            serde_json::json!([100]),
            serde_json::json!({ "open": [1.0], "high": [1.5], "low": [0.5], "close": [1.2] }),
        );
        let err = price_series_from_chart("AAPL", Interval::OneDay, &result).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn empty_arrays_give_empty_series() {
        let result = chart_result(
            serde_json::json!([]),
            serde_json::json!({
                "open": [], "high": [], "low": [], "close": [], "volume": []
            }),
        );
        let series = price_series_from_chart("AAPL", Interval::OneDay, &result).unwrap();
        assert!(series.is_empty());
    }
}
