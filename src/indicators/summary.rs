// =============================================================================
// Summary statistics for the dashboard header widgets
// =============================================================================

use serde::Serialize;

use crate::indicators::{rsi, RSI_WINDOW};
use crate::market::PriceSeries;

/// Descriptive statistics for one fetched series, shown above the chart.
///
/// `fifty_two_week_high` / `low` come from a separate one-year fetch and are
/// filled in by the caller when available.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub latest_price: f64,
    /// Change from the previous close (or the session open when the series
    /// has a single bar).
    pub change: f64,
    pub change_pct: f64,
    pub period_high: f64,
    pub period_low: f64,
    pub latest_volume: u64,
    /// Most recent RSI value and its OVERBOUGHT / OVERSOLD / NEUTRAL label;
    /// `None` when the series is too short or flat.
    pub rsi: Option<f64>,
    pub rsi_signal: Option<&'static str>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
}

/// Compute summary statistics for `series`.
///
/// Returns `None` for an empty series. With a single bar the "previous"
/// price falls back to that bar's open, mirroring how a one-day view reports
/// its intraday move.
pub fn summarize(series: &PriceSeries) -> Option<SummaryStats> {
    let latest = series.latest()?;
    let previous = if series.len() > 1 {
        series.bars[series.len() - 2].close
    } else {
        latest.open
    };

    let change = latest.close - previous;
    let change_pct = if previous != 0.0 {
        change / previous * 100.0
    } else {
        0.0
    };

    let period_high = series
        .bars
        .iter()
        .map(|b| b.high)
        .fold(f64::NEG_INFINITY, f64::max);
    let period_low = series
        .bars
        .iter()
        .map(|b| b.low)
        .fold(f64::INFINITY, f64::min);

    let (rsi, rsi_signal) = match rsi::current_rsi(&series.closes(), RSI_WINDOW) {
        Some((value, label)) => (Some(value), Some(label)),
        None => (None, None),
    };

    Some(SummaryStats {
        latest_price: latest.close,
        change,
        change_pct,
        period_high,
        period_low,
        latest_volume: latest.volume,
        rsi,
        rsi_signal,
        fifty_two_week_high: None,
        fifty_two_week_low: None,
    })
}

/// Extract the (high, low) range from a one-year daily series.
///
/// Returns `None` for an empty series.
pub fn fifty_two_week_range(yearly: &PriceSeries) -> Option<(f64, f64)> {
    if yearly.is_empty() {
        return None;
    }
    let high = yearly
        .bars
        .iter()
        .map(|b| b.high)
        .fold(f64::NEG_INFINITY, f64::max);
    let low = yearly
        .bars
        .iter()
        .map(|b| b.low)
        .fold(f64::INFINITY, f64::min);
    Some((high, low))
}
