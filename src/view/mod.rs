// =============================================================================
// View Assembly — chart and table specifications
// =============================================================================
//
// Pure mapping from (PriceSeries, IndicatorSet, DashboardSettings) to the
// JSON shapes the page renders. No network, no file access, no clock reads:
// identical inputs serialize identically, which is what makes the render
// pipeline testable.

pub mod charts;
pub mod overview;

use serde::Serialize;

use crate::market::PriceSeries;

/// Candlestick trace: parallel arrays, one entry per bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandlestickSeries {
    pub timestamps: Vec<String>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

/// Volume trace aligned with the candlesticks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeSeries {
    pub timestamps: Vec<String>,
    pub volume: Vec<u64>,
}

/// One named line, aligned to the bar timestamps; `None` renders as a gap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// A secondary chart pane below the price chart (RSI, MACD, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorPane {
    pub title: String,
    pub lines: Vec<LineSeries>,
    /// Horizontal guide levels (e.g. RSI 30/70).
    pub guides: Vec<f64>,
}

/// RFC 3339 timestamps for `series`, the shared x-axis of every trace.
pub fn timestamps(series: &PriceSeries) -> Vec<String> {
    series.bars.iter().map(|b| b.ts.to_rfc3339()).collect()
}

pub fn candlesticks(series: &PriceSeries) -> CandlestickSeries {
    CandlestickSeries {
        timestamps: timestamps(series),
        open: series.bars.iter().map(|b| b.open).collect(),
        high: series.bars.iter().map(|b| b.high).collect(),
        low: series.bars.iter().map(|b| b.low).collect(),
        close: series.bars.iter().map(|b| b.close).collect(),
    }
}

pub fn volume(series: &PriceSeries) -> VolumeSeries {
    VolumeSeries {
        timestamps: timestamps(series),
        volume: series.bars.iter().map(|b| b.volume).collect(),
    }
}
