// =============================================================================
// Stock dashboard view — candlestick chart, overlays, indicator panes
// =============================================================================

use serde::Serialize;

use crate::indicators::summary::SummaryStats;
use crate::indicators::IndicatorSet;
use crate::market::{Bar, PriceSeries};
use crate::types::{Interval, Range};
use crate::view::{candlesticks, CandlestickSeries, IndicatorPane, LineSeries, VolumeSeries};

/// Everything the Stock Dashboard tab renders for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockDashboardView {
    pub symbol: String,
    pub range: Range,
    pub interval: Interval,
    pub summary: Option<SummaryStats>,
    pub candles: CandlestickSeries,
    pub volume: VolumeSeries,
    /// Lines drawn over the price chart (moving averages, Bollinger bands).
    pub overlays: Vec<LineSeries>,
    /// Secondary panes below the price chart (RSI, MACD, ATR, OBV).
    pub panes: Vec<IndicatorPane>,
    /// The most recent bars, latest first, for the data table.
    pub recent: Vec<Bar>,
}

/// Rows shown in the recent-data table.
const RECENT_ROWS: usize = 10;

/// Overlay keys drawn on the price chart, in draw order.
const OVERLAY_KEYS: &[&str] = &[
    "sma_20", "sma_50", "sma_200", "ema_12", "ema_26", "bb_upper", "bb_middle", "bb_lower",
];

/// Assemble the dashboard view for one fetched series.
///
/// Pure and deterministic: the only inputs are the arguments. Indicators the
/// set does not contain (disabled, or undefined for this series) simply do
/// not appear.
pub fn stock_dashboard(
    series: &PriceSeries,
    indicators: &IndicatorSet,
    summary: Option<SummaryStats>,
    range: Range,
) -> StockDashboardView {
    let mut overlays = Vec::new();
    for key in OVERLAY_KEYS {
        if let Some(values) = indicators.get(key) {
            overlays.push(LineSeries {
                name: (*key).to_string(),
                values: values.to_vec(),
            });
        }
    }

    let mut panes = Vec::new();

    if let Some(values) = indicators.get("rsi_14") {
        panes.push(IndicatorPane {
            title: "RSI (14)".to_string(),
            lines: vec![LineSeries {
                name: "rsi_14".to_string(),
                values: values.to_vec(),
            }],
            guides: vec![30.0, 70.0],
        });
    }

    if let Some(macd) = indicators.get("macd") {
        let mut lines = vec![LineSeries {
            name: "macd".to_string(),
            values: macd.to_vec(),
        }];
        for key in ["macd_signal", "macd_hist"] {
            if let Some(values) = indicators.get(key) {
                lines.push(LineSeries {
                    name: key.to_string(),
                    values: values.to_vec(),
                });
            }
        }
        panes.push(IndicatorPane {
            title: "MACD (12, 26, 9)".to_string(),
            lines,
            guides: vec![0.0],
        });
    }

    if let Some(values) = indicators.get("atr_14") {
        panes.push(IndicatorPane {
            title: "ATR (14)".to_string(),
            lines: vec![LineSeries {
                name: "atr_14".to_string(),
                values: values.to_vec(),
            }],
            guides: vec![],
        });
    }

    if let Some(values) = indicators.get("obv") {
        panes.push(IndicatorPane {
            title: "On-Balance Volume".to_string(),
            lines: vec![LineSeries {
                name: "obv".to_string(),
                values: values.to_vec(),
            }],
            guides: vec![],
        });
    }

    let recent: Vec<Bar> = series.bars.iter().rev().take(RECENT_ROWS).copied().collect();

    StockDashboardView {
        symbol: series.symbol.clone(),
        range,
        interval: series.interval,
        summary,
        candles: candlesticks(series),
        volume: crate::view::volume(series),
        overlays,
        panes,
        recent,
    }
}
