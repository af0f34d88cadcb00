// =============================================================================
// Indicator Engine
// =============================================================================
//
// Pure, side-effect-free implementations of the technical indicators shown on
// the dashboard. Every series is ALIGNED to its input: one element per bar,
// `None` where a rolling computation has insufficient history. No indicator
// reorders or drops rows, and none of them errors on well-formed but short
// input — a series of fewer than two points simply yields all-`None` output.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod obv;
pub mod rsi;
pub mod sma;
pub mod summary;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::market::PriceSeries;
use crate::settings::IndicatorToggles;

/// Default RSI look-back window.
pub const RSI_WINDOW: usize = 14;
/// Default ATR look-back window.
pub const ATR_WINDOW: usize = 14;
/// Default Bollinger look-back window.
pub const BOLLINGER_WINDOW: usize = 20;
/// Default Bollinger band width in standard deviations.
pub const BOLLINGER_STD: f64 = 2.0;
/// SMA windows computed for the price overlay.
pub const SMA_WINDOWS: [usize; 3] = [20, 50, 200];

// =============================================================================
// IndicatorSet
// =============================================================================

/// A named collection of indicator series, each aligned to one `PriceSeries`.
///
/// Derived per render cycle, never persisted. A `BTreeMap` keeps the key
/// order deterministic so identical inputs serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndicatorSet {
    series: BTreeMap<String, Vec<Option<f64>>>,
}

impl IndicatorSet {
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<Option<f64>>) {
        self.series.insert(name.into(), values);
    }

    pub fn get(&self, name: &str) -> Option<&[Option<f64>]> {
        self.series.get(name).map(Vec::as_slice)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Whether every contained series has exactly `len` elements.
    pub fn is_aligned(&self, len: usize) -> bool {
        self.series.values().all(|v| v.len() == len)
    }
}

/// Compute the enabled indicators for `series`.
///
/// The returned set satisfies `is_aligned(series.len())` by construction:
/// every indicator function pads its lead-in window with `None` rather than
/// truncating.
pub fn compute(series: &PriceSeries, toggles: &IndicatorToggles) -> IndicatorSet {
    let closes = series.closes();
    let mut set = IndicatorSet::default();

    if toggles.sma {
        for w in SMA_WINDOWS {
            set.insert(format!("sma_{w}"), sma::sma(&closes, w));
        }
    }
    if toggles.ema {
        set.insert("ema_12", ema::ema(&closes, macd::FAST));
        set.insert("ema_26", ema::ema(&closes, macd::SLOW));
    }
    if toggles.macd {
        let out = macd::macd_standard(&closes);
        set.insert("macd", out.macd);
        set.insert("macd_signal", out.signal);
        set.insert("macd_hist", out.histogram);
    }
    if toggles.bollinger {
        let out = bollinger::bollinger(&closes, BOLLINGER_WINDOW, BOLLINGER_STD);
        set.insert("bb_upper", out.upper);
        set.insert("bb_middle", out.middle);
        set.insert("bb_lower", out.lower);
    }
    if toggles.rsi {
        set.insert(format!("rsi_{RSI_WINDOW}"), rsi::rsi(&closes, RSI_WINDOW));
    }
    if toggles.atr {
        set.insert(format!("atr_{ATR_WINDOW}"), atr::atr(&series.bars, ATR_WINDOW));
    }
    if toggles.obv {
        set.insert("obv", obv::obv(&series.bars));
    }

    set
}
