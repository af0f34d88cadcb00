// =============================================================================
// Market overview view — indices, sectors, movers, heatmap
// =============================================================================
//
// Pure assembly: the HTTP layer fetches one series per symbol (skipping
// failures) and hands the survivors here. Every function tolerates missing
// or degenerate series by omitting the affected row rather than erroring —
// one delisted ETF must not blank the whole overview page.
// =============================================================================

use serde::Serialize;

use crate::market::{universe, PriceSeries};
use crate::view::timestamps;

/// Number of gainers and losers shown by the movers widget.
const MOVER_COUNT: usize = 5;

/// Headline quote for one market index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexQuote {
    pub symbol: String,
    pub name: String,
    pub last: f64,
    pub change: f64,
    pub change_pct: f64,
}

/// One index line on the normalized comparison chart: percentage change
/// relative to the first close in the window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSeries {
    pub name: String,
    pub timestamps: Vec<String>,
    pub pct_change: Vec<f64>,
}

/// Sector performance row, derived from the sector's proxy ETF.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorPerformance {
    pub sector: String,
    pub etf: String,
    pub change_pct: f64,
}

/// One entry in the gainers/losers lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mover {
    pub symbol: String,
    pub price: f64,
    pub change_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Movers {
    pub gainers: Vec<Mover>,
    pub losers: Vec<Mover>,
}

/// One cell of the sector × ticker heatmap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub sector: String,
    pub symbol: String,
    pub change_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EconomicIndicator {
    pub name: String,
    pub value: String,
}

/// The complete Market Overview tab payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewView {
    pub indices: Vec<IndexQuote>,
    pub comparison: Vec<ComparisonSeries>,
    pub sectors: Vec<SectorPerformance>,
    pub movers: Movers,
    pub heatmap: Vec<HeatmapCell>,
    pub economic: Vec<EconomicIndicator>,
}

// =============================================================================
// Assembly functions
// =============================================================================

/// Headline quotes: last close vs previous close. Series with fewer than two
/// bars are omitted.
pub fn index_quotes(fetched: &[(&str, PriceSeries)]) -> Vec<IndexQuote> {
    fetched
        .iter()
        .filter_map(|(name, series)| {
            let n = series.len();
            if n < 2 {
                return None;
            }
            let last = series.bars[n - 1].close;
            let prev = series.bars[n - 2].close;
            if prev == 0.0 {
                return None;
            }
            Some(IndexQuote {
                symbol: series.symbol.clone(),
                name: (*name).to_string(),
                last,
                change: last - prev,
                change_pct: (last - prev) / prev * 100.0,
            })
        })
        .collect()
}

/// Normalize each series to percentage change from its first close.
pub fn comparison(fetched: &[(&str, PriceSeries)]) -> Vec<ComparisonSeries> {
    fetched
        .iter()
        .filter_map(|(name, series)| {
            let first = series.bars.first()?.close;
            if first == 0.0 {
                return None;
            }
            Some(ComparisonSeries {
                name: (*name).to_string(),
                timestamps: timestamps(series),
                pct_change: series
                    .bars
                    .iter()
                    .map(|b| (b.close / first - 1.0) * 100.0)
                    .collect(),
            })
        })
        .collect()
}

/// Sector rows: change from the first to the last close of the fetched
/// window, sorted best to worst.
pub fn sector_performance(fetched: &[(&str, &str, PriceSeries)]) -> Vec<SectorPerformance> {
    let mut rows: Vec<SectorPerformance> = fetched
        .iter()
        .filter_map(|(etf, sector, series)| {
            if series.len() < 2 {
                return None;
            }
            let first = series.bars.first()?.close;
            let last = series.bars.last()?.close;
            if first == 0.0 {
                return None;
            }
            Some(SectorPerformance {
                sector: (*sector).to_string(),
                etf: (*etf).to_string(),
                change_pct: (last - first) / first * 100.0,
            })
        })
        .collect();

    rows.sort_by(|a, b| b.change_pct.total_cmp(&a.change_pct));
    rows
}

/// Top gainers and losers across the scanned universe, by session move
/// (first open to last close of the fetched day).
pub fn movers(fetched: &[PriceSeries]) -> Movers {
    let mut changes: Vec<Mover> = fetched
        .iter()
        .filter_map(|series| {
            let pct = series.open_to_close_pct()?;
            Some(Mover {
                symbol: series.symbol.clone(),
                price: series.latest()?.close,
                change_pct: pct,
            })
        })
        .collect();

    changes.sort_by(|a, b| b.change_pct.total_cmp(&a.change_pct));

    let gainers = changes.iter().take(MOVER_COUNT).cloned().collect();
    let losers = {
        let mut tail: Vec<Mover> = changes
            .iter()
            .rev()
            .take(MOVER_COUNT.min(changes.len()))
            .cloned()
            .collect();
        tail.sort_by(|a, b| a.change_pct.total_cmp(&b.change_pct));
        tail
    };

    Movers { gainers, losers }
}

/// Heatmap cells: one per (sector, symbol) with a usable session move.
pub fn heatmap(fetched: &[(&str, PriceSeries)]) -> Vec<HeatmapCell> {
    fetched
        .iter()
        .filter_map(|(sector, series)| {
            Some(HeatmapCell {
                sector: (*sector).to_string(),
                symbol: series.symbol.clone(),
                change_pct: series.open_to_close_pct()?,
            })
        })
        .collect()
}

/// The static economic indicator table.
pub fn economic_indicators() -> Vec<EconomicIndicator> {
    universe::ECONOMIC_INDICATORS
        .iter()
        .map(|(name, value)| EconomicIndicator {
            name: (*name).to_string(),
            value: (*value).to_string(),
        })
        .collect()
}
