// =============================================================================
// On-Balance Volume (OBV)
// =============================================================================
//
// OBV is a cumulative volume-flow indicator: starting from the first bar's
// volume, each subsequent bar adds its volume on an up-close, subtracts it on
// a down-close, and carries the total unchanged on a flat close.
// =============================================================================

use crate::market::Bar;

/// Compute the aligned OBV series for `bars`.
///
/// The result always has the same length as `bars`.
///
/// # Edge cases
/// - `bars.len() < 2` => all `None` (a single bar carries no flow signal)
/// - Every step changes the running total by exactly +volume, -volume, or 0.
pub fn obv(bars: &[Bar]) -> Vec<Option<f64>> {
    let mut result = vec![None; bars.len()];
    if bars.len() < 2 {
        return result;
    }

    let mut total = bars[0].volume as f64;
    result[0] = Some(total);

    for i in 1..bars.len() {
        let vol = bars[i].volume as f64;
        if bars[i].close > bars[i - 1].close {
            total += vol;
        } else if bars[i].close < bars[i - 1].close {
            total -= vol;
        }
        result[i] = Some(total);
    }

    result
}
