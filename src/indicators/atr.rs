// =============================================================================
// Average True Range (ATR)
// =============================================================================
//
// ATR measures volatility by decomposing the entire range of a bar.
//
// True Range (TR) for each bar:
//   TR = max(H - L, |H - prevClose|, |L - prevClose|)
//
// ATR here is the rolling mean of TR over the look-back window, aligned to
// the input series. The first bar has no previous close, so TR values start
// at index 1 and the ATR is defined from index `window` onward.
// =============================================================================

use crate::market::Bar;

/// Compute the aligned ATR series for `bars` with look-back `window`.
///
/// The result always has the same length as `bars`; indices before `window`
/// are `None`.
///
/// # Edge cases
/// - `window == 0` => all `None`
/// - `bars.len() < window + 1` => all `None` (need `window` TR values, each
///   requiring a previous bar)
/// - Non-finite means yield `None` at that index.
pub fn atr(bars: &[Bar], window: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; bars.len()];
    if window == 0 || bars.len() < window + 1 {
        return result;
    }

    // TR at index i - 1 covers the move into bar i.
    let tr: Vec<f64> = bars
        .windows(2)
        .map(|w| {
            let hl = w[1].high - w[1].low;
            let hc = (w[1].high - w[0].close).abs();
            let lc = (w[1].low - w[0].close).abs();
            hl.max(hc).max(lc)
        })
        .collect();

    let window_f = window as f64;
    let mut sum: f64 = tr[..window].iter().sum();

    for i in window..bars.len() {
        if i > window {
            sum += tr[i - 1] - tr[i - 1 - window];
        }
        let mean = sum / window_f;
        result[i] = mean.is_finite().then_some(mean);
    }

    result
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Interval;
    use crate::market::PriceSeries;
    use chrono::{TimeZone, Utc};

    fn bars(rows: &[(f64, f64, f64, f64)]) -> Vec<Bar> {
        rows.iter()
            .enumerate()
            .map(|(i, &(open, high, low, close))| Bar {
                ts: Utc.timestamp_opt(i as i64 * 60, 0).unwrap(),
                open,
                high,
                low,
                close,
                volume: 100,
            })
            .collect()
    }

    #[test]
    fn atr_insufficient_data() {
        let b = bars(&[(1.0, 2.0, 0.5, 1.5); 5]);
        assert!(atr(&b, 14).iter().all(Option::is_none));
    }

    #[test]
    fn atr_window_zero() {
        let b = bars(&[(1.0, 2.0, 0.5, 1.5); 5]);
        assert!(atr(&b, 0).iter().all(Option::is_none));
    }

    #[test]
    fn atr_alignment() {
        let b = bars(&[(10.0, 12.0, 9.0, 11.0); 20]);
        let out = atr(&b, 5);
        assert_eq!(out.len(), 20);
        assert!(out[..5].iter().all(Option::is_none));
        assert!(out[5..].iter().all(Option::is_some));
    }

    #[test]
    fn atr_constant_range_equals_the_range() {
        // Every bar spans exactly 3.0 and closes inside the next bar's range,
        // so TR = high - low = 3.0 everywhere.
        let b = bars(&[(10.0, 12.0, 9.0, 11.0); 20]);
        let out = atr(&b, 5);
        for v in out.into_iter().flatten() {
            assert!((v - 3.0).abs() < 1e-10, "expected 3.0, got {v}");
        }
    }

    #[test]
    fn atr_gap_uses_previous_close() {
        // A gap up: the bar's own range is small but the distance from the
        // previous close dominates the true range.
        let b = bars(&[
            (10.0, 10.5, 9.5, 10.0),
            (20.0, 20.5, 19.5, 20.0), // TR = |20.5 - 10.0| = 10.5
            (20.0, 20.5, 19.5, 20.0), // TR = 1.0
        ]);
        let out = atr(&b, 2);
        let v = out[2].unwrap();
        assert!((v - (10.5 + 1.0) / 2.0).abs() < 1e-10);
    }

    #[test]
    fn atr_series_helper_roundtrip() {
        // Sanity: works against a PriceSeries' bars directly.
        let series = PriceSeries::new("T", Interval::OneDay, bars(&[(1.0, 2.0, 0.5, 1.5); 10]));
        let out = atr(&series.bars, 3);
        assert_eq!(out.len(), series.len());
    }
}
