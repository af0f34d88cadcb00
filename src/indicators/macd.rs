// =============================================================================
// Moving Average Convergence / Divergence (MACD)
// =============================================================================
//
// MACD line  = EMA(fast) - EMA(slow)            (standard: 12 / 26)
// Signal     = EMA(signal window) of the MACD line   (standard: 9)
// Histogram  = MACD - Signal
//
// All three series are aligned to the input: `None` until enough history has
// accumulated for the respective component.
// =============================================================================

use super::ema::ema;

/// Standard fast EMA window.
pub const FAST: usize = 12;
/// Standard slow EMA window.
pub const SLOW: usize = 26;
/// Standard signal EMA window.
pub const SIGNAL: usize = 9;

/// The three aligned MACD output series.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

/// Compute MACD for `closes` with the given windows.
///
/// Each output vector has the same length as `closes`. The MACD line is
/// defined from index `slow - 1`; the signal from `slow + signal_window - 2`;
/// the histogram wherever both are defined.
///
/// # Edge cases
/// - Any window of zero, or `closes.len() < 2` => all three series all `None`.
/// - A series shorter than `slow` simply yields all `None` — never an error.
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal_window: usize) -> MacdOutput {
    let len = closes.len();
    let undefined = MacdOutput {
        macd: vec![None; len],
        signal: vec![None; len],
        histogram: vec![None; len],
    };
    if fast == 0 || slow == 0 || signal_window == 0 || len < 2 {
        return undefined;
    }

    let fast_ema = ema(closes, fast);
    let slow_ema = ema(closes, slow);

    let mut macd_line = vec![None; len];
    for i in 0..len {
        if let (Some(f), Some(s)) = (fast_ema[i], slow_ema[i]) {
            let diff = f - s;
            macd_line[i] = diff.is_finite().then_some(diff);
        }
    }

    // Signal: EMA of the defined portion of the MACD line, re-aligned.
    let start = macd_line.iter().position(Option::is_some);
    let mut signal_line = vec![None; len];
    if let Some(start) = start {
        let defined: Vec<f64> = macd_line[start..].iter().map_while(|v| *v).collect();
        for (j, v) in ema(&defined, signal_window).into_iter().enumerate() {
            signal_line[start + j] = v;
        }
    }

    let mut histogram = vec![None; len];
    for i in 0..len {
        if let (Some(m), Some(s)) = (macd_line[i], signal_line[i]) {
            histogram[i] = Some(m - s);
        }
    }

    MacdOutput {
        macd: macd_line,
        signal: signal_line,
        histogram,
    }
}

/// MACD with the standard 12 / 26 / 9 windows.
pub fn macd_standard(closes: &[f64]) -> MacdOutput {
    macd(closes, FAST, SLOW, SIGNAL)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macd_empty_input() {
        let out = macd_standard(&[]);
        assert!(out.macd.is_empty());
        assert!(out.signal.is_empty());
        assert!(out.histogram.is_empty());
    }

    #[test]
    fn macd_short_input_is_all_undefined() {
        let closes: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let out = macd_standard(&closes);
        assert_eq!(out.macd.len(), 10);
        assert!(out.macd.iter().all(Option::is_none));
        assert!(out.signal.iter().all(Option::is_none));
        assert!(out.histogram.iter().all(Option::is_none));
    }

    #[test]
    fn macd_zero_window_guard() {
        let closes: Vec<f64> = (1..=60).map(|x| x as f64).collect();
        let out = macd(&closes, 0, 26, 9);
        assert!(out.macd.iter().all(Option::is_none));
    }

    #[test]
    fn macd_alignment() {
        let closes: Vec<f64> = (1..=60).map(|x| x as f64).collect();
        let out = macd_standard(&closes);
        assert_eq!(out.macd.len(), closes.len());
        assert_eq!(out.signal.len(), closes.len());
        assert_eq!(out.histogram.len(), closes.len());

        // MACD line defined from index slow - 1 = 25.
        assert!(out.macd[..25].iter().all(Option::is_none));
        assert!(out.macd[25].is_some());

        // Signal defined from index slow + signal - 2 = 33.
        assert!(out.signal[..33].iter().all(Option::is_none));
        assert!(out.signal[33].is_some());

        // Histogram defined exactly where both lines are.
        for i in 0..closes.len() {
            assert_eq!(
                out.histogram[i].is_some(),
                out.macd[i].is_some() && out.signal[i].is_some()
            );
        }
    }

    #[test]
    fn macd_constant_series_is_zero() {
        let closes = vec![50.0; 80];
        let out = macd_standard(&closes);
        for v in out.macd.iter().flatten() {
            assert!(v.abs() < 1e-10);
        }
        for v in out.signal.iter().flatten() {
            assert!(v.abs() < 1e-10);
        }
        for v in out.histogram.iter().flatten() {
            assert!(v.abs() < 1e-10);
        }
    }

    #[test]
    fn macd_positive_in_sustained_uptrend() {
        // In a rising market the fast EMA sits above the slow EMA.
        let closes: Vec<f64> = (1..=120).map(|x| x as f64).collect();
        let out = macd_standard(&closes);
        let last = out.macd.last().unwrap().unwrap();
        assert!(last > 0.0, "expected positive MACD, got {last}");
    }
}
