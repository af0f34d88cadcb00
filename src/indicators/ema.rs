// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (window + 1)
//   EMA_t      = close_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The very first EMA value is seeded with the SMA of the first `window`
// closes, so the series is defined from index `window - 1` onward.
// =============================================================================

/// Compute the aligned EMA series for `closes` with look-back `window`.
///
/// The result always has the same length as `closes`; indices before
/// `window - 1` are `None`.
///
/// # Edge cases
/// - `window == 0` => all `None` (division by zero guard)
/// - `closes.len() < 2` => all `None`
/// - A non-finite value poisons the recursion, so the remainder of the
///   series is `None` rather than untrustworthy numbers.
pub fn ema(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; closes.len()];
    if window == 0 || closes.len() < 2 || closes.len() < window {
        return result;
    }

    let multiplier = 2.0 / (window + 1) as f64;

    // Seed: SMA of the first `window` closes.
    let seed: f64 = closes[..window].iter().sum::<f64>() / window as f64;
    if !seed.is_finite() {
        return result;
    }
    result[window - 1] = Some(seed);

    let mut prev = seed;
    for (i, &close) in closes.iter().enumerate().skip(window) {
        let value = close * multiplier + prev * (1.0 - multiplier);
        if !value.is_finite() {
            // The recursion is broken from here on; leave the rest undefined.
            break;
        }
        result[i] = Some(value);
        prev = value;
    }

    result
}
