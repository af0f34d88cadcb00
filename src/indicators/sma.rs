// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// SMA at index i is the arithmetic mean of the closes in [i - w + 1, i].
// The output is aligned to the input: one element per close, `None` for the
// indices where the window has insufficient history.
// =============================================================================

/// Compute the aligned SMA series for `closes` with look-back `window`.
///
/// The result always has the same length as `closes`.
///
/// # Edge cases
/// - `window == 0` => all `None` (division by zero guard)
/// - `closes.len() < 2` => all `None` (too short to chart anything useful)
/// - Indices `< window - 1` => `None`
/// - A non-finite mean yields `None` at that index only.
pub fn sma(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; closes.len()];
    if window == 0 || closes.len() < 2 || closes.len() < window {
        return result;
    }

    // Rolling sum: subtract the value leaving the window, add the new one.
    let mut sum: f64 = closes[..window].iter().sum();
    let window_f = window as f64;

    for i in (window - 1)..closes.len() {
        if i >= window {
            sum += closes[i] - closes[i - window];
        }
        let mean = sum / window_f;
        result[i] = mean.is_finite().then_some(mean);
    }

    result
}
