// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Middle band = SMA(window), upper = middle + k*σ, lower = middle - k*σ,
// where σ is the sample standard deviation of the closes in the window.
//
// All three bands are aligned to the input series with `None` padding for
// the lead-in window.
// =============================================================================

/// The three aligned Bollinger band series.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerOutput {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Compute Bollinger bands for `closes` with look-back `window` and band
/// width `num_std` standard deviations.
///
/// Each output vector has the same length as `closes`; indices before
/// `window - 1` are `None`. Wherever the bands are defined,
/// `upper >= middle >= lower` holds (for `num_std >= 0`).
///
/// # Edge cases
/// - `window < 2` => all `None` (sample deviation needs two points)
/// - `closes.len() < window` => all `None`
/// - Non-finite intermediate values yield `None` at that index.
pub fn bollinger(closes: &[f64], window: usize, num_std: f64) -> BollingerOutput {
    let len = closes.len();
    let mut out = BollingerOutput {
        upper: vec![None; len],
        middle: vec![None; len],
        lower: vec![None; len],
    };
    if window < 2 || len < window || !num_std.is_finite() {
        return out;
    }

    let window_f = window as f64;
    for i in (window - 1)..len {
        let slice = &closes[i + 1 - window..=i];
        let mean: f64 = slice.iter().sum::<f64>() / window_f;
        let variance =
            slice.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (window_f - 1.0);
        let std_dev = variance.sqrt();

        let upper = mean + num_std * std_dev;
        let lower = mean - num_std * std_dev;
        if mean.is_finite() && upper.is_finite() && lower.is_finite() {
            out.middle[i] = Some(mean);
            out.upper[i] = Some(upper);
            out.lower[i] = Some(lower);
        }
    }

    out
}
