// =============================================================================
// Relative Strength Index (RSI) — rolling-mean variant
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — Average gain / average loss = rolling mean of the last `window`
//          gains / losses.
// Step 3 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// If the average loss is zero (only gains in the window), RSI is 100.
// If gains AND losses are both zero (flat window), there is no volatility to
// measure and the value is undefined rather than a division artifact.
//
// Thresholds:  RSI > 70 => OVERBOUGHT,  RSI < 30 => OVERSOLD.
// =============================================================================

/// Compute the aligned RSI series for `closes` with look-back `window`.
///
/// The result always has the same length as `closes`. The first value appears
/// at index `window` (the first `window` deltas are consumed by the rolling
/// averages).
///
/// # Edge cases
/// - `window == 0` => all `None`
/// - `closes.len() < window + 1` => all `None`
/// - Flat window (no movement) => `None` at that index
/// - Every defined value lies in [0, 100].
pub fn rsi(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; closes.len()];
    if window == 0 || closes.len() < window + 1 {
        return result;
    }

    let gains: Vec<f64> = closes
        .windows(2)
        .map(|w| (w[1] - w[0]).max(0.0))
        .collect();
    let losses: Vec<f64> = closes
        .windows(2)
        .map(|w| (w[0] - w[1]).max(0.0))
        .collect();

    let window_f = window as f64;
    let mut gain_sum: f64 = gains[..window].iter().sum();
    let mut loss_sum: f64 = losses[..window].iter().sum();

    // The rolling window of deltas [i - window .. i] ends at close index i.
    for i in window..closes.len() {
        if i > window {
            gain_sum += gains[i - 1] - gains[i - 1 - window];
            loss_sum += losses[i - 1] - losses[i - 1 - window];
        }
        result[i] = rsi_from_averages(gain_sum / window_f, loss_sum / window_f);
    }

    result
}

/// The most recent RSI value together with a human-readable label.
///
/// Returns `None` when there is insufficient data or the window is flat.
pub fn current_rsi(closes: &[f64], window: usize) -> Option<(f64, &'static str)> {
    let value = rsi(closes, window).into_iter().flatten().last()?;

    let label = if value >= 70.0 {
        "OVERBOUGHT"
    } else if value <= 30.0 {
        "OVERSOLD"
    } else {
        "NEUTRAL"
    };

    Some((value, label))
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// - Both averages zero => `None` (zero volatility, RSI undefined).
/// - Average loss zero (only gains) => 100.0.
/// - Non-finite results => `None`.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_gain == 0.0 && avg_loss == 0.0 {
        return None;
    }
    let value = if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };
    value.is_finite().then_some(value)
}
